//! Interactive chat loop: the terminal rendering of the chat widget.
//!
//! Submodules handle input, markdown rendering, the welcome banner, and
//! slash commands. The session itself lives in `concierge_core`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
