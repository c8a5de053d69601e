//! Main interactive chat loop.
//!
//! Opens a session, renders the greeting, then alternates between reading a
//! line and sending it. Ending the chat closes the session and waits for the
//! detached summarization so the process does not exit before the write.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use concierge_types::chat::{RejectReason, SendOutcome, Transcript, Turn};
use concierge_types::llm::MessageRole;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use crate::state::AppState;

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

fn print_turn(renderer: &ChatRenderer, turn: &Turn) {
    match turn.role() {
        MessageRole::User => {
            println!("  {} {}", style("You >").green().bold(), turn.text());
        }
        MessageRole::Assistant => {
            let rendered = renderer.render(turn.text());
            println!("  {} {}", style("Concierge >").cyan().bold(), rendered.trim());
        }
    }
}

fn print_history(renderer: &ChatRenderer, transcript: &Transcript) {
    println!();
    for turn in transcript {
        print_turn(renderer, turn);
    }
    println!();
}

/// Run an interactive chat session until the user leaves.
pub async fn run_chat_loop(state: &AppState) -> Result<()> {
    let chat_service = state.chat()?;
    let session = chat_service.open_session();
    let session_id = session.id();
    let renderer = ChatRenderer::new();

    info!(session_id = %session_id, "Chat session started");
    print_welcome_banner(
        chat_service.provider_name(),
        &chat_service.settings().model,
        &session_id.to_string(),
    );
    print_turn(&renderer, chat_service.settings().greeting());
    println!();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Type /exit or press Ctrl+D to end the chat.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => {
                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::History => print_history(&renderer, &session.transcript()),
                        ChatCommand::Exit => break,
                        ChatCommand::Unknown(name) => println!(
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        ),
                    }
                    continue;
                }

                let thinking = spinner("thinking...")?;
                let outcome = session.send(&text).await;
                thinking.finish_and_clear();

                match outcome {
                    SendOutcome::Replied | SendOutcome::FellBack(_) => {
                        if let SendOutcome::FellBack(reason) = outcome {
                            warn!(session_id = %session_id, ?reason, "Showing fallback reply");
                        }
                        let transcript = session.transcript();
                        if let Some(reply) = transcript.last() {
                            println!();
                            print_turn(&renderer, reply);
                            println!();
                        }
                    }
                    SendOutcome::Rejected(RejectReason::EmptyInput) => {}
                    SendOutcome::Rejected(reason) => {
                        println!(
                            "\n  {} Message not sent ({reason:?}).\n",
                            style("!").yellow().bold()
                        );
                    }
                    SendOutcome::DiscardedAfterClose => break,
                }
            }
        }
    }

    chat_input.flush();
    println!("\n  {}", style("Session ended.").dim());

    if let Some(summarization) = session.close() {
        let saving = spinner("saving conversation summary...")?;
        if let Err(e) = summarization.await {
            warn!(session_id = %session_id, error = %e, "Summarization task did not complete");
        }
        saving.finish_and_clear();
    }

    info!(session_id = %session_id, turns = session.transcript().len(), "Chat session closed");
    Ok(())
}
