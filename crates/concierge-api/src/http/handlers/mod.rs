//! HTTP request handlers for the REST API.

pub mod admin;
pub mod chat;
pub mod inquiry;
