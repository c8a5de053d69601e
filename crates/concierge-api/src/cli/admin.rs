//! Admin console CLI commands: inquiries, chat-logs, overview.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use dialoguer::Password;

use crate::state::AppState;

/// Use the given key, or prompt for it with hidden input.
fn resolve_key(key: Option<String>) -> Result<String> {
    match key {
        Some(k) => Ok(k),
        None => Ok(Password::new()
            .with_prompt(format!("Enter {}", style("admin access key").bold()))
            .interact()?),
    }
}

/// Shorten `text` to at most `max` characters for table display.
fn preview(text: &str, max: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > max {
        let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}

fn print_count(count: usize, noun: &str) {
    println!();
    println!(
        "  {} {noun}{}",
        style(count).bold(),
        if count == 1 { "" } else { "s" }
    );
    println!();
}

/// List all contact inquiries.
pub async fn list_inquiries(state: &AppState, key: Option<String>, json: bool) -> Result<()> {
    let key = resolve_key(key)?;
    let inquiries = state.admin_service.list_inquiries(&key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inquiries)?);
        return Ok(());
    }

    if inquiries.is_empty() {
        println!();
        println!("  {} No inquiries yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Received").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for inquiry in &inquiries {
        table.add_row(vec![
            Cell::new(inquiry.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            Cell::new(&inquiry.name).fg(Color::Cyan),
            Cell::new(&inquiry.email),
            Cell::new(inquiry.project_type.to_string()).fg(Color::Yellow),
            Cell::new(preview(&inquiry.message, 60)),
        ]);
    }

    println!();
    println!("{table}");
    print_count(inquiries.len(), "inquiry record");

    Ok(())
}

/// List all chat session summaries.
pub async fn list_chat_logs(state: &AppState, key: Option<String>, json: bool) -> Result<()> {
    let key = resolve_key(key)?;
    let logs = state.admin_service.list_chat_logs(&key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }

    if logs.is_empty() {
        println!();
        println!("  {} No chat logs yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Closed").fg(Color::White),
        Cell::new("Summary").fg(Color::White),
        Cell::new("Transcript").fg(Color::White),
    ]);

    for log in &logs {
        table.add_row(vec![
            Cell::new(log.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            Cell::new(&log.structured_text),
            Cell::new(preview(&log.raw_transcript_text, 80)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    print_count(logs.len(), "chat log");

    Ok(())
}

/// Show how many inquiries and chat logs are stored.
pub async fn overview(state: &AppState, key: Option<String>, json: bool) -> Result<()> {
    let key = resolve_key(key)?;
    let overview = state.admin_service.overview(&key).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Concierge admin").cyan().bold());
    println!();
    println!(
        "  {}   {}",
        style("Inquiries:").bold(),
        overview.inquiry_count
    );
    println!(
        "  {}   {}",
        style("Chat logs:").bold(),
        overview.chat_log_count
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("hello there", 20), "hello there");
    }

    #[test]
    fn test_preview_collapses_newlines() {
        assert_eq!(preview("USER: hi\nASSISTANT: hello", 40), "USER: hi ASSISTANT: hello");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "안녕하세요 반갑습니다 무엇을 도와드릴까요";
        let out = preview(text, 8);
        assert_eq!(out.chars().count(), 8);
        assert!(out.ends_with("..."));
    }
}
