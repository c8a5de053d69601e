//! Welcome banner shown when a chat session starts.

use console::style;

pub fn print_welcome_banner(provider: &str, model: &str, session_id: &str) {
    println!();
    println!("  {} {}", "*", style("Concierge").cyan().bold());
    println!(
        "  {}",
        style("Ask about automation, marketing, ad creatives, or app development.").dim()
    );
    println!();
    println!(
        "  {}  {}",
        style("Model:").bold(),
        style(format!("{provider} / {model}")).dim()
    );
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, /exit or Ctrl+D to end the chat").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
