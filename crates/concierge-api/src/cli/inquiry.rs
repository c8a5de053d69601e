//! Contact inquiry CLI command.

use anyhow::Result;
use console::style;

use concierge_types::inquiry::{NewInquiry, ProjectType};

use crate::state::AppState;

/// Submit a contact inquiry.
///
/// # Examples
///
/// ```bash
/// concierge inquiry submit --name Kim --email kim@example.com \
///     --message "We need an FAQ bot" --project-type ai-automation
/// ```
pub async fn submit_inquiry(
    state: &AppState,
    name: String,
    email: String,
    message: String,
    project_type: ProjectType,
    json: bool,
) -> Result<()> {
    let inquiry = state
        .inquiry_service
        .submit(NewInquiry {
            name,
            email,
            message,
            project_type,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inquiry)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Inquiry received from {} ({})",
        style("✓").green().bold(),
        style(&inquiry.name).cyan().bold(),
        style(&inquiry.email).dim()
    );
    println!(
        "  {}  {}",
        style("Type:").bold(),
        inquiry.project_type
    );
    println!(
        "  {}    {}",
        style("ID:").bold(),
        style(inquiry.id).dim()
    );
    println!();
    println!(
        "  {}",
        style("We'll get back to you within one business day.").dim()
    );
    println!();

    Ok(())
}
