//! CLI command definitions for the `concierge` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod admin;
pub mod chat;
pub mod inquiry;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use concierge_types::inquiry::ProjectType;

/// Talk to the agency concierge, leave an inquiry, or browse what visitors left behind.
#[derive(Parser)]
#[command(name = "concierge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session with the concierge.
    Chat,

    /// Contact form inquiries.
    Inquiry {
        #[command(subcommand)]
        action: InquiryAction,
    },

    /// Admin console (requires the access key).
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum InquiryAction {
    /// Submit a contact inquiry.
    Submit {
        /// Your name.
        #[arg(long)]
        name: String,

        /// Email address to reply to.
        #[arg(long)]
        email: String,

        /// What you would like to discuss.
        #[arg(long)]
        message: String,

        /// Project type (e.g. "ai-automation", "marketing", "app-dev").
        #[arg(long, default_value_t = ProjectType::default())]
        project_type: ProjectType,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// List contact inquiries, newest first.
    Inquiries {
        /// Admin access key (prompted for when omitted).
        #[arg(long, env = "CONCIERGE_ADMIN_KEY")]
        key: Option<String>,
    },

    /// List chat session summaries, newest first.
    #[command(alias = "logs")]
    ChatLogs {
        /// Admin access key (prompted for when omitted).
        #[arg(long, env = "CONCIERGE_ADMIN_KEY")]
        key: Option<String>,
    },

    /// Show record counts.
    Overview {
        /// Admin access key (prompted for when omitted).
        #[arg(long, env = "CONCIERGE_ADMIN_KEY")]
        key: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inquiry_submit() {
        let cli = Cli::try_parse_from([
            "concierge",
            "inquiry",
            "submit",
            "--name",
            "Kim",
            "--email",
            "kim@example.com",
            "--message",
            "Need a chatbot",
            "--project-type",
            "app-dev",
        ])
        .unwrap();

        match cli.command {
            Commands::Inquiry {
                action:
                    InquiryAction::Submit {
                        name, project_type, ..
                    },
            } => {
                assert_eq!(name, "Kim");
                assert_eq!(project_type, ProjectType::AppDev);
            }
            _ => panic!("expected inquiry submit"),
        }
    }

    #[test]
    fn test_project_type_defaults_to_ai_automation() {
        let cli = Cli::try_parse_from([
            "concierge", "inquiry", "submit", "--name", "a", "--email", "a@b", "--message", "m",
        ])
        .unwrap();
        let Commands::Inquiry {
            action: InquiryAction::Submit { project_type, .. },
        } = cli.command
        else {
            panic!("expected inquiry submit");
        };
        assert_eq!(project_type, ProjectType::AiAutomation);
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["concierge", "-vv", "chat"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Chat));
    }
}
