//! Concierge CLI and REST API entry point.
//!
//! Binary name: `concierge`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod sessions;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clap_complete::generate;

use cli::{AdminAction, Cli, Commands, InquiryAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,concierge=debug",
        _ => "trace",
    };
    concierge_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "concierge", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    concierge_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::Inquiry { action } => match action {
            InquiryAction::Submit {
                name,
                email,
                message,
                project_type,
            } => {
                cli::inquiry::submit_inquiry(&state, name, email, message, project_type, cli.json)
                    .await?;
            }
        },

        Commands::Admin { action } => match action {
            AdminAction::Inquiries { key } => {
                cli::admin::list_inquiries(&state, key, cli.json).await?;
            }
            AdminAction::ChatLogs { key } => {
                cli::admin::list_chat_logs(&state, key, cli.json).await?;
            }
            AdminAction::Overview { key } => {
                cli::admin::overview(&state, key, cli.json).await?;
            }
        },

        Commands::Serve { port, host } => {
            if state.chat_service.is_none() {
                println!(
                    "  {} Chat endpoints disabled: set {} to enable them",
                    console::style("!").yellow().bold(),
                    console::style("GEMINI_API_KEY").yellow()
                );
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Concierge API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}  {}",
                console::style("Data:").bold(),
                console::style(state.data_dir.display()).dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let sessions = state.sessions.clone();
            let sweeper = Arc::clone(&sessions).spawn_idle_sweeper(Duration::from_secs(
                state.server.session_idle_timeout_secs,
            ));
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            sweeper.abort();
            close_live_sessions(&sessions).await;
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Close every session still open at shutdown and wait for their summaries.
async fn close_live_sessions(sessions: &state::ConcreteSessionRegistry) {
    let handles = sessions.close_all();

    if !handles.is_empty() {
        tracing::info!(count = handles.len(), "Waiting for chat summaries before exit");
    }
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Summarization task did not complete");
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
