//! supportdesk CLI and REST API entry point.
//!
//! Binary name: `supportdesk`
//!
//! Parses CLI arguments, loads configuration, wires storage and the agent
//! provider, then dispatches to the command handler or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use supportdesk_infra::config::{load_config, load_dotenv};
use supportdesk_infra::filesystem::resolve_data_dir;
use supportdesk_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::{AppState, open_memory, ticket_reader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "supportdesk", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    load_dotenv();
    let data_dir = resolve_data_dir();
    let config = load_config(cli.config.as_deref(), &data_dir).await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::init(config, &data_dir).await?;

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Support API listening on {}",
                    style("⚡").bold(),
                    style(format!("http://{addr}")).cyan()
                );
                println!("  {}", style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state.clone());
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            state.chat_service.shutdown().await;
            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat {
            user_id,
            session_id,
        } => {
            let state = AppState::init(config, &data_dir).await?;
            cli::chat::loop_runner::run_chat_loop(&state, &user_id, session_id).await?;
        }

        Commands::Tickets { user_id } => {
            let tickets = ticket_reader(&config, &data_dir);
            cli::tickets::list_tickets(&tickets, user_id.as_deref(), cli.json).await?;
        }

        Commands::Memories { user_id, query } => {
            let memory = open_memory(&config, &data_dir).await?;
            cli::memories::show_memories(&memory, &user_id, query.as_deref(), cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before startup"),
    }

    Ok(())
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
    tracing::info!("shutdown signal received");
}
