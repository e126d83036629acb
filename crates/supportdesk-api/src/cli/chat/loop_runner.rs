//! Main chat loop orchestration.
//!
//! Resolves the user's session, prints the banner, then reads lines until
//! the user leaves. Each message is one support turn through the chat
//! service; slash commands are handled locally. On exit the loop waits for
//! background memory work before returning.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use supportdesk_types::chat::ChatRequest;

use crate::cli::{memories, tickets};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template);
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run the interactive chat loop for `user_id`.
pub async fn run_chat_loop(
    state: &AppState,
    user_id: &str,
    requested_session: Option<String>,
) -> anyhow::Result<()> {
    let chat = &state.chat_service;
    let memory = chat.memory();
    let attribution = memory.attribution(user_id);
    let mut session_id = memory
        .resolve_session(&attribution, requested_session.as_deref())
        .await?;

    print_welcome_banner(user_id, &session_id, chat.provider().name());

    let renderer = ChatRenderer::new();
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Exit => break,
            InputEvent::Blank => continue,
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Type 'exit' or press Ctrl+D to leave, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => break,
                ChatCommand::New => match memory.new_session(&attribution).await {
                    Ok(id) => {
                        println!(
                            "\n  {} New session started: {}\n",
                            style("*").cyan().bold(),
                            style(&id).dim()
                        );
                        session_id = id;
                    }
                    Err(e) => println!("\n  {} Error: {e}\n", style("!").red().bold()),
                },
                ChatCommand::Tickets => {
                    if let Err(e) = tickets::list_tickets(chat.tickets(), Some(user_id), false).await
                    {
                        println!("\n  {} Error: {e}\n", style("!").red().bold());
                    }
                }
                ChatCommand::Memories(query) => {
                    if let Err(e) =
                        memories::show_memories(memory, user_id, query.as_deref(), false).await
                    {
                        println!("\n  {} Error: {e}\n", style("!").red().bold());
                    }
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let request = ChatRequest {
            message: text,
            user_id: Some(user_id.to_string()),
            session_id: Some(session_id.clone()),
        };

        let spinner = thinking_spinner();
        let result = chat.chat(&request).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                session_id = response.session_id;
                println!();
                println!("  {}", style("Agent:").cyan().bold());
                println!("{}", renderer.render(&response.response));
                if let Some(ticket_id) = response.ticket_id {
                    println!(
                        "  {} Ticket {} created",
                        style("*").green().bold(),
                        style(ticket_id).yellow()
                    );
                }
                println!();
            }
            Err(e) => {
                println!("\n  {} Error: {e}\n", style("!").red().bold());
            }
        }
    }

    chat_input.flush();
    println!();
    println!("  {}", style("Saving conversation to memory...").dim());
    chat.shutdown().await;
    info!(user_id, session_id = %session_id, "chat loop finished");
    println!("  {}", style("Session ended. Memories persisted.").dim());
    Ok(())
}
