//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(user_id: &str, session_id: &str, provider: &str) {
    let rule = "=".repeat(60);

    println!();
    println!("  {}", style(&rule).dim());
    println!("  {}", style("Customer Support Assistant").cyan().bold());
    println!(
        "  {}",
        style("Memory is automatically persisted across sessions").dim()
    );
    println!("  {}", style(&rule).dim());
    println!();
    println!("  {}     {}", style("User:").bold(), style(user_id).dim());
    println!("  {}  {}", style("Session:").bold(), style(session_id).dim());
    println!("  {}    {}", style("Agent:").bold(), style(provider).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, 'exit' or Ctrl+D to quit").dim()
    );
    println!();
}
