//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and give in-chat access to sessions, tickets,
//! and memories without going through the agent.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// End the current session and start a fresh one.
    New,
    /// List this user's tickets.
    Tickets,
    /// Show remembered facts, optionally ranked against a query.
    Memories(Option<String>),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (trimmed, None),
    };

    match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" => Some(ChatCommand::New),
        "/tickets" => Some(ChatCommand::Tickets),
        "/memories" | "/mem" => Some(ChatCommand::Memories(arg.map(str::to_string))),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/new", "Start a new session"),
        ("/tickets", "List your support tickets"),
        ("/memories [query]", "Show what the assistant remembers"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, help) in rows {
        println!("  {}{help}", style(format!("{cmd:<20}")).cyan());
    }
    println!();
    println!(
        "  {}",
        style("'exit', 'quit', 'q' or Ctrl+D to leave; Ctrl+C keeps the chat open").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse("/new"), Some(ChatCommand::New));
        assert_eq!(parse("/tickets"), Some(ChatCommand::Tickets));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_memories_query() {
        assert_eq!(parse("/memories"), Some(ChatCommand::Memories(None)));
        assert_eq!(parse("/memories   "), Some(ChatCommand::Memories(None)));
        assert_eq!(
            parse("/memories billing address"),
            Some(ChatCommand::Memories(Some("billing address".to_string())))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
