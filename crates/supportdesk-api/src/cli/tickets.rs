//! `supportdesk tickets`: list tickets as a table or JSON.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use supportdesk_core::ticket::service::TicketService;
use supportdesk_core::ticket::store::TicketStore;
use supportdesk_types::ticket::Ticket;

/// Print tickets, optionally filtered by user.
pub async fn list_tickets<S: TicketStore>(
    service: &TicketService<S>,
    user_id: Option<&str>,
    json: bool,
) -> Result<()> {
    let tickets = service.list_tickets(user_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
        return Ok(());
    }

    if tickets.is_empty() {
        println!();
        println!("  {} No tickets found.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", ticket_table(&tickets));
    println!();
    println!("  {}", style(format!("{} ticket(s)", tickets.len())).dim());
    println!();
    Ok(())
}

/// Build the ticket table.
pub fn ticket_table(tickets: &[Ticket]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Ticket").fg(Color::White),
        Cell::new("User").fg(Color::White),
        Cell::new("Subject").fg(Color::White),
        Cell::new("Priority").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for ticket in tickets {
        let priority = match ticket.priority.as_str() {
            "urgent" => Cell::new(&ticket.priority).fg(Color::Red),
            "high" => Cell::new(&ticket.priority).fg(Color::Yellow),
            _ => Cell::new(&ticket.priority),
        };
        // Seconds are enough for a listing.
        let created = ticket.created_at.get(..19).unwrap_or(&ticket.created_at);

        table.add_row(vec![
            Cell::new(&ticket.ticket_id).fg(Color::Cyan),
            Cell::new(&ticket.user_id),
            Cell::new(truncate(&ticket.subject, 50)),
            priority,
            Cell::new(&ticket.status).fg(Color::Green),
            Cell::new(created).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Cut `text` to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
