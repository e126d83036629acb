//! Ticket operations used by the support tools and the read-only endpoints.

use supportdesk_types::error::TicketError;
use supportdesk_types::ticket::{Ticket, TicketPriority};
use tracing::info;

use crate::ticket::store::TicketStore;
use crate::tools::ToolResult;

/// Creates, lists, and reports on tickets over a [`TicketStore`].
pub struct TicketService<S: TicketStore> {
    store: S,
}

impl<S: TicketStore> TicketService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a new ticket for `user_id` and persist it.
    pub async fn create_ticket(
        &self,
        user_id: &str,
        session_id: &str,
        subject: &str,
        description: &str,
        priority: TicketPriority,
    ) -> Result<Ticket, TicketError> {
        let ticket = Ticket::open(user_id, session_id, subject, description, priority);
        self.store.append(&ticket).await?;
        info!(
            ticket_id = %ticket.ticket_id,
            user_id = %user_id,
            session_id = %session_id,
            priority = %priority,
            "Ticket created"
        );
        Ok(ticket)
    }

    /// All tickets in storage order, optionally restricted to one user.
    pub async fn list_tickets(&self, user_id: Option<&str>) -> Result<Vec<Ticket>, TicketError> {
        let tickets = self.store.load_all().await?;
        Ok(match user_id {
            Some(user_id) => tickets.into_iter().filter(|t| t.user_id == user_id).collect(),
            None => tickets,
        })
    }

    /// Status report for one ticket (by id) or for all of a user's tickets.
    ///
    /// A ticket is only visible to the user who opened it.
    pub async fn check_status(
        &self,
        user_id: &str,
        ticket_id: Option<&str>,
    ) -> Result<ToolResult, TicketError> {
        let Some(tickets) = self.store.load_if_present().await? else {
            return Ok(ToolResult::failure("No tickets found."));
        };

        match ticket_id.filter(|id| !id.is_empty()) {
            Some(ticket_id) => {
                let found = tickets
                    .into_iter()
                    .find(|t| t.ticket_id == ticket_id && t.user_id == user_id);
                Ok(match found {
                    Some(ticket) => {
                        let message = format!(
                            "Ticket {} - Status: {}, Priority: {}",
                            ticket.ticket_id, ticket.status, ticket.priority
                        );
                        ToolResult::success(message).with_ticket(ticket)
                    }
                    None => ToolResult::failure(format!("Ticket {ticket_id} not found.")),
                })
            }
            None => {
                let mine: Vec<Ticket> = tickets.into_iter().filter(|t| t.user_id == user_id).collect();
                if mine.is_empty() {
                    return Ok(ToolResult::success("You don't have any support tickets yet."));
                }
                let mut message = format!("You have {} ticket(s):", mine.len());
                for ticket in &mine {
                    message.push('\n');
                    message.push_str(&ticket.summary_line());
                }
                Ok(ToolResult::success(message).with_tickets(mine))
            }
        }
    }
}
