//! TicketStore trait definition.
//!
//! Tickets live in a flat file in production; the trait keeps the service
//! independent of that format. Follows the RPITIT repository pattern.

use supportdesk_types::error::TicketError;
use supportdesk_types::ticket::Ticket;

/// Persistence port for support tickets.
///
/// Implementations live in supportdesk-infra (e.g., `CsvTicketStore`).
pub trait TicketStore: Send + Sync {
    /// Prepare the backing storage (create the file and header if missing).
    fn init(&self) -> impl std::future::Future<Output = Result<(), TicketError>> + Send;

    /// Append one ticket.
    fn append(
        &self,
        ticket: &Ticket,
    ) -> impl std::future::Future<Output = Result<(), TicketError>> + Send;

    /// Every ticket, in storage order, or `None` when no storage exists yet.
    /// Presence and contents come from one read.
    fn load_if_present(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<Ticket>>, TicketError>> + Send;

    /// Every ticket, in storage order. Missing storage yields an empty list.
    fn load_all(&self) -> impl std::future::Future<Output = Result<Vec<Ticket>, TicketError>> + Send {
        async { Ok(self.load_if_present().await?.unwrap_or_default()) }
    }
}
