//! Support ticket types.
//!
//! A ticket is one row of the tickets CSV file. Field names match the CSV
//! header exactly, so the same struct drives both the file format and the
//! JSON returned by the API.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::TicketError;

/// Column order of the tickets CSV file.
pub const TICKET_CSV_HEADER: [&str; 8] = [
    "ticket_id",
    "user_id",
    "session_id",
    "subject",
    "description",
    "priority",
    "status",
    "created_at",
];

/// Urgency of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    /// All priorities, in the order offered to the model.
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketPriority::Low => write!(f, "low"),
            TicketPriority::Medium => write!(f, "medium"),
            TicketPriority::High => write!(f, "high"),
            TicketPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for TicketPriority {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "urgent" => Ok(TicketPriority::Urgent),
            _ => Err(TicketError::InvalidPriority(s.to_string())),
        }
    }
}

/// Lifecycle status of a ticket. Only `Open` is ever written by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::Resolved => write!(f, "resolved"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A support ticket as stored in the CSV file.
///
/// `priority` and `status` are kept as plain strings because rows are read
/// back without schema enforcement; edits made by hand survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub user_id: String,
    pub session_id: String,
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub created_at: String,
}

impl Ticket {
    /// Build a fresh `open` ticket with a new id and the current local time.
    pub fn open(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        priority: TicketPriority,
    ) -> Self {
        Self {
            ticket_id: generate_ticket_id(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            subject: subject.into(),
            description: description.into(),
            priority: priority.to_string(),
            status: TicketStatus::Open.to_string(),
            created_at: format_created_at(&Local::now()),
        }
    }

    /// One-line summary used in status listings.
    pub fn summary_line(&self) -> String {
        format!(
            "- {}: {} - {} ({})",
            self.ticket_id, self.subject, self.status, self.priority
        )
    }
}

/// `TKT-` followed by 8 uppercase hex characters.
pub fn generate_ticket_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TKT-{}", hex[..8].to_uppercase())
}

/// ISO-8601 local timestamp without offset, microsecond precision.
pub fn format_created_at(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ticket_id_format() {
        let id = generate_ticket_id();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("TKT-"));
        assert!(
            id[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_ticket_ids_are_unique() {
        assert_ne!(generate_ticket_id(), generate_ticket_id());
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<TicketPriority>().unwrap(), TicketPriority::High);
        assert_eq!(" urgent ".parse::<TicketPriority>().unwrap(), TicketPriority::Urgent);
        assert!(matches!(
            "critical".parse::<TicketPriority>(),
            Err(TicketError::InvalidPriority(value)) if value == "critical"
        ));
    }

    #[test]
    fn test_open_ticket_defaults() {
        let ticket = Ticket::open("u1", "s1", "Login", "Cannot log in", TicketPriority::Medium);
        assert_eq!(ticket.status, "open");
        assert_eq!(ticket.priority, "medium");
        assert_eq!(ticket.user_id, "u1");
        assert!(ticket.created_at.contains('T'));
    }

    #[test]
    fn test_created_at_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(format_created_at(&at), "2024-03-05T14:07:09.000000");
    }

    #[test]
    fn test_summary_line() {
        let ticket = Ticket {
            ticket_id: "TKT-ABCDEF12".to_string(),
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            subject: "Refund".to_string(),
            description: "Charged twice".to_string(),
            priority: "high".to_string(),
            status: "open".to_string(),
            created_at: "2024-01-01T00:00:00.000000".to_string(),
        };
        assert_eq!(ticket.summary_line(), "- TKT-ABCDEF12: Refund - open (high)");
    }
}
