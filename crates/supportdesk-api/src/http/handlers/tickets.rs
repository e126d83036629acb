//! GET /api/tickets: list tickets, optionally for one user.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use supportdesk_types::ticket::Ticket;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub user_id: Option<String>,
}

/// GET /api/tickets?user_id=
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let tickets = state
        .chat_service
        .tickets()
        .list_tickets(query.user_id.as_deref())
        .await?;
    Ok(Json(tickets))
}
