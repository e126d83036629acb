//! HTTP/REST API layer for supportdesk.
//!
//! Axum-based JSON API under `/api/` plus the static chat page at `/`.

pub mod error;
pub mod handlers;
pub mod router;
