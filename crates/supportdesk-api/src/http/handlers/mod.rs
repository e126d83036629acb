//! HTTP request handlers for the REST API.

pub mod chat;
pub mod health;
pub mod memories;
pub mod session;
pub mod tickets;
