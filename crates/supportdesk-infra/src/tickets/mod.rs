//! Ticket storage adapters.

pub mod csv_store;
