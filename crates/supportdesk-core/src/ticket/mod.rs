//! Support tickets: the storage port and the service the tools call.

pub mod service;
pub mod store;
