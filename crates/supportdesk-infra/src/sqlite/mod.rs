//! SQLite storage layer.
//!
//! Memory repository backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod memory;
pub mod pool;
