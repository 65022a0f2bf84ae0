//! Outbound clients, persistence adapters and shared helpers

pub mod client;
pub mod persistence;
pub mod util;
