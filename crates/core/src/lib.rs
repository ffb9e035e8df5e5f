//! Shared domain types for the clipflow notification platform.
//!
//! This crate is free of I/O: it defines the id/timestamp aliases, the
//! error taxonomy, the closed delivery-channel and notification-type
//! enumerations, and the per-user preference matrix that the persistence
//! and API layers build on.

pub mod channels;
pub mod error;
pub mod notifications;
pub mod types;
