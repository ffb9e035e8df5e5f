//! The notification engine.
//!
//! [`NotificationEngine`] ingests activity events and filters them
//! against each recipient's preference matrix; [`Dispatcher`] fans stored
//! notifications out to live connections; [`Inbox`] exposes the
//! client-facing read-state operations.

pub mod dispatch;
pub mod engine;
pub mod inbox;

pub use dispatch::Dispatcher;
pub use engine::{IngestOutcome, NotificationEngine};
pub use inbox::Inbox;
