//! Activity event bus and external delivery channels.
//!
//! This crate provides the producer-facing building blocks of the
//! notification engine:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ActivityEvent`] — the canonical activity event envelope.
//! - [`delivery`] — external delivery collaborators (email, push).

pub mod bus;
pub mod delivery;

pub use bus::{ActivityEvent, EventBus};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::push::PushDelivery;
