//! Request handlers for the notification and preference resources.
//!
//! Handlers stay thin: they translate the authenticated identity and
//! request parameters, delegate to the notification facade or the
//! repositories, and map errors via [`AppError`](crate::error::AppError).

pub mod notification;
pub mod preference;
