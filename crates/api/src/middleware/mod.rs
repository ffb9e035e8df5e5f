//! Request middleware (authentication extraction).

pub mod auth;
