//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - The DTOs the repositories and handlers exchange for that entity

pub mod notification;
pub mod preference;
