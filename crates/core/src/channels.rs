//! Delivery channel enumeration.
//!
//! A delivery channel is an independent path a notification can take to a
//! user (not to be confused with a video channel). The set is closed;
//! unknown channel names are rejected at the parse boundary instead of
//! flowing through as strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the three independent delivery paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Push,
    InApp,
}

impl Channel {
    /// Every delivery channel, in preference-document order.
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Push, Channel::InApp];

    /// The wire name used in preference documents, URLs, and the
    /// `notification_preferences` column set.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Push => "push",
            Channel::InApp => "in_app",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Channel::Email),
            "push" => Ok(Channel::Push),
            "in_app" => Ok(Channel::InApp),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown delivery channel: {other}"
            ))),
        }
    }
}
