//! Notification type enumeration and the per-user preference matrix.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::channels::Channel;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// The closed set of activity categories that can produce a notification.
///
/// There is no catch-all variant: unknown type strings fail to parse and
/// are rejected at the ingestion/preference boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    NewVideo,
    CommentReply,
    VideoComment,
    VideoLike,
    CommentLike,
    NewSubscriber,
    PlaylistAdd,
    Mention,
    Milestone,
    LiveStream,
}

impl NotificationType {
    /// Every notification type, in display order.
    pub const ALL: [NotificationType; 10] = [
        NotificationType::NewVideo,
        NotificationType::CommentReply,
        NotificationType::VideoComment,
        NotificationType::VideoLike,
        NotificationType::CommentLike,
        NotificationType::NewSubscriber,
        NotificationType::PlaylistAdd,
        NotificationType::Mention,
        NotificationType::Milestone,
        NotificationType::LiveStream,
    ];

    /// The wire name stored in the `notifications.notification_type`
    /// column and used as preference-document keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::NewVideo => "new_video",
            NotificationType::CommentReply => "comment_reply",
            NotificationType::VideoComment => "video_comment",
            NotificationType::VideoLike => "video_like",
            NotificationType::CommentLike => "comment_like",
            NotificationType::NewSubscriber => "new_subscriber",
            NotificationType::PlaylistAdd => "playlist_add",
            NotificationType::Mention => "mention",
            NotificationType::Milestone => "milestone",
            NotificationType::LiveStream => "live_stream",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!("unknown notification type: {s}"))
            })
    }
}

impl TryFrom<String> for NotificationType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// ChannelPrefs
// ---------------------------------------------------------------------------

/// Per-channel map from notification type to enabled flag.
///
/// Types missing from the map read as enabled, so a preference document
/// written before a new type shipped keeps notifying for it; the full
/// matrix is materialized by [`normalize`](ChannelPrefs::normalize)
/// before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelPrefs(BTreeMap<NotificationType, bool>);

impl ChannelPrefs {
    /// A bucket with every type set to `enabled`.
    pub fn all(enabled: bool) -> Self {
        Self(
            NotificationType::ALL
                .iter()
                .map(|ty| (*ty, enabled))
                .collect(),
        )
    }

    /// Whether `ty` is enabled on this channel. Missing entries default
    /// to enabled.
    pub fn enabled(&self, ty: NotificationType) -> bool {
        self.0.get(&ty).copied().unwrap_or(true)
    }

    /// Set the flag for a single type.
    pub fn set(&mut self, ty: NotificationType, enabled: bool) {
        self.0.insert(ty, enabled);
    }

    /// Set the flag for every type at once.
    pub fn set_all(&mut self, enabled: bool) {
        for ty in NotificationType::ALL {
            self.0.insert(ty, enabled);
        }
    }

    /// Fill in any missing type with the enabled default.
    pub fn normalize(&mut self) {
        for ty in NotificationType::ALL {
            self.0.entry(ty).or_insert(true);
        }
    }
}

impl Default for ChannelPrefs {
    fn default() -> Self {
        Self::all(true)
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// A user's full notification preference matrix: one flag per
/// (delivery channel, notification type) pair.
///
/// A bucket absent from an incoming document deserializes to the
/// all-enabled default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub email: ChannelPrefs,
    #[serde(default)]
    pub push: ChannelPrefs,
    #[serde(default)]
    pub in_app: ChannelPrefs,
}

impl Preferences {
    /// The bucket for one delivery channel.
    pub fn channel(&self, channel: Channel) -> &ChannelPrefs {
        match channel {
            Channel::Email => &self.email,
            Channel::Push => &self.push,
            Channel::InApp => &self.in_app,
        }
    }

    /// Mutable access to the bucket for one delivery channel.
    pub fn channel_mut(&mut self, channel: Channel) -> &mut ChannelPrefs {
        match channel {
            Channel::Email => &mut self.email,
            Channel::Push => &mut self.push,
            Channel::InApp => &mut self.in_app,
        }
    }

    /// Channels whose flag for `ty` is enabled, in [`Channel::ALL`] order.
    pub fn active_channels(&self, ty: NotificationType) -> Vec<Channel> {
        Channel::ALL
            .iter()
            .copied()
            .filter(|channel| self.channel(*channel).enabled(ty))
            .collect()
    }

    /// Materialize the full matrix in every bucket.
    pub fn normalize(&mut self) {
        self.email.normalize();
        self.push.normalize();
        self.in_app.normalize();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
