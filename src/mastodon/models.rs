// Serde types for the Mastodon REST and streaming payloads.
//
// Each payload is modeled as its identifying fields plus the ones mapped into
// events; media attachments also keep their type and full-size URL. Everything
// else in the server's JSON is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Mastodon account (the current user, a status author, a notifier).
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    /// Local username, without the instance part.
    pub username: String,
    /// `username` for local accounts, `username@domain` for remote ones.
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub statuses_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub followers_count: u64,
}

/// A media attachment on a status.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAttachment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    /// Null while the server is still processing the upload.
    pub preview_url: Option<String>,
}

/// A status (toot). Boosts arrive as a status wrapping the boosted one in `reblog`.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub in_reply_to_id: Option<String>,
    pub in_reply_to_account_id: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub content: String,
    pub url: Option<String>,
    pub account: Account,
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    pub reblog: Option<Box<Status>>,
}

impl Status {
    /// Whether this status replies to another one.
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }
}

/// Notification types the adapter knows how to translate.
///
/// Anything else the server sends (follow, poll, update, admin.sign_up, ...)
/// lands in `Other` and is dropped by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NotificationKind {
    Mention,
    Reblog,
    Favourite,
    Other(String),
}

impl From<String> for NotificationKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "mention" => Self::Mention,
            "reblog" => Self::Reblog,
            "favourite" => Self::Favourite,
            _ => Self::Other(kind),
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mention => "mention",
            Self::Reblog => "reblog",
            Self::Favourite => "favourite",
            Self::Other(kind) => kind,
        }
    }
}

/// A notification addressed to the current user.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    /// The account that triggered the notification.
    pub account: Account,
    /// Present for mention, reblog and favourite; absent for follows.
    pub status: Option<Status>,
}

/// One item pushed over the user stream.
#[derive(Debug, Clone)]
pub enum StreamItem {
    Notification(Notification),
    Update(Status),
    /// An event the adapter does not translate (delete, filters_changed, ...).
    Other { event: String },
}

/// Response from `POST /api/v1/apps`.
#[derive(Debug, Clone, Deserialize)]
pub struct Application {
    pub client_id: String,
    pub client_secret: String,
}

/// Response from `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
}
