// Unified event schema — what the adapter hands to the presentation layer.
//
// Every remote shape (notification, timeline status, streamed update) is
// flattened into a MessageEvent carrying exactly one Post. The session
// bootstrap produces a single LoginEvent. Both travel over one channel
// wrapped in AccountEvent.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Source tag for events produced by the Mastodon adapter.
pub const MASTODON_SOURCE: &str = "mastodon";

/// Kind tag for post events (the only kind emitted today).
pub const POST_KIND: &str = "post";

/// One item on the outbound event channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    Login(LoginEvent),
    Message(MessageEvent),
}

/// Emitted once per successful session bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginEvent {
    pub username: String,
    pub name: String,
    pub avatar: String,
    pub profile_url: String,
    pub posts: u64,
    pub follows: u64,
    pub followers: u64,
}

/// A normalized post-carrying event.
///
/// The flags are independent: a boosted post that arrives as a notification
/// has both `notification` and `forward` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEvent {
    /// Which backend produced the event.
    pub account: String,
    pub name: String,
    pub notification: bool,
    pub mention: bool,
    pub forward: bool,
    pub like: bool,
    pub post: Post,
    /// Preview URLs of attached media, outer status first.
    pub media: Vec<String>,
}

impl MessageEvent {
    /// A plain post event from the Mastodon backend with no flags set.
    pub fn mastodon_post(post: Post) -> Self {
        Self {
            account: MASTODON_SOURCE.to_string(),
            name: POST_KIND.to_string(),
            notification: false,
            mention: false,
            forward: false,
            like: false,
            post,
            media: Vec::new(),
        }
    }
}

/// A post as the presentation layer sees it.
///
/// `author*` always describe who wrote the content. When someone else
/// boosted or favourited it, that account is in `actor*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub message_id: String,
    pub body: String,
    pub author: String,
    pub author_name: String,
    pub author_url: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
    pub actor: Option<String>,
    pub actor_name: Option<String>,
    pub reply_to_author: Option<String>,
    pub reply_to_id: Option<String>,
}
