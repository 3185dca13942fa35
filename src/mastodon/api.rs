// Collaborator trait — everything the account adapter needs from a Mastodon server.
//
// The default implementation is MastodonClient (reqwest). The adapter only
// ever talks to this trait, so tests drive it with an in-memory fake.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::models::{Account, Notification, Status, StreamItem};

/// Receiving end of an open user stream.
///
/// Each item is either a decoded stream event or the connection error that
/// ended the stream. The channel closes when the connection ends.
pub type UserStream = mpsc::Receiver<Result<StreamItem>>;

#[async_trait]
pub trait MastodonApi: Send + Sync {
    /// Fetch the authenticated user's own account.
    async fn current_user(&self) -> Result<Account>;

    /// Fetch up to `limit` of the most recent notifications, newest first.
    async fn notifications(&self, limit: u32) -> Result<Vec<Notification>>;

    /// Fetch up to `limit` of the most recent home timeline statuses, newest first.
    async fn home_timeline(&self, limit: u32) -> Result<Vec<Status>>;

    /// Open the push connection for the authenticated user.
    async fn user_stream(&self) -> Result<UserStream>;

    /// Publish a new status.
    async fn post(&self, text: &str) -> Result<()>;

    /// Publish a status replying to `reply_to_id`.
    async fn reply(&self, reply_to_id: &str, text: &str) -> Result<()>;

    /// Boost (reblog) a status.
    async fn boost(&self, id: &str) -> Result<()>;

    /// Favourite a status.
    async fn favourite(&self, id: &str) -> Result<()>;
}
