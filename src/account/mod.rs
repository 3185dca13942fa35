// Mastodon account adapter — bootstrap, history seeding and live streaming.
//
// A MastodonAccount owns everything one account needs for its lifetime:
// credentials, the API handle and the cached current-user profile. `run`
// drives the whole pipeline on the caller's task:
//   1. session: fetch the current user, emit a LoginEvent
//   2. seed: last 40 notifications, then last 40 home statuses
//   3. stream: live user stream until cancelled
// Everything goes out over a single unbounded channel, in that order.

pub mod normalize;
pub mod sanitize;
pub mod seed;
pub mod session;
pub mod stream;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::events::AccountEvent;
use crate::mastodon::api::MastodonApi;
use crate::mastodon::client::{Credentials, MastodonClient};
use crate::mastodon::models::Account;

/// Producer side of the outbound event channel.
pub type EventSender = mpsc::UnboundedSender<AccountEvent>;

/// Fatal failures of an adapter run. Each variant names the phase that failed.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("failed to fetch current user")]
    CurrentUser(#[source] anyhow::Error),

    #[error("failed to fetch notifications")]
    Notifications(#[source] anyhow::Error),

    #[error("failed to fetch home timeline")]
    HomeTimeline(#[source] anyhow::Error),

    #[error("failed to open user stream")]
    StreamOpen(#[source] anyhow::Error),

    #[error("user stream failed")]
    Stream(#[source] anyhow::Error),

    #[error("user stream closed by server")]
    StreamClosed,

    #[error("event channel closed by consumer")]
    EventChannelClosed,
}

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No access token is configured; nothing was fetched or emitted.
    NotAuthenticated,
    /// The cancel signal stopped the live stream.
    Cancelled,
}

/// Push one event onto the outbound channel.
pub(crate) fn emit(events: &EventSender, event: AccountEvent) -> Result<(), AdapterError> {
    events
        .send(event)
        .map_err(|_| AdapterError::EventChannelClosed)
}

/// One Mastodon account.
pub struct MastodonAccount {
    credentials: Credentials,
    api: Arc<dyn MastodonApi>,
    me: Option<Account>,
}

impl MastodonAccount {
    /// Create an account backed by the HTTP client.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = MastodonClient::new(credentials)?;
        Ok(Self {
            credentials: client.credentials().clone(),
            api: Arc::new(client),
            me: None,
        })
    }

    /// Create an account backed by any MastodonApi implementation.
    pub fn with_api(credentials: Credentials, api: Arc<dyn MastodonApi>) -> Self {
        Self {
            credentials,
            api,
            me: None,
        }
    }

    /// Register the app with `instance` and return an unauthenticated account,
    /// the URL the user must visit, and the redirect URI used.
    pub async fn register(instance: &str) -> Result<(Self, String, String)> {
        let registration = MastodonClient::register_app(instance).await?;
        let account = Self::new(registration.credentials)?;
        Ok((account, registration.auth_url, registration.redirect_uri))
    }

    /// Exchange the authorization code shown to the user for an access token.
    ///
    /// Returns the complete credentials (instance, token, client id, client
    /// secret) for the caller to persist.
    pub async fn authenticate(&mut self, code: &str) -> Result<Credentials> {
        let mut client = MastodonClient::new(self.credentials.clone())?;
        let credentials = client.authenticate(code).await?;
        self.credentials = credentials.clone();
        self.api = Arc::new(client);
        Ok(credentials)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The current user's profile, cached by the last successful bootstrap.
    pub fn current_user(&self) -> Option<&Account> {
        self.me.as_ref()
    }

    /// Run the account until the live stream is cancelled or a phase fails.
    ///
    /// The cancel signal is only observed once seeding has finished: a
    /// signal raised earlier takes effect before the stream is opened.
    /// `events` is dropped on return, which closes the channel for the consumer.
    pub async fn run(
        &mut self,
        events: EventSender,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<RunOutcome, AdapterError> {
        if !self.credentials.is_authenticated() {
            debug!(instance = %self.credentials.instance, "No access token configured, not running");
            return Ok(RunOutcome::NotAuthenticated);
        }

        let me = session::bootstrap(self.api.as_ref(), &events).await?;
        self.me = Some(me);

        seed::seed_history(self.api.as_ref(), &events).await?;

        stream::run_live(self.api.as_ref(), &events, &mut cancel).await?;

        info!(instance = %self.credentials.instance, "Account run finished");
        Ok(RunOutcome::Cancelled)
    }

    /// Publish a new status.
    pub async fn post(&self, message: &str) -> Result<()> {
        self.api.post(message).await
    }

    /// Publish a reply to `reply_to_id`.
    pub async fn reply(&self, reply_to_id: &str, message: &str) -> Result<()> {
        self.api.reply(reply_to_id, message).await
    }

    /// Boost a status.
    pub async fn boost(&self, id: &str) -> Result<()> {
        self.api.boost(id).await
    }

    /// Favourite a status.
    pub async fn favourite(&self, id: &str) -> Result<()> {
        self.api.favourite(id).await
    }
}
