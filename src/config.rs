use std::env;

use anyhow::Result;

use crate::mastodon::client::Credentials;

/// Configuration loaded from environment variables.
///
/// Secrets come from env vars (never hardcoded). The .env file is loaded
/// automatically at startup via dotenvy.
pub struct Config {
    /// Instance address, e.g. `mastodon.social` or `https://mastodon.social`.
    pub instance: String,
    /// OAuth access token. Empty until `tusk authorize` has been run.
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    /// Load configuration from environment variables. Missing values are
    /// empty strings; use the `require_*` checks before an operation needs them.
    pub fn load() -> Result<Self> {
        Ok(Self {
            instance: env::var("MASTODON_INSTANCE").unwrap_or_default(),
            access_token: env::var("MASTODON_ACCESS_TOKEN").unwrap_or_default(),
            client_id: env::var("MASTODON_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("MASTODON_CLIENT_SECRET").unwrap_or_default(),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            instance: self.instance.clone(),
            access_token: self.access_token.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }

    /// Check that the instance is configured.
    pub fn require_instance(&self) -> Result<()> {
        if self.instance.is_empty() {
            anyhow::bail!(
                "MASTODON_INSTANCE not set. Add it to your .env file,\n\
                 or run `tusk register <instance>` to get started."
            );
        }
        Ok(())
    }

    /// Check what `tusk run` needs. Without a token the account never
    /// connects, so nothing is required; with one, the instance must be set.
    pub fn require_run(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Ok(());
        }
        self.require_instance()
    }

    /// Check that a registered app is configured.
    /// Call this before exchanging an authorization code.
    pub fn require_client(&self) -> Result<()> {
        self.require_instance()?;
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            anyhow::bail!(
                "MASTODON_CLIENT_ID / MASTODON_CLIENT_SECRET not set.\n\
                 Run `tusk register <instance>` and add the printed values to your .env file."
            );
        }
        Ok(())
    }

    /// Check that an access token is configured.
    /// Call this before any write operation.
    pub fn require_token(&self) -> Result<()> {
        self.require_instance()?;
        if self.access_token.is_empty() {
            anyhow::bail!(
                "MASTODON_ACCESS_TOKEN not set. This operation requires authentication.\n\
                 Run `tusk authorize <code>` and add the printed token to your .env file."
            );
        }
        Ok(())
    }
}
