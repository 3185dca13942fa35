// Mastodon REST client — bearer-authenticated JSON over HTTP.
//
// Thin reqwest wrapper in the same shape as the other HTTP clients in this
// crate: one generic GET helper, one generic POST helper, and a method per
// endpoint. App registration and the OAuth code exchange happen before a
// session exists, so they live here rather than on the MastodonApi trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::api::{MastodonApi, UserStream};
use super::models::{Account, Application, Notification, Status, Token};
use super::streaming;

/// Name shown to users on the instance's authorization page.
pub const CLIENT_NAME: &str = "tusk";

/// OAuth scopes requested at registration.
pub const SCOPES: &str = "read write follow post";

/// Out-of-band redirect: the instance displays the code for the user to paste.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Instance address plus the OAuth client and token for one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub instance: String,
    pub access_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Whether an access token is present. Without one the account
    /// has not finished the authorization flow.
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }
}

/// A freshly registered app and where to send the user to authorize it.
#[derive(Debug, Clone)]
pub struct AppRegistration {
    pub credentials: Credentials,
    pub auth_url: String,
    pub redirect_uri: String,
}

/// HTTP client for one Mastodon instance.
pub struct MastodonClient {
    client: reqwest::Client,
    credentials: Credentials,
}

impl MastodonClient {
    /// Create a client for the instance named in `credentials`.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tusk/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            credentials: Credentials {
                instance: normalize_instance(&credentials.instance),
                ..credentials
            },
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Register this app with an instance and build the authorization URL.
    pub async fn register_app(instance: &str) -> Result<AppRegistration> {
        let client = Self::new(Credentials {
            instance: instance.to_string(),
            ..Credentials::default()
        })?;

        let app: Application = client
            .post_form(
                "/api/v1/apps",
                &[
                    ("client_name", CLIENT_NAME),
                    ("redirect_uris", OOB_REDIRECT_URI),
                    ("scopes", SCOPES),
                    ("website", ""),
                ],
            )
            .await
            .with_context(|| format!("Failed to register app with {instance}"))?;

        let auth_url = reqwest::Url::parse_with_params(
            &format!("{}/oauth/authorize", client.credentials.instance),
            &[
                ("client_id", app.client_id.as_str()),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("response_type", "code"),
                ("scope", SCOPES),
            ],
        )
        .context("Failed to build authorization URL")?;

        info!(instance = %client.credentials.instance, "Registered app");

        Ok(AppRegistration {
            credentials: Credentials {
                client_id: app.client_id,
                client_secret: app.client_secret,
                ..client.credentials
            },
            auth_url: auth_url.to_string(),
            redirect_uri: OOB_REDIRECT_URI.to_string(),
        })
    }

    /// Exchange an authorization code for an access token.
    ///
    /// On success the token is stored on this client and the complete
    /// credentials are returned so the caller can persist them.
    pub async fn authenticate(&mut self, code: &str) -> Result<Credentials> {
        let token: Token = self
            .post_form(
                "/oauth/token",
                &[
                    ("grant_type", "authorization_code"),
                    ("client_id", self.credentials.client_id.as_str()),
                    ("client_secret", self.credentials.client_secret.as_str()),
                    ("redirect_uri", OOB_REDIRECT_URI),
                    ("code", code),
                ],
            )
            .await
            .context("Failed to exchange authorization code")?;

        self.credentials.access_token = token.access_token;
        info!(instance = %self.credentials.instance, "Obtained access token");
        Ok(self.credentials.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.credentials.instance, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.credentials.is_authenticated() {
            request.bearer_auth(&self.credentials.access_token)
        } else {
            request
        }
    }

    /// Send a request and return the response if it was a 2xx.
    async fn send(&self, request: reqwest::RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("Request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{path} returned {status}: {body}");
        }

        Ok(response)
    }

    /// GET an API endpoint and deserialize the JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!(path, "GET request");

        self.send(self.client.get(self.url(path)).query(params), path)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }

    /// POST a form to an API endpoint and deserialize the JSON response.
    async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<T> {
        debug!(path, "POST request");

        self.send(self.client.post(self.url(path)).form(form), path)
            .await?
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }
}

#[async_trait]
impl MastodonApi for MastodonClient {
    async fn current_user(&self) -> Result<Account> {
        self.get_json("/api/v1/accounts/verify_credentials", &[])
            .await
            .context("Failed to fetch current user")
    }

    async fn notifications(&self, limit: u32) -> Result<Vec<Notification>> {
        let limit = limit.to_string();
        self.get_json("/api/v1/notifications", &[("limit", &limit)])
            .await
            .context("Failed to fetch notifications")
    }

    async fn home_timeline(&self, limit: u32) -> Result<Vec<Status>> {
        let limit = limit.to_string();
        self.get_json("/api/v1/timelines/home", &[("limit", &limit)])
            .await
            .context("Failed to fetch home timeline")
    }

    async fn user_stream(&self) -> Result<UserStream> {
        let path = "/api/v1/streaming/user";
        // Instances redirect this path to a separate streaming host, and the
        // Authorization header is stripped on cross-host redirects. The query
        // token survives the redirect.
        let response = self
            .send(
                self.client
                    .get(self.url(path))
                    .query(&[("access_token", self.credentials.access_token.as_str())])
                    .header(reqwest::header::ACCEPT, "text/event-stream"),
                path,
            )
            .await
            .context("Failed to open user stream")?;

        info!(instance = %self.credentials.instance, "User stream connected");
        Ok(streaming::spawn_user_stream(response))
    }

    async fn post(&self, text: &str) -> Result<()> {
        let _: Status = self
            .post_form("/api/v1/statuses", &[("status", text)])
            .await
            .context("Failed to post status")?;
        Ok(())
    }

    async fn reply(&self, reply_to_id: &str, text: &str) -> Result<()> {
        let _: Status = self
            .post_form(
                "/api/v1/statuses",
                &[("status", text), ("in_reply_to_id", reply_to_id)],
            )
            .await
            .with_context(|| format!("Failed to reply to {reply_to_id}"))?;
        Ok(())
    }

    async fn boost(&self, id: &str) -> Result<()> {
        let _: Status = self
            .post_form(&format!("/api/v1/statuses/{id}/reblog"), &[] as &[(&str, &str)])
            .await
            .with_context(|| format!("Failed to boost {id}"))?;
        Ok(())
    }

    async fn favourite(&self, id: &str) -> Result<()> {
        let _: Status = self
            .post_form(&format!("/api/v1/statuses/{id}/favourite"), &[] as &[(&str, &str)])
            .await
            .with_context(|| format!("Failed to favourite {id}"))?;
        Ok(())
    }
}

/// Accept `mastodon.social`, `https://mastodon.social` or `https://mastodon.social/`.
pub fn normalize_instance(instance: &str) -> String {
    let instance = instance.trim().trim_end_matches('/');
    if instance.starts_with("http://") || instance.starts_with("https://") {
        instance.to_string()
    } else {
        format!("https://{instance}")
    }
}
