// Shared fixtures: builders for Mastodon payloads and an in-memory MastodonApi.
//
// Every test binary compiles this module separately, so not every helper is
// used everywhere.
#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use tusk::mastodon::api::{MastodonApi, UserStream};
use tusk::mastodon::models::{
    Account, MediaAttachment, Notification, NotificationKind, Status, StreamItem,
};

pub fn timestamp(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn account(username: &str) -> Account {
    Account {
        id: format!("{username}-id"),
        username: username.to_string(),
        acct: format!("{username}@remote.example"),
        display_name: format!("{username} (display)"),
        url: format!("https://remote.example/@{username}"),
        avatar: format!("https://remote.example/avatars/{username}.png"),
        statuses_count: 0,
        following_count: 0,
        followers_count: 0,
    }
}

pub fn status(id: &str, author: &str) -> Status {
    Status {
        id: id.to_string(),
        created_at: timestamp("2024-05-01T12:00:00Z"),
        in_reply_to_id: None,
        in_reply_to_account_id: None,
        content: format!("<p>status {id}</p>"),
        url: Some(format!("https://remote.example/@{author}/{id}")),
        account: account(author),
        media_attachments: Vec::new(),
        reblog: None,
    }
}

pub fn media(id: &str, preview_url: Option<&str>) -> MediaAttachment {
    MediaAttachment {
        id: id.to_string(),
        kind: "image".to_string(),
        url: preview_url.map(|u| u.replace("/small/", "/original/")),
        preview_url: preview_url.map(String::from),
    }
}

pub fn notification(id: &str, kind: &str, from: &str, status: Option<Status>) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationKind::from(kind.to_string()),
        created_at: timestamp("2024-05-02T08:30:00Z"),
        account: account(from),
        status,
    }
}

/// A stream whose sending half stays with the test.
pub fn user_stream() -> (mpsc::Sender<Result<StreamItem>>, UserStream) {
    mpsc::channel(16)
}

/// In-memory MastodonApi. Pages that are `None` fail when fetched; the
/// stream can be opened once.
pub struct FakeApi {
    me: Option<Account>,
    notifications: Option<Vec<Notification>>,
    timeline: Option<Vec<Status>>,
    stream: Mutex<Option<UserStream>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(me: Account) -> Self {
        Self {
            me: Some(me),
            notifications: Some(Vec::new()),
            timeline: Some(Vec::new()),
            stream: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// An API whose current-user lookup fails.
    pub fn unauthorized() -> Self {
        Self {
            me: None,
            ..Self::new(account("nobody"))
        }
    }

    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn with_timeline(mut self, timeline: Vec<Status>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    pub fn failing_notifications(mut self) -> Self {
        self.notifications = None;
        self
    }

    pub fn failing_timeline(mut self) -> Self {
        self.timeline = None;
        self
    }

    pub fn with_stream(self, stream: UserStream) -> Self {
        *self.stream.lock().unwrap() = Some(stream);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MastodonApi for FakeApi {
    async fn current_user(&self) -> Result<Account> {
        self.record("current_user".to_string());
        self.me
            .clone()
            .ok_or_else(|| anyhow!("/api/v1/accounts/verify_credentials returned 401"))
    }

    async fn notifications(&self, limit: u32) -> Result<Vec<Notification>> {
        self.record(format!("notifications:{limit}"));
        self.notifications
            .clone()
            .ok_or_else(|| anyhow!("/api/v1/notifications returned 503"))
    }

    async fn home_timeline(&self, limit: u32) -> Result<Vec<Status>> {
        self.record(format!("home_timeline:{limit}"));
        self.timeline
            .clone()
            .ok_or_else(|| anyhow!("/api/v1/timelines/home returned 503"))
    }

    async fn user_stream(&self) -> Result<UserStream> {
        self.record("user_stream".to_string());
        self.stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow!("/api/v1/streaming/user returned 502"))
    }

    async fn post(&self, text: &str) -> Result<()> {
        self.record(format!("post:{text}"));
        Ok(())
    }

    async fn reply(&self, reply_to_id: &str, text: &str) -> Result<()> {
        self.record(format!("reply:{reply_to_id}:{text}"));
        Ok(())
    }

    async fn boost(&self, id: &str) -> Result<()> {
        self.record(format!("boost:{id}"));
        Ok(())
    }

    async fn favourite(&self, id: &str) -> Result<()> {
        self.record(format!("favourite:{id}"));
        Ok(())
    }
}
