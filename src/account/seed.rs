// History seeding — one page of notifications, then one page of the home timeline.
//
// Runs once at startup so the presentation layer has something to show
// before the live stream delivers anything. Items are normalized in the
// order the server returns them (newest first).

use tracing::{debug, info};

use super::normalize;
use super::{emit, AdapterError, EventSender};
use crate::events::AccountEvent;
use crate::mastodon::api::MastodonApi;

/// How many notifications to fetch at startup.
pub const INITIAL_NOTIFICATIONS_COUNT: u32 = 40;

/// How many home timeline statuses to fetch at startup.
pub const INITIAL_FEED_COUNT: u32 = 40;

/// Fetch and emit the notification page, then the home timeline page.
///
/// Either fetch failing aborts the run; nothing is retried and events
/// already emitted stay emitted.
pub async fn seed_history(api: &dyn MastodonApi, events: &EventSender) -> Result<(), AdapterError> {
    let notifications = api
        .notifications(INITIAL_NOTIFICATIONS_COUNT)
        .await
        .map_err(AdapterError::Notifications)?;

    let mut emitted = 0usize;
    for notification in &notifications {
        if let Some(event) = normalize::from_notification(notification) {
            emit(events, AccountEvent::Message(event))?;
            emitted += 1;
        }
    }

    debug!(
        fetched = notifications.len(),
        emitted, "Seeded notifications"
    );

    let statuses = api
        .home_timeline(INITIAL_FEED_COUNT)
        .await
        .map_err(AdapterError::HomeTimeline)?;

    for status in &statuses {
        emit(events, AccountEvent::Message(normalize::from_status(status)))?;
    }

    info!(
        notifications = emitted,
        statuses = statuses.len(),
        "History seeded"
    );

    Ok(())
}
