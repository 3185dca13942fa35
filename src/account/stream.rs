// Live stream loop — forward pushed items until cancelled.
//
// Waits on two things at once: the next stream item and the cancel signal.
// Cancellation is polled first, so once it is raised no further item is
// forwarded even if several are already queued. There is no reconnect: a
// connection error, or the server hanging up, ends the run with an error.

use tokio::sync::watch;
use tracing::{debug, info};

use super::normalize;
use super::{emit, AdapterError, EventSender};
use crate::events::AccountEvent;
use crate::mastodon::api::MastodonApi;
use crate::mastodon::models::StreamItem;

/// Run the live loop. Returns `Ok(())` only when cancelled.
///
/// `cancel` carries `true` once a stop is requested. A dropped sender can
/// never signal again and is treated as a stop request too.
pub async fn run_live(
    api: &dyn MastodonApi,
    events: &EventSender,
    cancel: &mut watch::Receiver<bool>,
) -> Result<(), AdapterError> {
    if *cancel.borrow_and_update() {
        info!("Cancelled before the user stream was opened");
        return Ok(());
    }

    let mut stream = api.user_stream().await.map_err(AdapterError::StreamOpen)?;

    loop {
        tokio::select! {
            biased;

            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow_and_update() {
                    info!("Cancellation requested, leaving user stream");
                    return Ok(());
                }
            }

            item = stream.recv() => match item {
                Some(Ok(item)) => dispatch(&item, events)?,
                Some(Err(e)) => return Err(AdapterError::Stream(e)),
                None => return Err(AdapterError::StreamClosed),
            },
        }
    }
}

/// Normalize one stream item and forward the result, if any.
fn dispatch(item: &StreamItem, events: &EventSender) -> Result<(), AdapterError> {
    debug!(?item, "Stream item received");

    let event = match item {
        StreamItem::Notification(notification) => normalize::from_notification(notification),
        StreamItem::Update(status) => Some(normalize::from_status(status)),
        StreamItem::Other { event } => {
            debug!(event = %event, "Ignoring stream event");
            None
        }
    };

    if let Some(event) = event {
        emit(events, AccountEvent::Message(event))?;
    }
    Ok(())
}
