// Event normalization — remote statuses and notifications into MessageEvents.
//
// Two entry points: `from_status` for timeline items and streamed updates,
// `from_notification` for notifications. Both build a generic Post first and
// then apply the variant-specific fields on top, so the variant always wins.

use tracing::warn;

use super::sanitize::sanitize_body;
use crate::events::{MessageEvent, Post};
use crate::mastodon::models::{Account, MediaAttachment, Notification, NotificationKind, Status};

/// Translate a status. A status that wraps a reblog becomes a forward whose
/// author is the original poster and whose actor is the booster.
pub fn from_status(status: &Status) -> MessageEvent {
    let mut event = MessageEvent::mastodon_post(Post {
        message_id: status.id.clone(),
        body: sanitize_body(&status.content),
        author: status.account.acct.clone(),
        author_name: status.account.display_name.clone(),
        author_url: status.account.url.clone(),
        avatar: status.account.avatar.clone(),
        created_at: status.created_at,
        url: status.url.clone(),
        actor: None,
        actor_name: None,
        reply_to_author: None,
        reply_to_id: None,
    });
    event.media.extend(preview_urls(&status.media_attachments));

    if let Some(inner) = &status.reblog {
        event.forward = true;
        event.media.extend(preview_urls(&inner.media_attachments));
        event.post.url = inner.url.clone();
        set_author(&mut event.post, &inner.account);
        set_actor(&mut event.post, &status.account);
    }

    event
}

/// Translate a notification, or return `None` for kinds we don't handle.
pub fn from_notification(notification: &Notification) -> Option<MessageEvent> {
    let status = match (&notification.kind, &notification.status) {
        (NotificationKind::Other(kind), _) => {
            warn!(kind = %kind, id = %notification.id, "Unknown notification type, skipping");
            return None;
        }
        (kind, None) => {
            warn!(
                kind = kind.as_str(),
                id = %notification.id,
                "Notification carries no status, skipping"
            );
            return None;
        }
        (_, Some(status)) => status,
    };

    let mut event = MessageEvent::mastodon_post(Post {
        message_id: status.id.clone(),
        body: sanitize_body(&status.content),
        author: notification.account.username.clone(),
        author_name: notification.account.display_name.clone(),
        author_url: notification.account.url.clone(),
        avatar: notification.account.avatar.clone(),
        created_at: notification.created_at,
        url: status.url.clone(),
        actor: None,
        actor_name: None,
        reply_to_author: None,
        reply_to_id: None,
    });
    event.notification = true;
    event.media.extend(preview_urls(&status.media_attachments));

    match &notification.kind {
        NotificationKind::Mention => {
            // Only replies count as mentions; a bare mention stays a plain notification.
            if status.is_reply() {
                event.mention = true;
                event.post.reply_to_author = status.in_reply_to_account_id.clone();
                event.post.reply_to_id = status.in_reply_to_id.clone();
            }
        }
        NotificationKind::Reblog => {
            event.forward = true;
            set_author(&mut event.post, &status.account);
            set_actor(&mut event.post, &notification.account);
        }
        NotificationKind::Favourite => {
            event.like = true;
            set_author(&mut event.post, &status.account);
            set_actor(&mut event.post, &notification.account);
        }
        // Rejected above
        NotificationKind::Other(_) => return None,
    }

    Some(event)
}

fn preview_urls(attachments: &[MediaAttachment]) -> impl Iterator<Item = String> + '_ {
    attachments.iter().filter_map(|m| m.preview_url.clone())
}

fn set_author(post: &mut Post, account: &Account) {
    post.author = account.username.clone();
    post.author_name = account.display_name.clone();
    post.author_url = account.url.clone();
}

fn set_actor(post: &mut Post, account: &Account) {
    post.actor = Some(account.username.clone());
    post.actor_name = Some(account.display_name.clone());
}
