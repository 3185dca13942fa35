// Session bootstrap — who are we logged in as?

use tracing::info;

use super::{emit, AdapterError, EventSender};
use crate::events::{AccountEvent, LoginEvent};
use crate::mastodon::api::MastodonApi;
use crate::mastodon::models::Account;

/// Fetch the current user and emit exactly one LoginEvent.
///
/// A failed fetch is fatal for the run; there is no retry.
pub async fn bootstrap(api: &dyn MastodonApi, events: &EventSender) -> Result<Account, AdapterError> {
    let me = api.current_user().await.map_err(AdapterError::CurrentUser)?;

    info!(
        username = %me.username,
        followers = me.followers_count,
        "Logged in"
    );

    emit(events, AccountEvent::Login(login_event(&me)))?;
    Ok(me)
}

/// Copy the profile fields the presentation layer shows after login.
pub fn login_event(me: &Account) -> LoginEvent {
    LoginEvent {
        username: me.username.clone(),
        name: me.display_name.clone(),
        avatar: me.avatar.clone(),
        profile_url: me.url.clone(),
        posts: me.statuses_count,
        follows: me.following_count,
        followers: me.followers_count,
    }
}
