// Colored terminal output for the event stream.
//
// One block per event: a header line naming what happened and who did it,
// the post text, then any media links.

use colored::Colorize;

use crate::events::{AccountEvent, LoginEvent, MessageEvent};

/// Longest body shown before truncating.
const MAX_BODY_CHARS: usize = 280;

/// Display any event from the adapter channel.
pub fn display_event(event: &AccountEvent) {
    match event {
        AccountEvent::Login(login) => display_login(login),
        AccountEvent::Message(message) => display_message(message),
    }
}

/// Display the logged-in account summary.
pub fn display_login(login: &LoginEvent) {
    println!(
        "\n{}",
        format!("=== Logged in as @{} ===", login.username).bold()
    );
    if !login.name.is_empty() {
        println!("  {}", login.name);
    }
    println!("  {}", login.profile_url.dimmed());
    println!(
        "  {} posts  |  {} following  |  {} followers",
        login.posts, login.follows, login.followers
    );
    println!();
}

/// Display one post event.
pub fn display_message(event: &MessageEvent) {
    let post = &event.post;
    let timestamp = post.created_at.format("%Y-%m-%d %H:%M");

    println!(
        "{} {} {}",
        event_label(event),
        format!("@{}", post.author).bold(),
        timestamp.to_string().dimmed()
    );

    if let Some(actor) = &post.actor {
        let verb = if event.like { "favourited by" } else { "boosted by" };
        println!("  {} @{}", verb.dimmed(), actor);
    }

    if let (Some(author), Some(id)) = (&post.reply_to_author, &post.reply_to_id) {
        println!("  {}", format!("in reply to {id} (account {author})").dimmed());
    }

    let body = super::truncate_chars(&super::plain_text(&post.body), MAX_BODY_CHARS);
    for line in body.lines() {
        println!("  {line}");
    }

    for url in &event.media {
        println!("  {} {}", "media".cyan(), url);
    }

    if let Some(url) = &post.url {
        println!("  {}", url.dimmed());
    }
    println!();
}

/// Short colored tag for the event's flags.
fn event_label(event: &MessageEvent) -> colored::ColoredString {
    if event.mention {
        "[mention]".yellow().bold()
    } else if event.like {
        "[favourite]".magenta()
    } else if event.forward {
        "[boost]".green()
    } else if event.notification {
        "[notification]".yellow()
    } else {
        "[post]".normal()
    }
}
