// Tusk: a Mastodon account adapter.
//
// This is the library root. `account` holds the adapter pipeline,
// `mastodon` the remote API it talks to, `events` the schema it emits.

pub mod account;
pub mod config;
pub mod events;
pub mod mastodon;
pub mod output;
