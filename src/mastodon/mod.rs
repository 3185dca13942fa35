// Mastodon API surface — the collaborator trait, its HTTP implementation,
// the payload types and the user stream decoder.
//
// The account adapter only depends on `api::MastodonApi`; `client` is the
// production implementation over reqwest.

pub mod api;
pub mod client;
pub mod models;
pub mod streaming;
