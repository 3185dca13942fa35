// Post body sanitizing.
//
// Mastodon shortens link text in status HTML by wrapping the hidden parts of
// a URL in `<span class="invisible">` and the visible truncated part in
// `<span class="ellipsis">`. We drop the former and turn the latter into
// plain text followed by "...". Nothing else in the body is touched.

use std::sync::LazyLock;

use regex_lite::Regex;

static INVISIBLE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="invisible">(.[^<]*)</span>"#).expect("valid invisible-span regex")
});

static ELLIPSIS_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="ellipsis">(.[^<]*)</span>"#).expect("valid ellipsis-span regex")
});

/// Sanitize a status body. Total: input that doesn't match either wrapper
/// is returned unchanged.
pub fn sanitize_body(body: &str) -> String {
    let body = INVISIBLE_SPAN.replace_all(body, "");
    ELLIPSIS_SPAN.replace_all(&body, "${1}...").into_owned()
}
