// Output formatting — terminal rendering of adapter events.

pub mod terminal;

use std::sync::LazyLock;

use regex_lite::Regex;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>\s*<p>|<br\s*/?>").expect("valid paragraph regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Flatten a status body's HTML into terminal text: paragraph and line breaks
/// become newlines, remaining tags are dropped and the common entities decoded.
pub fn plain_text(body: &str) -> String {
    let text = PARAGRAPH_BREAK.replace_all(body, "\n");
    let text = TAG.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let body = r#"<p>Hello <a href="https://x.y/@a" class="u-url mention">@<span>a</span></a></p><p>second &amp; last</p>"#;
        assert_eq!(plain_text(body), "Hello @a\nsecond & last");
    }

    #[test]
    fn test_plain_text_line_breaks() {
        assert_eq!(plain_text("one<br>two<br />three"), "one\ntwo\nthree");
    }
}
