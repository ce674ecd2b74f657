//! Sanitizers that turn untrusted text into a safe, bounded value.
//!
//! None of these fail: unsafe input comes back emptied or filtered, and
//! attack-pattern hits are reported to a [`SecuritySink`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::patterns::find_attack;
use crate::security::{SecuritySignal, SecuritySink, TracingSink};

pub const DEFAULT_MAX_LENGTH: usize = 500;
pub const NAME_MAX_LENGTH: usize = 100;
pub const ADDRESS_MAX_LENGTH: usize = 200;
pub const USERNAME_MAX_LENGTH: usize = 30;

/// Tags kept by [`sanitize_html`]. Attributes are always dropped.
pub const ALLOWED_HTML_TAGS: &[&str] = &[
    "b", "i", "em", "strong", "u", "br", "p", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6",
];

const QUEBEC_ACCENTS: &str = "àâäçéèêëîïôöùûüÿæœÀÂÄÇÉÈÊËÎÏÔÖÙÛÜŸÆŒ";
const ADDRESS_PUNCTUATION: &str = " -.,#'()";

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("invalid script block pattern")
});
static IFRAME_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").expect("invalid iframe block pattern")
});
static JAVASCRIPT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("invalid javascript uri pattern"));
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:\s|/)+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*)"#)
        .expect("invalid event handler pattern")
});
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(/?)\s*([a-z][a-z0-9]*)\b[^>]*>").expect("invalid html tag pattern")
});

/// A tag opened at the end of the input and never closed. Embedding
/// the fragment would let the next `>` in the page close it.
static UNTERMINATED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*[a-z/!][^>]*$").expect("invalid unterminated tag pattern")
});

/// Report an attack-pattern hit. Returns `true` when the input must be
/// discarded.
fn screen(input: &str, sink: &dyn SecuritySink) -> bool {
    match find_attack(input) {
        Some(pattern) => {
            sink.signal(&SecuritySignal {
                pattern,
                input_len: input.len(),
            });
            true
        }
        None => false,
    }
}

fn html_entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#x27;"),
        '/' => Some("&#x2F;"),
        _ => None,
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// [`sanitize_string_with`] reporting to the default [`TracingSink`].
pub fn sanitize_string(input: &str, max_length: usize) -> String {
    sanitize_string_with(input, max_length, &TracingSink)
}

/// Sanitize free text.
///
/// The input is trimmed and screened against the attack-pattern table;
/// a hit empties the value and signals `sink`. Otherwise `&<>"'/` are
/// HTML-encoded, control characters (U+0000..U+001F, U+007F..U+009F) are
/// removed, and the result is cut to `max_length` characters. The cut
/// never splits an entity, so the output can be shorter than the limit.
pub fn sanitize_string_with(input: &str, max_length: usize, sink: &dyn SecuritySink) -> String {
    let trimmed = input.trim();
    if screen(trimmed, sink) {
        return String::new();
    }

    let mut out = String::with_capacity(trimmed.len().min(max_length));
    let mut len = 0;
    for c in trimmed.chars().filter(|c| !c.is_control()) {
        let entity = html_entity(c);
        let unit_len = entity.map_or(1, str::len);
        if len + unit_len > max_length {
            break;
        }
        match entity {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
        len += unit_len;
    }
    out
}

fn strip_html_once(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input, "");
    let out = IFRAME_BLOCK.replace_all(&out, "");
    let out = JAVASCRIPT_URI.replace_all(&out, "");
    let out = EVENT_HANDLER.replace_all(&out, "");
    let out = HTML_TAG.replace_all(&out, |caps: &Captures| {
        let name = caps[2].to_ascii_lowercase();
        if ALLOWED_HTML_TAGS.contains(&name.as_str()) {
            format!("<{}{name}>", &caps[1])
        } else {
            String::new()
        }
    });
    UNTERMINATED_TAG.replace_all(&out, "").into_owned()
}

/// Reduce rich text to the allow-listed tags.
///
/// Script and iframe blocks go with their content, `javascript:` URIs
/// and inline event handlers are dropped, and every other tag is
/// removed while its text is kept. A trailing tag with no closing `>`
/// is dropped. Passes repeat until the output is
/// stable, so nested fragments cannot reassemble into a tag.
pub fn sanitize_html(input: &str) -> String {
    let mut current = strip_html_once(input);
    loop {
        let next = strip_html_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Lower-case and trim. Shape is checked separately by
/// [`crate::format::is_valid_email`].
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Keep letters (accented included), whitespace, hyphens and
/// apostrophes, then collapse whitespace runs to single spaces.
pub fn sanitize_name(value: &str, max_length: usize) -> String {
    let kept: String = value
        .trim()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\''))
        .collect();
    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_length).trim_end().to_owned()
}

/// Local part of the email, lower-cased, ASCII alphanumerics only.
/// Uniqueness is the user store's concern.
pub fn generate_username_from_email(email: &str, max_length: usize) -> String {
    let local = email.trim().split('@').next().unwrap_or_default();
    local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(max_length)
        .collect()
}

fn is_address_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || QUEBEC_ACCENTS.contains(c) || ADDRESS_PUNCTUATION.contains(c)
}

/// [`sanitize_address_with`] reporting to the default [`TracingSink`].
pub fn sanitize_address(value: &str, max_length: usize) -> String {
    sanitize_address_with(value, max_length, &TracingSink)
}

/// Screen like [`sanitize_string_with`], then keep only characters that
/// appear in Quebec street addresses, then cut to `max_length`.
///
/// Unlike [`sanitize_string_with`] this does not HTML-encode before
/// filtering: the filter runs on the raw text, so an apostrophe stays an
/// apostrophe instead of leaving `#x27` behind. Encode at output time.
pub fn sanitize_address_with(value: &str, max_length: usize, sink: &dyn SecuritySink) -> String {
    let trimmed = value.trim();
    if screen(trimmed, sink) {
        return String::new();
    }
    let kept: String = trimmed.chars().filter(|c| is_address_char(*c)).collect();
    truncate_chars(kept.trim(), max_length).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use crate::security::MemorySink;

    use super::*;

    #[test]
    fn script_input_is_emptied_and_signalled() {
        let sink = MemorySink::new();
        let out = sanitize_string_with("<script>alert(1)</script>", DEFAULT_MAX_LENGTH, &sink);
        assert_eq!(out, "");
        let signals = sink.drain();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].pattern, "script_tag");
        assert_eq!(signals[0].input_len, 25);
    }

    #[test]
    fn dangerous_characters_are_encoded() {
        let sink = MemorySink::new();
        assert_eq!(
            sanitize_string_with("O'Brien", DEFAULT_MAX_LENGTH, &sink),
            "O&#x27;Brien"
        );
        assert_eq!(
            sanitize_string_with("Tom & Jerry > 2/3 \"fans\"", DEFAULT_MAX_LENGTH, &sink),
            "Tom &amp; Jerry &gt; 2&#x2F;3 &quot;fans&quot;"
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(sanitize_string("ab\u{0007}c\u{0085}d\u{007F}", 50), "abcd");
        assert_eq!(sanitize_string("  padded\t\n", 50), "padded");
    }

    #[test]
    fn truncation_never_splits_an_entity() {
        assert_eq!(sanitize_string("abcdef", 3), "abc");
        assert_eq!(sanitize_string("abcd&", 6), "abcd");
        assert_eq!(sanitize_string("abcd&", 9), "abcd&amp;");
        assert_eq!(sanitize_string("é".repeat(10).as_str(), 4), "éééé");
    }

    #[test]
    fn html_keeps_only_allowed_tags() {
        let input = r#"<p onclick="steal()">Hi <b>there</b><script>alert(1)</script></p>"#;
        assert_eq!(sanitize_html(input), "<p>Hi <b>there</b></p>");
        assert_eq!(
            sanitize_html(r#"<a href="javascript:alert(1)">link</a>"#),
            "link"
        );
        assert_eq!(sanitize_html(r#"<H1 class="x">Titre</H1>"#), "<h1>Titre</h1>");
        assert_eq!(sanitize_html("<iframe src=\"x\"></iframe>ok<br/>"), "ok<br>");
    }

    #[test]
    fn html_drops_slash_separated_handlers_and_open_tags() {
        assert_eq!(sanitize_html("<img/src/onerror=alert(1)"), "");
        assert_eq!(
            sanitize_html("<b>hi</b><svg/onload=alert(1)"),
            "<b>hi</b>"
        );
        assert_eq!(sanitize_html("<span/onclick=x()>ok</span>"), "<span>ok</span>");
        assert_eq!(sanitize_html("<p>texte <div"), "<p>texte ");
    }

    #[test]
    fn html_nested_fragments_do_not_reassemble() {
        let out = sanitize_html("<scr<script>x</script>ipt>alert(1)</script>");
        assert!(!out.to_ascii_lowercase().contains("<script"));
        let out = sanitize_html("javajavascript:script:alert(1)");
        assert!(!out.to_ascii_lowercase().contains("javascript:"));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Marie@Example.COM "), "marie@example.com");
    }

    #[test]
    fn names_keep_accents_and_collapse_spaces() {
        assert_eq!(
            sanitize_name("  Jean-François   O'Neil ", NAME_MAX_LENGTH),
            "Jean-François O'Neil"
        );
        assert_eq!(sanitize_name("Zoë 3rd <b>", NAME_MAX_LENGTH), "Zoë rd b");
        assert_eq!(sanitize_name("Jean\tPaul\nRoy", NAME_MAX_LENGTH), "Jean Paul Roy");
        assert_eq!(
            sanitize_name(&"a".repeat(150), NAME_MAX_LENGTH).chars().count(),
            100
        );
    }

    #[test]
    fn username_derives_from_local_part() {
        assert_eq!(
            generate_username_from_email("Jean.Dupont+test@Example.com", USERNAME_MAX_LENGTH),
            "jeanduponttest"
        );
        assert_eq!(
            generate_username_from_email(&format!("{}@x.ca", "b".repeat(40)), USERNAME_MAX_LENGTH)
                .len(),
            30
        );
        assert_eq!(generate_username_from_email("", USERNAME_MAX_LENGTH), "");
    }

    #[test]
    fn address_keeps_quebec_characters_raw() {
        let sink = MemorySink::new();
        assert_eq!(
            sanitize_address_with(
                "1234 rue Saint-Denis, app. #5 (arrière)",
                ADDRESS_MAX_LENGTH,
                &sink
            ),
            "1234 rue Saint-Denis, app. #5 (arrière)"
        );
        assert_eq!(
            sanitize_address_with("12 rue O'Connor <b>", ADDRESS_MAX_LENGTH, &sink),
            "12 rue O'Connor b"
        );
        assert!(sink.is_empty());

        assert_eq!(
            sanitize_address_with("1 rue X; DROP", ADDRESS_MAX_LENGTH, &sink),
            ""
        );
        assert_eq!(sink.len(), 1);
    }
}
