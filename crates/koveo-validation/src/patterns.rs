//! Attack-pattern signatures checked before any free text is accepted.
//!
//! The table is a heuristic screen. It over-matches (any `;` or `|`
//! rejects the input) and it will miss obfuscated payloads, so it sits
//! in front of parameterized queries and output encoding, not in place
//! of them.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) struct AttackPattern {
    pub(crate) name: &'static str,
    regex: Regex,
}

const SIGNATURES: &[(&str, &str)] = &[
    (
        "sql_statement",
        r"(?i)\b(?:union\s+(?:all\s+)?select|select\s+.+\s+from|insert\s+into|delete\s+from|drop\s+(?:table|database)|alter\s+table|truncate\s+table|exec(?:ute)?\s*\()",
    ),
    ("sql_tautology", r"(?i)'\s*(?:or|and)\s+'?\w+'?\s*=\s*'?\w+"),
    ("sql_comment", r"--|/\*|\*/"),
    ("sql_separator", r"[;|]"),
    ("script_tag", r"(?i)<\s*/?\s*script"),
    ("iframe_tag", r"(?i)<\s*/?\s*iframe"),
    ("javascript_uri", r"(?i)javascript\s*:"),
    ("event_handler", r"(?i)\bon[a-z]+\s*="),
    (
        "nosql_operator",
        r"\$(?:where|ne|eq|gt|gte|lt|lte|in|nin|regex|exists|or|and|not|expr)\b",
    ),
];

static ATTACK_PATTERNS: LazyLock<Vec<AttackPattern>> = LazyLock::new(|| {
    SIGNATURES
        .iter()
        .map(|(name, pattern)| AttackPattern {
            name,
            regex: Regex::new(pattern).expect("invalid attack pattern"),
        })
        .collect()
});

/// Name of the first signature matching `input`, if any.
pub(crate) fn find_attack(input: &str) -> Option<&'static str> {
    ATTACK_PATTERNS
        .iter()
        .find(|p| p.regex.is_match(input))
        .map(|p| p.name)
}
