use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::block::{META_KEY_ELEMENTS, META_MAIN_CONTENT, META_TYPE};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"));

static DESCRIPTION_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?\[(?:图片描述|image description)\](?:\*\*)?")
        .expect("description label regex is valid")
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").expect("bullet regex is valid"));

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__").expect("emphasis regex is valid"));

static FIELD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:图片类型|主要内容|关键元素|image type|main content|key elements)[ \t]*[:：]")
        .expect("field label regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// (metadata key, value pattern); a label only counts at the start of a
/// line (after an optional bullet) and the value runs to end of line
static FIELD_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (META_TYPE, r"(?mi)^[ \t]*(?:[-*+][ \t]+)?(?:图片类型|image type)[ \t]*[:：][ \t]*([^\n]*)"),
        (
            META_MAIN_CONTENT,
            r"(?mi)^[ \t]*(?:[-*+][ \t]+)?(?:主要内容|main content)[ \t]*[:：][ \t]*([^\n]*)",
        ),
        (
            META_KEY_ELEMENTS,
            r"(?mi)^[ \t]*(?:[-*+][ \t]+)?(?:关键元素|key elements)[ \t]*[:：][ \t]*([^\n]*)",
        ),
    ]
    .into_iter()
    .map(|(key, pattern)| (key, Regex::new(pattern).expect("field regex is valid")))
    .collect()
});

/// Reduce a raw block to its plain description text.
///
/// Removes comments (the markers themselves included), the description
/// label, list bullets, bold/emphasis markup and field labels, then
/// collapses whitespace runs to single spaces.
pub fn clean_block_text(raw: &str) -> String {
    let text = COMMENT_RE.replace_all(raw, "");
    let text = DESCRIPTION_LABEL_RE.replace_all(&text, "");
    let text = BULLET_RE.replace_all(&text, "");
    let text = EMPHASIS_RE.replace_all(&text, "");
    let text = FIELD_LABEL_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Parse the optional `label: value` fields of a raw block.
///
/// Fields whose label is missing, or whose value is empty, are left out.
pub fn parse_block_metadata(raw: &str) -> BTreeMap<String, String> {
    let text = COMMENT_RE.replace_all(raw, "");
    let text = EMPHASIS_RE.replace_all(&text, "");

    let mut metadata = BTreeMap::new();
    for (key, pattern) in FIELD_PATTERNS.iter() {
        let Some(caps) = pattern.captures(&text) else {
            continue;
        };
        let value = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if !value.is_empty() {
            metadata.insert((*key).to_string(), value.to_string());
        }
    }
    metadata
}
