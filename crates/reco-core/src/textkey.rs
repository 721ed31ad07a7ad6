//! Text-key normalization for fuzzy title/query equality.
//!
//! Free-text titles arriving from the AI collaborator differ from history
//! entries in casing, spacing, and punctuation ("流浪地球 2" vs "流浪地球2").
//! Normalizing both sides to a text key makes duplicate detection a set
//! membership test. Two strings name the same recommendation iff their keys
//! are equal and non-empty.

/// Punctuation and bullet characters stripped during normalization.
///
/// Covers the ASCII set plus the CJK forms the candidate generator actually
/// emits (fullwidth stops, enumeration commas, bracket pairs, corner quotes).
const STRIPPED_CHARS: &[char] = &[
    '·', '•', '。', '！', '!', '？', '?', '，', ',', '、', '；', ';', '：', ':', '"', '\'', '“',
    '”', '‘', '’', '（', '）', '(', ')', '【', '】', '[', ']', '{', '}', '<', '>', '《', '》',
    '「', '」', '『', '』',
];

/// Canonicalize a free-text string into a comparable key.
///
/// Lowercases, strips the fixed punctuation set, and drops all whitespace
/// (internal included). Total: never fails, and empty or whitespace-only
/// input yields the empty string. Empty keys never match anything, so an
/// untitled item can never be deduped away.
pub fn normalize_text_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED_CHARS.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Composite duplicate-detection key: `{titleKey}|{queryKey}|{kind}`.
///
/// Stricter than the title key alone: two different items can share a
/// generic title but differ in sub-kind.
pub fn composite_key(title_key: &str, query_key: &str, kind_label: &str) -> String {
    format!("{}|{}|{}", title_key, query_key, kind_label)
}

/// Whether two text keys identify the same entity.
///
/// Empty keys never match: items without a usable title must not silently
/// absorb each other.
pub fn keys_match(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}
