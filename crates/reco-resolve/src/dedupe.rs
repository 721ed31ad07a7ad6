//! Candidate deduplication against batch, history, and exclusion data.
//!
//! Raw candidate batches repeat themselves, repeat prior sessions, and
//! repeat titles already shown this session. This module removes all three
//! kinds of repeats using text-key matching, in two modes: strict (never
//! repeat history, accept a short result) and fill (prefer freshness, but
//! tolerate history repeats over returning too few items).

use std::collections::HashSet;

use reco_core::defaults;
use reco_core::models::{Candidate, HistoryItem};
use reco_core::textkey::{composite_key, normalize_text_key};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Dedupe policy for history overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupeMode {
    /// Reject every history overlap; output may be shorter than requested.
    Strict,
    /// Strict first pass, then a second pass over the same input that
    /// tolerates history overlap to top up toward the requested count.
    Fill,
}

/// Configuration for candidate deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupeConfig {
    /// Maximum number of candidates to return.
    pub count: usize,
    /// History-overlap policy.
    pub mode: DedupeMode,
    /// Cap on how many history/exclude entries are keyed per lookup set.
    /// Enforced before any matching work, bounding cost on large histories.
    pub key_cap: usize,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            count: defaults::RESULT_COUNT,
            mode: DedupeMode::Strict,
            key_cap: defaults::HISTORY_KEY_CAP,
        }
    }
}

impl DedupeConfig {
    /// Create a config returning at most `count` candidates.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Set the dedupe mode.
    pub fn with_mode(mut self, mode: DedupeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the history/exclude key cap.
    pub fn with_key_cap(mut self, key_cap: usize) -> Self {
        self.key_cap = key_cap;
        self
    }
}

/// Lookup sets built once per call, each bounded to the first `key_cap`
/// entries of its source.
struct LookupKeys {
    exclude_titles: HashSet<String>,
    history_titles: HashSet<String>,
    history_queries: HashSet<String>,
}

impl LookupKeys {
    fn build(user_history: &[HistoryItem], exclude_titles: &[String], key_cap: usize) -> Self {
        let exclude_titles: HashSet<String> = exclude_titles
            .iter()
            .take(key_cap)
            .map(|t| normalize_text_key(t))
            .filter(|k| !k.is_empty())
            .collect();

        let history_titles: HashSet<String> = user_history
            .iter()
            .take(key_cap)
            .map(|h| normalize_text_key(&h.title))
            .filter(|k| !k.is_empty())
            .collect();

        let history_queries: HashSet<String> = user_history
            .iter()
            .take(key_cap)
            .filter_map(|h| h.search_query())
            .map(normalize_text_key)
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            exclude_titles,
            history_titles,
            history_queries,
        }
    }
}

/// Remove duplicate and already-seen candidates from a batch.
///
/// Rules, in order, for each candidate:
/// 1. Empty title key: skipped silently (never emitted).
/// 2. Composite key (`titleKey|queryKey|kind`) already accepted this call:
///    skipped (intra-batch dedup).
/// 3. Title key in `exclude_titles`: always rejected, in both modes.
/// 4. Title key or non-empty query key overlapping history: rejected in the
///    strict pass; tolerated in the fill-mode second pass.
///
/// Input order is preserved (first seen, first kept); output stops at
/// `config.count`.
pub fn dedupe_candidates(
    candidates: &[Candidate],
    user_history: &[HistoryItem],
    exclude_titles: &[String],
    config: &DedupeConfig,
) -> Vec<Candidate> {
    let keys = LookupKeys::build(user_history, exclude_titles, config.key_cap);

    let mut seen_composites: HashSet<String> = HashSet::new();
    let mut accepted: Vec<Candidate> = Vec::with_capacity(config.count.min(candidates.len()));

    accept_pass(
        candidates,
        &keys,
        &mut seen_composites,
        &mut accepted,
        config.count,
        false,
    );

    if config.mode == DedupeMode::Fill && accepted.len() < config.count {
        debug!(
            dedupe_mode = "fill",
            fill_pass = true,
            result_count = accepted.len(),
            "strict pass under-filled, re-scanning with history overlap allowed"
        );
        accept_pass(
            candidates,
            &keys,
            &mut seen_composites,
            &mut accepted,
            config.count,
            true,
        );
    }

    debug!(
        op = "dedupe_candidates",
        candidate_count = candidates.len(),
        result_count = accepted.len(),
        "deduplication complete"
    );

    accepted
}

fn accept_pass(
    candidates: &[Candidate],
    keys: &LookupKeys,
    seen_composites: &mut HashSet<String>,
    accepted: &mut Vec<Candidate>,
    count: usize,
    allow_history: bool,
) {
    for candidate in candidates {
        if accepted.len() >= count {
            break;
        }

        let title_key = normalize_text_key(&candidate.title);
        if title_key.is_empty() {
            trace!(title = %candidate.title, "skipping candidate with empty title key");
            continue;
        }

        let query_key = candidate
            .search_query
            .as_deref()
            .map(normalize_text_key)
            .unwrap_or_default();
        let composite = composite_key(&title_key, &query_key, candidate.kind_label());

        if seen_composites.contains(&composite) {
            continue;
        }
        // Exclusion is absolute: these titles were already shown this session.
        if keys.exclude_titles.contains(&title_key) {
            continue;
        }
        if !allow_history {
            if keys.history_titles.contains(&title_key) {
                continue;
            }
            if !query_key.is_empty() && keys.history_queries.contains(&query_key) {
                continue;
            }
        }

        seen_composites.insert(composite);
        accepted.push(candidate.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reco_core::models::{Category, EntertainmentKind, FitnessKind};

    fn entertainment(title: &str) -> Candidate {
        Candidate::new(title, Category::Entertainment, "哔哩哔哩")
            .with_entertainment_type(EntertainmentKind::Video)
    }

    #[test]
    fn test_strict_output_never_exceeds_count() {
        let candidates: Vec<Candidate> = (0..10)
            .map(|i| entertainment(&format!("电影{}", i)))
            .collect();

        let result = dedupe_candidates(&candidates, &[], &[], &DedupeConfig::new(4));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_intra_batch_duplicates_collapse() {
        let candidates = vec![
            entertainment("流浪地球2"),
            entertainment("流浪地球 2"),
            entertainment("《流浪地球2》"),
            entertainment("狂飙"),
        ];

        let result = dedupe_candidates(&candidates, &[], &[], &DedupeConfig::new(4));
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "流浪地球2");
        assert_eq!(result[1].title, "狂飙");
    }

    #[test]
    fn test_same_title_different_kind_both_survive() {
        let tutorial = Candidate::new("入门指南", Category::Fitness, "Keep")
            .with_fitness_type(FitnessKind::Tutorial);
        let equipment = Candidate::new("入门指南", Category::Fitness, "京东")
            .with_fitness_type(FitnessKind::Equipment);

        let result =
            dedupe_candidates(&[tutorial, equipment], &[], &[], &DedupeConfig::new(4));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_exclude_titles_rejected_in_both_modes() {
        let candidates = vec![entertainment("狂飙"), entertainment("三体")];
        let exclude = vec!["狂 飙".to_string()];

        for mode in [DedupeMode::Strict, DedupeMode::Fill] {
            let result = dedupe_candidates(
                &candidates,
                &[],
                &exclude,
                &DedupeConfig::new(4).with_mode(mode),
            );
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].title, "三体");
        }
    }

    #[test]
    fn test_strict_rejects_history_title_and_query() {
        let history = vec![HistoryItem::with_query("流浪地球2", "流浪地球2 豆瓣 评分")];
        let candidates = vec![
            // Fresh title, but the normalized query matches history.
            entertainment("球2值得二刷吗").with_query("流浪地球2豆瓣评分"),
            entertainment("流浪地球 2"),
            entertainment("满江红"),
        ];

        let result = dedupe_candidates(&candidates, &history, &[], &DedupeConfig::new(4));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "满江红");
    }

    #[test]
    fn test_strict_never_backfills_with_history_overlap() {
        let history = vec![HistoryItem::new("流浪地球2")];
        let candidates = vec![entertainment("流浪地球2")];

        let result = dedupe_candidates(&candidates, &history, &[], &DedupeConfig::new(3));
        assert!(result.is_empty());
    }

    #[test]
    fn test_fill_mode_tops_up_with_history_overlap() {
        let history = vec![HistoryItem::new("流浪地球2"), HistoryItem::new("狂飙")];
        let candidates = vec![
            entertainment("流浪地球2"),
            entertainment("狂飙"),
            entertainment("满江红"),
        ];

        let config = DedupeConfig::new(3).with_mode(DedupeMode::Fill);
        let result = dedupe_candidates(&candidates, &history, &[], &config);

        // Fresh item first (strict pass), history repeats appended after.
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].title, "满江红");
        assert_eq!(result[1].title, "流浪地球2");
        assert_eq!(result[2].title, "狂飙");
    }

    #[test]
    fn test_fill_mode_is_superset_of_strict() {
        let history = vec![HistoryItem::new("老番茄解说")];
        let candidates = vec![
            entertainment("老番茄解说"),
            entertainment("赛博朋克2077"),
            entertainment("塞尔达传说"),
        ];

        let strict = dedupe_candidates(&candidates, &history, &[], &DedupeConfig::new(3));
        let fill = dedupe_candidates(
            &candidates,
            &history,
            &[],
            &DedupeConfig::new(3).with_mode(DedupeMode::Fill),
        );

        assert!(fill.len() >= strict.len());
        for candidate in &strict {
            assert!(fill.contains(candidate));
        }
    }

    #[test]
    fn test_fill_mode_still_respects_exclusion_and_composite_dedup() {
        let exclude = vec!["狂飙".to_string()];
        let candidates = vec![
            entertainment("狂飙"),
            entertainment("狂飙"),
            entertainment("三体"),
        ];

        let config = DedupeConfig::new(5).with_mode(DedupeMode::Fill);
        let result = dedupe_candidates(&candidates, &[], &exclude, &config);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "三体");
    }

    #[test]
    fn test_empty_title_candidates_are_dropped() {
        let candidates = vec![
            Candidate::new("", Category::Food, "大众点评"),
            Candidate::new("！？。", Category::Food, "大众点评"),
            Candidate::new("人气火锅", Category::Food, "大众点评"),
        ];

        let result = dedupe_candidates(&candidates, &[], &[], &DedupeConfig::new(4));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "人气火锅");
    }

    #[test]
    fn test_key_cap_bounds_history_keying() {
        // History longer than the cap: entries past the cap are not keyed,
        // so a candidate matching only those entries survives strict mode.
        let mut history: Vec<HistoryItem> = (0..defaults::HISTORY_KEY_CAP)
            .map(|i| HistoryItem::new(format!("看过的剧{}", i)))
            .collect();
        history.push(HistoryItem::new("刚好越界的剧"));

        let candidates = vec![entertainment("刚好越界的剧"), entertainment("看过的剧0")];
        let result = dedupe_candidates(&candidates, &history, &[], &DedupeConfig::new(4));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "刚好越界的剧");
    }

    #[test]
    fn test_key_cap_is_configurable() {
        let history = vec![HistoryItem::new("第一条"), HistoryItem::new("第二条")];
        let candidates = vec![entertainment("第二条")];

        // Cap of 1 keys only the first history entry.
        let config = DedupeConfig::new(4).with_key_cap(1);
        let result = dedupe_candidates(&candidates, &history, &[], &config);
        assert_eq!(result.len(), 1);

        let full = dedupe_candidates(&candidates, &history, &[], &DedupeConfig::new(4));
        assert!(full.is_empty());
    }

    #[test]
    fn test_input_order_preserved() {
        let candidates = vec![
            entertainment("甲"),
            entertainment("乙"),
            entertainment("丙"),
        ];

        let result = dedupe_candidates(&candidates, &[], &[], &DedupeConfig::new(3));
        let titles: Vec<&str> = result.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["甲", "乙", "丙"]);
    }

    #[test]
    fn test_empty_batch() {
        let result = dedupe_candidates(&[], &[], &[], &DedupeConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_default_config_values() {
        let config = DedupeConfig::default();
        assert_eq!(config.count, defaults::RESULT_COUNT);
        assert_eq!(config.mode, DedupeMode::Strict);
        assert_eq!(config.key_cap, defaults::HISTORY_KEY_CAP);
    }
}
