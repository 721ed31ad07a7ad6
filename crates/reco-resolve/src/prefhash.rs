//! Deterministic preference hashing for cache keying.
//!
//! The caching collaborator stores resolved batches keyed by the user's
//! preference state plus their recent clicks. The key must be stable across
//! process restarts (no salts, no process-local state) and must change
//! whenever the clicked-title set or any weight changes, or stale batches
//! would survive cache invalidation.

use reco_core::defaults;
use reco_core::models::PreferenceRecord;
use sha2::{Digest, Sha256};

// Separator bytes keep adjacent fields from colliding ("ab"+"c" vs "a"+"bc").
const FIELD_SEP: [u8; 1] = [0x1f];
const PAIR_SEP: [u8; 1] = [0x1e];

/// Derive a short, stable cache key from preference state and recent
/// interactions.
///
/// Weight entries are sorted by key and recent titles are sorted and
/// deduplicated before hashing, so map iteration order and click order
/// never leak into the key; only the *sets* matter. Weights hash by their
/// exact bit pattern.
pub fn generate_preference_hash(record: &PreferenceRecord, recent_titles: &[String]) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.category.label().as_bytes());
    hasher.update(FIELD_SEP);

    let mut weights: Vec<(&str, f64)> = record
        .weights
        .iter()
        .map(|(key, value)| (key.as_str(), *value))
        .collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in weights {
        hasher.update(key.as_bytes());
        hasher.update(PAIR_SEP);
        hasher.update(value.to_bits().to_be_bytes());
        hasher.update(FIELD_SEP);
    }

    let mut titles: Vec<&str> = recent_titles.iter().map(String::as_str).collect();
    titles.sort_unstable();
    titles.dedup();
    for title in titles {
        hasher.update(title.as_bytes());
        hasher.update(FIELD_SEP);
    }

    let digest = hex::encode(hasher.finalize());
    digest[..defaults::PREFERENCE_HASH_LEN].to_string()
}
