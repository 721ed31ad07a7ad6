//! Centralized default constants for the reco resolution engine.
//!
//! **This module is the single source of truth** for all shared default values.
//! Both crates reference these constants instead of defining their own magic
//! numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// DEDUPLICATION
// =============================================================================

/// Maximum number of history/exclude entries keyed per lookup set.
///
/// Bounds the O(n·m) matching cost of large histories. Overridable per
/// call via `DedupeConfig::key_cap`.
pub const HISTORY_KEY_CAP: usize = 80;

/// Default number of candidates a resolution pass returns.
pub const RESULT_COUNT: usize = 4;

// =============================================================================
// FALLBACK GENERATION
// =============================================================================

/// Minimum requested batch size at which entertainment output must cover
/// all four entertainment kinds (video, game, music, review).
pub const ENTERTAINMENT_COVERAGE_MIN: usize = 4;

/// Number of fitness kinds that a sufficiently large batch must cover
/// (tutorial, equipment, nearby_place).
pub const FITNESS_KIND_COUNT: usize = 3;

// =============================================================================
// PREFERENCE HASHING
// =============================================================================

/// Length (hex chars) of the truncated preference hash used as a cache key.
pub const PREFERENCE_HASH_LEN: usize = 16;

// =============================================================================
// FEEDBACK
// =============================================================================

/// Probability that a resolved batch asks the client to show a feedback
/// prompt. Tuning value with no derived meaning; overridable via
/// `FeedbackTrigger`.
pub const FEEDBACK_TRIGGER_PROBABILITY: f64 = 0.6;
