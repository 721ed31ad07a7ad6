//! Structured logging schema and field name constants for the reco engine.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools (Loki, Elasticsearch) can query by
//! standardized field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Precondition violation (empty template bank), requires attention |
//! | WARN  | Recoverable degradation, automatic fallback applied |
//! | INFO  | Pipeline completions with result counts |
//! | DEBUG | Decision points (mode switches, provider selection, cache keys) |
//! | TRACE | Per-candidate iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "dedupe", "fallback", "platform", "link", "prefhash", "pipeline"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "dedupe_candidates", "generate_fallbacks", "resolve_link"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Candidate category being resolved.
pub const CATEGORY: &str = "category";

/// Platform display name before or after normalization.
pub const PLATFORM: &str = "platform";

/// Provider key selected for link resolution.
pub const PROVIDER: &str = "provider";

/// Request locale.
pub const LOCALE: &str = "locale";

/// Preference cache key.
pub const PREFERENCE_HASH: &str = "preference_hash";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of candidates entering a stage.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Number of candidates surviving a stage.
pub const RESULT_COUNT: &str = "result_count";

/// Number of candidates rejected by a stage.
pub const REJECTED_COUNT: &str = "rejected_count";

/// Number of fallback candidates synthesized.
pub const FALLBACK_COUNT: &str = "fallback_count";

/// Number of history entries consulted (after the key cap).
pub const HISTORY_COUNT: &str = "history_count";

// ─── Dedupe-specific fields ────────────────────────────────────────────────

/// Dedupe mode in effect ("strict", "fill").
pub const DEDUPE_MODE: &str = "dedupe_mode";

/// Whether the fill-mode second pass ran.
pub const FILL_PASS: &str = "fill_pass";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
