//! # reco-resolve
//!
//! Candidate resolution engine for the reco recommendation service.
//!
//! This crate provides:
//! - Batch deduplication against session exclusions and prior-session
//!   history, in strict and fill modes
//! - Fallback candidate synthesis guaranteeing category kind coverage
//! - Region/client-aware platform normalization
//! - Outbound link construction gated by a domain allow-list
//! - Deterministic preference hashing for the caching layer
//!
//! ## Example
//!
//! ```
//! use reco_resolve::{
//!     resolve_candidates, Candidate, Category, ClientKind, Locale, Region,
//!     ResolveConfig, ResolveRequest, UserPreference,
//! };
//!
//! let request = ResolveRequest {
//!     category: Category::Fitness,
//!     locale: Locale::Zh,
//!     region: Region::Cn,
//!     client: ClientKind::App,
//!     is_mobile: true,
//!     count: 3,
//!     candidates: vec![Candidate::new("零基础跟练", Category::Fitness, "哔哩哔哩")],
//!     user_history: vec![],
//!     exclude_titles: vec![],
//!     preference: UserPreference::default(),
//! };
//!
//! let resolved = resolve_candidates(&request, &ResolveConfig::default());
//! assert!(resolved.len() <= 3);
//! ```

pub mod dedupe;
pub mod fallback;
pub mod link;
pub mod pipeline;
pub mod platform;
pub mod prefhash;

// Re-export core types
pub use reco_core::*;

// Re-export engine types
pub use dedupe::{dedupe_candidates, DedupeConfig, DedupeMode};
pub use fallback::{generate_fallback_candidates, FallbackRequest};
pub use link::{
    is_allowed_outbound_url, provider_for_platform, resolve_candidate_link, Provider,
};
pub use pipeline::{resolve_candidates, FeedbackTrigger, ResolveConfig, ResolveRequest};
pub use platform::{normalize_platform, PlatformContext};
pub use prefhash::generate_preference_hash;
