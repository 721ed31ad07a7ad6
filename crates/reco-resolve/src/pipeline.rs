//! End-to-end candidate resolution pipeline.
//!
//! Wires the stages together in their required order: dedupe against
//! history and exclusions, top up missing diversity kinds from the
//! fallback bank, normalize platforms per requesting surface, then build
//! and validate outbound links. Each stage is pure; so is the pipeline.

use reco_core::defaults;
use reco_core::models::{
    Candidate, Category, ClientKind, HistoryItem, Locale, Region, ResolvedCandidate,
    UserPreference,
};
use reco_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dedupe::{dedupe_candidates, DedupeConfig, DedupeMode};
use crate::fallback::{generate_fallback_candidates, FallbackRequest};
use crate::link::resolve_candidate_link;
use crate::platform::{normalize_platform, PlatformContext};

/// One resolution request, carrying the raw batch and everything known
/// about the requesting user and surface.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub category: Category,
    pub locale: Locale,
    pub region: Region,
    pub client: ClientKind,
    pub is_mobile: bool,
    /// Maximum number of resolved candidates to return.
    pub count: usize,
    /// Raw AI/rule-generated candidates.
    pub candidates: Vec<Candidate>,
    /// Prior-session history, used for exclusion only.
    pub user_history: Vec<HistoryItem>,
    /// Titles already shown this session; never re-emitted.
    pub exclude_titles: Vec<String>,
    pub preference: UserPreference,
}

/// Tuning for a resolution run.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// History-overlap policy for the dedupe stage.
    pub dedupe_mode: DedupeMode,
    /// Cap on keyed history/exclude entries.
    pub key_cap: usize,
    /// Feedback-prompt decision parameters.
    pub feedback: FeedbackTrigger,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            dedupe_mode: DedupeMode::Strict,
            key_cap: defaults::HISTORY_KEY_CAP,
            feedback: FeedbackTrigger::default(),
        }
    }
}

impl ResolveConfig {
    /// Set the dedupe mode.
    pub fn with_dedupe_mode(mut self, mode: DedupeMode) -> Self {
        self.dedupe_mode = mode;
        self
    }

    /// Override the history/exclude key cap.
    pub fn with_key_cap(mut self, key_cap: usize) -> Self {
        self.key_cap = key_cap;
        self
    }

    /// Override the feedback trigger.
    pub fn with_feedback(mut self, feedback: FeedbackTrigger) -> Self {
        self.feedback = feedback;
        self
    }
}

/// Resolve a raw candidate batch into a safe, deduplicated,
/// diversity-covered, link-carrying output list.
///
/// Output length is at most `request.count`; it can be shorter when the
/// batch, the fallback bank, and the dedupe policy together cannot supply
/// enough distinct non-excluded items.
pub fn resolve_candidates(
    request: &ResolveRequest,
    config: &ResolveConfig,
) -> Vec<ResolvedCandidate> {
    let dedupe_config = DedupeConfig::new(request.count)
        .with_mode(config.dedupe_mode)
        .with_key_cap(config.key_cap);

    let mut selected = dedupe_candidates(
        &request.candidates,
        &request.user_history,
        &request.exclude_titles,
        &dedupe_config,
    );

    if selected.len() < request.count {
        let fallback_request = FallbackRequest {
            category: request.category,
            locale: request.locale,
            count: request.count - selected.len(),
            exclude_titles: request.exclude_titles.clone(),
            user_history: request.user_history.clone(),
            preference: request.preference.clone(),
        };
        let filler = generate_fallback_candidates(&fallback_request, &selected);
        debug!(
            op = "resolve_candidates",
            fallback_count = filler.len(),
            "topped up under-filled batch"
        );
        selected.extend(filler);
    }
    selected.truncate(request.count);

    let resolved: Vec<ResolvedCandidate> = selected
        .into_iter()
        .enumerate()
        .map(|(index, mut candidate)| {
            let context = PlatformContext {
                category: candidate.category,
                client: request.client,
                is_mobile: request.is_mobile,
                locale: request.locale,
                index,
                fitness_type: candidate.fitness_type,
            };
            candidate.platform = normalize_platform(&candidate.platform, &context);

            let link = resolve_candidate_link(&candidate, request.region);
            ResolvedCandidate { candidate, link }
        })
        .collect();

    info!(
        op = "resolve_candidates",
        category = request.category.label(),
        candidate_count = request.candidates.len(),
        result_count = resolved.len(),
        "resolution pipeline complete"
    );

    resolved
}

// =============================================================================
// FEEDBACK TRIGGER
// =============================================================================

/// Decision parameters for the post-resolution feedback prompt.
///
/// A fixed fraction of batches request feedback. The fraction is a tuning
/// value with no derived meaning; the random roll is supplied by the caller
/// so this stays deterministic and testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackTrigger {
    /// Probability in `[0.0, 1.0]` that a batch requests feedback.
    pub probability: f64,
}

impl Default for FeedbackTrigger {
    fn default() -> Self {
        Self {
            probability: defaults::FEEDBACK_TRIGGER_PROBABILITY,
        }
    }
}

impl FeedbackTrigger {
    /// Create a trigger with a validated probability.
    pub fn new(probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::Config(format!(
                "feedback probability must be within [0, 1], got {}",
                probability
            )));
        }
        Ok(Self { probability })
    }

    /// Whether a batch with the given roll (uniform in `[0, 1)`) requests
    /// feedback.
    pub fn should_request_feedback(&self, roll: f64) -> bool {
        roll < self.probability
    }
}
