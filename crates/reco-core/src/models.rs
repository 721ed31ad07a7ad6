//! Core data models for the reco resolution engine.
//!
//! These types form the validated boundary between the engine and its
//! collaborators: the AI/content generator that produces raw candidates,
//! the database layer that supplies history and preferences, and the UI
//! layer that consumes resolved output. Collaborator JSON uses camelCase
//! keys (`searchQuery`, `entertainmentType`); absent optional fields
//! deserialize to their defaults rather than failing the batch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// CATEGORIES AND KINDS
// =============================================================================

/// Top-level recommendation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Entertainment,
    Shopping,
    Food,
    Travel,
    Fitness,
}

impl Category {
    /// Stable string label, used in composite keys and hash serialization.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Fitness => "fitness",
        }
    }
}

/// Sub-kind discriminator for entertainment candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentKind {
    Video,
    Game,
    Music,
    Review,
}

impl EntertainmentKind {
    /// All entertainment kinds, in diversity-coverage order.
    pub const ALL: [EntertainmentKind; 4] = [
        EntertainmentKind::Video,
        EntertainmentKind::Game,
        EntertainmentKind::Music,
        EntertainmentKind::Review,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntertainmentKind::Video => "video",
            EntertainmentKind::Game => "game",
            EntertainmentKind::Music => "music",
            EntertainmentKind::Review => "review",
        }
    }
}

/// Sub-kind discriminator for fitness candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessKind {
    Tutorial,
    Equipment,
    NearbyPlace,
}

impl FitnessKind {
    /// All fitness kinds, in diversity-coverage order.
    pub const ALL: [FitnessKind; 3] = [
        FitnessKind::Tutorial,
        FitnessKind::Equipment,
        FitnessKind::NearbyPlace,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FitnessKind::Tutorial => "tutorial",
            FitnessKind::Equipment => "equipment",
            FitnessKind::NearbyPlace => "nearby_place",
        }
    }
}

// =============================================================================
// CANDIDATE
// =============================================================================

/// One proposed recommendation item, before or after resolution.
///
/// Candidates are transient: constructed per request from collaborator
/// output, resolved, and discarded with the response. The engine never
/// persists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// User-facing display title. May be empty in raw collaborator output;
    /// empty-titled candidates are filtered during resolution.
    pub title: String,

    /// Search query used for matching and link construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,

    /// Top-level category this candidate belongs to.
    pub category: Category,

    /// Entertainment sub-kind, when `category` is entertainment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entertainment_type: Option<EntertainmentKind>,

    /// Fitness sub-kind, when `category` is fitness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_type: Option<FitnessKind>,

    /// Free-text display name of the target app/site.
    #[serde(default)]
    pub platform: String,
}

impl Candidate {
    /// Creates a new candidate with the required fields.
    pub fn new(title: impl Into<String>, category: Category, platform: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            search_query: None,
            category,
            entertainment_type: None,
            fitness_type: None,
            platform: platform.into(),
        }
    }

    /// Set the search query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Set the entertainment sub-kind.
    pub fn with_entertainment_type(mut self, kind: EntertainmentKind) -> Self {
        self.entertainment_type = Some(kind);
        self
    }

    /// Set the fitness sub-kind.
    pub fn with_fitness_type(mut self, kind: FitnessKind) -> Self {
        self.fitness_type = Some(kind);
        self
    }

    /// Sub-kind discriminator used in composite duplicate keys.
    ///
    /// Categories without a sub-kind (shopping, food, travel) and candidates
    /// missing their kind field all map to `"general"`, so title+query dedup
    /// still applies to them.
    pub fn kind_label(&self) -> &'static str {
        match self.category {
            Category::Entertainment => self
                .entertainment_type
                .map(|k| k.label())
                .unwrap_or("general"),
            Category::Fitness => self.fitness_type.map(|k| k.label()).unwrap_or("general"),
            _ => "general",
        }
    }

    /// Text used for link construction: the search query when present and
    /// non-empty, otherwise the title.
    pub fn link_text(&self) -> &str {
        match self.search_query.as_deref() {
            Some(q) if !q.trim().is_empty() => q,
            _ => &self.title,
        }
    }
}

// =============================================================================
// HISTORY AND PREFERENCES
// =============================================================================

/// Read-only fact from a prior session, consumed for exclusion only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HistoryMetadata>,
}

/// Optional metadata recorded alongside a history item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl HistoryItem {
    /// Creates a history item with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metadata: None,
        }
    }

    /// Creates a history item with a recorded search query.
    pub fn with_query(title: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metadata: Some(HistoryMetadata {
                search_query: Some(query.into()),
            }),
        }
    }

    /// The recorded search query, if any.
    pub fn search_query(&self) -> Option<&str> {
        self.metadata.as_ref()?.search_query.as_deref()
    }
}

/// User preference state supplied by the database collaborator.
///
/// Both fields default to empty: a brand-new user deserializes cleanly
/// from `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    /// Free-text interest tags used to personalize fallback queries.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Arbitrary preference weights keyed by interest name.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

/// Preference state hashed into a cache key for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    pub category: Category,

    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

// =============================================================================
// REQUEST CONTEXT
// =============================================================================

/// Request locale. Only `zh` activates CN-specific platform rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Zh,
    En,
}

/// Serving region, selecting the provider table for link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Cn,
    Intl,
}

/// Client surface making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    App,
    Web,
}

// =============================================================================
// RESOLVED LINKS
// =============================================================================

/// Kind of outbound URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// In-provider search or deeplink page.
    PlatformSearch,
    /// Generic web-search engine fallback.
    WebSearch,
}

/// One outbound URL with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedUrl {
    pub url: String,

    #[serde(rename = "type")]
    pub link_type: LinkType,
}

/// Primary outbound URL plus ordered fallback URLs.
///
/// Invariant: every URL here passes the allow-list validator. The resolver
/// builds from the provider table and re-checks each URL before emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub primary: ResolvedUrl,

    #[serde(default)]
    pub fallbacks: Vec<ResolvedUrl>,
}

/// Final output shape handed to the UI collaborator: the candidate with
/// its normalized platform, plus its resolved link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,

    pub link: ResolvedLink,
}
