//! Region/client-aware platform normalization.
//!
//! Inside the CN mobile app container, some platform targets the candidate
//! generator emits are unusable: map apps cannot render acceptable results
//! in the embedded food flow, and overseas video sites cannot be opened at
//! all. This module rewrites those display names. It activates only for
//! zh-locale mobile app traffic; web and international traffic pass through
//! untouched.

use reco_core::models::{Category, ClientKind, FitnessKind, Locale};
use tracing::trace;

/// Per-candidate context for platform normalization.
#[derive(Debug, Clone)]
pub struct PlatformContext {
    pub category: Category,
    pub client: ClientKind,
    pub is_mobile: bool,
    pub locale: Locale,
    /// Position of the candidate in its batch; drives the deterministic
    /// video-platform alternation.
    pub index: usize,
    pub fitness_type: Option<FitnessKind>,
}

/// CN video platforms the app container can open directly. Incoming names
/// already in this set pass through unchanged.
const CN_VIDEO_PLATFORMS: &[&str] = &["哔哩哔哩", "B站", "抖音", "快手", "西瓜视频"];

/// Alternation pair used when the incoming platform is generic: even batch
/// positions get the first entry, odd positions the second.
const CN_VIDEO_ALTERNATION: [&str; 2] = ["哔哩哔哩", "抖音"];

/// Map services that cannot render inside the app container.
const CN_MAP_SERVICES: &[&str] = &["高德地图", "百度地图", "腾讯地图"];

/// Shopping platform forced for fitness equipment candidates.
const CN_EQUIPMENT_PLATFORM: &str = "京东";

/// Maps platform (with fitness-place overlay) forced for nearby-place
/// candidates.
const CN_NEARBY_PLATFORM: &str = "高德地图";

/// Social-discovery platform substituted for map services in the food flow.
const CN_FOOD_DISCOVERY_PLATFORM: &str = "小红书";

/// Rewrite a platform display name for the requesting surface.
///
/// Identity unless `locale == zh && is_mobile && client == app`. When
/// active, the rewrite is a pure table: no lookups, no randomness beyond
/// the index alternation, same input always gives the same output.
pub fn normalize_platform(platform: &str, ctx: &PlatformContext) -> String {
    if ctx.locale != Locale::Zh || !ctx.is_mobile || ctx.client != ClientKind::App {
        return platform.to_string();
    }

    let normalized = match ctx.category {
        Category::Fitness => normalize_fitness_platform(platform, ctx),
        Category::Food => normalize_food_platform(platform),
        _ => platform.to_string(),
    };

    if normalized != platform {
        trace!(
            subsystem = "platform",
            platform = platform,
            rewritten = %normalized,
            "platform rewritten for cn mobile app"
        );
    }
    normalized
}

fn normalize_fitness_platform(platform: &str, ctx: &PlatformContext) -> String {
    match ctx.fitness_type {
        Some(FitnessKind::Equipment) => CN_EQUIPMENT_PLATFORM.to_string(),
        Some(FitnessKind::NearbyPlace) => CN_NEARBY_PLATFORM.to_string(),
        _ => {
            if CN_VIDEO_PLATFORMS.contains(&platform) {
                platform.to_string()
            } else {
                CN_VIDEO_ALTERNATION[ctx.index % 2].to_string()
            }
        }
    }
}

fn normalize_food_platform(platform: &str) -> String {
    if CN_MAP_SERVICES.contains(&platform) {
        CN_FOOD_DISCOVERY_PLATFORM.to_string()
    } else {
        platform.to_string()
    }
}
