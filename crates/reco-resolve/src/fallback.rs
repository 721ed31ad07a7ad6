//! Fallback candidate synthesis for diversity coverage.
//!
//! When the AI-produced batch under-supplies a category's required sub-kinds
//! (an entertainment batch with four videos and no music, a fitness batch
//! with no nearby place), this module tops the batch up from a static,
//! locale-aware template bank. Synthesized candidates flow through the same
//! `Candidate` shape as AI output, so dedupe and link resolution treat them
//! identically.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use reco_core::models::{
    Candidate, Category, EntertainmentKind, FitnessKind, HistoryItem, Locale, UserPreference,
};
use reco_core::textkey::{composite_key, normalize_text_key};
use tracing::{debug, error};

/// One synthesizable candidate template.
///
/// `query` may contain a `{tag}` placeholder, interpolated from the user's
/// preference tags at emission time. Titles are always non-empty: an
/// untitled filler could never be deduped away downstream.
struct FallbackTemplate {
    category: Category,
    locale: Locale,
    entertainment_type: Option<EntertainmentKind>,
    fitness_type: Option<FitnessKind>,
    title: &'static str,
    query: &'static str,
    platform: &'static str,
}

impl FallbackTemplate {
    const fn entertainment(
        locale: Locale,
        kind: EntertainmentKind,
        title: &'static str,
        query: &'static str,
        platform: &'static str,
    ) -> Self {
        Self {
            category: Category::Entertainment,
            locale,
            entertainment_type: Some(kind),
            fitness_type: None,
            title,
            query,
            platform,
        }
    }

    const fn fitness(
        locale: Locale,
        kind: FitnessKind,
        title: &'static str,
        query: &'static str,
        platform: &'static str,
    ) -> Self {
        Self {
            category: Category::Fitness,
            locale,
            entertainment_type: None,
            fitness_type: Some(kind),
            title,
            query,
            platform,
        }
    }

    const fn general(
        category: Category,
        locale: Locale,
        title: &'static str,
        query: &'static str,
        platform: &'static str,
    ) -> Self {
        Self {
            category,
            locale,
            entertainment_type: None,
            fitness_type: None,
            title,
            query,
            platform,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self.category {
            Category::Entertainment => self
                .entertainment_type
                .map(|k| k.label())
                .unwrap_or("general"),
            Category::Fitness => self.fitness_type.map(|k| k.label()).unwrap_or("general"),
            _ => "general",
        }
    }

    fn to_candidate(&self, query: String) -> Candidate {
        Candidate {
            title: self.title.to_string(),
            search_query: Some(query),
            category: self.category,
            entertainment_type: self.entertainment_type,
            fitness_type: self.fitness_type,
            platform: self.platform.to_string(),
        }
    }
}

/// The full template bank. Every category × locale pair has entries;
/// entertainment covers all four kinds and fitness all three, so coverage
/// top-up can always succeed.
static TEMPLATES: &[FallbackTemplate] = &[
    // ─── Entertainment / zh ────────────────────────────────────────────────
    FallbackTemplate::entertainment(
        Locale::Zh,
        EntertainmentKind::Video,
        "本周高分影视混剪",
        "高分电影 混剪 {tag}",
        "哔哩哔哩",
    ),
    FallbackTemplate::entertainment(
        Locale::Zh,
        EntertainmentKind::Game,
        "最近值得一玩的休闲游戏",
        "休闲游戏 推荐 {tag}",
        "TapTap",
    ),
    FallbackTemplate::entertainment(
        Locale::Zh,
        EntertainmentKind::Music,
        "适合通勤路上听的歌单",
        "通勤 歌单 {tag}",
        "网易云音乐",
    ),
    FallbackTemplate::entertainment(
        Locale::Zh,
        EntertainmentKind::Review,
        "本月口碑佳作影评合集",
        "高分影评 {tag}",
        "豆瓣",
    ),
    FallbackTemplate::entertainment(
        Locale::Zh,
        EntertainmentKind::Video,
        "热门剧集十分钟速看",
        "热门剧集 解说",
        "哔哩哔哩",
    ),
    // ─── Entertainment / en ────────────────────────────────────────────────
    FallbackTemplate::entertainment(
        Locale::En,
        EntertainmentKind::Video,
        "Trending movie recaps this week",
        "movie recap {tag}",
        "YouTube",
    ),
    FallbackTemplate::entertainment(
        Locale::En,
        EntertainmentKind::Game,
        "Cozy games worth trying",
        "cozy games {tag}",
        "YouTube",
    ),
    FallbackTemplate::entertainment(
        Locale::En,
        EntertainmentKind::Music,
        "Fresh commute playlists",
        "commute playlist {tag}",
        "Spotify",
    ),
    FallbackTemplate::entertainment(
        Locale::En,
        EntertainmentKind::Review,
        "Top-rated film reviews",
        "best film reviews this week",
        "IMDb",
    ),
    // ─── Shopping ──────────────────────────────────────────────────────────
    FallbackTemplate::general(
        Category::Shopping,
        Locale::Zh,
        "应季好物清单",
        "应季 好物 {tag}",
        "淘宝",
    ),
    FallbackTemplate::general(
        Category::Shopping,
        Locale::Zh,
        "高性价比数码配件",
        "数码配件 高性价比",
        "京东",
    ),
    FallbackTemplate::general(
        Category::Shopping,
        Locale::En,
        "Seasonal picks worth a look",
        "seasonal deals {tag}",
        "Amazon",
    ),
    FallbackTemplate::general(
        Category::Shopping,
        Locale::En,
        "Highly rated everyday gadgets",
        "best rated gadgets",
        "Amazon",
    ),
    // ─── Food ──────────────────────────────────────────────────────────────
    FallbackTemplate::general(
        Category::Food,
        Locale::Zh,
        "附近人气小馆打卡",
        "附近 人气餐厅 {tag}",
        "大众点评",
    ),
    FallbackTemplate::general(
        Category::Food,
        Locale::Zh,
        "在家复刻的快手菜",
        "快手菜 教程",
        "小红书",
    ),
    FallbackTemplate::general(
        Category::Food,
        Locale::En,
        "Hidden-gem restaurants nearby",
        "best restaurants near me",
        "Yelp",
    ),
    FallbackTemplate::general(
        Category::Food,
        Locale::En,
        "Easy weeknight recipes",
        "easy recipes {tag}",
        "YouTube",
    ),
    // ─── Travel ────────────────────────────────────────────────────────────
    FallbackTemplate::general(
        Category::Travel,
        Locale::Zh,
        "周末周边游路线",
        "周末 周边游 {tag}",
        "携程",
    ),
    FallbackTemplate::general(
        Category::Travel,
        Locale::Zh,
        "小众Citywalk路线",
        "citywalk 路线",
        "小红书",
    ),
    FallbackTemplate::general(
        Category::Travel,
        Locale::En,
        "Weekend getaway ideas",
        "weekend getaway {tag}",
        "Tripadvisor",
    ),
    FallbackTemplate::general(
        Category::Travel,
        Locale::En,
        "Underrated city walks",
        "city walking routes",
        "Tripadvisor",
    ),
    // ─── Fitness / zh ──────────────────────────────────────────────────────
    FallbackTemplate::fitness(
        Locale::Zh,
        FitnessKind::Tutorial,
        "零基础燃脂跟练",
        "燃脂 跟练 {tag}",
        "哔哩哔哩",
    ),
    FallbackTemplate::fitness(
        Locale::Zh,
        FitnessKind::Equipment,
        "家用健身小器械清单",
        "健身器材 家用 {tag}",
        "京东",
    ),
    FallbackTemplate::fitness(
        Locale::Zh,
        FitnessKind::NearbyPlace,
        "附近适合夜跑的公园",
        "附近 夜跑 公园",
        "高德地图",
    ),
    // ─── Fitness / en ──────────────────────────────────────────────────────
    FallbackTemplate::fitness(
        Locale::En,
        FitnessKind::Tutorial,
        "Beginner follow-along workouts",
        "beginner workout {tag}",
        "YouTube",
    ),
    FallbackTemplate::fitness(
        Locale::En,
        FitnessKind::Equipment,
        "Compact home gym gear",
        "home gym equipment",
        "Amazon",
    ),
    FallbackTemplate::fitness(
        Locale::En,
        FitnessKind::NearbyPlace,
        "Running routes near you",
        "running routes near me",
        "Google Maps",
    ),
];

/// Bank indexed by (category, locale), built once.
static BANK: Lazy<HashMap<(Category, Locale), Vec<&'static FallbackTemplate>>> =
    Lazy::new(|| {
        let mut bank: HashMap<(Category, Locale), Vec<&'static FallbackTemplate>> = HashMap::new();
        for template in TEMPLATES {
            bank.entry((template.category, template.locale))
                .or_default()
                .push(template);
        }
        bank
    });

/// Parameters for one fallback-generation call.
#[derive(Debug, Clone)]
pub struct FallbackRequest {
    pub category: Category,
    pub locale: Locale,
    /// Maximum number of candidates to synthesize.
    pub count: usize,
    /// Titles already shown this session; never re-emitted.
    pub exclude_titles: Vec<String>,
    /// Prior-session history; synthesized filler avoids these titles too.
    pub user_history: Vec<HistoryItem>,
    /// Preference tags for query personalization.
    pub preference: UserPreference,
}

/// Synthesize category-correct filler candidates.
///
/// Templates for sub-kinds missing from `existing` are emitted first, then
/// remaining templates top up toward `count`. Output never collides (via
/// text key) with `exclude_titles`, history titles, or composite keys
/// already present in `existing`.
pub fn generate_fallback_candidates(
    request: &FallbackRequest,
    existing: &[Candidate],
) -> Vec<Candidate> {
    if request.count == 0 {
        return Vec::new();
    }

    let templates = match BANK.get(&(request.category, request.locale)) {
        Some(templates) if !templates.is_empty() => templates,
        _ => {
            // A category with no templates is a configuration defect, not a
            // runtime condition.
            error!(
                subsystem = "fallback",
                category = request.category.label(),
                "template bank has no entries for requested category/locale"
            );
            debug_assert!(
                false,
                "empty fallback template bank for {:?}/{:?}",
                request.category, request.locale
            );
            return Vec::new();
        }
    };

    let exclude_keys: HashSet<String> = request
        .exclude_titles
        .iter()
        .map(|t| normalize_text_key(t))
        .filter(|k| !k.is_empty())
        .collect();
    let history_keys: HashSet<String> = request
        .user_history
        .iter()
        .map(|h| normalize_text_key(&h.title))
        .filter(|k| !k.is_empty())
        .collect();

    let mut seen_composites: HashSet<String> = existing
        .iter()
        .map(|c| {
            composite_key(
                &normalize_text_key(&c.title),
                &c.search_query
                    .as_deref()
                    .map(normalize_text_key)
                    .unwrap_or_default(),
                c.kind_label(),
            )
        })
        .collect();

    let covered_kinds: HashSet<&'static str> =
        existing.iter().map(|c| c.kind_label()).collect();

    // Missing kinds first, then everything else as top-up material.
    let (priority, remainder): (Vec<&&'static FallbackTemplate>, Vec<&&'static FallbackTemplate>) =
        templates
            .iter()
            .partition(|t| !covered_kinds.contains(t.kind_label()));

    let mut generated: Vec<Candidate> = Vec::new();
    let mut emitted_kinds: HashSet<&'static str> = HashSet::new();

    // First pass: one template per missing kind, restoring coverage.
    for template in &priority {
        if generated.len() >= request.count {
            break;
        }
        if emitted_kinds.contains(template.kind_label()) {
            continue;
        }
        if try_emit(
            template,
            request,
            &exclude_keys,
            &history_keys,
            &mut seen_composites,
            &mut generated,
        ) {
            emitted_kinds.insert(template.kind_label());
        }
    }

    // Second pass: top up toward `count` with whatever remains.
    for template in priority.iter().chain(remainder.iter()) {
        if generated.len() >= request.count {
            break;
        }
        try_emit(
            template,
            request,
            &exclude_keys,
            &history_keys,
            &mut seen_composites,
            &mut generated,
        );
    }

    debug!(
        op = "generate_fallbacks",
        category = request.category.label(),
        fallback_count = generated.len(),
        "fallback synthesis complete"
    );

    generated
}

/// Emit one template as a candidate if it clears the exclusion, history,
/// and composite-key gates. Returns whether a candidate was pushed.
fn try_emit(
    template: &FallbackTemplate,
    request: &FallbackRequest,
    exclude_keys: &HashSet<String>,
    history_keys: &HashSet<String>,
    seen_composites: &mut HashSet<String>,
    generated: &mut Vec<Candidate>,
) -> bool {
    let title_key = normalize_text_key(template.title);
    if exclude_keys.contains(&title_key) || history_keys.contains(&title_key) {
        return false;
    }

    let query = personalize(template.query, &request.preference.tags, generated.len());
    let query_key = normalize_text_key(&query);
    let composite = composite_key(&title_key, &query_key, template.kind_label());
    if seen_composites.contains(&composite) {
        return false;
    }

    seen_composites.insert(composite);
    generated.push(template.to_candidate(query));
    true
}

/// Interpolate the `{tag}` placeholder from preference tags.
///
/// Tags rotate by emission index so consecutive fillers vary. Without tags
/// the placeholder collapses and surrounding whitespace is re-normalized.
fn personalize(template: &str, tags: &[String], index: usize) -> String {
    let interpolated = if template.contains("{tag}") {
        let replacement = if tags.is_empty() {
            ""
        } else {
            tags[index % tags.len()].trim()
        };
        template.replace("{tag}", replacement)
    } else {
        template.to_string()
    };

    interpolated.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(category: Category, locale: Locale, count: usize) -> FallbackRequest {
        FallbackRequest {
            category,
            locale,
            count,
            exclude_titles: Vec::new(),
            user_history: Vec::new(),
            preference: UserPreference::default(),
        }
    }

    #[test]
    fn test_fitness_coverage_from_empty_batch() {
        let generated =
            generate_fallback_candidates(&request(Category::Fitness, Locale::Zh, 5), &[]);

        assert!(generated.len() <= 5);
        for kind in FitnessKind::ALL {
            assert!(
                generated.iter().any(|c| c.fitness_type == Some(kind)),
                "missing fitness kind {:?}",
                kind
            );
        }
    }

    #[test]
    fn test_entertainment_coverage_from_empty_batch() {
        let generated =
            generate_fallback_candidates(&request(Category::Entertainment, Locale::Zh, 4), &[]);

        assert_eq!(generated.len(), 4);
        for kind in EntertainmentKind::ALL {
            assert!(generated.iter().any(|c| c.entertainment_type == Some(kind)));
        }
    }

    #[test]
    fn test_missing_kinds_fill_before_repeats() {
        // Batch already has a video; the one remaining slot must not be
        // spent on another video.
        let existing = vec![Candidate::new("某个视频", Category::Entertainment, "哔哩哔哩")
            .with_entertainment_type(EntertainmentKind::Video)];

        let generated = generate_fallback_candidates(
            &request(Category::Entertainment, Locale::Zh, 3),
            &existing,
        );

        assert_eq!(generated.len(), 3);
        assert!(generated
            .iter()
            .all(|c| c.entertainment_type != Some(EntertainmentKind::Video)));
    }

    #[test]
    fn test_output_capped_at_count() {
        let generated =
            generate_fallback_candidates(&request(Category::Entertainment, Locale::Zh, 2), &[]);
        assert_eq!(generated.len(), 2);
    }

    #[test]
    fn test_count_zero_yields_nothing() {
        let generated =
            generate_fallback_candidates(&request(Category::Fitness, Locale::En, 0), &[]);
        assert!(generated.is_empty());
    }

    #[test]
    fn test_excluded_titles_never_emitted() {
        let mut req = request(Category::Fitness, Locale::Zh, 5);
        req.exclude_titles = vec!["零基础燃脂跟练".to_string()];

        let generated = generate_fallback_candidates(&req, &[]);
        assert!(generated.iter().all(|c| c.title != "零基础燃脂跟练"));
    }

    #[test]
    fn test_history_titles_never_emitted() {
        let mut req = request(Category::Travel, Locale::Zh, 4);
        req.user_history = vec![HistoryItem::new("周末 周边游 路线")];

        let generated = generate_fallback_candidates(&req, &[]);
        // Text-key match: spacing differences do not defeat the exclusion.
        assert!(generated.iter().all(|c| c.title != "周末周边游路线"));
    }

    #[test]
    fn test_tag_personalization_rotates() {
        let mut req = request(Category::Entertainment, Locale::Zh, 4);
        req.preference.tags = vec!["科幻".to_string(), "悬疑".to_string()];

        let generated = generate_fallback_candidates(&req, &[]);
        let queries: Vec<&str> = generated
            .iter()
            .filter_map(|c| c.search_query.as_deref())
            .collect();

        assert!(queries.iter().any(|q| q.contains("科幻") || q.contains("悬疑")));
    }

    #[test]
    fn test_placeholder_collapses_without_tags() {
        let generated =
            generate_fallback_candidates(&request(Category::Shopping, Locale::Zh, 2), &[]);

        for candidate in &generated {
            let query = candidate.search_query.as_deref().unwrap();
            assert!(!query.contains("{tag}"));
            assert!(!query.contains("  "));
            assert_eq!(query, query.trim());
        }
    }

    #[test]
    fn test_all_outputs_titled_and_category_correct() {
        for (category, locale) in [
            (Category::Entertainment, Locale::En),
            (Category::Shopping, Locale::En),
            (Category::Food, Locale::Zh),
            (Category::Travel, Locale::En),
            (Category::Fitness, Locale::En),
        ] {
            let generated = generate_fallback_candidates(&request(category, locale, 5), &[]);
            assert!(!generated.is_empty());
            for candidate in &generated {
                assert!(!normalize_text_key(&candidate.title).is_empty());
                assert_eq!(candidate.category, category);
                assert!(!candidate.platform.is_empty());
            }
        }
    }

    #[test]
    fn test_personalize_helper() {
        let tags = vec!["徒步".to_string()];
        assert_eq!(personalize("周边游 {tag}", &tags, 0), "周边游 徒步");
        assert_eq!(personalize("周边游 {tag}", &[], 0), "周边游");
        assert_eq!(personalize("无占位符", &tags, 0), "无占位符");
    }
}
