//! Outbound link construction and allow-list validation.
//!
//! Every URL leaving the system is built from a declarative provider table
//! and checked against a fixed allow-list of provider domains. The table is
//! the single place to audit when extending a region: a provider carries
//! its search-URL template and its allow-listed domain side by side, so a
//! template can never point somewhere the validator would reject.
//!
//! The validator fails closed: unknown hosts, unparseable URLs, and
//! non-http(s) schemes are always disallowed.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use reco_core::models::{Candidate, Category, LinkType, Region, ResolvedLink, ResolvedUrl};
use reco_core::textkey::normalize_text_key;
use tracing::{debug, warn};
use url::Url;

// =============================================================================
// PROVIDER TABLE
// =============================================================================

/// Outbound destination providers, per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    // CN
    Bilibili,
    Douyin,
    Taobao,
    Jd,
    Meituan,
    Dianping,
    Xiaohongshu,
    Amap,
    Douban,
    QqMusic,
    NeteaseMusic,
    Ctrip,
    Iqiyi,
    BaiduSearch,
    // INTL
    Youtube,
    GoogleMaps,
    Amazon,
    Yelp,
    Spotify,
    Booking,
    Tripadvisor,
    GoogleSearch,
}

impl Provider {
    /// Allow-listed registrable domain for this provider. Subdomains of the
    /// domain are permitted; nothing else is.
    pub fn allowed_domain(&self) -> &'static str {
        match self {
            Provider::Bilibili => "bilibili.com",
            Provider::Douyin => "douyin.com",
            Provider::Taobao => "taobao.com",
            Provider::Jd => "jd.com",
            Provider::Meituan => "meituan.com",
            Provider::Dianping => "dianping.com",
            Provider::Xiaohongshu => "xiaohongshu.com",
            Provider::Amap => "amap.com",
            Provider::Douban => "douban.com",
            Provider::QqMusic => "y.qq.com",
            Provider::NeteaseMusic => "music.163.com",
            Provider::Ctrip => "ctrip.com",
            Provider::Iqiyi => "iqiyi.com",
            Provider::BaiduSearch => "baidu.com",
            Provider::Youtube => "youtube.com",
            Provider::GoogleMaps => "google.com",
            Provider::Amazon => "amazon.com",
            Provider::Yelp => "yelp.com",
            Provider::Spotify => "spotify.com",
            Provider::Booking => "booking.com",
            Provider::Tripadvisor => "tripadvisor.com",
            Provider::GoogleSearch => "google.com",
        }
    }

    /// Region whose traffic this provider serves.
    pub fn region(&self) -> Region {
        match self {
            Provider::Bilibili
            | Provider::Douyin
            | Provider::Taobao
            | Provider::Jd
            | Provider::Meituan
            | Provider::Dianping
            | Provider::Xiaohongshu
            | Provider::Amap
            | Provider::Douban
            | Provider::QqMusic
            | Provider::NeteaseMusic
            | Provider::Ctrip
            | Provider::Iqiyi
            | Provider::BaiduSearch => Region::Cn,
            Provider::Youtube
            | Provider::GoogleMaps
            | Provider::Amazon
            | Provider::Yelp
            | Provider::Spotify
            | Provider::Booking
            | Provider::Tripadvisor
            | Provider::GoogleSearch => Region::Intl,
        }
    }

    /// Build this provider's search URL for the given text. Query text is
    /// percent-encoded by the `url` crate, both in query pairs and in path
    /// segments.
    pub fn search_url(&self, text: &str) -> String {
        match self {
            Provider::Bilibili => query_url("https://search.bilibili.com/all", "keyword", text),
            Provider::Douyin => path_url("https://www.douyin.com/search/", "", text),
            Provider::Taobao => query_url("https://s.taobao.com/search", "q", text),
            Provider::Jd => query_url("https://search.jd.com/Search", "keyword", text),
            Provider::Meituan => path_url("https://www.meituan.com/s/", "", text),
            Provider::Dianping => {
                path_url("https://www.dianping.com/search/keyword/", "", text)
            }
            Provider::Xiaohongshu => {
                query_url("https://www.xiaohongshu.com/search_result", "keyword", text)
            }
            Provider::Amap => query_url("https://www.amap.com/search", "query", text),
            Provider::Douban => query_url("https://www.douban.com/search", "q", text),
            Provider::QqMusic => query_url("https://y.qq.com/n/ryqq/search", "w", text),
            Provider::NeteaseMusic => query_url("https://music.163.com/search", "keywords", text),
            Provider::Ctrip => query_url("https://you.ctrip.com/searchsite", "query", text),
            Provider::Iqiyi => path_url("https://so.iqiyi.com/so/", "q_", text),
            Provider::BaiduSearch => query_url("https://www.baidu.com/s", "wd", text),
            Provider::Youtube => {
                query_url("https://www.youtube.com/results", "search_query", text)
            }
            Provider::GoogleMaps => path_url("https://www.google.com/maps/search/", "", text),
            Provider::Amazon => query_url("https://www.amazon.com/s", "k", text),
            Provider::Yelp => query_url("https://www.yelp.com/search", "find_desc", text),
            Provider::Spotify => path_url("https://open.spotify.com/search/", "", text),
            Provider::Booking => {
                query_url("https://www.booking.com/searchresults.html", "ss", text)
            }
            Provider::Tripadvisor => query_url("https://www.tripadvisor.com/Search", "q", text),
            Provider::GoogleSearch => query_url("https://www.google.com/search", "q", text),
        }
    }

    const ALL: [Provider; 22] = [
        Provider::Bilibili,
        Provider::Douyin,
        Provider::Taobao,
        Provider::Jd,
        Provider::Meituan,
        Provider::Dianping,
        Provider::Xiaohongshu,
        Provider::Amap,
        Provider::Douban,
        Provider::QqMusic,
        Provider::NeteaseMusic,
        Provider::Ctrip,
        Provider::Iqiyi,
        Provider::BaiduSearch,
        Provider::Youtube,
        Provider::GoogleMaps,
        Provider::Amazon,
        Provider::Yelp,
        Provider::Spotify,
        Provider::Booking,
        Provider::Tripadvisor,
        Provider::GoogleSearch,
    ];
}

fn query_url(base: &str, param: &str, text: &str) -> String {
    let mut url = Url::parse(base).expect("provider base URL is valid");
    url.query_pairs_mut().append_pair(param, text);
    url.into()
}

fn path_url(base: &str, prefix: &str, text: &str) -> String {
    let mut url = Url::parse(base).expect("provider base URL is valid");
    {
        let mut segments = url
            .path_segments_mut()
            .expect("provider base URL has a path");
        segments.pop_if_empty().push(&format!("{}{}", prefix, text));
    }
    url.into()
}

// =============================================================================
// ALLOW-LIST VALIDATOR
// =============================================================================

/// Fixed set of permitted outbound domains, derived from the provider table.
static ALLOWED_DOMAINS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| Provider::ALL.iter().map(|p| p.allowed_domain()).collect());

/// Whether a URL is permitted to leave the system.
///
/// Requires an http(s) scheme and a host that is an allow-listed domain or
/// a subdomain of one (dot-boundary suffix match, never raw substring).
/// Everything else fails closed: unknown domains are never "allowed by
/// default".
pub fn is_allowed_outbound_url(raw: &str) -> bool {
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let host = match parsed.host_str() {
        Some(host) => host.trim_end_matches('.').to_ascii_lowercase(),
        None => return false,
    };

    ALLOWED_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

// =============================================================================
// PLATFORM → PROVIDER MAPPING
// =============================================================================

/// Map a free-text platform display name to a provider.
///
/// Matching runs over the normalized text key, so casing, spacing, and
/// punctuation variants ("Google Maps", "googlemaps") all resolve.
pub fn provider_for_platform(platform: &str) -> Option<Provider> {
    let key = normalize_text_key(platform);
    let provider = match key.as_str() {
        "哔哩哔哩" | "b站" | "bilibili" => Provider::Bilibili,
        "抖音" | "douyin" => Provider::Douyin,
        "淘宝" | "taobao" => Provider::Taobao,
        "京东" | "jd" | "jingdong" => Provider::Jd,
        "美团" | "meituan" => Provider::Meituan,
        "大众点评" | "点评" | "dianping" => Provider::Dianping,
        "小红书" | "xiaohongshu" => Provider::Xiaohongshu,
        "高德地图" | "高德" | "amap" => Provider::Amap,
        "豆瓣" | "douban" => Provider::Douban,
        "qq音乐" | "qqmusic" => Provider::QqMusic,
        "网易云音乐" | "网易云" | "neteasecloudmusic" => Provider::NeteaseMusic,
        "携程" | "ctrip" => Provider::Ctrip,
        "爱奇艺" | "iqiyi" => Provider::Iqiyi,
        "百度" | "baidu" => Provider::BaiduSearch,
        "youtube" | "油管" => Provider::Youtube,
        "googlemaps" | "谷歌地图" => Provider::GoogleMaps,
        "amazon" | "亚马逊" => Provider::Amazon,
        "yelp" => Provider::Yelp,
        "spotify" => Provider::Spotify,
        "booking" | "bookingcom" => Provider::Booking,
        "tripadvisor" => Provider::Tripadvisor,
        "google" | "谷歌" => Provider::GoogleSearch,
        _ => return None,
    };
    Some(provider)
}

/// Default provider used when a candidate's platform is unknown or serves
/// the wrong region.
fn default_provider(category: Category, region: Region) -> Provider {
    match (region, category) {
        (Region::Cn, Category::Entertainment) => Provider::Bilibili,
        (Region::Cn, Category::Shopping) => Provider::Taobao,
        (Region::Cn, Category::Food) => Provider::Dianping,
        (Region::Cn, Category::Travel) => Provider::Ctrip,
        (Region::Cn, Category::Fitness) => Provider::Bilibili,
        (Region::Intl, Category::Entertainment) => Provider::Youtube,
        (Region::Intl, Category::Shopping) => Provider::Amazon,
        (Region::Intl, Category::Food) => Provider::Yelp,
        (Region::Intl, Category::Travel) => Provider::Tripadvisor,
        (Region::Intl, Category::Fitness) => Provider::Youtube,
    }
}

/// Alternate same-category provider used as the first fallback.
fn alternate_provider(category: Category, region: Region) -> Option<Provider> {
    match (region, category) {
        (Region::Cn, Category::Entertainment) => Some(Provider::Iqiyi),
        (Region::Cn, Category::Shopping) => Some(Provider::Jd),
        (Region::Cn, Category::Food) => Some(Provider::Meituan),
        (Region::Cn, Category::Travel) => Some(Provider::Xiaohongshu),
        (Region::Intl, Category::Travel) => Some(Provider::Booking),
        _ => None,
    }
}

/// Generic web-search provider for a region; always allow-listed, always
/// available as the last fallback.
fn web_search_provider(region: Region) -> Provider {
    match region {
        Region::Cn => Provider::BaiduSearch,
        Region::Intl => Provider::GoogleSearch,
    }
}

// =============================================================================
// LINK RESOLUTION
// =============================================================================

/// Build a candidate's primary outbound URL plus ordered fallbacks.
///
/// Every URL in the result passes [`is_allowed_outbound_url`]: the chain is
/// built from the provider table, every URL is re-checked, and a URL that
/// fails the check is dropped rather than surfaced. The result is never
/// empty; when nothing else survives, the primary is the region's generic
/// web-search URL.
pub fn resolve_candidate_link(candidate: &Candidate, region: Region) -> ResolvedLink {
    let text = candidate.link_text();

    let mapped = provider_for_platform(&candidate.platform).filter(|p| p.region() == region);
    let primary_provider =
        mapped.unwrap_or_else(|| default_provider(candidate.category, region));
    let search_provider = web_search_provider(region);

    let mut chain: Vec<(Provider, LinkType)> =
        vec![(primary_provider, LinkType::PlatformSearch)];
    if let Some(alternate) = alternate_provider(candidate.category, region) {
        if alternate != primary_provider {
            chain.push((alternate, LinkType::PlatformSearch));
        }
    }
    if search_provider != primary_provider {
        chain.push((search_provider, LinkType::WebSearch));
    }

    let mut resolved: Vec<ResolvedUrl> = chain
        .into_iter()
        .filter_map(|(provider, link_type)| {
            let url = provider.search_url(text);
            if is_allowed_outbound_url(&url) {
                Some(ResolvedUrl { url, link_type })
            } else {
                warn!(
                    subsystem = "link",
                    provider = ?provider,
                    "templated URL failed allow-list check, dropping"
                );
                None
            }
        })
        .collect();

    if resolved.is_empty() {
        // The UI has no error path for a missing link; degrade to the
        // generic search URL rather than to nothing.
        resolved.push(ResolvedUrl {
            url: search_provider.search_url(text),
            link_type: LinkType::WebSearch,
        });
    }

    let primary = resolved.remove(0);
    debug!(
        op = "resolve_link",
        platform = %candidate.platform,
        provider = ?primary_provider,
        "link resolved"
    );

    ResolvedLink {
        primary,
        fallbacks: resolved,
    }
}
