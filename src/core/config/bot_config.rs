//! Static bot configuration: the provider table, dictionary endpoints,
//! quote pools, and behavior rules. Loaded once at startup and shared
//! immutably through `Data`; secrets come from the environment instead.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::core::gallery::ProviderKind;

/// How a post identifier is carved out of a URL. The prefix must literally
/// appear in the URL; nothing validates that what follows is well-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRule {
    pub prefix: String,
    #[serde(default)]
    pub terminator: Terminator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminator {
    /// Cut at the first occurrence of this string; when it never occurs the
    /// rest of the URL is the identifier.
    Literal(String),
    /// Keep the longest run of leading ASCII digits; an empty run means no
    /// identifier at all.
    #[default]
    LeadingDigits,
}

/// Everything the bot knows about one art site. Declaration order in
/// `sites` doubles as resolution priority when domain substrings overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub kind: ProviderKind,
    /// Display name, used for plain attribution footers.
    pub name: String,
    /// Substring matched against link domains.
    pub domain: String,
    #[serde(default)]
    pub favicon: Option<String>,
    pub id_rules: Vec<IdRule>,
    /// Most gallery items posted for a single link.
    #[serde(default = "default_item_cap")]
    pub item_cap: usize,
    #[serde(default = "default_max_title_len")]
    pub max_title_len: usize,
    /// How many sibling posts to request when expanding a board gallery.
    #[serde(default = "default_gallery_fetch_limit")]
    pub gallery_fetch_limit: usize,
    /// Base of the human-facing post page, with the id appended verbatim.
    #[serde(default)]
    pub post_page_base: Option<String>,
    /// Appended to image URLs to request full quality.
    #[serde(default)]
    pub image_quality_suffix: Option<String>,
}

fn default_item_cap() -> usize {
    4
}

fn default_max_title_len() -> usize {
    256
}

fn default_gallery_fetch_limit() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEndpoints {
    /// API endpoint queried for definitions.
    pub search_url: String,
    /// Human-facing page the embeds link to, with the term appended.
    pub dictionary_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryAssets {
    pub urban: DictionaryEndpoints,
    pub webster: DictionaryEndpoints,
}

impl Default for DictionaryAssets {
    fn default() -> Self {
        Self {
            urban: DictionaryEndpoints {
                search_url: "https://api.urbandictionary.com/v0/define".to_string(),
                dictionary_url: "https://www.urbandictionary.com/define.php?term=".to_string(),
            },
            webster: DictionaryEndpoints {
                search_url: "https://dictionaryapi.com/api/v3/references/collegiate/json"
                    .to_string(),
                dictionary_url: "https://www.merriam-webster.com/dictionary".to_string(),
            },
        }
    }
}

/// The bot's canned lines. Picked at random so it doesn't sound like a robot
/// reading the same card every time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePool {
    pub dictionary_no_results: Vec<String>,
    pub dictionary_try_this: Vec<String>,
    pub processing_long_task: Vec<String>,
    pub converting_units: Vec<String>,
    pub converting_units_modest: Vec<String>,
    pub quiet_channel_past_threshold: Vec<String>,
    pub artist_unknown: Vec<String>,
    pub nothing_found: Vec<String>,
    pub data_error: Vec<String>,
}

impl Default for QuotePool {
    fn default() -> Self {
        let lines = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            dictionary_no_results: lines(&[
                "Nope, nothing.",
                "I searched far and wide. There's nothing.",
                "Not a single entry. Are you making words up?",
            ]),
            dictionary_try_this: lines(&[
                "Hmm, did you mean one of these?",
                "No luck with that spelling. Maybe:",
            ]),
            processing_long_task: lines(&[
                "Hold on, fetching the pictures...",
                "One moment, this takes a little while...",
            ]),
            converting_units: lines(&[
                "Let me translate that for the metric crowd:",
                "Freedom units detected. Converting:",
            ]),
            converting_units_modest: lines(&[
                "Don't quote me on the decimals.",
                "Math brought to you by a very small robot.",
            ]),
            quiet_channel_past_threshold: lines(&[
                "This channel is meant to stay quiet, maybe take the chatter elsewhere?",
                "Lots of talk, not a lot of art. Just saying.",
            ]),
            artist_unknown: lines(&["I'm not aware of anybody at the moment..."]),
            nothing_found: lines(&["Sorry, nothing found!"]),
            data_error: lines(&["Error retrieving data from server."]),
        }
    }
}

/// Pick one line from a pool; empty pools fall back to an empty string so a
/// thin config never panics mid-conversation.
pub fn pick_quote(pool: &[String]) -> &str {
    use rand::seq::SliceRandom;

    pool.choose(&mut rand::thread_rng())
        .map(|s| s.as_str())
        .unwrap_or("")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietChannelRule {
    pub max_messages_without_embeds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorRules {
    /// Board posts carrying any of these tags get their file linked directly,
    /// because the post page itself won't render a preview for them.
    pub no_preview_tags: Vec<String>,
    /// Channels that should stay mostly-art, keyed by channel id.
    pub quiet_channels: HashMap<u64, QuietChannelRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneEntry {
    pub label: String,
    pub zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub sites: Vec<SiteConfig>,
    pub dictionaries: DictionaryAssets,
    pub quotes: QuotePool,
    pub rules: BehaviorRules,
    pub timezones: Vec<TimezoneEntry>,
}

impl BotConfig {
    /// Read the config from a JSON file, falling back to the built-in
    /// defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub fn site(&self, kind: ProviderKind) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.kind == kind)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            sites: vec![
                SiteConfig {
                    kind: ProviderKind::Twitter,
                    name: "Twitter".to_string(),
                    domain: "twitter.com".to_string(),
                    favicon: Some(
                        "https://abs.twimg.com/icons/apple-touch-icon-192x192.png".to_string(),
                    ),
                    id_rules: vec![IdRule {
                        prefix: "/status/".to_string(),
                        terminator: Terminator::Literal("?".to_string()),
                    }],
                    item_cap: default_item_cap(),
                    max_title_len: default_max_title_len(),
                    gallery_fetch_limit: default_gallery_fetch_limit(),
                    post_page_base: None,
                    image_quality_suffix: Some(":orig".to_string()),
                },
                SiteConfig {
                    kind: ProviderKind::Pixiv,
                    name: "Pixiv".to_string(),
                    domain: "pixiv.net".to_string(),
                    favicon: Some("https://www.pixiv.net/favicon.ico".to_string()),
                    id_rules: vec![
                        IdRule {
                            prefix: "illust_id=".to_string(),
                            terminator: Terminator::Literal("&".to_string()),
                        },
                        IdRule {
                            prefix: "/artworks/".to_string(),
                            terminator: Terminator::Literal("?".to_string()),
                        },
                    ],
                    item_cap: default_item_cap(),
                    max_title_len: default_max_title_len(),
                    gallery_fetch_limit: default_gallery_fetch_limit(),
                    post_page_base: None,
                    image_quality_suffix: None,
                },
                SiteConfig {
                    kind: ProviderKind::Danbooru,
                    name: "Danbooru".to_string(),
                    domain: "danbooru.donmai.us".to_string(),
                    favicon: None,
                    id_rules: vec![IdRule {
                        prefix: "/posts/".to_string(),
                        terminator: Terminator::Literal("?".to_string()),
                    }],
                    item_cap: default_item_cap(),
                    max_title_len: default_max_title_len(),
                    gallery_fetch_limit: default_gallery_fetch_limit(),
                    post_page_base: Some("https://danbooru.donmai.us/posts/".to_string()),
                    image_quality_suffix: None,
                },
                SiteConfig {
                    kind: ProviderKind::E621,
                    name: "e621".to_string(),
                    domain: "e621.net".to_string(),
                    favicon: None,
                    id_rules: vec![
                        IdRule {
                            prefix: "/show/".to_string(),
                            terminator: Terminator::LeadingDigits,
                        },
                        IdRule {
                            prefix: "/posts/".to_string(),
                            terminator: Terminator::LeadingDigits,
                        },
                    ],
                    item_cap: default_item_cap(),
                    max_title_len: default_max_title_len(),
                    gallery_fetch_limit: default_gallery_fetch_limit(),
                    post_page_base: Some("https://e621.net/posts/".to_string()),
                    image_quality_suffix: None,
                },
            ],
            dictionaries: DictionaryAssets::default(),
            quotes: QuotePool::default(),
            rules: BehaviorRules {
                // Flash and video posts have no preview image on the page.
                no_preview_tags: vec!["flash".to_string(), "webm".to_string()],
                quiet_channels: HashMap::new(),
            },
            timezones: vec![
                TimezoneEntry {
                    label: "USA".to_string(),
                    zone: "America/Chicago".to_string(),
                },
                TimezoneEntry {
                    label: "Canada".to_string(),
                    zone: "America/Toronto".to_string(),
                },
                TimezoneEntry {
                    label: "Mexico".to_string(),
                    zone: "America/Mexico_City".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardCredentials {
    pub username: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct IllustCredentials {
    pub username: String,
    pub password: String,
}

/// Secrets pulled from the environment (or a `.env` file) at startup.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub discord_token: String,
    pub board: Option<BoardCredentials>,
    pub microblog_bearer: Option<String>,
    pub illust: Option<IllustCredentials>,
    pub dictionary_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> anyhow::Result<Self> {
        let discord_token = std::env::var("DISCORD_TOKEN")
            .context("Missing DISCORD_TOKEN environment variable")?;

        let board = match (
            std::env::var("DANBOORU_USERNAME").ok(),
            std::env::var("DANBOORU_API_KEY").ok(),
        ) {
            (Some(username), Some(api_key)) => Some(BoardCredentials { username, api_key }),
            _ => None,
        };

        let illust = match (
            std::env::var("PIXIV_USERNAME").ok(),
            std::env::var("PIXIV_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(IllustCredentials { username, password }),
            _ => None,
        };

        Ok(Self {
            discord_token,
            board,
            microblog_bearer: std::env::var("TWITTER_BEARER_TOKEN").ok(),
            illust,
            dictionary_key: std::env::var("WEBSTER_API_KEY").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_all_sites() {
        let config = BotConfig::default();
        assert!(config.site(ProviderKind::Danbooru).is_some());
        assert!(config.site(ProviderKind::E621).is_some());
        assert!(config.site(ProviderKind::Twitter).is_some());
        assert!(config.site(ProviderKind::Pixiv).is_some());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = BotConfig::default();
        let raw = serde_json::to_string(&config).unwrap();
        let back: BotConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.sites.len(), config.sites.len());
        assert_eq!(back.sites[0].domain, config.sites[0].domain);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let back: BotConfig = serde_json::from_str(r#"{"timezones": []}"#).unwrap();
        assert!(back.timezones.is_empty());
        assert!(!back.sites.is_empty());
        assert!(!back.quotes.nothing_found.is_empty());
    }

    #[test]
    fn test_pick_quote_handles_empty_pool() {
        assert_eq!(pick_quote(&[]), "");
        let pool = vec!["only line".to_string()];
        assert_eq!(pick_quote(&pool), "only line");
    }
}
