//! Pulls URLs out of free-form chat text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExternalLink;

// Permissive on purpose: anything scheme-prefixed that looks vaguely like a
// URL should be considered, since the site resolver filters by domain anyway.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[A-Za-z0-9$\-_.+!*'(),@&=:;/?#~]|%[0-9A-Fa-f]{2})+")
        .expect("URL pattern compiles")
});

/// Find every URL-looking substring in `text`, in order of appearance.
/// Duplicates are kept; callers that care can dedup themselves.
pub fn find_links(text: &str) -> Vec<ExternalLink> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| {
            let url = m.as_str().to_string();
            let domain = domain_of(&url);
            ExternalLink { url, domain }
        })
        .collect()
}

/// Derive the host domain: drop the scheme, cut at the first `/`, then at
/// the first `?` (for URLs that put a query directly after the host).
pub fn domain_of(url: &str) -> String {
    let after_scheme = url.splitn(2, "//").nth(1).unwrap_or(url);
    let host = after_scheme.split('/').next().unwrap_or(after_scheme);
    host.split('?').next().unwrap_or(host).to_string()
}

/// Last path segment of a URL, used to name inline attachments.
pub fn file_name_of(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}
