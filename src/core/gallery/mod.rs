//! Gallery detection and normalization for art-site links.
//!
//! A message comes in, `links` pulls the URLs out of it, `resolver` decides
//! which site a URL belongs to, and `service` turns it into a run of
//! [`GalleryItem`]s ready to be posted back into the channel.

pub mod links;
pub mod resolver;
pub mod service;
pub mod tags;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while expanding a link into a gallery.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("no post found for {0}")]
    NotFound(String),
}

/// A link found in a chat message, paired with its host domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub url: String,
    pub domain: String,
}

/// The art sites the bot knows how to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Danbooru,
    E621,
    Twitter,
    Pixiv,
}

/// Where an embed image comes from: a remote URL, or bytes the bot uploads
/// itself because the upstream won't serve the file without special headers.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Url(String),
    Attachment { filename: String, bytes: Vec<u8> },
}

/// Attribution block shown at the top of an embed.
#[derive(Debug, Clone)]
pub struct AuthorBlock {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

/// Trailing footer, present only on the last item of a gallery run.
#[derive(Debug, Clone)]
pub struct GalleryFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

/// One message worth of normalized gallery content.
#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub image: ImageSource,
    pub author: Option<AuthorBlock>,
    pub footer: Option<GalleryFooter>,
}
