// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "gallery/gallery_adapters.rs"]
pub mod gallery;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::activity::ActivityTracker;
use crate::core::artist::ArtistCache;
use crate::core::config::BotConfig;
use crate::core::conversion::UnitConversionService;
use crate::core::dictionary::DictionaryService;
use crate::core::gallery::service::GalleryService;
use crate::core::timezones::TimezoneService;
use crate::infra::boards::BoardApiClient;
use crate::infra::dictionary::{UrbanApiClient, WebsterApiClient};
use crate::infra::illustration::IllustApiClient;
use crate::infra::microblog::MicroblogApiClient;

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands and event handlers.
pub struct Data {
    pub config: Arc<BotConfig>,
    pub gallery: Arc<GalleryService<BoardApiClient, MicroblogApiClient, IllustApiClient>>,
    pub dictionary: Arc<DictionaryService<UrbanApiClient, WebsterApiClient>>,
    pub conversions: Arc<UnitConversionService>,
    pub timezones: Arc<TimezoneService>,
    pub activity: Arc<ActivityTracker>,
    pub artists: Arc<ArtistCache>,
    pub launch_time: DateTime<Utc>,
}
