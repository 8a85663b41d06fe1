// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "activity/activity_tracker.rs"]
pub mod activity;

#[path = "artist/artist_cache.rs"]
pub mod artist;

#[path = "config/bot_config.rs"]
pub mod config;

#[path = "conversion/unit_service.rs"]
pub mod conversion;

#[path = "dictionary/dictionary_service.rs"]
pub mod dictionary;

#[path = "gallery/mod.rs"]
pub mod gallery;

#[path = "timezones/timezone_service.rs"]
pub mod timezones;
