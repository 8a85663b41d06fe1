// This is the entry point of the gallery bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (upstream API clients)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration and secrets
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::collections::HashMap;
use std::sync::Arc;

use poise::serenity_prelude as serenity;

use crate::core::activity::ActivityTracker;
use crate::core::artist::ArtistCache;
use crate::core::config::{BotConfig, Secrets};
use crate::core::conversion::UnitConversionService;
use crate::core::dictionary::DictionaryService;
use crate::core::gallery::service::GalleryService;
use crate::core::gallery::ProviderKind;
use crate::core::timezones::TimezoneService;
use crate::discord::gallery::dispatcher;
use crate::discord::{Data, Error};
use crate::infra::boards::BoardApiClient;
use crate::infra::dictionary::{UrbanApiClient, WebsterApiClient};
use crate::infra::http::Transport;
use crate::infra::illustration::IllustApiClient;
use crate::infra::microblog::MicroblogApiClient;

/// Event handler for non-command Discord events. Every inbound message goes
/// through the gallery dispatcher.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // Ignore bot messages (including our own)
        if new_message.author.bot {
            return Ok(());
        }
        dispatcher::handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let secrets = Secrets::from_env().expect(
        "Missing required environment variables! Create a .env file with your bot token.",
    );

    let config_path =
        std::env::var("GALLERY_BOT_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = Arc::new(BotConfig::load_or_default(&config_path).expect("Failed to load config"));

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let transport = Transport::new().expect("Failed to build HTTP client");

    let artists = Arc::new(ArtistCache::new());
    let activity = Arc::new(ActivityTracker::new(config.rules.quiet_channels.clone()));

    let mut boards = HashMap::new();
    boards.insert(
        ProviderKind::Danbooru,
        BoardApiClient::new(
            "https://danbooru.donmai.us",
            secrets.board.clone(),
            transport.clone(),
        ),
    );
    boards.insert(
        ProviderKind::E621,
        BoardApiClient::new("https://e621.net", None, transport.clone()),
    );

    let microblog = MicroblogApiClient::new(secrets.microblog_bearer.clone(), transport.clone());
    let illust = IllustApiClient::new(secrets.illust.clone(), transport.clone());

    let gallery = Arc::new(GalleryService::new(
        Arc::clone(&config),
        boards,
        microblog,
        illust,
        Arc::clone(&artists),
    ));

    let dictionary = Arc::new(DictionaryService::new(
        UrbanApiClient::new(
            config.dictionaries.urban.search_url.clone(),
            transport.clone(),
        ),
        WebsterApiClient::new(
            config.dictionaries.webster.search_url.clone(),
            secrets.dictionary_key.clone(),
            transport.clone(),
        ),
        config.dictionaries.clone(),
    ));

    let timezones = Arc::new(TimezoneService::new(config.timezones.clone()));

    // Create the data structure that will be shared across all commands
    let data = Data {
        config: Arc::clone(&config),
        gallery,
        dictionary,
        conversions: Arc::new(UnitConversionService::new()),
        timezones,
        activity,
        artists,
        launch_time: chrono::Utc::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Register all our commands here
            commands: vec![
                discord::commands::artist::artist(),
                discord::commands::avatar::avatar(),
                discord::commands::boards::danbooru(),
                discord::commands::boards::e621(),
                discord::commands::dictionary::urban(),
                discord::commands::dictionary::word(),
                discord::commands::timezones::time(),
                discord::commands::uptime::uptime(),
                discord::commands::uptime::last(),
            ],
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                println!("🎨 Gallery bot is starting up...");

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                println!("✅ Commands registered!");
                println!("🚀 Bot is ready!");

                // Change play status to something fitting
                ctx.set_activity(Some(serenity::ActivityData::playing("with books")));

                Ok(data)
            })
        })
        .build();

    // Create the client and start the bot
    let mut client = serenity::ClientBuilder::new(secrets.discord_token.clone(), intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
