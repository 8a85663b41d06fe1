//! Message-event hook: scan for imperial units and art-site links, expand
//! what can be expanded, and keep the channel-activity bookkeeping current.
//!
//! This is the swallow-and-log boundary for automatic detection: a provider
//! that misbehaves costs us one skipped link and a warning in the logs, not
//! an error message in chat.

use poise::serenity_prelude as serenity;

use crate::core::config::pick_quote;
use crate::core::gallery::{links, ProviderKind};
use crate::discord::{Data, Error};

use super::renderer;

pub async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    convert_units(ctx, msg, data).await?;

    let found = links::find_links(&msg.content);
    let had_links = !found.is_empty();

    for link in &found {
        let Some(kind) = data.gallery.resolve(&link.domain) else {
            continue;
        };

        // Proxying image bytes takes a moment; let the channel know.
        let mut notice = None;
        if kind == ProviderKind::Pixiv {
            let quote = pick_quote(&data.config.quotes.processing_long_task);
            if !quote.is_empty() {
                notice = msg
                    .channel_id
                    .say(&ctx.http, format!("***{}***", quote))
                    .await
                    .ok();
            }
            let _ = msg.channel_id.broadcast_typing(&ctx.http).await;
        }

        match data.gallery.gallery_for(link).await {
            Ok(items) if !items.is_empty() => {
                if let Err(err) = renderer::render_gallery(&ctx.http, msg.channel_id, items).await {
                    tracing::warn!(url = %link.url, error = %err, "Failed to post gallery");
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    url = %link.url,
                    provider = ?kind,
                    error = %err,
                    "Gallery fetch failed"
                );
            }
        }

        if let Some(notice) = notice {
            let _ = notice.delete(&ctx.http).await;
        }
    }

    let should_warn = data.activity.note_message(msg.channel_id.get(), had_links).await;
    if should_warn {
        let quote = pick_quote(&data.config.quotes.quiet_channel_past_threshold);
        if !quote.is_empty() {
            msg.channel_id.say(&ctx.http, quote).await?;
        }
    }

    Ok(())
}

/// Reply to imperial measurements with their metric equivalents.
async fn convert_units(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let conversions = data.conversions.scan(&msg.content);
    if conversions.is_empty() {
        return Ok(());
    }

    let mut reply = format!("{}```", pick_quote(&data.config.quotes.converting_units));
    for conversion in &conversions {
        reply.push_str(&format!("\n{} → {:.4}m", conversion.matched, conversion.meters));
    }
    // Half the time the bot gets modest about its own math.
    if rand::random::<bool>() {
        reply.push_str("```\n");
        reply.push_str(pick_quote(&data.config.quotes.converting_units_modest));
    } else {
        reply.push_str("```");
    }

    msg.channel_id.say(&ctx.http, reply).await?;
    Ok(())
}
