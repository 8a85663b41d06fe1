use crate::core::config::pick_quote;
use crate::core::gallery::service::BoardHit;
use crate::core::gallery::ProviderKind;
use crate::discord::{Context, Error};

/// Search on danbooru!
#[poise::command(slash_command, aliases("dan"))]
pub async fn danbooru(
    ctx: Context<'_>,
    #[description = "Tags to search for"] tags: String,
) -> Result<(), Error> {
    search_board(ctx, ProviderKind::Danbooru, tags).await
}

/// Search on e621!
#[poise::command(slash_command, aliases("e6"))]
pub async fn e621(
    ctx: Context<'_>,
    #[description = "Tags to search for"] tags: String,
) -> Result<(), Error> {
    search_board(ctx, ProviderKind::E621, tags).await
}

/// Shared logic for the board search commands. Explicit searches answer in
/// chat even when things go wrong, unlike automatic link expansion.
async fn search_board(ctx: Context<'_>, kind: ProviderKind, tags: String) -> Result<(), Error> {
    ctx.defer().await?;

    let hits = match ctx.data().gallery.board_search(kind, &tags).await {
        Ok(hits) => hits,
        Err(err) => {
            tracing::warn!(provider = ?kind, tags = %tags, error = %err, "Board search failed");
            ctx.say(pick_quote(&ctx.data().config.quotes.data_error))
                .await?;
            return Ok(());
        }
    };

    if hits.is_empty() {
        ctx.say(pick_quote(&ctx.data().config.quotes.nothing_found))
            .await?;
        return Ok(());
    }

    for hit in hits {
        match hit {
            BoardHit::Embed {
                title,
                image_url,
                post_url,
            } => {
                let embed = poise::serenity_prelude::CreateEmbed::new()
                    .title(title)
                    .url(&post_url)
                    .image(image_url);
                // Angle brackets suppress the platform's own preview of the
                // page link so only our embed shows.
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!("<{}>", post_url))
                        .embed(embed),
                )
                .await?;
            }
            BoardHit::Plain { url } => {
                ctx.say(url).await?;
            }
        }
    }
    Ok(())
}
