use poise::serenity_prelude as serenity;

use crate::core::config::pick_quote;
use crate::core::gallery::ProviderKind;
use crate::discord::{Context, Error};

/// Info about the artist behind the most recent art link the bot resolved.
#[poise::command(slash_command, subcommands("twitter", "danbooru", "pixiv"))]
pub async fn artist(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Display the artist's twitter profile.
#[poise::command(slash_command, aliases("twit"))]
pub async fn twitter(ctx: Context<'_>) -> Result<(), Error> {
    let Some(artist) = ctx.data().artists.current().await else {
        ctx.say(pick_quote(&ctx.data().config.quotes.artist_unknown))
            .await?;
        return Ok(());
    };

    let mut author =
        serenity::CreateEmbedAuthor::new(format!("{} (@{})", artist.name, artist.screen_name))
            .url(artist.profile_url());
    if let Some(avatar) = &artist.avatar_url {
        author = author.icon_url(avatar);
    }

    let mut embed = serenity::CreateEmbed::new().author(author);
    if let Some(avatar) = &artist.avatar_url {
        embed = embed.thumbnail(avatar);
    }
    if let Some(site) = ctx.data().config.site(ProviderKind::Twitter) {
        let mut footer = serenity::CreateEmbedFooter::new(&site.name);
        if let Some(icon) = &site.favicon {
            footer = footer.icon_url(icon);
        }
        embed = embed.footer(footer);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Display the artist's art from danbooru.
#[poise::command(slash_command, aliases("dan"))]
pub async fn danbooru(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Box.").await?;
    Ok(())
}

/// Display something from pixiv.
#[poise::command(slash_command, aliases("pix"))]
pub async fn pixiv(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Navi?").await?;
    Ok(())
}
