use poise::serenity_prelude as serenity;

use crate::discord::{Context, Error};

/// Display the avatar of an user.
#[poise::command(slash_command, aliases("ava"))]
pub async fn avatar(
    ctx: Context<'_>,
    #[description = "User to show (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());

    let embed = serenity::CreateEmbed::new()
        .image(user.face())
        .author(serenity::CreateEmbedAuthor::new(&user.name).icon_url(user.face()));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
