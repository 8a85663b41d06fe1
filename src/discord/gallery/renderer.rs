//! Turns normalized gallery items into Discord embeds.

use poise::serenity_prelude as serenity;

use crate::core::gallery::{GalleryItem, ImageSource};

/// Send one embed per item, sequentially and in input order. There is no
/// retry here; a failed send bubbles up and the dispatch boundary decides
/// what to log.
pub async fn render_gallery(
    http: &serenity::Http,
    channel_id: serenity::ChannelId,
    items: Vec<GalleryItem>,
) -> Result<(), serenity::Error> {
    for item in items {
        let mut embed = serenity::CreateEmbed::new();
        if let Some(title) = &item.title {
            embed = embed.title(title);
        }
        if let Some(link) = &item.link {
            embed = embed.url(link);
        }
        if let Some(author) = &item.author {
            let mut author_block = serenity::CreateEmbedAuthor::new(&author.name);
            if let Some(url) = &author.url {
                author_block = author_block.url(url);
            }
            if let Some(icon) = &author.icon_url {
                author_block = author_block.icon_url(icon);
            }
            embed = embed.author(author_block);
        }
        if let Some(footer) = &item.footer {
            let mut footer_block = serenity::CreateEmbedFooter::new(&footer.text);
            if let Some(icon) = &footer.icon_url {
                footer_block = footer_block.icon_url(icon);
            }
            embed = embed.footer(footer_block);
        }

        let mut message = serenity::CreateMessage::new();
        match item.image {
            ImageSource::Url(url) => {
                embed = embed.image(url);
            }
            ImageSource::Attachment { filename, bytes } => {
                embed = embed.image(format!("attachment://{}", filename));
                message = message.add_file(serenity::CreateAttachment::bytes(bytes, filename));
            }
        }

        channel_id.send_message(http, message.embed(embed)).await?;
    }
    Ok(())
}
