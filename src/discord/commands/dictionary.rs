use poise::serenity_prelude as serenity;

use crate::core::config::pick_quote;
use crate::core::dictionary::WordLookupResult;
use crate::discord::{Context, Error};

/// Search a term in urbandictionary.
#[poise::command(
    slash_command,
    rename = "urbandictionary",
    aliases("wu", "udictionary")
)]
pub async fn urban(
    ctx: Context<'_>,
    #[description = "Term to look up"] term: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let term = term.to_lowercase();

    let article = match ctx.data().dictionary.search_slang(&term).await {
        Ok(article) => article,
        Err(err) => {
            tracing::warn!(term = %term, error = %err, "Slang dictionary lookup failed");
            ctx.say(pick_quote(&ctx.data().config.quotes.data_error))
                .await?;
            return Ok(());
        }
    };

    let Some(article) = article else {
        ctx.say(pick_quote(&ctx.data().config.quotes.dictionary_no_results))
            .await?;
        return Ok(());
    };

    let embed = serenity::CreateEmbed::new()
        .title(article.term)
        .url(article.url)
        .description(article.description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Search a term in merriam-webster's dictionary.
#[poise::command(slash_command, rename = "word", aliases("w", "dictionary"))]
pub async fn word(
    ctx: Context<'_>,
    #[description = "Word to look up"] term: String,
) -> Result<(), Error> {
    ctx.defer().await?;
    let term = term.to_lowercase();

    let result = match ctx.data().dictionary.search_word(&term).await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(term = %term, error = %err, "Dictionary lookup failed");
            ctx.say("Oops. What?").await?;
            return Ok(());
        }
    };

    match result {
        WordLookupResult::Found(article) => {
            let embed = serenity::CreateEmbed::new()
                .title(article.word)
                .url(article.url)
                .description(article.description);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        WordLookupResult::Suggestions(suggestions) => {
            let listing = suggestions
                .iter()
                .map(|s| format!("• {}", s))
                .collect::<Vec<_>>()
                .join("\n\n");
            let embed = serenity::CreateEmbed::new().description(format!("*{}*", listing));
            ctx.send(
                poise::CreateReply::default()
                    .content(pick_quote(&ctx.data().config.quotes.dictionary_try_this).to_string())
                    .embed(embed),
            )
            .await?;
        }
        WordLookupResult::NoResults => {
            ctx.say(pick_quote(&ctx.data().config.quotes.dictionary_no_results))
                .await?;
        }
    }
    Ok(())
}
