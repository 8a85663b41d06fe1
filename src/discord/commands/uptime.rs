use chrono::Utc;

use crate::discord::{Context, Error};

/// Mention the current uptime.
#[poise::command(slash_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let delta = Utc::now() - ctx.data().launch_time;
    let total_seconds = delta.num_seconds().max(0);

    let (hours, remainder) = (total_seconds / 3600, total_seconds % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    let (days, hours) = (hours / 24, hours % 24);

    ctx.say(format!(
        "I've been running for {} days, {} hours, {} minutes and {} seconds.",
        days, hours, minutes, seconds
    ))
    .await?;
    Ok(())
}

/// Mention a brief summary of the last used channel.
#[poise::command(slash_command, rename = "last")]
pub async fn last(ctx: Context<'_>) -> Result<(), Error> {
    let snapshot = ctx.data().activity.snapshot().await;

    let reply = match snapshot.last_channel {
        Some(channel_id) => format!(
            "Last channel: <#{}>\nCurrent count there: {}",
            channel_id, snapshot.count
        ),
        None => "I haven't seen anybody talk yet.".to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}
