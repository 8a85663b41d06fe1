use crate::discord::{Context, Error};

/// Provide time zones.
#[poise::command(slash_command, rename = "time", aliases("t"))]
pub async fn time(ctx: Context<'_>) -> Result<(), Error> {
    let rows = ctx.data().timezones.current_rows();
    if rows.is_empty() {
        ctx.say("No timezones configured.").await?;
        return Ok(());
    }

    let mut reply = String::from(">>> ");
    for row in rows {
        reply.push_str(&row);
        reply.push('\n');
    }
    ctx.say(reply).await?;
    Ok(())
}
