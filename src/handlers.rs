use api::{deep_linking::create_deep_linked_url, proto::ParseMode};
use async_trait::async_trait;
use bot::{handler::Context, handler::Handler, ward};
use compact_str::CompactString;
use log::info;
use serde_json::json;

/// Greets the user, a deep link payload arrives as the `/start` query.
pub struct Start {
    pub bot_username: CompactString,
}

#[async_trait]
impl Handler for Start {
    async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()> {
        let command = ward!(&ctx.command, return Ok(()));
        let text = if command.query().is_empty() {
            let link = create_deep_linked_url(&self.bot_username, "from-link", false)?;
            format!("Hi! Share this link and I will know where you came from: {link}")
        } else {
            info!("started with payload '{}'", command.query());
            format!("Hi! You came with the payload <b>{}</b>", command.query())
        };
        ctx.reply(&text, Some(ParseMode::Html)).await?;
        Ok(())
    }
}

/// Counts `/count` calls per chat in the chat data.
pub struct Count;

#[async_trait]
impl Handler for Count {
    async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()> {
        let chat_data = ward!(ctx.chat_data(), return Ok(()));
        let count = chat_data.get("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
        chat_data.insert("count".into(), json!(count));
        ctx.reply(&format!("Counted {count} times in this chat"), None)
            .await?;
        Ok(())
    }
}

/// Answers with the first regex match of its filter.
pub struct Greet;

#[async_trait]
impl Handler for Greet {
    async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()> {
        let found = ward!(ctx.matches().next(), return Ok(()));
        let text = format!("{} to you too!", found.text);
        ctx.reply(&text, None).await?;
        Ok(())
    }
}

pub struct Echo;

#[async_trait]
impl Handler for Echo {
    async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()> {
        let text = ward!(ctx.message().and_then(|m| m.text.as_ref()), return Ok(()));
        ctx.send(text).await?;
        Ok(())
    }
}
