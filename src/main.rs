mod config;
mod handlers;

use crate::{
    config::GlobalConfig,
    handlers::{Count, Echo, Greet, Start},
};
use bot::{
    bot::{config::BotConfig, Bot, State},
    connector::webhook::WebhookConnectorConfig,
    filters::{message, text},
};
use eyre::eyre;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use tokio::{signal, sync::mpsc};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Off)
        .with_module_level("tgbind", LevelFilter::Debug)
        .with_module_level("bot", LevelFilter::Debug)
        .with_module_level("api", LevelFilter::Debug)
        .init()?;

    let token = dotenv::var("TOKEN").map_err(|err| eyre!("no TOKEN in env, {err}"))?;
    let work_dir = PathBuf::from(dotenv::var("WORK_DIR").unwrap_or_else(|_| ".".into()));
    let config = GlobalConfig::from_file(work_dir.join("config.xml"))?;

    let mut webhook = WebhookConnectorConfig {
        webhook_url: config.webhook_url,
        secret_token: config.secret_token,
        ..Default::default()
    };
    if let Some(listen) = config.listen {
        webhook.listen = listen;
    }

    let bot_config = BotConfig {
        connector_mode: config.connector_mode,
        update_limit: config.update_limit,
        polling_timeout: config.polling_timeout.or(Some(30)),
        skip_missed_updates: config.skip_missed_updates,
        work_dir,
        data_file_name: config.data_file_name,
        webhook,
        ..Default::default()
    };
    bot_config.verify()?;

    let (tx, rx) = mpsc::channel::<State>(1);
    let mut bot = Bot::with_config(token.as_str(), rx, bot_config);

    config.commands.register(bot.comm()).await?;
    let bot_username = match config.bot_username {
        Some(username) => username,
        None => bot
            .comm()
            .get_me()
            .await?
            .into_result()?
            .username
            .ok_or_else(|| eyre!("bot has no username"))?,
    };

    let for_me = Some(bot_username.as_str());
    bot.add_handler(
        0,
        text::named_command(["start"], for_me),
        Start {
            bot_username: bot_username.clone(),
        },
    );
    bot.add_handler(0, text::named_command(["count"], for_me), Count);
    bot.add_handler(0, text::regex(r"(?i)\bhello\b")?, Greet);
    bot.add_handler(1, message::text() & !text::command(), Echo);

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                if let Err(err) = tx.send(State::Shutdown).await {
                    error!("failed to send shutdown signal, {err}");
                }
            }
            Err(err) => error!("unable to listen for shutdown signal, {err}"),
        }
    });

    bot.start().await
}
