use crate::{
    bot::{command::BotCommandInfo, config::BotConfig},
    communicator::{Communicate, Communicator},
    connector::{
        polling::{PollingConnector, PollingConnectorConfig},
        webhook::WebhookConnector,
        Connector, ConnectorMode,
    },
    filters::Filter,
    handler::{Context, Handler},
    persistence::{Persistence, Store},
};
use api::{basic_types::UpdateId, proto::CommonUpdate};
use eyre::WrapErr;
use log::{debug, error, info, warn};
use std::{collections::BTreeMap, path::PathBuf, time::Duration};
use tokio::sync::mpsc::Receiver;

pub mod command;
pub mod config;

const RETRY_DELAY: Duration = Duration::from_millis(1000);

struct Route {
    filter: Filter,
    handler: Box<dyn Handler>,
}

pub struct Bot {
    connector: Box<dyn Connector>,
    communicator: Communicator,
    groups: BTreeMap<i32, Vec<Route>>,
    store: Store,
    data_path: PathBuf,
    state_rx: Receiver<State>,
    skip_missed_updates: bool,
}

#[derive(Debug)]
pub enum State {
    Shutdown,
}

enum Event {
    State(Option<State>),
    Updates(eyre::Result<Vec<CommonUpdate>>),
}

impl Bot {
    pub fn new(token: &str, state_rx: Receiver<State>) -> Self {
        Self::with_config(token, state_rx, Default::default())
    }

    pub fn with_config(token: &str, state_rx: Receiver<State>, config: BotConfig) -> Self {
        let communicator = Communicator::with_base_url(token, &config.base_url);
        let data_path = config.data_path();
        let skip_missed_updates = config.skip_missed_updates;
        let connector: Box<dyn Connector> = match config.connector_mode {
            ConnectorMode::Polling => {
                let connector_config = PollingConnectorConfig {
                    allowed_updates: config.allowed_updates.iter().copied().collect(),
                    limit: config.update_limit,
                    timeout: config.polling_timeout,
                    drop_pending_updates: config.skip_missed_updates,
                };
                Box::new(PollingConnector::with_config(
                    communicator.clone(),
                    connector_config,
                ))
            }
            ConnectorMode::Webhook => {
                let mut connector_config = config.webhook;
                connector_config.allowed_updates =
                    config.allowed_updates.iter().copied().collect();
                connector_config.drop_pending_updates = skip_missed_updates;
                Box::new(WebhookConnector::with_config(
                    communicator.clone(),
                    connector_config,
                ))
            }
        };
        Self::with_connector(
            communicator,
            connector,
            state_rx,
            data_path,
            skip_missed_updates,
        )
    }

    /// Runs on any update source, e.g. a custom `Connector`.
    pub fn with_connector(
        communicator: Communicator,
        connector: Box<dyn Connector>,
        state_rx: Receiver<State>,
        data_path: PathBuf,
        skip_missed_updates: bool,
    ) -> Self {
        Self {
            connector,
            communicator,
            groups: Default::default(),
            store: Default::default(),
            data_path,
            state_rx,
            skip_missed_updates,
        }
    }

    /// Groups run in ascending order and each one handles an update at most once:
    /// the first handler whose filter matches wins, the rest of the group is skipped.
    pub fn add_handler(&mut self, group: i32, filter: Filter, handler: impl Handler + 'static) {
        debug!("handler added to group {group} with filter {filter}");
        self.groups.entry(group).or_default().push(Route {
            filter,
            handler: Box::new(handler),
        });
    }

    pub fn comm(&self) -> &dyn Communicate {
        &self.communicator
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    async fn dispatch(&mut self, update: &CommonUpdate) {
        let message = update.data.effective_message();
        if let Some(message) = message {
            if let Some(to) = message.migrate_to_chat_id {
                info!("chat {} migrated to {to}", message.chat.id);
                self.store.migrate_chat_data(message.chat.id, to);
            }
        }
        let command = message.and_then(|message| BotCommandInfo::try_from(message).ok());

        for (group, routes) in &self.groups {
            for route in routes {
                let result = skip!(
                    route.filter.check(&update.data),
                    "filter {} failed in group {group}",
                    route.filter
                );
                if !result.is_match() {
                    continue;
                }
                let mut ctx = Context {
                    comm: &self.communicator,
                    update,
                    data: result.into_data(),
                    command: command.clone(),
                    store: &mut self.store,
                };
                if let Err(err) = route.handler.handle(&mut ctx).await {
                    error!("handler in group {group} failed on update {}, {err}", update.id);
                }
                break;
            }
        }
    }

    fn check_is_old_update(&mut self, id: UpdateId) -> bool {
        let last_update_id = self.store.last_update_id;
        if last_update_id >= id {
            true
        } else if last_update_id != 0 && last_update_id < id - 1 {
            error!(
                "some updates skipped! last update id = {}, new update id = {}",
                last_update_id, id
            );
            self.store.last_update_id = id;
            false
        } else {
            self.store.last_update_id = id;
            false
        }
    }

    async fn process(&mut self, updates: Vec<CommonUpdate>) {
        if self.store.last_update_id == 0 && self.skip_missed_updates {
            if let Some(last_update_id) = updates.iter().map(|u| u.id).max() {
                info!("skipping {} missed updates", updates.len());
                self.store.last_update_id = last_update_id;
            }
            return;
        }

        for update in updates {
            if self.check_is_old_update(update.id) {
                continue;
            }
            debug!("update received: {update:?}");
            self.dispatch(&update).await;
        }
    }

    fn load_data(&mut self) -> eyre::Result<()> {
        if !self.data_path.exists() {
            info!("no bot data at {:?}, starting fresh", self.data_path);
            return Ok(());
        }
        let data = std::fs::read(&self.data_path)?;
        self.store.deserialize(data)?;
        Ok(())
    }

    fn save_data(&self) -> eyre::Result<()> {
        let data = self.store.serialize()?;
        let tmp_path = self.data_path.with_extension("tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.data_path)?;
        Ok(())
    }

    pub async fn start(mut self) -> eyre::Result<()> {
        // the shutdown save would overwrite data that failed to load
        self.load_data()
            .wrap_err_with(|| format!("failed to load bot data from {:?}", self.data_path))?;

        self.connector.on_startup().await?;

        loop {
            let event = tokio::select! {
                state = self.state_rx.recv() => Event::State(state),
                updates = self.connector.fetch_updates() => Event::Updates(updates),
            };

            let updates = match event {
                Event::State(state) => {
                    match state {
                        Some(State::Shutdown) => info!("shutdown signal received, saving bot data.."),
                        None => warn!("bot signal channel closed, saving bot data.."),
                    }
                    if let Err(err) = self.save_data() {
                        error!("failed to save bot data, {err}");
                    }
                    return Ok(());
                }
                Event::Updates(Ok(updates)) => updates,
                Event::Updates(Err(err)) => {
                    error!("{err}");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            if updates.is_empty() {
                continue;
            }
            self.process(updates).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{message, text, Check, FilterResult};
    use api::proto::{Chat, Message, MessageEntity, MessageEntityType, Update};
    use assert2::{check, let_assert};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Record {
        name: &'static str,
        log: Log,
    }

    #[async_trait]
    impl Handler for Record {
        async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()> {
            let mut entry = self.name.to_string();
            if let Some(command) = &ctx.command {
                entry.push_str(&format!(" /{}", command.name()));
            }
            for found in ctx.matches() {
                entry.push_str(&format!(" [{}]", found.text));
            }
            if let Some(chat_data) = ctx.chat_data() {
                let seen = chat_data.get("seen").and_then(|v| v.as_i64()).unwrap_or(0);
                chat_data.insert("seen".into(), json!(seen + 1));
            }
            self.log.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Handler for Failing {
        async fn handle(&self, _ctx: &mut Context<'_>) -> eyre::Result<()> {
            eyre::bail!("handler failed")
        }
    }

    /// Hands out the scripted batches, then waits forever.
    struct Scripted(Vec<Vec<CommonUpdate>>);

    #[async_trait]
    impl Connector for Scripted {
        async fn on_startup(&mut self) -> eyre::Result<()> {
            Ok(())
        }

        async fn fetch_updates(&mut self) -> eyre::Result<Vec<CommonUpdate>> {
            if self.0.is_empty() {
                std::future::pending::<()>().await;
            }
            Ok(self.0.remove(0))
        }
    }

    fn text_update(id: UpdateId, text: &str) -> CommonUpdate {
        let entities = text.starts_with('/').then(|| {
            vec![MessageEntity {
                entity_type: MessageEntityType::BotCommand,
                offset: 0,
                length: text.split(' ').next().unwrap_or(text).encode_utf16().count(),
                url: None,
                user: None,
                language: None,
                custom_emoji_id: None,
            }]
        });
        CommonUpdate {
            id,
            data: Update::MessageUpdate(Message {
                message_id: id as i32,
                chat: Chat {
                    id: 10,
                    ..Default::default()
                },
                text: Some(text.into()),
                entities,
                ..Default::default()
            }),
        }
    }

    fn bot(updates: Vec<Vec<CommonUpdate>>, data_path: PathBuf) -> (Bot, mpsc::Sender<State>, Log) {
        let (tx, rx) = mpsc::channel(1);
        let bot = Bot::with_connector(
            Communicator::new("token"),
            Box::new(Scripted(updates)),
            rx,
            data_path,
            false,
        );
        (bot, tx, Log::default())
    }

    fn record(name: &'static str, log: &Log) -> Record {
        Record {
            name,
            log: log.clone(),
        }
    }

    #[tokio::test]
    async fn first_match_per_group_and_every_group() {
        let (mut bot, _tx, log) = bot(vec![], PathBuf::from("unused.json"));
        bot.add_handler(1, message::all(), record("audit", &log));
        bot.add_handler(0, text::named_command(["start"], None), record("start", &log));
        bot.add_handler(0, message::text(), record("echo", &log));
        bot.add_handler(0, message::text(), record("never", &log));
        bot.add_handler(2, message::photo(), record("photo", &log));

        bot.process(vec![text_update(1, "/start now"), text_update(2, "hello")])
            .await;

        check!(
            *log.lock().unwrap()
                == ["start /start", "audit /start", "echo", "audit"]
        );
        check!(bot.store().chat_data[&10]["seen"] == json!(4));
        check!(bot.store().last_update_id == 2);
    }

    #[tokio::test]
    async fn filter_data_reaches_handler() {
        let (mut bot, _tx, log) = bot(vec![], PathBuf::from("unused.json"));
        let filter = text::regex(r"\d+").unwrap() & !message::forwarded();
        bot.add_handler(0, filter, record("numbers", &log));

        bot.process(vec![text_update(1, "take 42 and 7")]).await;

        check!(*log.lock().unwrap() == ["numbers [42]"]);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_other_groups() {
        let (mut bot, _tx, log) = bot(vec![], PathBuf::from("unused.json"));
        bot.add_handler(0, message::all(), Failing);
        bot.add_handler(1, message::all(), record("after", &log));

        bot.process(vec![text_update(1, "hi")]).await;

        check!(*log.lock().unwrap() == ["after"]);
    }

    #[derive(Debug)]
    struct Broken;

    impl Check for Broken {
        fn check(&self, _update: &Update) -> eyre::Result<FilterResult> {
            eyre::bail!("broken leaf")
        }
    }

    #[tokio::test]
    async fn failing_filter_falls_through_to_next_route() {
        let (mut bot, _tx, log) = bot(vec![], PathBuf::from("unused.json"));
        bot.add_handler(0, Filter::leaf(Broken), record("broken", &log));
        bot.add_handler(0, message::all(), record("fallback", &log));
        bot.add_handler(1, Filter::leaf(Broken) & message::all(), record("broken and", &log));
        bot.add_handler(2, message::text(), record("later", &log));

        bot.process(vec![text_update(1, "hi")]).await;

        check!(*log.lock().unwrap() == ["fallback", "later"]);
        check!(bot.store().last_update_id == 1);
    }

    #[tokio::test]
    async fn old_updates_are_ignored() {
        let (mut bot, _tx, log) = bot(vec![], PathBuf::from("unused.json"));
        bot.add_handler(0, message::all(), record("seen", &log));

        bot.process(vec![text_update(5, "a")]).await;
        bot.process(vec![text_update(5, "a"), text_update(4, "b"), text_update(9, "c")])
            .await;

        check!(log.lock().unwrap().len() == 2);
        check!(bot.store().last_update_id == 9);
    }

    #[tokio::test]
    async fn missed_updates_are_skipped_on_first_batch() {
        let (tx, rx) = mpsc::channel(1);
        let mut bot = Bot::with_connector(
            Communicator::new("token"),
            Box::new(Scripted(vec![])),
            rx,
            PathBuf::from("unused.json"),
            true,
        );
        let log = Log::default();
        bot.add_handler(0, message::all(), record("seen", &log));

        bot.process(vec![text_update(3, "old"), text_update(4, "older")]).await;
        bot.process(vec![text_update(5, "new")]).await;

        check!(*log.lock().unwrap() == ["seen"]);
        drop(tx);
    }

    #[tokio::test]
    async fn unreadable_data_stops_start() {
        let data_path =
            std::env::temp_dir().join(format!("tgbind-bad-data-{}.json", std::process::id()));
        std::fs::write(&data_path, b"[]").unwrap();

        let (bot, _tx, _log) = bot(vec![vec![text_update(1, "hi")]], data_path.clone());
        let_assert!(Err(err) = bot.start().await);
        check!(err.to_string().starts_with("failed to load bot data"));
        check!(std::fs::read(&data_path).unwrap() == b"[]");
        std::fs::remove_file(&data_path).unwrap();
    }

    #[tokio::test]
    async fn shutdown_saves_store() {
        let data_path = std::env::temp_dir().join(format!("tgbind-bot-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&data_path);

        let (mut bot, tx, log) = bot(vec![vec![text_update(1, "hi")]], data_path.clone());
        bot.add_handler(0, message::text(), record("echo", &log));

        let running = tokio::spawn(bot.start());
        while log.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(State::Shutdown).await.unwrap();
        running.await.unwrap().unwrap();

        let mut store = Store::default();
        store.deserialize(std::fs::read(&data_path).unwrap()).unwrap();
        check!(store.last_update_id == 1);
        check!(store.chat_data[&10]["seen"] == json!(1));
        std::fs::remove_file(&data_path).unwrap();
    }
}
