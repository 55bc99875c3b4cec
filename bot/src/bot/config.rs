use crate::connector::{webhook::WebhookConnectorConfig, ConnectorMode, BASE_URL};
use api::proto::UpdateType;
use compact_str::CompactString;
use eyre::ensure;
use std::{collections::HashSet, path::PathBuf};

#[derive(Debug)]
pub struct BotConfig {
    pub connector_mode: ConnectorMode,
    pub allowed_updates: HashSet<UpdateType>,
    pub update_limit: Option<u32>,
    /// Long polling timeout in seconds.
    pub polling_timeout: Option<u32>,
    /// Drops updates that arrived while the bot was down: the connector asks Telegram to
    /// discard pending updates, and with no saved `last_update_id` the whole first
    /// fetched batch is skipped too. That batch may already hold fresh updates, which
    /// are lost as well.
    pub skip_missed_updates: bool,
    pub work_dir: PathBuf,
    pub data_file_name: CompactString,
    pub base_url: CompactString,
    pub webhook: WebhookConnectorConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            connector_mode: ConnectorMode::Polling,
            allowed_updates: Default::default(),
            update_limit: None,
            polling_timeout: Some(30),
            skip_missed_updates: false,
            work_dir: ".".into(),
            data_file_name: "tgbind.json".into(),
            base_url: BASE_URL.into(),
            webhook: Default::default(),
        }
    }
}

impl BotConfig {
    pub fn verify(&self) -> eyre::Result<()> {
        if let Some(limit) = self.update_limit {
            ensure!(
                (1..=100).contains(&limit),
                "number of updates to retrieve is strictly 1-100"
            );
        }
        ensure!(
            !self.data_file_name.is_empty(),
            "data file name cannot be empty"
        );
        if self.connector_mode == ConnectorMode::Webhook {
            ensure!(
                self.webhook.url_path.starts_with('/'),
                "webhook url path must start with '/'"
            );
        }
        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        self.work_dir.join(self.data_file_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn verify_config() {
        check!(BotConfig::default().verify().is_ok());
        let config = BotConfig {
            update_limit: Some(101),
            ..Default::default()
        };
        check!(config.verify().is_err());
        let config = BotConfig {
            data_file_name: "".into(),
            ..Default::default()
        };
        check!(config.verify().is_err());
        check!(BotConfig::default().data_path() == PathBuf::from("./tgbind.json"));
    }
}
