use bot::{command::Commands, connector::ConnectorMode};
use compact_str::CompactString;
use eyre::ensure;
use serde::Deserialize;
use std::{net::SocketAddr, path::Path};

#[derive(Debug, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub connector_mode: ConnectorMode,
    pub data_file_name: CompactString,
    #[serde(default)]
    pub skip_missed_updates: bool,
    pub polling_timeout: Option<u32>,
    pub update_limit: Option<u32>,
    /// Used for deep links, asked from `getMe` when missing.
    pub bot_username: Option<CompactString>,
    pub listen: Option<SocketAddr>,
    pub webhook_url: Option<CompactString>,
    pub secret_token: Option<CompactString>,
    #[serde(default)]
    pub commands: Commands,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            connector_mode: Default::default(),
            data_file_name: "tgbind.json".into(),
            skip_missed_updates: false,
            polling_timeout: None,
            update_limit: None,
            bot_username: None,
            listen: None,
            webhook_url: None,
            secret_token: None,
            commands: Default::default(),
        }
    }
}

impl GlobalConfig {
    fn validate(&self) -> eyre::Result<()> {
        ensure!(
            !self.data_file_name.is_empty(),
            "data file name cannot be empty"
        );
        if let Some(url) = &self.webhook_url {
            ensure!(
                url.starts_with("https://"),
                "webhook url must use https, got '{url}'"
            );
        }
        if let Some(token) = &self.secret_token {
            ensure!(
                (1..=256).contains(&token.len())
                    && token
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "secret token must be 1-256 characters of A-Z, a-z, 0-9, _ and -"
            );
        }
        self.commands.verify()
    }

    pub fn parse(contents: &str) -> eyre::Result<Self> {
        let config = serde_xml_rs::from_str::<Self>(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(contents.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn load_config() {
        let config = GlobalConfig::parse(
            r#"<config>
                <data_file_name>demo.json</data_file_name>
                <skip_missed_updates>true</skip_missed_updates>
                <bot_username>demo_bot</bot_username>
            </config>"#,
        )
        .unwrap();
        check!(config.data_file_name.as_str() == "demo.json");
        check!(config.skip_missed_updates);
        check!(config.bot_username.as_deref() == Some("demo_bot"));
        check!(config.connector_mode == ConnectorMode::Polling);
        check!(config.commands.cmd_vec.is_empty());
    }

    #[test]
    fn reject_bad_values() {
        let config = GlobalConfig {
            data_file_name: "".into(),
            ..Default::default()
        };
        check!(config.validate().is_err());

        let config = GlobalConfig {
            webhook_url: Some("http://example.com/hook".into()),
            ..Default::default()
        };
        let_assert!(Err(err) = config.validate());
        check!(err.to_string().contains("https"));

        let config = GlobalConfig {
            secret_token: Some("not allowed!".into()),
            ..Default::default()
        };
        check!(config.validate().is_err());
        check!(GlobalConfig::default().validate().is_ok());
    }
}
