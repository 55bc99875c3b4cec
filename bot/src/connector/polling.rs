use crate::{communicator::Communicator, connector::Connector};
use api::{
    endpoints::{DeleteWebhook, GetUpdates},
    proto::{CommonUpdate, UpdateType},
    request::{DeleteWebhookRequest, GetUpdatesRequest},
    response::CommonResponse,
    warn_once,
    warnings::WarningCategory,
};
use async_trait::async_trait;
use log::{error, info};

pub struct PollingConnector {
    comm: Communicator,
    offset: Option<i64>,
    config: PollingConnectorConfig,
}

#[derive(Debug, Default)]
pub struct PollingConnectorConfig {
    pub allowed_updates: Vec<UpdateType>,
    pub limit: Option<u32>,
    /// Long polling timeout in seconds.
    pub timeout: Option<u32>,
    pub drop_pending_updates: bool,
}

impl PollingConnector {
    pub fn with_config(comm: Communicator, config: PollingConnectorConfig) -> Self {
        Self {
            comm,
            offset: None,
            config,
        }
    }

    fn make_request(&self) -> GetUpdatesRequest {
        GetUpdatesRequest {
            offset: self.offset,
            limit: self.config.limit,
            timeout: self.config.timeout,
            allowed_updates: (!self.config.allowed_updates.is_empty())
                .then(|| self.config.allowed_updates.clone()),
        }
    }
}

#[async_trait]
impl Connector for PollingConnector {
    async fn on_startup(&mut self) -> eyre::Result<()> {
        if self.config.timeout.unwrap_or(0) == 0 {
            warn_once!(
                WarningCategory::User,
                "polling with timeout 0 is short polling, set a timeout to long poll"
            );
        }
        let request = DeleteWebhookRequest {
            drop_pending_updates: Some(self.config.drop_pending_updates),
        };
        match self.comm.request::<DeleteWebhook>(&request).await? {
            CommonResponse::Ok(_) => {
                info!("webhook deleted, polling for updates");
            }
            CommonResponse::Err(err) => {
                error!("{err}");
            }
        };
        Ok(())
    }

    async fn fetch_updates(&mut self) -> eyre::Result<Vec<CommonUpdate>> {
        let request = self.make_request();
        let updates = self
            .comm
            .request::<GetUpdates>(&request)
            .await?
            .into_result()?;

        if let Some(last_update_id) = updates.iter().map(|u| u.id).max() {
            self.offset.replace(last_update_id + 1);
        };

        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::test_server;
    use api::proto::Update;
    use assert2::{check, let_assert};
    use axum::{routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn offset_follows_last_update() {
        let offsets = Arc::new(Mutex::new(Vec::<Value>::new()));
        let recorded = offsets.clone();
        let app = Router::new().route(
            "/bottoken/getUpdates",
            get(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(body["offset"].clone());
                    Json(json!({"ok": true, "result": [
                        {"update_id": 7, "message": {"message_id": 1, "date": 0, "chat": {"id": 1, "type": "private"}}},
                        {"update_id": 8, "message_reaction": {}}
                    ]}))
                }
            }),
        );
        let comm = Communicator::with_base_url("token", &test_server::spawn(app));
        let mut connector = PollingConnector::with_config(
            comm,
            PollingConnectorConfig {
                timeout: Some(10),
                ..Default::default()
            },
        );

        let updates = connector.fetch_updates().await.unwrap();
        check!(updates.len() == 2);
        let_assert!(Update::Unsupported(kind) = &updates[1].data);
        check!(kind.as_str() == "message_reaction");
        connector.fetch_updates().await.unwrap();
        check!(*offsets.lock().unwrap() == vec![Value::Null, json!(9)]);
    }

    #[test]
    fn empty_allowed_updates_are_omitted() {
        let connector = PollingConnector::with_config(
            Communicator::new("token"),
            PollingConnectorConfig::default(),
        );
        check!(connector.make_request().allowed_updates.is_none());
    }
}
