use crate::{communicator::Communicator, connector::Connector};
use api::{
    endpoints::SetWebhook,
    proto::{CommonUpdate, InputFile, UpdateType},
    request::SetWebhookRequest,
    warn_once,
    warnings::WarningCategory,
};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use axum_server::tls_rustls::{from_tcp_rustls, RustlsConfig};
use compact_str::CompactString;
use eyre::{bail, eyre};
use log::{debug, error, info, warn};
use std::{
    net::{SocketAddr, TcpListener},
    path::PathBuf,
    sync::Arc,
};
use tokio::sync::mpsc::{self, Receiver, Sender};

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

const UPDATE_QUEUE_SIZE: usize = 128;

/// Certificate and key the webhook server terminates TLS with.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug)]
pub struct WebhookConnectorConfig {
    /// Local address the server binds to.
    pub listen: SocketAddr,
    /// Route updates are posted to.
    pub url_path: CompactString,
    /// Public https url registered with `setWebhook`, nothing is registered when `None`.
    pub webhook_url: Option<CompactString>,
    pub secret_token: Option<CompactString>,
    /// Public key certificate uploaded to Telegram, needed for self-signed certificates.
    pub certificate: Option<InputFile>,
    pub tls: Option<TlsConfig>,
    pub ip_address: Option<CompactString>,
    pub max_connections: Option<u32>,
    pub allowed_updates: Vec<UpdateType>,
    pub drop_pending_updates: bool,
}

impl Default for WebhookConnectorConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8443)),
            url_path: "/".into(),
            webhook_url: None,
            secret_token: None,
            certificate: None,
            tls: None,
            ip_address: None,
            max_connections: None,
            allowed_updates: vec![],
            drop_pending_updates: false,
        }
    }
}

pub struct WebhookConnector {
    comm: Communicator,
    config: WebhookConnectorConfig,
    updates_rx: Option<Receiver<CommonUpdate>>,
    local_addr: Option<SocketAddr>,
}

struct WebhookState {
    updates_tx: Sender<CommonUpdate>,
    secret_token: Option<CompactString>,
}

async fn receive_update(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(secret_token) = &state.secret_token {
        let given = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if given != Some(secret_token.as_str()) {
            warn!("rejected webhook request with a wrong secret token");
            return StatusCode::FORBIDDEN;
        }
    }
    let update = match serde_json::from_slice::<CommonUpdate>(&body) {
        Ok(update) => update,
        Err(err) => {
            error!("failed to parse webhook update, {err}");
            return StatusCode::BAD_REQUEST;
        }
    };
    match state.updates_tx.send(update).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl WebhookConnector {
    pub fn with_config(comm: Communicator, config: WebhookConnectorConfig) -> Self {
        Self {
            comm,
            config,
            updates_rx: None,
            local_addr: None,
        }
    }

    /// Address the server is bound to once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    async fn serve(&mut self) -> eyre::Result<()> {
        let listener = TcpListener::bind(self.config.listen)?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        self.local_addr.replace(local_addr);

        let (updates_tx, updates_rx) = mpsc::channel(UPDATE_QUEUE_SIZE);
        self.updates_rx.replace(updates_rx);
        let state = Arc::new(WebhookState {
            updates_tx,
            secret_token: self.config.secret_token.clone(),
        });
        let app = Router::new()
            .route(self.config.url_path.as_str(), post(receive_update))
            .with_state(state);

        match &self.config.tls {
            Some(tls) => {
                let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
                let server = from_tcp_rustls(listener, rustls).serve(app.into_make_service());
                tokio::spawn(async move {
                    if let Err(err) = server.await {
                        error!("webhook server stopped, {err}");
                    }
                });
            }
            None => {
                let server = axum_server::from_tcp(listener).serve(app.into_make_service());
                tokio::spawn(async move {
                    if let Err(err) = server.await {
                        error!("webhook server stopped, {err}");
                    }
                });
            }
        }
        info!("webhook server is listening on {local_addr}");
        Ok(())
    }
}

#[async_trait]
impl Connector for WebhookConnector {
    async fn on_startup(&mut self) -> eyre::Result<()> {
        if self.config.secret_token.is_none() {
            warn_once!(
                WarningCategory::User,
                "webhook started without a secret token, anyone who finds the url can post updates"
            );
        }
        self.serve().await?;

        let Some(url) = self.config.webhook_url.clone() else {
            debug!("no webhook url configured, skipping setWebhook");
            return Ok(());
        };
        let request = SetWebhookRequest {
            url,
            certificate: self.config.certificate.clone(),
            ip_address: self.config.ip_address.clone(),
            max_connections: self.config.max_connections,
            allowed_updates: (!self.config.allowed_updates.is_empty())
                .then(|| self.config.allowed_updates.clone()),
            drop_pending_updates: Some(self.config.drop_pending_updates),
            secret_token: self.config.secret_token.clone(),
        };
        self.comm.upload::<SetWebhook>(&request).await?.into_result()?;
        info!("webhook set");
        Ok(())
    }

    /// Waits for the next update, then drains whatever else is queued.
    async fn fetch_updates(&mut self) -> eyre::Result<Vec<CommonUpdate>> {
        let updates_rx = self
            .updates_rx
            .as_mut()
            .ok_or_else(|| eyre!("webhook connector is not listening"))?;
        let Some(first) = updates_rx.recv().await else {
            bail!("webhook server is gone");
        };
        let mut updates = vec![first];
        while let Ok(update) = updates_rx.try_recv() {
            updates.push(update);
        }
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::proto::Update;
    use assert2::{check, let_assert};

    const UPDATE: &str = r#"{"update_id": 3, "message": {"message_id": 1, "date": 0, "chat": {"id": 1, "type": "private"}, "text": "hi"}}"#;

    async fn started(secret_token: Option<&str>) -> (WebhookConnector, String) {
        let mut connector = WebhookConnector::with_config(
            Communicator::new("token"),
            WebhookConnectorConfig {
                listen: SocketAddr::from(([127, 0, 0, 1], 0)),
                url_path: "/hook".into(),
                secret_token: secret_token.map(CompactString::from),
                ..Default::default()
            },
        );
        connector.on_startup().await.unwrap();
        let url = format!("http://{}/hook", connector.local_addr().unwrap());
        (connector, url)
    }

    #[tokio::test]
    async fn secret_token_is_checked() {
        let (mut connector, url) = started(Some("s3cret")).await;
        let client = reqwest::Client::new();

        let response = client.post(&url).body(UPDATE).send().await.unwrap();
        check!(response.status() == reqwest::StatusCode::FORBIDDEN);
        let response = client
            .post(&url)
            .header(SECRET_TOKEN_HEADER, "guess")
            .body(UPDATE)
            .send()
            .await
            .unwrap();
        check!(response.status() == reqwest::StatusCode::FORBIDDEN);

        let response = client
            .post(&url)
            .header(SECRET_TOKEN_HEADER, "s3cret")
            .body(UPDATE)
            .send()
            .await
            .unwrap();
        check!(response.status() == reqwest::StatusCode::OK);

        let updates = connector.fetch_updates().await.unwrap();
        check!(updates.len() == 1);
        check!(updates[0].id == 3);
        let_assert!(Update::MessageUpdate(message) = &updates[0].data);
        check!(message.text.as_deref() == Some("hi"));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (_connector, url) = started(None).await;
        let response = reqwest::Client::new()
            .post(&url)
            .body("{not json")
            .send()
            .await
            .unwrap();
        check!(response.status() == reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fetch_before_start_fails() {
        let mut connector =
            WebhookConnector::with_config(Communicator::new("token"), Default::default());
        check!(connector.fetch_updates().await.is_err());
    }
}
