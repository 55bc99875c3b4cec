pub mod polling;
pub mod webhook;

use api::{
    endpoints::Endpoint,
    files::GetFiles,
    params::{form_text, ToParams},
    proto::{CommonUpdate, InputFileResult},
    response::CommonResponse,
};
use async_trait::async_trait;
use eyre::eyre;
use log::debug;
use reqwest::{multipart::Form, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorMode {
    #[default]
    Polling,
    Webhook,
}

/// Source of updates for the bot loop.
#[async_trait]
pub trait Connector: Send {
    async fn on_startup(&mut self) -> eyre::Result<()>;

    async fn fetch_updates(&mut self) -> eyre::Result<Vec<CommonUpdate>>;
}

pub(crate) fn method_url<E: Endpoint>(base_url: &str, token: &str) -> String {
    format!("{}/bot{}/{}", base_url, token, E::PATH)
}

fn parse_response<R: DeserializeOwned>(text: &str) -> eyre::Result<CommonResponse<R>> {
    serde_json::from_str::<CommonResponse<R>>(text).map_err(|err| {
        eyre!(
            "{}, type = {:?}, response = {}",
            err,
            std::any::type_name::<CommonResponse<R>>(),
            text
        )
    })
}

/// Sends the request as a JSON body.
pub(crate) async fn send_request<E>(
    client: &Client,
    url: &str,
    data: &E::Request,
) -> eyre::Result<CommonResponse<E::Response>>
where
    E: Endpoint,
    E::Request: Serialize,
    E::Response: DeserializeOwned,
{
    let request = client.request(E::METHOD, url).json(data).build()?;
    let text = client.execute(request).await?.text().await?;
    parse_response(&text)
}

/// Sends the request as `multipart/form-data`: every upload becomes a file part
/// under its field name, the remaining fields become text parts.
pub(crate) async fn send_multipart<E>(
    client: &Client,
    url: &str,
    data: &E::Request,
) -> eyre::Result<CommonResponse<E::Response>>
where
    E: Endpoint,
    E::Request: Serialize + GetFiles,
    E::Response: DeserializeOwned,
{
    let mut params = data.to_params()?;
    let mut form = Form::new();
    for (name, file) in data.uploads() {
        params.remove(&name);
        form = match file.data().await? {
            InputFileResult::Part(part) => form.part(name.to_string(), part),
            InputFileResult::Text(text) => form.text(name.to_string(), text.to_string()),
        };
    }
    for (name, value) in params {
        form = form.text(name.to_string(), form_text(&value)?);
    }
    debug!("sending multipart request to {}", E::PATH);
    let request = client.request(E::METHOD, url).multipart(form).build()?;
    let text = client.execute(request).await?.text().await?;
    parse_response(&text)
}

#[cfg(test)]
pub(crate) mod test_server {
    use axum::Router;
    use std::net::{SocketAddr, TcpListener};

    /// Serves `app` on an ephemeral local port, returning its base url.
    pub(crate) fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{
        endpoints::{GetMe, SendPhoto},
        proto::{ChatId, InputFile, User},
        request::{EmptyRequest, SendPhotoRequest},
    };
    use assert2::{check, let_assert};
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn error_names_type_and_body() {
        let app = Router::new().route(
            "/bottoken/getMe",
            axum::routing::get(|| async { "<html>bad gateway</html>" }),
        );
        let base_url = test_server::spawn(app);
        let url = method_url::<GetMe>(&base_url, "token");
        let client = Client::new();
        let_assert!(Err(err) = send_request::<GetMe>(&client, &url, &EmptyRequest {}).await);
        let message = err.to_string();
        check!(message.contains("CommonResponse<api::proto::User>"));
        check!(message.contains("<html>bad gateway</html>"));
    }

    #[tokio::test]
    async fn json_request() {
        let app = Router::new().route(
            "/bottoken/getMe",
            axum::routing::get(|| async {
                Json(json!({"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "echo"}}))
            }),
        );
        let base_url = test_server::spawn(app);
        let url = method_url::<GetMe>(&base_url, "token");
        let response = send_request::<GetMe>(&Client::new(), &url, &EmptyRequest {})
            .await
            .unwrap();
        let_assert!(Ok(User { id: 1, is_bot: true, .. }) = response.into_result());
    }

    #[tokio::test]
    async fn multipart_upload() {
        let app = Router::new().route(
            "/bottoken/sendPhoto",
            post(|headers: HeaderMap, body: String| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                let ok = content_type.starts_with("multipart/form-data")
                    && body.contains(r#"name="photo"; filename="cat.png""#)
                    && body.contains(r#"name="caption""#)
                    && body.contains("meow")
                    && body.contains(r#"name="chat_id""#);
                let result: Value = if ok {
                    json!({"ok": true, "result": {"message_id": 9, "date": 0, "chat": {"id": 5, "type": "private"}}})
                } else {
                    json!({"ok": false, "error_code": 400, "description": body})
                };
                Json(result)
            }),
        );
        let base_url = test_server::spawn(app);
        let url = method_url::<SendPhoto>(&base_url, "token");
        let request = SendPhotoRequest {
            chat_id: ChatId::Int(5),
            photo: InputFile::FileBytes("cat.png".into(), vec![1, 2, 3]),
            caption: Some("meow".into()),
            ..Default::default()
        };
        let response = send_multipart::<SendPhoto>(&Client::new(), &url, &request)
            .await
            .unwrap();
        let_assert!(Ok(message) = response.into_result());
        check!(message.message_id == 9);
    }
}
