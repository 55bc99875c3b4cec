use crate::{basic_types::MessageId, proto::Message};
use compact_str::CompactString;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::{
    error::Error,
    fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum CommonResponse<R> {
    Ok(R),
    Err(ErrorResponse),
}

#[allow(clippy::from_over_into)]
impl<R> Into<Result<R, ErrorResponse>> for CommonResponse<R> {
    fn into(self) -> Result<R, ErrorResponse> {
        match self {
            CommonResponse::Ok(response) => Ok(response),
            CommonResponse::Err(error) => Err(error),
        }
    }
}

impl<R> CommonResponse<R> {
    pub fn into_result(self) -> Result<R, ErrorResponse> {
        self.into()
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub description: CompactString,
    pub error_code: i64,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

impl ErrorResponse {
    /// Seconds to wait before repeating a request that exceeded flood control.
    pub fn retry_after(&self) -> Option<u64> {
        self.parameters.as_ref()?.retry_after
    }

    /// New identifier of a group that was migrated to a supergroup.
    pub fn migrate_to_chat_id(&self) -> Option<i64> {
        self.parameters.as_ref()?.migrate_to_chat_id
    }
}

/// Describes why a request was unsuccessful.
/// https://core.telegram.org/bots/api#responseparameters
#[derive(Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<i64>,
    pub retry_after: Option<u64>,
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "response error: {}, code: {}",
            self.description, self.error_code
        )
    }
}

impl Error for ErrorResponse {
    fn description(&self) -> &str {
        self.description.as_str()
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for CommonResponse<R> {
    fn deserialize<D>(deserializer: D) -> Result<CommonResponse<R>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::deserialize(deserializer)?;

        let ok = map
            .remove("ok")
            .ok_or_else(|| de::Error::missing_field("ok"))
            .map(Deserialize::deserialize)?
            .map_err(de::Error::custom)?;
        if ok {
            let result = map
                .remove("result")
                .ok_or_else(|| de::Error::missing_field("result"))
                .map(R::deserialize)?
                .map_err(de::Error::custom)?;
            Ok(CommonResponse::Ok(result))
        } else {
            let rest = Value::Object(map);
            ErrorResponse::deserialize(rest)
                .map(CommonResponse::Err)
                .map_err(de::Error::custom)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageIdResponse {
    pub message_id: MessageId,
}

/// Result of edit methods: the edited message, or `true` when an inline message was edited.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EditedMessage {
    Message(Box<Message>),
    Inline(bool),
}

#[cfg(test)]
mod tests {
    use crate::{
        proto::Message,
        response::{CommonResponse, EditedMessage},
    };
    use assert2::{check, let_assert};
    use serde_json::json;

    #[test]
    fn deserialize_response_check() {
        let message = json!({
            "ok": true,
            "result": {
                "message_id": 123,
                "date": 2345,
                "chat": {
                    "id": 1,
                    "type": "group",
                }
            }
        });
        let response = serde_json::from_value::<CommonResponse<Message>>(message).unwrap();
        let_assert!(Ok(message) = response.into_result());
        check!(message.message_id == 123);

        let message = json!({"ok":true,"result":true,"description":"Webhook was set"});
        let response = serde_json::from_value::<CommonResponse<bool>>(message).unwrap();
        let_assert!(Ok(true) = response.into_result());
    }

    #[test]
    fn error_carries_parameters() {
        let message = json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 3",
            "parameters": {"retry_after": 3}
        });
        let response = serde_json::from_value::<CommonResponse<bool>>(message).unwrap();
        let_assert!(Err(error) = response.into_result());
        check!(error.error_code == 429);
        check!(error.retry_after() == Some(3));
        check!(error.migrate_to_chat_id() == None);
        check!(error.to_string() == "response error: Too Many Requests: retry after 3, code: 429");
    }

    #[test]
    fn edited_inline_message_is_bool() {
        let response = serde_json::from_value::<CommonResponse<EditedMessage>>(
            json!({"ok": true, "result": true}),
        )
        .unwrap();
        let_assert!(Ok(EditedMessage::Inline(true)) = response.into_result());
    }
}
