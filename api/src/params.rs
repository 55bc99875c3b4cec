use compact_str::CompactString;
use eyre::bail;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub type Params = HashMap<CompactString, Value>;

/// Flattens a request into its top level fields, used to build multipart forms.
pub trait ToParams {
    fn to_params(&self) -> eyre::Result<Params>;
}

impl<T: Serialize> ToParams for T {
    fn to_params(&self) -> eyre::Result<Params> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (CompactString::from(key), value))
                .collect()),
            Value::Null => Ok(Params::new()),
            other => bail!("request must serialize to an object, got {other}"),
        }
    }
}

/// Text of a multipart form field: strings go as is, anything else as JSON.
pub fn form_text(value: &Value) -> eyre::Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SendMessageRequest;
    use assert2::check;
    use serde_json::json;

    #[test]
    fn request_to_params() {
        let params = SendMessageRequest::new(5, "text").to_params().unwrap();
        check!(params.len() == 2);
        check!(params["chat_id"] == json!(5));
        check!(form_text(&params["chat_id"]).unwrap() == "5");
        check!(form_text(&params["text"]).unwrap() == "text");
    }

    #[test]
    fn nested_values_are_json_text() {
        let value = json!({"inline_keyboard": [[{"text": "a", "callback_data": "b"}]]});
        check!(
            form_text(&value).unwrap()
                == r#"{"inline_keyboard":[[{"callback_data":"b","text":"a"}]]}"#
        );
    }

    #[test]
    fn non_object_is_rejected() {
        check!(5.to_params().is_err());
    }
}
