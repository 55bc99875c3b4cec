use api::basic_types::{ChatIntId, UpdateId, UserId};
use eyre::ensure;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub trait Persistence {
    type Input;
    type Output;

    fn serialize(&self) -> eyre::Result<Self::Output>;

    fn deserialize(&mut self, input: Self::Input) -> eyre::Result<()>;
}

/// Free-form JSON object a handler keeps between updates.
pub type Data = Map<String, Value>;

/// Everything the bot keeps across restarts, saved as one JSON document.
/// Integer map keys are written as JSON strings and read back as integers.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub user_data: HashMap<UserId, Data>,
    #[serde(default)]
    pub chat_data: HashMap<ChatIntId, Data>,
    #[serde(default)]
    pub bot_data: Data,
    #[serde(default)]
    pub last_update_id: UpdateId,
}

impl Store {
    pub fn user_data(&mut self, user_id: UserId) -> &mut Data {
        self.user_data.entry(user_id).or_default()
    }

    pub fn chat_data(&mut self, chat_id: ChatIntId) -> &mut Data {
        self.chat_data.entry(chat_id).or_default()
    }

    /// Moves the data of a group that became a supergroup.
    pub fn migrate_chat_data(&mut self, from: ChatIntId, to: ChatIntId) {
        if let Some(data) = self.chat_data.remove(&from) {
            self.chat_data.insert(to, data);
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Persistence for Store {
    type Input = Vec<u8>;
    type Output = Vec<u8>;

    fn serialize(&self) -> eyre::Result<Self::Output> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    fn deserialize(&mut self, input: Self::Input) -> eyre::Result<()> {
        let value: Value = serde_json::from_slice(input.as_slice())?;
        ensure!(
            value.is_object(),
            "bot data must be a JSON object, got {}",
            kind(&value)
        );
        *self = serde_json::from_value(value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use serde_json::json;

    #[test]
    fn integer_keys_round_trip() {
        let mut store = Store::default();
        store.user_data(42).insert("name".into(), json!("Ann"));
        store.chat_data(-100500).insert("count".into(), json!(3));
        store.bot_data.insert("started".into(), json!(true));
        store.last_update_id = 900;

        let bytes = Persistence::serialize(&store).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        insta::assert_json_snapshot!(value, @r###"
        {
          "bot_data": {
            "started": true
          },
          "chat_data": {
            "-100500": {
              "count": 3
            }
          },
          "last_update_id": 900,
          "user_data": {
            "42": {
              "name": "Ann"
            }
          }
        }
        "###);

        let mut loaded = Store::default();
        loaded.deserialize(bytes).unwrap();
        check!(loaded == store);
    }

    #[test]
    fn missing_sections_default() {
        let mut store = Store::default();
        store.deserialize(br#"{"last_update_id": 5}"#.to_vec()).unwrap();
        check!(store.last_update_id == 5);
        check!(store.user_data.is_empty());
        check!(store.deserialize(b"[]".to_vec()).is_err());
    }

    #[test]
    fn non_object_data_is_rejected() {
        let mut store = Store::default();
        store.user_data(42).insert("name".into(), json!("Ann"));

        let inputs: [&[u8]; 4] = [b"[]", b"[{}, 5]", b"null", b"7"];
        for input in inputs {
            let_assert!(Err(err) = store.deserialize(input.to_vec()));
            check!(err.to_string().starts_with("bot data must be a JSON object"));
        }
        check!(store.user_data(42)["name"] == json!("Ann"));
        check!(store.deserialize(b"{".to_vec()).is_err());
    }

    #[test]
    fn migrate_moves_chat_data() {
        let mut store = Store::default();
        store.chat_data(-1).insert("count".into(), json!(1));
        store.migrate_chat_data(-1, -1001);
        check!(!store.chat_data.contains_key(&-1));
        check!(store.chat_data(-1001)["count"] == json!(1));
    }
}
