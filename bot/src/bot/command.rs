use api::proto::Message;
use compact_str::CompactString;
use eyre::bail;

/// A `/name@bot query` command split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommandInfo {
    name: CompactString,
    addressee: Option<CompactString>,
    query: CompactString,
}

impl TryFrom<&Message> for BotCommandInfo {
    type Error = eyre::Report;

    fn try_from(message: &Message) -> Result<Self, Self::Error> {
        let Some(text) = message.text.as_ref() else {
            bail!("no text for bot command in message {}", message.message_id);
        };
        let Some(entity) = message.command_entity() else {
            bail!("message {} does not start with a bot command", message.message_id);
        };
        let Some(command) = entity.extract(text) else {
            bail!("bot command entity is out of range in message {}", message.message_id);
        };
        // the command starts the text, so its utf-8 length is a valid split point
        let query = &text[command.len()..];
        Ok(Self::from_command(&command, query))
    }
}

impl BotCommandInfo {
    pub fn name(&self) -> &CompactString {
        &self.name
    }

    /// Bot username after `@`, if the command was addressed explicitly.
    pub fn addressee(&self) -> Option<&CompactString> {
        self.addressee.as_ref()
    }

    pub fn query(&self) -> &CompactString {
        &self.query
    }

    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.query.split_whitespace()
    }

    /// Commands without an addressee are for every bot in the chat.
    pub fn is_for(&self, bot_username: &str) -> bool {
        self.addressee
            .as_ref()
            .map_or(true, |addressee| addressee.eq_ignore_ascii_case(bot_username))
    }

    fn from_command(command: &str, query: &str) -> Self {
        let command = command.strip_prefix('/').unwrap_or(command);
        let (name, addressee) = match command.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee.into())),
            None => (command, None),
        };
        Self {
            name: name.into(),
            addressee,
            query: query.trim().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::proto::{MessageEntity, MessageEntityType};
    use assert2::{check, let_assert};

    fn command_message(text: &str, length: usize) -> Message {
        Message {
            message_id: 1,
            text: Some(text.into()),
            entities: Some(vec![MessageEntity {
                entity_type: MessageEntityType::BotCommand,
                offset: 0,
                length,
                url: None,
                user: None,
                language: None,
                custom_emoji_id: None,
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn parse_command() {
        let cmd = BotCommandInfo::try_from(&command_message("/start@echo_bot  deep link ", 15)).unwrap();
        check!(cmd.name().as_str() == "start");
        check!(cmd.addressee().map(|a| a.as_str()) == Some("echo_bot"));
        check!(cmd.query().as_str() == "deep link");
        check!(cmd.args().collect::<Vec<_>>() == ["deep", "link"]);
        check!(cmd.is_for("Echo_Bot"));
        check!(!cmd.is_for("other_bot"));
    }

    #[test]
    fn utf16_lengths() {
        // "/🎲" is three utf-16 units
        let cmd = BotCommandInfo::try_from(&command_message("/🎲 roll", 3)).unwrap();
        check!(cmd.name().as_str() == "🎲");
        check!(cmd.query().as_str() == "roll");
        check!(cmd.is_for("anyone"));
    }

    #[test]
    fn not_a_command() {
        let plain = Message {
            text: Some("/start".into()),
            ..Default::default()
        };
        let_assert!(Err(err) = BotCommandInfo::try_from(&plain));
        check!(err.to_string().contains("does not start with a bot command"));
        check!(BotCommandInfo::try_from(&Message::default()).is_err());
    }
}
