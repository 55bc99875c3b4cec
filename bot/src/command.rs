use api::{
    basic_types::{ChatIntId, UserId},
    proto::{BotCommand, BotCommandScope, ChatId},
};
use compact_str::CompactString;
use eyre::{bail, ensure};
use log::info;
use serde::Deserialize;

use crate::communicator::Communicate;

/// Commands to register with `setMyCommands`, usually read from the config file.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Commands {
    #[serde(rename = "$value", default)]
    pub cmd_vec: Vec<Command>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Command {
    pub name: CompactString,
    pub desc: CompactString,
    #[serde(default)]
    pub scope: ScopeKind,
    pub chat_id: Option<ChatIntId>,
    pub user_id: Option<UserId>,
    pub language_code: Option<CompactString>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    #[default]
    Default,
    AllPrivateChats,
    AllGroupChats,
    AllChatAdministrators,
    Chat,
    ChatAdministrators,
    ChatMember,
}

impl Command {
    pub fn verify(&self) -> eyre::Result<()> {
        let name_len = self.name.chars().count();
        ensure!(
            (1..=32).contains(&name_len),
            "command name can only contain 1-32 characters, got '{}'",
            self.name
        );
        ensure!(
            self.name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
            "command name '{}' can only use lowercase letters, digits and underscores",
            self.name
        );
        let desc_len = self.desc.chars().count();
        ensure!(
            (1..=256).contains(&desc_len),
            "description of '{}' can only contain 1-256 characters",
            self.name
        );
        self.bot_command_scope()?;
        Ok(())
    }

    pub fn bot_command_scope(&self) -> eyre::Result<BotCommandScope> {
        let chat_id = || match self.chat_id {
            Some(chat_id) => Ok(ChatId::Int(chat_id)),
            None => bail!("scope of '{}' needs a chat_id", self.name),
        };
        let scope = match self.scope {
            ScopeKind::Default => BotCommandScope::Default,
            ScopeKind::AllPrivateChats => BotCommandScope::AllPrivateChats,
            ScopeKind::AllGroupChats => BotCommandScope::AllGroupChats,
            ScopeKind::AllChatAdministrators => BotCommandScope::AllChatAdministrators,
            ScopeKind::Chat => BotCommandScope::Chat { chat_id: chat_id()? },
            ScopeKind::ChatAdministrators => {
                BotCommandScope::ChatAdministrators { chat_id: chat_id()? }
            }
            ScopeKind::ChatMember => {
                let Some(user_id) = self.user_id else {
                    bail!("scope of '{}' needs a user_id", self.name);
                };
                BotCommandScope::ChatMember {
                    chat_id: chat_id()?,
                    user_id,
                }
            }
        };
        Ok(scope)
    }
}

/// Commands sharing one scope and language, i.e. one `setMyCommands` call.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandGroup {
    pub scope: BotCommandScope,
    pub language_code: Option<CompactString>,
    pub commands: Vec<BotCommand>,
}

impl Commands {
    pub fn verify(&self) -> eyre::Result<()> {
        for cmd in &self.cmd_vec {
            cmd.verify()?;
        }
        for group in self.groups()? {
            ensure!(
                group.commands.len() <= 100,
                "at most 100 commands can share a scope"
            );
        }
        Ok(())
    }

    /// Groups the commands by scope and language, keeping the config order.
    pub fn groups(&self) -> eyre::Result<Vec<CommandGroup>> {
        let mut groups: Vec<CommandGroup> = vec![];
        for cmd in &self.cmd_vec {
            let scope = cmd.bot_command_scope()?;
            let bot_command = BotCommand {
                command: cmd.name.clone(),
                description: cmd.desc.clone(),
            };
            match groups
                .iter_mut()
                .find(|group| group.scope == scope && group.language_code == cmd.language_code)
            {
                Some(group) => group.commands.push(bot_command),
                None => groups.push(CommandGroup {
                    scope,
                    language_code: cmd.language_code.clone(),
                    commands: vec![bot_command],
                }),
            }
        }
        Ok(groups)
    }

    pub async fn register(&self, comm: &dyn Communicate) -> eyre::Result<()> {
        self.verify()?;
        for group in self.groups()? {
            let count = group.commands.len();
            comm.set_my_commands(
                group.commands,
                Some(group.scope),
                group.language_code.as_deref(),
            )
            .await?
            .into_result()?;
            info!("registered {count} commands");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use serde_json::json;

    fn command(name: &str, desc: &str) -> Command {
        Command {
            name: name.into(),
            desc: desc.into(),
            scope: ScopeKind::Default,
            chat_id: None,
            user_id: None,
            language_code: None,
        }
    }

    #[test]
    fn deserialize_command() {
        let cmd = serde_json::from_value::<Command>(json!({
            "name": "count",
            "desc": "messages seen in this chat",
            "scope": "chat_member",
            "chat_id": -100,
            "user_id": 7
        }))
        .unwrap();
        check!(cmd.scope == ScopeKind::ChatMember);
        let_assert!(Ok(BotCommandScope::ChatMember { user_id: 7, .. }) = cmd.bot_command_scope());
    }

    #[test]
    fn verify_limits() {
        check!(command("start", "greets").verify().is_ok());
        check!(command("", "greets").verify().is_err());
        check!(command(&"a".repeat(33), "too long").verify().is_err());
        check!(command("Start", "uppercase").verify().is_err());
        check!(command("start", "").verify().is_err());
        check!(command("start", &"d".repeat(257)).verify().is_err());

        let mut chat_scoped = command("ban", "admins only");
        chat_scoped.scope = ScopeKind::ChatAdministrators;
        let_assert!(Err(err) = chat_scoped.verify());
        check!(err.to_string() == "scope of 'ban' needs a chat_id");
    }

    #[test]
    fn grouped_by_scope() {
        let mut private = command("settings", "private settings");
        private.scope = ScopeKind::AllPrivateChats;
        let commands = Commands {
            cmd_vec: vec![command("start", "greets"), private, command("count", "counts")],
        };
        let groups = commands.groups().unwrap();
        check!(groups.len() == 2);
        check!(groups[0].scope == BotCommandScope::Default);
        check!(groups[0].commands.len() == 2);
        check!(groups[1].scope == BotCommandScope::AllPrivateChats);
    }
}
