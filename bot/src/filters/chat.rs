//! Leaves over who sent a message and where.

use api::{
    basic_types::{ChatIntId, UserId},
    proto::{ChatType, Message},
};
use compact_str::CompactString;

use crate::filters::{message::has, Filter, FilterResult, MessageCheck};

pub fn private() -> Filter {
    has("ChatType.Private", |m| m.chat.chat_type == ChatType::Private)
}

pub fn group() -> Filter {
    has("ChatType.Group", |m| m.chat.chat_type == ChatType::Group)
}

pub fn supergroup() -> Filter {
    has("ChatType.Supergroup", |m| m.chat.chat_type == ChatType::Supergroup)
}

/// Groups and supergroups.
pub fn groups() -> Filter {
    has("ChatType.Groups", |m| {
        matches!(m.chat.chat_type, ChatType::Group | ChatType::Supergroup)
    })
}

pub fn channel() -> Filter {
    has("ChatType.Channel", |m| m.chat.chat_type == ChatType::Channel)
}

/// Identifiers an entity is matched against. Usernames are stored without `@`.
#[derive(Debug, Default)]
struct Identifiers {
    ids: Vec<i64>,
    usernames: Vec<CompactString>,
}

impl Identifiers {
    fn new<S: AsRef<str>>(ids: &[i64], usernames: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.to_vec(),
            usernames: usernames
                .into_iter()
                .map(|username| username.as_ref().trim_start_matches('@').into())
                .collect(),
        }
    }

    fn contains(&self, id: i64, username: Option<&CompactString>) -> bool {
        self.ids.contains(&id)
            || username.is_some_and(|username| {
                self.usernames
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(username))
            })
    }
}

#[derive(Debug)]
struct FromUser(Identifiers);

impl MessageCheck for FromUser {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(message.from.as_ref().is_some_and(|user| {
            self.0.contains(user.id, user.username.as_ref())
        })))
    }
}

/// Messages sent by one of the given users.
pub fn user<S: AsRef<str>>(ids: &[UserId], usernames: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(FromUser(Identifiers::new(ids, usernames)))
}

#[derive(Debug)]
struct InChat(Identifiers);

impl MessageCheck for InChat {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(
            self.0.contains(message.chat.id, message.chat.username.as_ref()),
        ))
    }
}

/// Messages posted in one of the given chats.
pub fn chat<S: AsRef<str>>(ids: &[ChatIntId], usernames: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(InChat(Identifiers::new(ids, usernames)))
}

#[derive(Debug)]
struct ViaBot(Identifiers);

impl MessageCheck for ViaBot {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(message.via_bot.as_ref().is_some_and(|bot| {
            self.0.contains(bot.id, bot.username.as_ref())
        })))
    }
}

/// Messages sent through one of the given inline bots.
pub fn via_bot<S: AsRef<str>>(ids: &[UserId], usernames: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(ViaBot(Identifiers::new(ids, usernames)))
}

#[derive(Debug)]
struct Language(Vec<CompactString>);

impl MessageCheck for Language {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let code = message
            .from
            .as_ref()
            .and_then(|user| user.language_code.as_ref());
        Ok(FilterResult::from(code.is_some_and(|code| {
            self.0.iter().any(|prefix| code.starts_with(prefix.as_str()))
        })))
    }
}

/// Messages from users whose language code starts with one of the prefixes,
/// so `"en"` covers `"en_US"` and `"en_GB"`.
pub fn language<S: AsRef<str>>(prefixes: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(Language(
        prefixes.into_iter().map(|p| p.as_ref().into()).collect(),
    ))
}
