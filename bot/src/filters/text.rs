//! Leaves over message text, captions and their entities.

use api::{
    basic_types::UserId,
    proto::{Message, MessageEntityType},
};
use compact_str::CompactString;
use regex::Regex;

use crate::filters::{Filter, FilterData, FilterResult, FilterValue, MessageCheck, RegexMatch, MATCHES};

#[derive(Debug)]
struct ExactText(Vec<CompactString>);

impl MessageCheck for ExactText {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(
            message
                .text
                .as_ref()
                .is_some_and(|text| self.0.contains(text)),
        ))
    }
}

/// Messages whose text equals one of `strings`.
pub fn exact_text<S: AsRef<str>>(strings: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(ExactText(
        strings.into_iter().map(|s| s.as_ref().into()).collect(),
    ))
}

#[derive(Debug)]
struct ExactCaption(Vec<CompactString>);

impl MessageCheck for ExactCaption {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(
            message
                .caption
                .as_ref()
                .is_some_and(|caption| self.0.contains(caption)),
        ))
    }
}

pub fn exact_caption<S: AsRef<str>>(strings: impl IntoIterator<Item = S>) -> Filter {
    Filter::message(ExactCaption(
        strings.into_iter().map(|s| s.as_ref().into()).collect(),
    ))
}

#[derive(Debug)]
struct AnyCommand;

impl MessageCheck for AnyCommand {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(message.is_command()))
    }
}

/// Messages starting with a bot command.
pub fn command() -> Filter {
    Filter::message(AnyCommand)
}

#[derive(Debug)]
struct NamedCommand {
    names: Vec<CompactString>,
    bot_username: Option<CompactString>,
}

impl MessageCheck for NamedCommand {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let Some(command) = message
            .command_entity()
            .and_then(|entity| message.parse_entity(entity))
        else {
            return Ok(FilterResult::Rejected);
        };
        let command = command.trim_start_matches('/');
        let (name, addressee) = match command.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (command, None),
        };
        let for_us = match (addressee, &self.bot_username) {
            (Some(addressee), Some(username)) => addressee.eq_ignore_ascii_case(username),
            _ => true,
        };
        let name = name.to_lowercase();
        Ok(FilterResult::from(
            for_us && self.names.iter().any(|known| known.as_str() == name),
        ))
    }
}

/// `/name` commands, with `/name@bot` accepted only when addressed to
/// `bot_username` (any addressee when it is `None`). Names compare case-insensitively.
pub fn named_command<S: AsRef<str>>(
    names: impl IntoIterator<Item = S>,
    bot_username: Option<&str>,
) -> Filter {
    Filter::message(NamedCommand {
        names: names
            .into_iter()
            .map(|name| name.as_ref().to_lowercase().into())
            .collect(),
        bot_username: bot_username.map(CompactString::from),
    })
}

#[derive(Debug)]
enum Source {
    Text,
    Caption,
}

#[derive(Debug)]
struct RegexSearch {
    regex: Regex,
    source: Source,
}

impl MessageCheck for RegexSearch {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let haystack = match self.source {
            Source::Text => message.text.as_ref(),
            Source::Caption => message.caption.as_ref(),
        };
        let found = haystack
            .and_then(|haystack| self.regex.captures(haystack))
            .and_then(|captures| RegexMatch::from_captures(&self.regex, &captures));
        Ok(match found {
            Some(found) => {
                FilterResult::from_data(FilterData::with(MATCHES, vec![FilterValue::Match(found)]))
            }
            None => FilterResult::Rejected,
        })
    }
}

/// Searches the text for `pattern` and returns the first match under `"matches"`.
pub fn regex(pattern: &str) -> eyre::Result<Filter> {
    Ok(Filter::message(RegexSearch {
        regex: Regex::new(pattern)?,
        source: Source::Text,
    }))
}

pub fn caption_regex(pattern: &str) -> eyre::Result<Filter> {
    Ok(Filter::message(RegexSearch {
        regex: Regex::new(pattern)?,
        source: Source::Caption,
    }))
}

#[derive(Debug)]
struct Entity {
    entity_type: MessageEntityType,
    source: Source,
}

impl MessageCheck for Entity {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let entities = match self.source {
            Source::Text => message.entities.as_ref(),
            Source::Caption => message.caption_entities.as_ref(),
        };
        Ok(FilterResult::from(entities.is_some_and(|entities| {
            entities
                .iter()
                .any(|entity| entity.entity_type == self.entity_type)
        })))
    }
}

/// Messages with at least one text entity of the given type.
pub fn entity(entity_type: MessageEntityType) -> Filter {
    Filter::message(Entity {
        entity_type,
        source: Source::Text,
    })
}

pub fn caption_entity(entity_type: MessageEntityType) -> Filter {
    Filter::message(Entity {
        entity_type,
        source: Source::Caption,
    })
}

#[derive(Debug)]
struct Mention {
    usernames: Vec<CompactString>,
    user_ids: Vec<UserId>,
}

impl MessageCheck for Mention {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let Some(entities) = message.entities.as_ref() else {
            return Ok(FilterResult::Rejected);
        };
        let matched = entities.iter().any(|entity| match &entity.entity_type {
            MessageEntityType::Mention => message
                .parse_entity(entity)
                .map(|mention| mention.trim_start_matches('@').to_lowercase())
                .is_some_and(|mention| self.usernames.iter().any(|name| name.as_str() == mention)),
            MessageEntityType::TextMention => entity
                .user
                .as_ref()
                .is_some_and(|user| self.user_ids.contains(&user.id)),
            _ => false,
        });
        Ok(FilterResult::from(matched))
    }
}

/// Messages mentioning one of the users, either by `@username` or by a text
/// mention of their id.
pub fn mention<S: AsRef<str>>(usernames: impl IntoIterator<Item = S>, user_ids: &[UserId]) -> Filter {
    Filter::message(Mention {
        usernames: usernames
            .into_iter()
            .map(|name| name.as_ref().trim_start_matches('@').to_lowercase().into())
            .collect(),
        user_ids: user_ids.to_vec(),
    })
}
