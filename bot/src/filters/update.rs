//! Leaves over the kind of update, independent of message content.

use api::proto::{Update, UpdateType};

use crate::filters::{Check, Filter, FilterResult};

#[derive(Debug)]
struct OfType(Vec<UpdateType>);

impl Check for OfType {
    fn check(&self, update: &Update) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from(
            update
                .update_type()
                .is_some_and(|update_type| self.0.contains(&update_type)),
        ))
    }
}

/// Updates of one of the given kinds.
pub fn of_type(types: &[UpdateType]) -> Filter {
    Filter::leaf(OfType(types.to_vec()))
}

pub fn message() -> Filter {
    of_type(&[UpdateType::Message])
}

pub fn edited_message() -> Filter {
    of_type(&[UpdateType::EditedMessage])
}

pub fn channel_post() -> Filter {
    of_type(&[UpdateType::ChannelPost])
}

pub fn edited_channel_post() -> Filter {
    of_type(&[UpdateType::EditedChannelPost])
}

/// New or edited messages.
pub fn messages() -> Filter {
    of_type(&[UpdateType::Message, UpdateType::EditedMessage])
}

/// New or edited channel posts.
pub fn channel_posts() -> Filter {
    of_type(&[UpdateType::ChannelPost, UpdateType::EditedChannelPost])
}

/// Edited messages and edited channel posts.
pub fn edited() -> Filter {
    of_type(&[UpdateType::EditedMessage, UpdateType::EditedChannelPost])
}

pub fn callback_query() -> Filter {
    of_type(&[UpdateType::CallbackQuery])
}

pub fn inline_query() -> Filter {
    of_type(&[UpdateType::InlineQuery])
}
