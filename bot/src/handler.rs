use crate::{
    bot::command::BotCommandInfo,
    communicator::Communicate,
    filters::{FilterData, RegexMatch},
    persistence::{Data, Store},
};
use api::{
    basic_types::{ChatIntId, UserId},
    proto::{CommonUpdate, Message, ParseMode},
};
use async_trait::async_trait;
use eyre::eyre;

/// Reacts to updates its filter let through.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>) -> eyre::Result<()>;
}

/// Everything a handler gets for one update.
pub struct Context<'a> {
    pub comm: &'a dyn Communicate,
    pub update: &'a CommonUpdate,
    /// Data the filter extracted, e.g. regex matches.
    pub data: FilterData,
    /// Set when the effective message starts with a bot command.
    pub command: Option<BotCommandInfo>,
    pub store: &'a mut Store,
}

impl Context<'_> {
    pub fn message(&self) -> Option<&Message> {
        self.update.data.effective_message()
    }

    pub fn chat_id(&self) -> Option<ChatIntId> {
        self.update.data.effective_chat().map(|chat| chat.id)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.update.data.effective_user().map(|user| user.id)
    }

    pub fn matches(&self) -> impl Iterator<Item = &RegexMatch> {
        self.data.matches()
    }

    pub fn user_data(&mut self) -> Option<&mut Data> {
        let user_id = self.user_id()?;
        Some(self.store.user_data(user_id))
    }

    pub fn chat_data(&mut self) -> Option<&mut Data> {
        let chat_id = self.chat_id()?;
        Some(self.store.chat_data(chat_id))
    }

    /// Replies to the effective message.
    pub async fn reply(&self, text: &str, parse_mode: Option<ParseMode>) -> eyre::Result<Message> {
        let message = self
            .message()
            .ok_or_else(|| eyre!("update {} has no message to reply to", self.update.id))?;
        let sent = self
            .comm
            .reply_message(text, message.chat.id.into(), message.message_id, parse_mode)
            .await?
            .into_result()?;
        Ok(sent)
    }

    /// Sends a message to the effective chat.
    pub async fn send(&self, text: &str) -> eyre::Result<Message> {
        let chat_id = self
            .chat_id()
            .ok_or_else(|| eyre!("update {} has no chat", self.update.id))?;
        let sent = self
            .comm
            .send_message(text, chat_id.into())
            .await?
            .into_result()?;
        Ok(sent)
    }
}
