//! Leaves testing what a message contains.

use api::proto::Message;
use compact_str::CompactString;
use std::fmt::{Debug, Formatter};

use crate::filters::{Filter, FilterResult, MessageCheck};

/// Presence test over one message field.
pub(crate) struct Has {
    name: &'static str,
    test: fn(&Message) -> bool,
}

impl Debug for Has {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

impl MessageCheck for Has {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        Ok(FilterResult::from((self.test)(message)))
    }
}

pub(crate) fn has(name: &'static str, test: fn(&Message) -> bool) -> Filter {
    Filter::message(Has { name, test })
}

fn non_empty(value: &Option<CompactString>) -> bool {
    value.as_ref().is_some_and(|value| !value.is_empty())
}

/// Any update carrying a message.
pub fn all() -> Filter {
    has("All", |_| true)
}

pub fn text() -> Filter {
    has("Text", |m| non_empty(&m.text))
}

pub fn caption() -> Filter {
    has("Caption", |m| non_empty(&m.caption))
}

pub fn reply() -> Filter {
    has("Reply", |m| m.reply_to_message.is_some())
}

pub fn forwarded() -> Filter {
    has("Forwarded", |m| m.forward_origin.is_some())
}

pub fn is_automatic_forward() -> Filter {
    has("IsAutomaticForward", |m| m.is_automatic_forward.unwrap_or(false))
}

pub fn animation() -> Filter {
    has("Animation", |m| m.animation.is_some())
}

pub fn audio() -> Filter {
    has("Audio", |m| m.audio.is_some())
}

pub fn document() -> Filter {
    has("Document", |m| m.document.is_some())
}

pub fn photo() -> Filter {
    has("Photo", |m| m.photo.as_ref().is_some_and(|sizes| !sizes.is_empty()))
}

pub fn sticker() -> Filter {
    has("Sticker", |m| m.sticker.is_some())
}

pub fn video() -> Filter {
    has("Video", |m| m.video.is_some())
}

pub fn video_note() -> Filter {
    has("VideoNote", |m| m.video_note.is_some())
}

pub fn voice() -> Filter {
    has("Voice", |m| m.voice.is_some())
}

pub fn contact() -> Filter {
    has("Contact", |m| m.contact.is_some())
}

pub fn location() -> Filter {
    has("Location", |m| m.location.is_some())
}

pub fn venue() -> Filter {
    has("Venue", |m| m.venue.is_some())
}

pub fn poll() -> Filter {
    has("Poll", |m| m.poll.is_some())
}

pub fn dice() -> Filter {
    has("Dice", |m| m.dice.is_some())
}

pub fn game() -> Filter {
    has("Game", |m| m.game.is_some())
}

pub fn invoice() -> Filter {
    has("Invoice", |m| m.invoice.is_some())
}

pub fn successful_payment() -> Filter {
    has("SuccessfulPayment", |m| m.successful_payment.is_some())
}

pub fn passport_data() -> Filter {
    has("PassportData", |m| m.passport_data.is_some())
}

pub fn has_media_spoiler() -> Filter {
    has("HasMediaSpoiler", |m| m.has_media_spoiler.unwrap_or(false))
}

pub fn has_protected_content() -> Filter {
    has("HasProtectedContent", |m| m.has_protected_content.unwrap_or(false))
}

pub fn is_topic_message() -> Filter {
    has("IsTopicMessage", |m| m.is_topic_message.unwrap_or(false))
}

pub fn via_bot() -> Filter {
    has("ViaBot", |m| m.via_bot.is_some())
}

/// Any attachment a user can send.
pub fn attachment() -> Filter {
    animation() | audio() | document() | photo() | sticker() | video() | video_note() | voice()
}

pub mod dice_emoji {
    pub const DICE: &str = "🎲";
    pub const DARTS: &str = "🎯";
    pub const BASKETBALL: &str = "🏀";
    pub const FOOTBALL: &str = "⚽";
    pub const SLOT_MACHINE: &str = "🎰";
    pub const BOWLING: &str = "🎳";
}

#[derive(Debug)]
struct DiceValue {
    emoji: Option<CompactString>,
    values: Vec<u8>,
}

impl MessageCheck for DiceValue {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let Some(dice) = &message.dice else {
            return Ok(FilterResult::Rejected);
        };
        let emoji_ok = self.emoji.as_ref().map_or(true, |emoji| emoji == &dice.emoji);
        let value_ok = self.values.is_empty() || self.values.contains(&dice.value);
        Ok(FilterResult::from(emoji_ok && value_ok))
    }
}

/// Dice messages thrown with `emoji` (any when `None`) that landed on one of
/// `values` (any when empty).
pub fn dice_with(emoji: Option<&str>, values: &[u8]) -> Filter {
    Filter::message(DiceValue {
        emoji: emoji.map(CompactString::from),
        values: values.to_vec(),
    })
}

#[derive(Debug)]
struct DocumentMimeType(CompactString);

impl MessageCheck for DocumentMimeType {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let mime_type = message
            .document
            .as_ref()
            .and_then(|document| document.mime_type.as_ref());
        Ok(FilterResult::from(mime_type == Some(&self.0)))
    }
}

pub fn document_mime_type(mime_type: &str) -> Filter {
    Filter::message(DocumentMimeType(mime_type.into()))
}

#[derive(Debug)]
struct DocumentCategory(CompactString);

impl MessageCheck for DocumentCategory {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let mime_type = message
            .document
            .as_ref()
            .and_then(|document| document.mime_type.as_ref());
        Ok(FilterResult::from(
            mime_type.is_some_and(|mime_type| mime_type.starts_with(self.0.as_str())),
        ))
    }
}

/// Documents whose MIME type starts with `category`, e.g. `"image/"`.
pub fn document_category(category: &str) -> Filter {
    Filter::message(DocumentCategory(category.into()))
}

#[derive(Debug)]
struct DocumentFileExtension {
    extension: Option<CompactString>,
    case_sensitive: bool,
}

impl MessageCheck for DocumentFileExtension {
    fn check_message(&self, message: &Message) -> eyre::Result<FilterResult> {
        let Some(file_name) = message
            .document
            .as_ref()
            .and_then(|document| document.file_name.as_ref())
        else {
            return Ok(FilterResult::Rejected);
        };
        let matched = match &self.extension {
            None => !file_name.contains('.'),
            Some(extension) if self.case_sensitive => file_name.ends_with(&format!(".{extension}")),
            Some(extension) => file_name
                .to_lowercase()
                .ends_with(&format!(".{}", extension.to_lowercase())),
        };
        Ok(FilterResult::from(matched))
    }
}

/// Documents by file name extension given without the leading dot, `None`
/// selects files that have no extension at all.
pub fn document_file_extension(extension: Option<&str>, case_sensitive: bool) -> Filter {
    Filter::message(DocumentFileExtension {
        extension: extension.map(|ext| ext.trim_start_matches('.').into()),
        case_sensitive,
    })
}
