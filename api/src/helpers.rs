use compact_str::CompactString;

use crate::{
    basic_types::UserId,
    proto::{Message, MessageEntityType, Update},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkdownVersion {
    V1,
    V2,
}

/// Escapes Telegram markup symbols. For Markdown V2, `entity` narrows the
/// set to what is special inside `pre`/`code` or `text_link`/`custom_emoji`.
pub fn escape_markdown(
    text: &str,
    version: MarkdownVersion,
    entity: Option<&MessageEntityType>,
) -> String {
    let special: &str = match (version, entity) {
        (MarkdownVersion::V1, _) => r"_*`[",
        (MarkdownVersion::V2, Some(MessageEntityType::Pre | MessageEntityType::Code)) => r"\`",
        (
            MarkdownVersion::V2,
            Some(MessageEntityType::TextLink | MessageEntityType::CustomEmoji),
        ) => r"\)",
        (MarkdownVersion::V2, _) => r"\_*[]()~`>#+-=|{}.!",
    };

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn mention_html(user_id: UserId, name: &str) -> String {
    format!(r#"<a href="tg://user?id={user_id}">{}</a>"#, escape_html(name))
}

pub fn mention_markdown(user_id: UserId, name: &str, version: MarkdownVersion) -> String {
    let name = match version {
        MarkdownVersion::V1 => name.to_string(),
        MarkdownVersion::V2 => escape_markdown(name, version, None),
    };
    format!("[{name}](tg://user?id={user_id})")
}

const MESSAGE_TYPES: &[&str] = &[
    "text",
    "new_chat_members",
    "left_chat_member",
    "new_chat_title",
    "new_chat_photo",
    "delete_chat_photo",
    "group_chat_created",
    "supergroup_chat_created",
    "channel_chat_created",
    "migrate_to_chat_id",
    "migrate_from_chat_id",
    "pinned_message",
    "audio",
    "game",
    "animation",
    "document",
    "photo",
    "sticker",
    "video",
    "voice",
    "video_note",
    "contact",
    "location",
    "venue",
    "invoice",
    "successful_payment",
    "dice",
    "poll",
    "passport_data",
];

fn has_field(message: &Message, field: &str) -> bool {
    match field {
        "text" => message.text.is_some(),
        "new_chat_members" => message
            .new_chat_members
            .as_ref()
            .is_some_and(|members| !members.is_empty()),
        "left_chat_member" => message.left_chat_member.is_some(),
        "new_chat_title" => message.new_chat_title.is_some(),
        "new_chat_photo" => message
            .new_chat_photo
            .as_ref()
            .is_some_and(|photo| !photo.is_empty()),
        "delete_chat_photo" => message.delete_chat_photo.unwrap_or(false),
        "group_chat_created" => message.group_chat_created.unwrap_or(false),
        "supergroup_chat_created" => message.supergroup_chat_created.unwrap_or(false),
        "channel_chat_created" => message.channel_chat_created.unwrap_or(false),
        "migrate_to_chat_id" => message.migrate_to_chat_id.is_some(),
        "migrate_from_chat_id" => message.migrate_from_chat_id.is_some(),
        "pinned_message" => message.pinned_message.is_some(),
        "audio" => message.audio.is_some(),
        "game" => message.game.is_some(),
        "animation" => message.animation.is_some(),
        "document" => message.document.is_some(),
        "photo" => message.photo.as_ref().is_some_and(|photo| !photo.is_empty()),
        "sticker" => message.sticker.is_some(),
        "video" => message.video.is_some(),
        "voice" => message.voice.is_some(),
        "video_note" => message.video_note.is_some(),
        "contact" => message.contact.is_some(),
        "location" => message.location.is_some(),
        "venue" => message.venue.is_some(),
        "invoice" => message.invoice.is_some(),
        "successful_payment" => message.successful_payment.is_some(),
        "dice" => message.dice.is_some(),
        "poll" => message.poll.is_some(),
        "passport_data" => message.passport_data.is_some(),
        _ => false,
    }
}

/// Name of the first content field set in the message, in Bot API field terms.
pub fn message_type(message: &Message) -> Option<CompactString> {
    MESSAGE_TYPES
        .iter()
        .find(|field| has_field(message, field))
        .map(|field| CompactString::from(*field))
}

/// Content type of the update's effective message.
pub fn effective_message_type(update: &Update) -> Option<CompactString> {
    message_type(update.effective_message()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Dice, Location};
    use assert2::check;

    #[test]
    fn escape_v1() {
        check!(escape_markdown("*bold* _it_", MarkdownVersion::V1, None) == r"\*bold\* \_it\_");
    }

    #[test]
    fn escape_v2() {
        check!(
            escape_markdown("a.b (c) !", MarkdownVersion::V2, None) == r"a\.b \(c\) \!"
        );
        check!(
            escape_markdown("x.`y`", MarkdownVersion::V2, Some(&MessageEntityType::Code))
                == r"x.\`y\`"
        );
        check!(
            escape_markdown(
                "http://a.b/(c)",
                MarkdownVersion::V2,
                Some(&MessageEntityType::TextLink)
            ) == r"http://a.b/(c\)"
        );
    }

    #[test]
    fn mentions() {
        check!(mention_html(42, "<Tom & Jerry>") == r#"<a href="tg://user?id=42">&lt;Tom &amp; Jerry&gt;</a>"#);
        check!(mention_markdown(42, "a_b", MarkdownVersion::V1) == "[a_b](tg://user?id=42)");
        check!(mention_markdown(42, "a_b", MarkdownVersion::V2) == r"[a\_b](tg://user?id=42)");
    }

    #[test]
    fn message_type_prefers_text() {
        let message = Message {
            text: Some("hi".into()),
            dice: Some(Dice::default()),
            ..Default::default()
        };
        check!(message_type(&message).as_deref() == Some("text"));

        let message = Message {
            location: Some(Location::default()),
            ..Default::default()
        };
        check!(message_type(&message).as_deref() == Some("location"));
        check!(message_type(&Message::default()).is_none());
    }

    #[test]
    fn effective_type_of_update() {
        let update = Update::MessageUpdate(Message {
            dice: Some(Dice::default()),
            ..Default::default()
        });
        check!(effective_message_type(&update).as_deref() == Some("dice"));
        check!(effective_message_type(&Update::Unsupported("x".into())).is_none());
    }
}
