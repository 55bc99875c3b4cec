use compact_str::CompactString;
use derivative::Derivative;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
    basic_types::{MessageId, MessageThreadId, UserId},
    files::{Files, GetFiles},
    inline::InlineQueryResult,
    payments::{LabeledPrice, ShippingOption},
    proto::{
        BotCommand, BotCommandScope, ChatAction, ChatId, InlineKeyboardMarkup, InputFile,
        MessageEntity, ParseMode, PollType, ReplyMarkup, UpdateType,
    },
};

#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendMessageRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub text: CompactString,
    pub parse_mode: Option<ParseMode>,
    pub entities: Option<Vec<MessageEntity>>,
    pub disable_web_page_preview: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessageRequest {
    pub fn new(chat_id: impl Into<ChatId>, text: &str) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            ..Default::default()
        }
    }
}

/// `timeout` is the long polling timeout in seconds, 0 means short polling.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: Option<i64>,
    pub limit: Option<u32>,
    pub timeout: Option<u32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
}

/// Use this method to specify a URL and receive incoming updates via an outgoing webhook.
/// https://core.telegram.org/bots/api#setwebhook
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct SetWebhookRequest {
    pub url: CompactString,
    pub certificate: Option<InputFile>,
    pub ip_address: Option<CompactString>,
    pub max_connections: Option<u32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
    pub drop_pending_updates: Option<bool>,
    pub secret_token: Option<CompactString>,
}

impl GetFiles for SetWebhookRequest {
    fn get_files(&self) -> Files {
        let mut files = Files::new();
        if let Some(certificate) = &self.certificate {
            files.insert("certificate".into(), certificate.clone());
        }
        files
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct DeleteWebhookRequest {
    pub drop_pending_updates: Option<bool>,
}

/// Use this method to send photos. On success, the sent Message is returned.
/// https://core.telegram.org/bots/api#sendphoto
#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendPhotoRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    /// Photo to send. Pass a file_id as String to send a photo that exists
    /// on the Telegram servers (recommended), pass an HTTP URL as a String for Telegram
    /// to get a photo from the Internet, or upload a new photo using multipart/form-data.
    /// The photo must be at most 10 MB in size. The photo's width and height must not exceed 10000 in total.
    /// Width and height ratio must be at most 20. [More information on Sending Files »](https://core.telegram.org/bots/api#sending-files)
    #[derivative(Default(value = "InputFile::FileID(CompactString::default())"))]
    pub photo: InputFile,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub has_spoiler: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl GetFiles for SendPhotoRequest {
    fn get_files(&self) -> Files {
        Files::from([("photo".into(), self.photo.clone())])
    }
}

/// Use this method to send general files. On success, the sent Message is returned.
/// Bots can currently send files of any type of up to 50 MB in size.
/// https://core.telegram.org/bots/api#senddocument
#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendDocumentRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    #[derivative(Default(value = "InputFile::FileID(CompactString::default())"))]
    pub document: InputFile,
    pub thumbnail: Option<InputFile>,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub disable_content_type_detection: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl GetFiles for SendDocumentRequest {
    fn get_files(&self) -> Files {
        let mut files = Files::from([("document".into(), self.document.clone())]);
        if let Some(thumbnail) = &self.thumbnail {
            files.insert("thumbnail".into(), thumbnail.clone());
        }
        files
    }
}

/// Use this method to send animation files (GIF or H.264/MPEG-4 AVC video without sound).
/// On success, the sent Message is returned.
/// https://core.telegram.org/bots/api#sendanimation
#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendAnimationRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    /// Animation to send. Pass a file_id as String to send an animation that exists
    /// on the Telegram servers (recommended), pass an HTTP URL as a String
    /// for Telegram to get an animation from the Internet, or upload a new animation using multipart/form-data.
    /// [More information on Sending Files »](https://core.telegram.org/bots/api#sending-files)
    #[derivative(Default(value = "InputFile::FileID(CompactString::default())"))]
    pub animation: InputFile,
    pub duration: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Thumbnail of the file sent. Ignored if the file is not uploaded using multipart/form-data.
    pub thumbnail: Option<InputFile>,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub has_spoiler: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl GetFiles for SendAnimationRequest {
    fn get_files(&self) -> Files {
        let mut files = Files::from([("animation".into(), self.animation.clone())]);
        if let Some(thumbnail) = &self.thumbnail {
            files.insert("thumbnail".into(), thumbnail.clone());
        }
        files
    }
}

/// Use this method to forward messages of any kind. Service messages can't be forwarded.
/// On success, the sent Message is returned.
/// https://core.telegram.org/bots/api#forwardmessage
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ForwardMessageRequest {
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub from_chat_id: ChatId,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub message_id: MessageId,
}

/// Use this method to copy messages of any kind. Service messages and invoice messages can't be copied.
/// The method is analogous to the method forwardMessage, but the copied message doesn't have a link
/// to the original message. Returns the MessageId of the sent message on success.
/// https://core.telegram.org/bots/api#copymessage
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CopyMessageRequest {
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub from_chat_id: ChatId,
    pub message_id: MessageId,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct SendChatActionRequest {
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub action: ChatAction,
}

/// Use this method to send an animated emoji that will display a random value.
/// https://core.telegram.org/bots/api#senddice
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct SendDiceRequest {
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    /// Emoji on which the dice throw animation is based, defaults to “🎲”.
    pub emoji: Option<CompactString>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

/// https://core.telegram.org/bots/api#sendlocation
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct SendLocationRequest {
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub latitude: f32,
    pub longitude: f32,
    pub horizontal_accuracy: Option<f32>,
    pub live_period: Option<i32>,
    pub heading: Option<i16>,
    pub proximity_alert_radius: Option<i32>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

/// Use this method to send a native poll. On success, the sent Message is returned.
/// https://core.telegram.org/bots/api#sendpoll
#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendPollRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub question: CompactString,
    pub options: Vec<CompactString>,
    pub is_anonymous: Option<bool>,
    #[serde(rename = "type")]
    pub poll_type: Option<PollType>,
    pub allows_multiple_answers: Option<bool>,
    pub correct_option_id: Option<i32>,
    pub explanation: Option<CompactString>,
    pub explanation_parse_mode: Option<ParseMode>,
    pub open_period: Option<i32>,
    pub is_closed: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<ReplyMarkup>,
}

/// Use this method to send invoices. On success, the sent Message is returned.
/// https://core.telegram.org/bots/api#sendinvoice
#[skip_serializing_none]
#[derive(Debug, Derivative, Serialize)]
#[derivative(Default)]
pub struct SendInvoiceRequest {
    #[derivative(Default(value = "ChatId::Int(0)"))]
    pub chat_id: ChatId,
    pub message_thread_id: Option<MessageThreadId>,
    pub title: CompactString,
    pub description: CompactString,
    /// Bot-defined invoice payload, 1-128 bytes. Not displayed to the user.
    pub payload: CompactString,
    pub provider_token: CompactString,
    pub currency: CompactString,
    pub prices: Vec<LabeledPrice>,
    pub max_tip_amount: Option<i64>,
    pub suggested_tip_amounts: Option<Vec<i64>>,
    pub start_parameter: Option<CompactString>,
    pub provider_data: Option<CompactString>,
    pub photo_url: Option<CompactString>,
    pub need_name: Option<bool>,
    pub need_phone_number: Option<bool>,
    pub need_email: Option<bool>,
    pub need_shipping_address: Option<bool>,
    pub is_flexible: Option<bool>,
    pub disable_notification: Option<bool>,
    pub protect_content: Option<bool>,
    pub reply_to_message_id: Option<MessageId>,
    pub allow_sending_without_reply: Option<bool>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

/// Use this method to edit text and game messages.
/// Either `chat_id` with `message_id`, or `inline_message_id` must be set.
/// https://core.telegram.org/bots/api#editmessagetext
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct EditMessageTextRequest {
    pub chat_id: Option<ChatId>,
    pub message_id: Option<MessageId>,
    pub inline_message_id: Option<CompactString>,
    pub text: CompactString,
    pub parse_mode: Option<ParseMode>,
    pub entities: Option<Vec<MessageEntity>>,
    pub disable_web_page_preview: Option<bool>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct DeleteMessageRequest {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// https://core.telegram.org/bots/api#answercallbackquery
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct AnswerCallbackQueryRequest {
    pub callback_query_id: CompactString,
    pub text: Option<CompactString>,
    pub show_alert: Option<bool>,
    pub url: Option<CompactString>,
    pub cache_time: Option<i32>,
}

/// Use this method to send answers to an inline query. No more than 50 results per query are allowed.
/// https://core.telegram.org/bots/api#answerinlinequery
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct AnswerInlineQueryRequest {
    pub inline_query_id: CompactString,
    pub results: Vec<InlineQueryResult>,
    pub cache_time: Option<i32>,
    pub is_personal: Option<bool>,
    pub next_offset: Option<CompactString>,
}

/// Reply to a shipping query. `shipping_options` is required when `ok` is true,
/// `error_message` when it is false.
/// https://core.telegram.org/bots/api#answershippingquery
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct AnswerShippingQueryRequest {
    pub shipping_query_id: CompactString,
    pub ok: bool,
    pub shipping_options: Option<Vec<ShippingOption>>,
    pub error_message: Option<CompactString>,
}

/// https://core.telegram.org/bots/api#answerprecheckoutquery
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct AnswerPreCheckoutQueryRequest {
    pub pre_checkout_query_id: CompactString,
    pub ok: bool,
    pub error_message: Option<CompactString>,
}

#[derive(Debug, Serialize)]
pub struct GetChatRequest {
    pub chat_id: ChatId,
}

#[derive(Debug, Serialize)]
pub struct GetChatMemberRequest {
    pub chat_id: ChatId,
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct GetFileRequest {
    pub file_id: CompactString,
}

/// Use this method to change the list of the bot's commands.
/// https://core.telegram.org/bots/api#setmycommands
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct SetMyCommandsRequest {
    pub commands: Vec<BotCommand>,
    pub scope: Option<BotCommandScope>,
    pub language_code: Option<CompactString>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct GetMyCommandsRequest {
    pub scope: Option<BotCommandScope>,
    pub language_code: Option<CompactString>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct DeleteMyCommandsRequest {
    pub scope: Option<BotCommandScope>,
    pub language_code: Option<CompactString>,
}

/// Body of methods that take no parameters.
#[derive(Debug, Default, Serialize)]
pub struct EmptyRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use serde_json::json;

    #[test]
    fn optional_fields_are_skipped() {
        let request = SendMessageRequest::new(-42, "hi");
        check!(serde_json::to_value(&request).unwrap() == json!({"chat_id": -42, "text": "hi"}));
    }

    #[test]
    fn upload_is_referenced_as_attachment() {
        let request = SendPhotoRequest {
            chat_id: ChatId::from("@channel"),
            photo: InputFile::FileBytes("cat.png".into(), vec![1, 2, 3]),
            ..Default::default()
        };
        check!(
            serde_json::to_value(&request).unwrap()
                == json!({"chat_id": "@channel", "photo": "attach://cat.png"})
        );
        check!(request.any_need_upload());

        let request = SendPhotoRequest {
            photo: InputFile::FileID("AgAD".into()),
            ..Default::default()
        };
        check!(!request.any_need_upload());
    }

    #[test]
    fn commands_scope_is_tagged() {
        let request = SetMyCommandsRequest {
            commands: vec![BotCommand {
                command: "start".into(),
                description: "Start the bot".into(),
            }],
            scope: Some(BotCommandScope::ChatMember {
                chat_id: ChatId::from(10),
                user_id: 7,
            }),
            language_code: None,
        };
        check!(
            serde_json::to_value(&request).unwrap()
                == json!({
                    "commands": [{"command": "start", "description": "Start the bot"}],
                    "scope": {"type": "chat_member", "chat_id": 10, "user_id": 7}
                })
        );
    }
}
