use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::proto::{ChatType, InlineKeyboardMarkup, Location, MessageEntity, ParseMode, User};

/// This object represents an incoming inline query.
/// https://core.telegram.org/bots/api#inlinequery
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct InlineQuery {
    pub id: CompactString,
    pub from: User,
    pub query: CompactString,
    pub offset: CompactString,
    pub chat_type: Option<ChatType>,
    pub location: Option<Location>,
}

/// Represents a result of an inline query that was chosen by the user and sent to their chat partner.
/// https://core.telegram.org/bots/api#choseninlineresult
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ChosenInlineResult {
    pub result_id: CompactString,
    pub from: User,
    pub location: Option<Location>,
    pub inline_message_id: Option<CompactString>,
    pub query: CompactString,
}

/// This object represents one result of an inline query.
/// https://core.telegram.org/bots/api#inlinequeryresult
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineQueryResult {
    Article(InlineQueryResultArticle),
    Photo(InlineQueryResultPhoto),
    Gif(InlineQueryResultGif),
    Document(InlineQueryResultDocument),
    Location(InlineQueryResultLocation),
}

impl InlineQueryResult {
    pub fn id(&self) -> &str {
        match self {
            InlineQueryResult::Article(result) => &result.id,
            InlineQueryResult::Photo(result) => &result.id,
            InlineQueryResult::Gif(result) => &result.id,
            InlineQueryResult::Document(result) => &result.id,
            InlineQueryResult::Location(result) => &result.id,
        }
    }
}

/// Represents a link to an article or web page.
/// https://core.telegram.org/bots/api#inlinequeryresultarticle
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InlineQueryResultArticle {
    pub id: CompactString,
    pub title: CompactString,
    pub input_message_content: InputMessageContent,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub url: Option<CompactString>,
    pub hide_url: Option<bool>,
    pub description: Option<CompactString>,
    pub thumbnail_url: Option<CompactString>,
    pub thumbnail_width: Option<i32>,
    pub thumbnail_height: Option<i32>,
}

impl InlineQueryResultArticle {
    pub fn text(id: &str, title: &str, text: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            input_message_content: InputMessageContent::Text(InputTextMessageContent {
                message_text: text.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Represents a link to a photo. By default, this photo will be sent by the user with optional caption.
/// https://core.telegram.org/bots/api#inlinequeryresultphoto
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InlineQueryResultPhoto {
    pub id: CompactString,
    pub photo_url: CompactString,
    pub thumbnail_url: CompactString,
    pub photo_width: Option<i32>,
    pub photo_height: Option<i32>,
    pub title: Option<CompactString>,
    pub description: Option<CompactString>,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub input_message_content: Option<InputMessageContent>,
}

/// Represents a link to an animated GIF file.
/// https://core.telegram.org/bots/api#inlinequeryresultgif
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InlineQueryResultGif {
    pub id: CompactString,
    pub gif_url: CompactString,
    pub gif_width: Option<i32>,
    pub gif_height: Option<i32>,
    pub gif_duration: Option<i32>,
    pub thumbnail_url: CompactString,
    pub thumbnail_mime_type: Option<CompactString>,
    pub title: Option<CompactString>,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub input_message_content: Option<InputMessageContent>,
}

/// Represents a link to a file. Currently, only .PDF and .ZIP files can be sent using this method.
/// https://core.telegram.org/bots/api#inlinequeryresultdocument
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InlineQueryResultDocument {
    pub id: CompactString,
    pub title: CompactString,
    pub caption: Option<CompactString>,
    pub parse_mode: Option<ParseMode>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub document_url: CompactString,
    pub mime_type: CompactString,
    pub description: Option<CompactString>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub input_message_content: Option<InputMessageContent>,
    pub thumbnail_url: Option<CompactString>,
}

/// Represents a location on a map.
/// https://core.telegram.org/bots/api#inlinequeryresultlocation
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InlineQueryResultLocation {
    pub id: CompactString,
    pub latitude: f32,
    pub longitude: f32,
    pub title: CompactString,
    pub horizontal_accuracy: Option<f32>,
    pub live_period: Option<i32>,
    pub heading: Option<i16>,
    pub proximity_alert_radius: Option<i32>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub input_message_content: Option<InputMessageContent>,
}

/// This object represents the content of a message to be sent as a result of an inline query.
/// https://core.telegram.org/bots/api#inputmessagecontent
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InputMessageContent {
    Text(InputTextMessageContent),
    Location(InputLocationMessageContent),
    Venue(InputVenueMessageContent),
    Contact(InputContactMessageContent),
}

impl Default for InputMessageContent {
    fn default() -> Self {
        InputMessageContent::Text(InputTextMessageContent::default())
    }
}

/// https://core.telegram.org/bots/api#inputtextmessagecontent
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InputTextMessageContent {
    pub message_text: CompactString,
    pub parse_mode: Option<ParseMode>,
    pub entities: Option<Vec<MessageEntity>>,
    pub disable_web_page_preview: Option<bool>,
}

/// https://core.telegram.org/bots/api#inputlocationmessagecontent
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InputLocationMessageContent {
    pub latitude: f32,
    pub longitude: f32,
    pub horizontal_accuracy: Option<f32>,
    pub live_period: Option<i32>,
    pub heading: Option<i16>,
    pub proximity_alert_radius: Option<i32>,
}

/// https://core.telegram.org/bots/api#inputvenuemessagecontent
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InputVenueMessageContent {
    pub latitude: f32,
    pub longitude: f32,
    pub title: CompactString,
    pub address: CompactString,
    pub foursquare_id: Option<CompactString>,
    pub foursquare_type: Option<CompactString>,
    pub google_place_id: Option<CompactString>,
    pub google_place_type: Option<CompactString>,
}

/// https://core.telegram.org/bots/api#inputcontactmessagecontent
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct InputContactMessageContent {
    pub phone_number: CompactString,
    pub first_name: CompactString,
    pub last_name: Option<CompactString>,
    pub vcard: Option<CompactString>,
}
