use compact_str::CompactString;
use eyre::eyre;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::Map;
use serde_with::skip_serializing_none;

use crate::{
    basic_types::{ChatIntId, Date, MessageId, MessageThreadId, UpdateId, UserId},
    inline::{ChosenInlineResult, InlineQuery},
    payments::{Invoice, PreCheckoutQuery, ShippingQuery, SuccessfulPayment},
};

/// This object represents the contents of a file to be uploaded. Must be posted using multipart/form-data in the usual way that files are uploaded via the browser.
#[derive(Debug, Clone)]
pub enum InputFile {
    /// FileID is an ID of a file already uploaded to Telegram.
    FileID(CompactString),
    /// FileURL is a URL to use as a file for a request.
    FileURL(CompactString),
    /// fileAttach is an internal file type used for processed media groups.
    FileAttach(CompactString),
    /// FileBytes contains information about a set of bytes to upload as a File.
    FileBytes(CompactString, Vec<u8>),
    /// FilePath is a path to a local file.
    FilePath(CompactString),
}

/// On success, returns an InputFileResult object data method
pub enum InputFileResult {
    /// don't need upload
    Text(CompactString),
    /// must upload using multipart/form-data
    Part(reqwest::multipart::Part),
}

impl InputFile {
    pub fn need_upload(&self) -> bool {
        matches!(self, InputFile::FileBytes(_, _) | InputFile::FilePath(_))
    }

    pub async fn data(&self) -> eyre::Result<InputFileResult> {
        match self {
            InputFile::FileID(id) => Ok(InputFileResult::Text(id.clone())),
            InputFile::FileURL(url) => Ok(InputFileResult::Text(url.clone())),
            InputFile::FileAttach(attach) => Ok(InputFileResult::Text(attach.clone())),
            InputFile::FileBytes(file_name, bytes) => Ok(InputFileResult::Part(
                reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.to_string()),
            )),
            InputFile::FilePath(path) => Ok(InputFileResult::Part(
                reqwest::multipart::Part::stream(reqwest::Body::wrap_stream(
                    tokio_util::codec::FramedRead::new(
                        tokio::fs::File::open(path.as_str()).await?,
                        tokio_util::codec::BytesCodec::new(),
                    ),
                ))
                .file_name(path.to_string()),
            )),
        }
    }
}

impl Serialize for InputFile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            InputFile::FileID(value) | InputFile::FileURL(value) | InputFile::FileAttach(value) => {
                serializer.serialize_str(value)
            }
            // replaced by a multipart part before sending
            InputFile::FileBytes(name, _) | InputFile::FilePath(name) => {
                serializer.serialize_str(&format!("attach://{name}"))
            }
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
    ChatJoinRequest,
}

#[derive(Debug)]
pub struct CommonUpdate {
    pub id: UpdateId,
    pub data: Update,
}

#[derive(Debug)]
pub enum Update {
    MessageUpdate(Message),
    EditedMessageUpdate(Message),
    ChannelPostUpdate(Message),
    EditedChannelPostUpdate(Message),
    InlineQueryUpdate(InlineQuery),
    ChosenInlineResultUpdate(ChosenInlineResult),
    CallbackQueryUpdate(CallbackQuery),
    ShippingQueryUpdate(ShippingQuery),
    PreCheckoutQueryUpdate(PreCheckoutQuery),
    PollUpdate(Poll),
    PollAnswerUpdate(PollAnswer),
    MyChatMemberUpdate(ChatMemberUpdated),
    ChatMemberUpdate(ChatMemberUpdated),
    ChatJoinRequestUpdate(ChatJoinRequest),
    /// An update kind this version does not model, holds its key.
    Unsupported(CompactString),
}

impl Update {
    pub fn update_type(&self) -> Option<UpdateType> {
        let update_type = match self {
            Update::MessageUpdate(_) => UpdateType::Message,
            Update::EditedMessageUpdate(_) => UpdateType::EditedMessage,
            Update::ChannelPostUpdate(_) => UpdateType::ChannelPost,
            Update::EditedChannelPostUpdate(_) => UpdateType::EditedChannelPost,
            Update::InlineQueryUpdate(_) => UpdateType::InlineQuery,
            Update::ChosenInlineResultUpdate(_) => UpdateType::ChosenInlineResult,
            Update::CallbackQueryUpdate(_) => UpdateType::CallbackQuery,
            Update::ShippingQueryUpdate(_) => UpdateType::ShippingQuery,
            Update::PreCheckoutQueryUpdate(_) => UpdateType::PreCheckoutQuery,
            Update::PollUpdate(_) => UpdateType::Poll,
            Update::PollAnswerUpdate(_) => UpdateType::PollAnswer,
            Update::MyChatMemberUpdate(_) => UpdateType::MyChatMember,
            Update::ChatMemberUpdate(_) => UpdateType::ChatMember,
            Update::ChatJoinRequestUpdate(_) => UpdateType::ChatJoinRequest,
            Update::Unsupported(_) => return None,
        };
        Some(update_type)
    }

    /// The message this update carries, if any. Callback queries yield the
    /// message the pressed button was attached to.
    pub fn effective_message(&self) -> Option<&Message> {
        match self {
            Update::MessageUpdate(message)
            | Update::EditedMessageUpdate(message)
            | Update::ChannelPostUpdate(message)
            | Update::EditedChannelPostUpdate(message) => Some(message),
            Update::CallbackQueryUpdate(query) => query.message.as_ref(),
            _ => None,
        }
    }

    pub fn effective_user(&self) -> Option<&User> {
        match self {
            Update::MessageUpdate(message)
            | Update::EditedMessageUpdate(message)
            | Update::ChannelPostUpdate(message)
            | Update::EditedChannelPostUpdate(message) => message.from.as_ref(),
            Update::InlineQueryUpdate(query) => Some(&query.from),
            Update::ChosenInlineResultUpdate(result) => Some(&result.from),
            Update::CallbackQueryUpdate(query) => Some(&query.from),
            Update::ShippingQueryUpdate(query) => Some(&query.from),
            Update::PreCheckoutQueryUpdate(query) => Some(&query.from),
            Update::PollAnswerUpdate(answer) => answer.user.as_ref(),
            Update::MyChatMemberUpdate(updated) | Update::ChatMemberUpdate(updated) => {
                Some(&updated.from)
            }
            Update::ChatJoinRequestUpdate(request) => Some(&request.from),
            Update::PollUpdate(_) | Update::Unsupported(_) => None,
        }
    }

    pub fn effective_chat(&self) -> Option<&Chat> {
        match self {
            Update::MyChatMemberUpdate(updated) | Update::ChatMemberUpdate(updated) => {
                Some(&updated.chat)
            }
            Update::ChatJoinRequestUpdate(request) => Some(&request.chat),
            _ => self.effective_message().map(|message| &message.chat),
        }
    }
}

impl<'de> Deserialize<'de> for CommonUpdate {
    fn deserialize<D>(deserializer: D) -> Result<CommonUpdate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::deserialize(deserializer)?;

        let id = map
            .remove("update_id")
            .ok_or_else(|| de::Error::missing_field("update_id"))
            .map(Deserialize::deserialize)?
            .map_err(de::Error::custom)?;

        let (key, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("update with no data"))?;

        let update =
            match key.as_str() {
                "message" => serde_json::from_value::<Message>(value).map(Update::MessageUpdate),
                "edited_message" => {
                    serde_json::from_value::<Message>(value).map(Update::EditedMessageUpdate)
                }
                "channel_post" => {
                    serde_json::from_value::<Message>(value).map(Update::ChannelPostUpdate)
                }
                "edited_channel_post" => {
                    serde_json::from_value::<Message>(value).map(Update::EditedChannelPostUpdate)
                }
                "inline_query" => {
                    serde_json::from_value::<InlineQuery>(value).map(Update::InlineQueryUpdate)
                }
                "chosen_inline_result" => serde_json::from_value::<ChosenInlineResult>(value)
                    .map(Update::ChosenInlineResultUpdate),
                "callback_query" => {
                    serde_json::from_value::<CallbackQuery>(value).map(Update::CallbackQueryUpdate)
                }
                "shipping_query" => {
                    serde_json::from_value::<ShippingQuery>(value).map(Update::ShippingQueryUpdate)
                }
                "pre_checkout_query" => serde_json::from_value::<PreCheckoutQuery>(value)
                    .map(Update::PreCheckoutQueryUpdate),
                "poll" => serde_json::from_value::<Poll>(value).map(Update::PollUpdate),
                "poll_answer" => {
                    serde_json::from_value::<PollAnswer>(value).map(Update::PollAnswerUpdate)
                }
                "my_chat_member" => serde_json::from_value::<ChatMemberUpdated>(value)
                    .map(Update::MyChatMemberUpdate),
                "chat_member" => {
                    serde_json::from_value::<ChatMemberUpdated>(value).map(Update::ChatMemberUpdate)
                }
                "chat_join_request" => serde_json::from_value::<ChatJoinRequest>(value)
                    .map(Update::ChatJoinRequestUpdate),
                _ => Ok(Update::Unsupported(key.as_str().into())),
            }
            .map_err(de::Error::custom)?;
        Ok(CommonUpdate { id, data: update })
    }
}

/// This object represents an incoming callback query from a callback button in an inline keyboard.
/// https://core.telegram.org/bots/api#callbackquery
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: CompactString,
    pub from: User,
    pub message: Option<Message>,
    pub inline_message_id: Option<CompactString>,
    pub chat_instance: Option<CompactString>,
    pub data: Option<CompactString>,
    pub game_short_name: Option<CompactString>,
}

/// This object represents an answer of a user in a non-anonymous poll.
/// https://core.telegram.org/bots/api#pollanswer
#[derive(Debug, Deserialize)]
pub struct PollAnswer {
    pub poll_id: CompactString,
    pub voter_chat: Option<Chat>,
    pub user: Option<User>,
    pub option_ids: Vec<u32>,
}

/// This object represents changes in the status of a [chat member](https://core.telegram.org/bots/api#chatmember).
/// https://core.telegram.org/bots/api#chatmemberupdated
#[derive(Debug, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub from: User,
    pub date: Date,
    pub old_chat_member: ChatMember,
    pub new_chat_member: ChatMember,
    pub invite_link: Option<ChatInviteLink>,
}

/// This object contains information about one member of a chat.
/// https://core.telegram.org/bots/api#chatmember
#[allow(clippy::enum_variant_names)]
#[derive(Debug, Deserialize)]
#[serde(tag = "status")]
pub enum ChatMember {
    #[serde(rename = "creator")]
    ChatMemberOwner(ChatMemberOwner),
    #[serde(rename = "administrator")]
    ChatMemberAdministrator(ChatMemberAdministrator),
    #[serde(rename = "member")]
    ChatMemberMember(ChatMemberMember),
    #[serde(rename = "restricted")]
    ChatMemberRestricted(ChatMemberRestricted),
    #[serde(rename = "left")]
    ChatMemberLeft(ChatMemberLeft),
    #[serde(rename = "kicked")]
    ChatMemberBanned(ChatMemberBanned),
}

impl ChatMember {
    pub fn user(&self) -> &User {
        match self {
            ChatMember::ChatMemberOwner(member) => &member.user,
            ChatMember::ChatMemberAdministrator(member) => &member.user,
            ChatMember::ChatMemberMember(member) => &member.user,
            ChatMember::ChatMemberRestricted(member) => &member.user,
            ChatMember::ChatMemberLeft(member) => &member.user,
            ChatMember::ChatMemberBanned(member) => &member.user,
        }
    }

    /// Whether the user is currently present in the chat.
    pub fn is_present(&self) -> bool {
        match self {
            ChatMember::ChatMemberOwner(_)
            | ChatMember::ChatMemberAdministrator(_)
            | ChatMember::ChatMemberMember(_) => true,
            ChatMember::ChatMemberRestricted(member) => member.is_member,
            ChatMember::ChatMemberLeft(_) | ChatMember::ChatMemberBanned(_) => false,
        }
    }
}

/// Represents a [chat member](https://core.telegram.org/bots/api#chatmember) that owns the chat and has all administrator privileges.
/// https://core.telegram.org/bots/api#chatmemberowner
#[derive(Debug, Deserialize)]
pub struct ChatMemberOwner {
    pub user: User,
    pub is_anonymous: bool,
    pub custom_title: Option<CompactString>,
}

/// Represents a [chat member](https://core.telegram.org/bots/api#chatmember) that has some additional privileges.
/// https://core.telegram.org/bots/api#chatmemberadministrator
#[derive(Debug, Deserialize)]
pub struct ChatMemberAdministrator {
    pub user: User,
    pub can_be_edited: bool,
    pub is_anonymous: bool,
    pub can_manage_chat: bool,
    pub can_delete_messages: bool,
    pub can_manage_video_chats: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    pub can_post_messages: Option<bool>,
    pub can_edit_messages: Option<bool>,
    pub can_pin_messages: Option<bool>,
    pub can_manage_topics: Option<bool>,
    pub custom_title: Option<CompactString>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMemberMember {
    pub user: User,
}

/// Represents a [chat member](https://core.telegram.org/bots/api#chatmember) that is under certain restrictions in the chat. Supergroups only.
/// https://core.telegram.org/bots/api#chatmemberrestricted
#[derive(Debug, Deserialize)]
pub struct ChatMemberRestricted {
    pub user: User,
    pub is_member: bool,
    pub can_send_messages: bool,
    pub can_send_audios: bool,
    pub can_send_documents: bool,
    pub can_send_photos: bool,
    pub can_send_videos: bool,
    pub can_send_video_notes: bool,
    pub can_send_voice_notes: bool,
    pub can_send_polls: bool,
    pub can_send_other_messages: bool,
    pub can_add_web_page_previews: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    pub can_pin_messages: bool,
    pub can_manage_topics: bool,
    pub until_date: Date,
}

#[derive(Debug, Deserialize)]
pub struct ChatMemberLeft {
    pub user: User,
}

/// Represents a [chat member](https://core.telegram.org/bots/api#chatmember) that was banned in the chat and can't return to the chat or view chat messages.
/// https://core.telegram.org/bots/api#chatmemberbanned
#[derive(Debug, Deserialize)]
pub struct ChatMemberBanned {
    pub user: User,
    pub until_date: Date,
}

/// Represents an invite link for a chat.
/// https://core.telegram.org/bots/api#chatinvitelink
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatInviteLink {
    pub invite_link: CompactString,
    pub creator: User,
    pub creates_join_request: bool,
    pub is_primary: bool,
    pub is_revoked: bool,
    pub name: Option<CompactString>,
    pub expire_date: Option<Date>,
    pub member_limit: Option<u32>,
    pub pending_join_request_count: Option<u64>,
}

/// Represents a join request sent to a chat.
/// https://core.telegram.org/bots/api#chatjoinrequest
#[derive(Debug, Deserialize)]
pub struct ChatJoinRequest {
    pub chat: Chat,
    pub from: User,
    pub user_chat_id: i64,
    pub date: Date,
    pub bio: Option<CompactString>,
    pub invite_link: Option<ChatInviteLink>,
}

/// Unique identifier for the target chat or username of the target channel (in the format `@channelusername`).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChatId {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    Int(ChatIntId),
    Str(CompactString),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<CompactString> for ChatId {
    fn from(id: CompactString) -> Self {
        Self::Str(id)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::Str(id.into())
    }
}

impl TryFrom<&ChatId> for ChatIntId {
    type Error = eyre::Report;

    fn try_from(value: &ChatId) -> Result<Self, Self::Error> {
        match value {
            ChatId::Int(id) => Ok(*id),
            ChatId::Str(id) => id
                .parse::<ChatIntId>()
                .map_err(|err| eyre!("chat id '{id}' is not numeric, {err}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
    Markdown,
    MarkdownV2,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    InlineKeyboardMarkup(InlineKeyboardMarkup),
    ReplyKeyboardMarkup(ReplyKeyboardMarkup),
    ReplyKeyboardRemove(ReplyKeyboardRemove),
    ForceReply(ForceReply),
}

/// This object represents a [custom keyboard](https://core.telegram.org/bots/features#keyboards)
/// with reply options.
/// https://core.telegram.org/bots/api#replykeyboardmarkup
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub is_persistent: Option<bool>,
    pub resize_keyboard: Option<bool>,
    pub one_time_keyboard: Option<bool>,
    pub input_field_placeholder: Option<CompactString>,
    pub selective: Option<bool>,
}

/// This object represents one button of the reply keyboard.
/// The optional fields `web_app`, `request_user`, `request_chat`, `request_contact`,
/// `request_location`, and `request_poll` are mutually exclusive.
/// https://core.telegram.org/bots/api#keyboardbutton
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeyboardButton {
    pub text: CompactString,
    pub request_user: Option<KeyboardButtonRequestUser>,
    pub request_chat: Option<KeyboardButtonRequestChat>,
    pub request_contact: Option<bool>,
    pub request_location: Option<bool>,
    pub request_poll: Option<KeyboardButtonPollType>,
    pub web_app: Option<WebAppInfo>,
}

/// https://core.telegram.org/bots/api#keyboardbuttonrequestuser
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct KeyboardButtonRequestUser {
    pub request_id: i32,
    pub user_is_bot: Option<bool>,
    pub user_is_premium: Option<bool>,
}

/// https://core.telegram.org/bots/api#keyboardbuttonrequestchat
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct KeyboardButtonRequestChat {
    pub request_id: i32,
    pub chat_is_channel: Option<bool>,
    pub chat_is_forum: Option<bool>,
    pub chat_has_username: Option<bool>,
    pub chat_is_created: Option<bool>,
    pub user_administrator_rights: Option<ChatAdministratorRights>,
    pub bot_administrator_rights: Option<ChatAdministratorRights>,
    pub bot_is_member: Option<bool>,
}

/// Represents the rights of an administrator in a chat.
/// https://core.telegram.org/bots/api#chatadministratorrights
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatAdministratorRights {
    pub is_anonymous: bool,
    pub can_manage_chat: bool,
    pub can_delete_messages: bool,
    pub can_manage_video_chats: bool,
    pub can_restrict_members: bool,
    pub can_promote_members: bool,
    pub can_change_info: bool,
    pub can_invite_users: bool,
    pub can_post_messages: Option<bool>,
    pub can_edit_messages: Option<bool>,
    pub can_pin_messages: Option<bool>,
    pub can_manage_topics: Option<bool>,
}

/// https://core.telegram.org/bots/api#keyboardbuttonpolltype
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct KeyboardButtonPollType {
    #[serde(default, rename = "type")]
    pub poll_type: Option<PollType>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PollType {
    Quiz,
    Regular,
}

/// Describes a [Web App](https://core.telegram.org/bots/webapps).
#[derive(Debug, Deserialize, Serialize)]
pub struct WebAppInfo {
    pub url: CompactString,
}

/// https://core.telegram.org/bots/api#replykeyboardremove
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
    pub selective: Option<bool>,
}

/// Upon receiving a message with this object,
/// Telegram clients will display a reply interface to the user
/// (act as if the user has selected the bot's message and tapped 'Reply').
/// https://core.telegram.org/bots/api#forcereply
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ForceReply {
    pub force_reply: bool,
    pub input_field_placeholder: Option<CompactString>,
    pub selective: Option<bool>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: CompactString,
    pub last_name: Option<CompactString>,
    pub username: Option<CompactString>,
    pub language_code: Option<CompactString>,
    pub is_premium: Option<bool>,
    pub added_to_attachment_menu: Option<bool>,
    pub can_join_groups: Option<bool>,
    pub can_read_all_group_messages: Option<bool>,
    pub supports_inline_queries: Option<bool>,
}

impl User {
    pub fn full_name(&self) -> CompactString {
        let mut name = self.first_name.clone();
        if let Some(s) = &self.last_name {
            name += &format!(" {s}");
        }
        name
    }

    /// `https://t.me/<username>` when the user has a username.
    pub fn link(&self) -> Option<CompactString> {
        self.username
            .as_ref()
            .map(|username| compact_str::format_compact!("https://t.me/{username}"))
    }
}

string_enum! {
    /// Type of chat, can be either “private”, “group”, “supergroup” or “channel”.
    /// Inline queries additionally use “sender” for a private chat with the inline query sender.
    pub enum ChatType {
        Sender => "sender",
        Private => "private",
        Group => "group",
        Supergroup => "supergroup",
        Channel => "channel",
    }
}

impl Default for ChatType {
    fn default() -> Self {
        ChatType::Private
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Chat {
    pub id: ChatIntId,
    #[serde(default, rename = "type")]
    pub chat_type: ChatType,
    pub title: Option<CompactString>,
    pub username: Option<CompactString>,
    pub first_name: Option<CompactString>,
    pub last_name: Option<CompactString>,
    pub is_forum: Option<bool>,
    pub photo: Option<ChatPhoto>,
    pub active_usernames: Option<Vec<CompactString>>,
    pub emoji_status_custom_emoji_id: Option<CompactString>,
    pub bio: Option<CompactString>,
    pub has_private_forwards: Option<bool>,
    pub has_restricted_voice_and_video_messages: Option<bool>,
    pub join_by_request: Option<bool>,
    pub description: Option<CompactString>,
    pub invite_link: Option<CompactString>,
    pub pinned_message: Option<Box<Message>>,
    pub permissions: Option<ChatPermissions>,
    pub slow_mode_delay: Option<i64>,
    pub message_auto_delete_time: Option<i64>,
    pub has_aggressive_anti_spam_enabled: Option<bool>,
    pub has_hidden_members: Option<bool>,
    pub has_protected_content: Option<bool>,
    pub sticker_set_name: Option<CompactString>,
    pub can_set_sticker_set: Option<bool>,
    pub linked_chat_id: Option<i64>,
    pub location: Option<ChatLocation>,
}

impl Chat {
    /// Title for groups and channels, full name for private chats.
    pub fn effective_name(&self) -> Option<CompactString> {
        if let Some(title) = &self.title {
            return Some(title.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(compact_str::format_compact!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// Represents a location to which a chat is connected.
/// https://core.telegram.org/bots/api#chatlocation
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatLocation {
    pub location: Location,
    pub address: CompactString,
}

/// Describes actions that a non-administrator user is allowed to take in a chat.
/// https://core.telegram.org/bots/api#chatpermissions
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatPermissions {
    pub can_send_messages: Option<bool>,
    pub can_send_audios: Option<bool>,
    pub can_send_documents: Option<bool>,
    pub can_send_photos: Option<bool>,
    pub can_send_videos: Option<bool>,
    pub can_send_video_notes: Option<bool>,
    pub can_send_voice_notes: Option<bool>,
    pub can_send_polls: Option<bool>,
    pub can_send_other_messages: Option<bool>,
    pub can_add_web_page_previews: Option<bool>,
    pub can_change_info: Option<bool>,
    pub can_invite_users: Option<bool>,
    pub can_pin_messages: Option<bool>,
    pub can_manage_topics: Option<bool>,
}

/// https://core.telegram.org/bots/api#chatphoto
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatPhoto {
    pub small_file_id: CompactString,
    pub small_file_unique_id: CompactString,
    pub big_file_id: CompactString,
    pub big_file_unique_id: CompactString,
}

/// This object represents one special entity in a text message. For example, hashtags, usernames, URLs, etc.
/// Offsets and lengths are measured in UTF-16 code units.
/// https://core.telegram.org/bots/api#messageentity
#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub entity_type: MessageEntityType,
    pub offset: usize,
    pub length: usize,
    pub url: Option<CompactString>,
    pub user: Option<User>,
    pub language: Option<CompactString>,
    pub custom_emoji_id: Option<CompactString>,
}

impl MessageEntity {
    /// Slice of `text` this entity covers, `None` when it is out of range.
    pub fn extract(&self, text: &str) -> Option<String> {
        let units = text.encode_utf16().collect::<Vec<_>>();
        let end = self.offset.checked_add(self.length)?;
        let slice = units.get(self.offset..end)?;
        String::from_utf16(slice).ok()
    }
}

string_enum! {
    /// Type of the entity.
    /// https://core.telegram.org/bots/api#messageentity
    pub enum MessageEntityType {
        Mention => "mention",
        Hashtag => "hashtag",
        Cashtag => "cashtag",
        BotCommand => "bot_command",
        Url => "url",
        Email => "email",
        PhoneNumber => "phone_number",
        Bold => "bold",
        Italic => "italic",
        Underline => "underline",
        Strikethrough => "strikethrough",
        Spoiler => "spoiler",
        Blockquote => "blockquote",
        Code => "code",
        Pre => "pre",
        TextLink => "text_link",
        TextMention => "text_mention",
        CustomEmoji => "custom_emoji",
    }
}

/// This object represents an animation file (GIF or H.264/MPEG-4 AVC video without sound).
/// https://core.telegram.org/bots/api#animation
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Animation {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub width: i32,
    pub height: i32,
    pub duration: i32,
    pub thumbnail: Option<PhotoSize>,
    pub file_name: Option<CompactString>,
    pub mime_type: Option<CompactString>,
    pub file_size: Option<i64>,
}

/// https://core.telegram.org/bots/api#audio
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Audio {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub duration: i32,
    pub performer: Option<CompactString>,
    pub title: Option<CompactString>,
    pub file_name: Option<CompactString>,
    pub mime_type: Option<CompactString>,
    pub file_size: Option<i64>,
    pub thumbnail: Option<PhotoSize>,
}

/// This object represents a general file (as opposed to photos, voice messages and audio files).
/// https://core.telegram.org/bots/api#document
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Document {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub thumbnail: Option<PhotoSize>,
    pub file_name: Option<CompactString>,
    pub mime_type: Option<CompactString>,
    pub file_size: Option<i64>,
}

/// This object represents one size of a photo
/// or a [file](https://core.telegram.org/bots/api#document) /
/// [sticker](https://core.telegram.org/bots/api#sticker) thumbnail.
/// https://core.telegram.org/bots/api#photosize
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PhotoSize {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub width: i32,
    pub height: i32,
    pub file_size: Option<i64>,
}

/// https://core.telegram.org/bots/api#sticker
#[derive(Debug, Default, Deserialize)]
pub struct Sticker {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    #[serde(rename = "type")]
    pub sticker_type: StickerType,
    pub width: i32,
    pub height: i32,
    pub is_animated: bool,
    pub is_video: bool,
    pub thumbnail: Option<PhotoSize>,
    pub emoji: Option<CompactString>,
    pub set_name: Option<CompactString>,
    pub premium_animation: Option<File>,
    pub mask_position: Option<MaskPosition>,
    pub custom_emoji_id: Option<CompactString>,
    pub needs_repainting: Option<bool>,
    pub file_size: Option<i64>,
}

/// This object describes the position on faces where a mask should be placed by default.
/// https://core.telegram.org/bots/api#maskposition
#[derive(Debug, Deserialize)]
pub struct MaskPosition {
    pub point: CompactString,
    pub x_shift: f32,
    pub y_shift: f32,
    pub scale: f32,
}

/// This object represents a file ready to be downloaded.
/// The file can be downloaded via the link `https://api.telegram.org/file/bot<token>/<file_path>`.
/// It is guaranteed that the link will be valid for at least 1 hour.
/// https://core.telegram.org/bots/api#file
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct File {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub file_size: Option<i64>,
    pub file_path: Option<CompactString>,
}

impl File {
    pub fn download_url(&self, base_url: &str, token: &str) -> Option<String> {
        self.file_path
            .as_ref()
            .map(|path| format!("{base_url}/file/bot{token}/{path}"))
    }
}

string_enum! {
    /// Type of the sticker, currently one of “regular”, “mask”, “custom_emoji”.
    /// The type of the sticker is independent from its format,
    /// which is determined by the fields `is_animated` and `is_video`.
    pub enum StickerType {
        Regular => "regular",
        Mask => "mask",
        CustomEmoji => "custom_emoji",
    }
}

impl Default for StickerType {
    fn default() -> Self {
        StickerType::Regular
    }
}

/// https://core.telegram.org/bots/api#video
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Video {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub width: i32,
    pub height: i32,
    pub duration: i32,
    pub thumbnail: Option<PhotoSize>,
    pub file_name: Option<CompactString>,
    pub mime_type: Option<CompactString>,
    pub file_size: Option<i64>,
}

/// https://core.telegram.org/bots/api#videonote
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VideoNote {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub length: i32,
    pub duration: i32,
    pub thumbnail: Option<PhotoSize>,
    pub file_size: Option<i64>,
}

/// https://core.telegram.org/bots/api#voice
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Voice {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub duration: i32,
    pub mime_type: Option<CompactString>,
    pub file_size: Option<i64>,
}

/// This object represents an animated emoji that displays a random value.
/// https://core.telegram.org/bots/api#dice
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Dice {
    pub emoji: CompactString,
    pub value: u8,
}

/// This object represents a game. Use BotFather to create and edit games, their short names will act as unique identifiers.
/// https://core.telegram.org/bots/api#game
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Game {
    pub title: CompactString,
    pub description: CompactString,
    pub photo: Vec<PhotoSize>,
    pub text: Option<CompactString>,
    pub text_entities: Option<Vec<MessageEntity>>,
    pub animation: Option<Animation>,
}

/// This object contains information about a poll.
/// https://core.telegram.org/bots/api#poll
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct Poll {
    pub id: CompactString,
    pub question: CompactString,
    pub options: Vec<PollOption>,
    pub total_voter_count: i32,
    pub is_closed: bool,
    pub is_anonymous: bool,
    #[serde(rename = "type")]
    pub poll_type: PollType,
    pub allows_multiple_answers: bool,
    pub correct_option_id: Option<i32>,
    pub explanation: Option<CompactString>,
    pub explanation_entities: Option<Vec<MessageEntity>>,
    pub open_period: Option<i32>,
    pub close_date: Option<Date>,
}

/// https://core.telegram.org/bots/api#polloption
#[derive(Debug, Deserialize, Serialize)]
pub struct PollOption {
    pub text: CompactString,
    pub voter_count: i32,
}

/// https://core.telegram.org/bots/api#venue
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Venue {
    pub location: Location,
    pub title: CompactString,
    pub address: CompactString,
    pub foursquare_id: Option<CompactString>,
    pub foursquare_type: Option<CompactString>,
    pub google_place_id: Option<CompactString>,
    pub google_place_type: Option<CompactString>,
}

/// This object represents a service message about a change in auto-delete timer settings.
/// https://core.telegram.org/bots/api#messageautodeletetimerchanged
#[derive(Debug, Deserialize, Serialize)]
pub struct MessageAutoDeleteTimerChanged {
    pub message_auto_delete_time: i32,
}

/// This object represents a point on the map.
/// https://core.telegram.org/bots/api#location
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Location {
    pub longitude: f32,
    pub latitude: f32,
    pub horizontal_accuracy: Option<f32>,
    pub live_period: Option<i32>,
    pub heading: Option<i16>,
    pub proximity_alert_radius: Option<i32>,
}

/// https://core.telegram.org/bots/api#usershared
#[derive(Debug, Deserialize, Serialize)]
pub struct UserShared {
    pub request_id: i32,
    pub user_id: UserId,
}

/// https://core.telegram.org/bots/api#chatshared
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatShared {
    pub request_id: i32,
    pub chat_id: i64,
}

/// This object represents a service message about a user allowing a bot to write messages.
/// https://core.telegram.org/bots/api#writeaccessallowed
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WriteAccessAllowed {
    pub web_app_name: Option<CompactString>,
}

/// Describes Telegram Passport data shared with the bot by the user.
/// https://core.telegram.org/bots/api#passportdata
#[derive(Debug, Deserialize, Serialize)]
pub struct PassportData {
    pub data: Vec<EncryptedPassportElement>,
    pub credentials: EncryptedCredentials,
}

/// Describes documents or other Telegram Passport elements shared with the bot by the user.
/// https://core.telegram.org/bots/api#encryptedpassportelement
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct EncryptedPassportElement {
    #[serde(rename = "type")]
    pub element_type: PassportElementType,
    pub data: Option<CompactString>,
    pub phone_number: Option<CompactString>,
    pub email: Option<CompactString>,
    pub files: Option<Vec<PassportFile>>,
    pub front_side: Option<PassportFile>,
    pub reverse_side: Option<PassportFile>,
    pub selfie: Option<PassportFile>,
    pub translation: Option<Vec<PassportFile>>,
    pub hash: CompactString,
}

/// This object represents a file uploaded to Telegram Passport.
/// https://core.telegram.org/bots/api#passportfile
#[derive(Debug, Deserialize, Serialize)]
pub struct PassportFile {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub file_size: i64,
    pub file_date: Date,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassportElementType {
    PersonalDetails,
    Passport,
    DriverLicense,
    IdentityCard,
    InternalPassport,
    Address,
    UtilityBill,
    BankStatement,
    RentalAgreement,
    PassportRegistration,
    TemporaryRegistration,
    PhoneNumber,
    Email,
}

/// https://core.telegram.org/bots/api#encryptedcredentials
#[derive(Debug, Deserialize, Serialize)]
pub struct EncryptedCredentials {
    pub data: CompactString,
    pub hash: CompactString,
    pub secret: CompactString,
}

/// This object represents the content of a service message,
/// sent whenever a user in the chat triggers a proximity alert set by another user.
/// https://core.telegram.org/bots/api#proximityalerttriggered
#[derive(Debug, Deserialize, Serialize)]
pub struct ProximityAlertTriggered {
    pub traveler: User,
    pub watcher: User,
    pub distance: i32,
}

/// https://core.telegram.org/bots/api#forumtopiccreated
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicCreated {
    pub name: CompactString,
    pub icon_color: i32,
    pub icon_custom_emoji_id: Option<CompactString>,
}

/// https://core.telegram.org/bots/api#forumtopicedited
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicEdited {
    pub name: Option<CompactString>,
    pub icon_custom_emoji_id: Option<CompactString>,
}

/// Currently holds no information.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ForumTopicClosed {}

/// Currently holds no information.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ForumTopicReopened {}

/// Currently holds no information.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralForumTopicHidden {}

/// Currently holds no information.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralForumTopicUnhidden {}

/// https://core.telegram.org/bots/api#videochatscheduled
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatScheduled {
    pub start_date: Date,
}

/// Currently holds no information.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VideoChatStarted {}

/// https://core.telegram.org/bots/api#videochatended
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatEnded {
    pub duration: i32,
}

/// https://core.telegram.org/bots/api#videochatparticipantsinvited
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatParticipantsInvited {
    pub users: Vec<User>,
}

/// Describes data sent from a [Web App](https://core.telegram.org/bots/webapps) to the bot.
/// https://core.telegram.org/bots/api#webappdata
#[derive(Debug, Deserialize, Serialize)]
pub struct WebAppData {
    pub data: CompactString,
    pub button_text: CompactString,
}

/// This object represents an [inline keyboard](https://core.telegram.org/bots/features#inline-keyboards)
/// that appears right next to the message it belongs to.
/// https://core.telegram.org/bots/api#inlinekeyboardmarkup
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// This object represents one button of an inline keyboard.
/// You **must** use exactly one of the optional fields.
/// https://core.telegram.org/bots/api#inlinekeyboardbutton
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InlineKeyboardButton {
    pub text: CompactString,
    pub url: Option<CompactString>,
    pub callback_data: Option<CompactString>,
    pub web_app: Option<WebAppInfo>,
    pub login_url: Option<LoginUrl>,
    pub switch_inline_query: Option<CompactString>,
    pub switch_inline_query_current_chat: Option<CompactString>,
    pub callback_game: Option<CallbackGame>,
    pub pay: Option<bool>,
}

impl InlineKeyboardButton {
    pub fn callback(text: &str, data: &str) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn url(text: &str, url: &str) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// https://core.telegram.org/bots/api#loginurl
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginUrl {
    pub url: CompactString,
    pub forward_text: Option<CompactString>,
    pub bot_username: Option<CompactString>,
    pub request_write_access: Option<bool>,
}

/// A placeholder, currently holds no information. Use BotFather to set up your game.
#[derive(Debug, Deserialize, Serialize)]
pub struct CallbackGame {}

/// This object represents a phone contact.
/// https://core.telegram.org/bots/api#contact
#[skip_serializing_none]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Contact {
    pub phone_number: CompactString,
    pub first_name: CompactString,
    pub last_name: Option<CompactString>,
    pub user_id: Option<UserId>,
    pub vcard: Option<CompactString>,
}

/// This object describes the origin of a message.
/// https://core.telegram.org/bots/api#messageorigin
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageOrigin {
    User {
        date: Date,
        sender_user: User,
    },
    HiddenUser {
        date: Date,
        sender_user_name: CompactString,
    },
    Chat {
        date: Date,
        sender_chat: Chat,
        author_signature: Option<CompactString>,
    },
    Channel {
        date: Date,
        chat: Chat,
        message_id: MessageId,
        author_signature: Option<CompactString>,
    },
}

impl MessageOrigin {
    pub fn date(&self) -> Date {
        match self {
            MessageOrigin::User { date, .. }
            | MessageOrigin::HiddenUser { date, .. }
            | MessageOrigin::Chat { date, .. }
            | MessageOrigin::Channel { date, .. } => *date,
        }
    }

    pub fn sender_user(&self) -> Option<&User> {
        match self {
            MessageOrigin::User { sender_user, .. } => Some(sender_user),
            _ => None,
        }
    }

    pub fn sender_chat(&self) -> Option<&Chat> {
        match self {
            MessageOrigin::Chat { sender_chat, .. } => Some(sender_chat),
            MessageOrigin::Channel { chat, .. } => Some(chat),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub message_thread_id: Option<MessageThreadId>,
    pub from: Option<User>,
    pub sender_chat: Option<Chat>,
    pub date: Date,
    pub chat: Chat,
    pub forward_origin: Option<MessageOrigin>,
    pub is_topic_message: Option<bool>,
    pub is_automatic_forward: Option<bool>,
    pub reply_to_message: Option<Box<Message>>,
    pub via_bot: Option<User>,
    pub edit_date: Option<Date>,
    pub has_protected_content: Option<bool>,
    pub media_group_id: Option<CompactString>,
    pub author_signature: Option<CompactString>,
    pub text: Option<CompactString>,
    pub entities: Option<Vec<MessageEntity>>,
    pub animation: Option<Animation>,
    pub audio: Option<Audio>,
    pub document: Option<Document>,
    pub photo: Option<Vec<PhotoSize>>,
    pub sticker: Option<Sticker>,
    pub video: Option<Video>,
    pub video_note: Option<VideoNote>,
    pub voice: Option<Voice>,
    pub caption: Option<CompactString>,
    pub caption_entities: Option<Vec<MessageEntity>>,
    pub has_media_spoiler: Option<bool>,
    pub contact: Option<Contact>,
    pub dice: Option<Dice>,
    pub game: Option<Game>,
    pub poll: Option<Poll>,
    pub venue: Option<Venue>,
    pub location: Option<Location>,
    pub new_chat_members: Option<Vec<User>>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: Option<CompactString>,
    pub new_chat_photo: Option<Vec<PhotoSize>>,
    pub delete_chat_photo: Option<bool>,
    pub group_chat_created: Option<bool>,
    pub supergroup_chat_created: Option<bool>,
    pub channel_chat_created: Option<bool>,
    pub message_auto_delete_timer_changed: Option<MessageAutoDeleteTimerChanged>,
    pub migrate_to_chat_id: Option<i64>,
    pub migrate_from_chat_id: Option<i64>,
    pub pinned_message: Option<Box<Message>>,
    pub invoice: Option<Invoice>,
    pub successful_payment: Option<SuccessfulPayment>,
    pub user_shared: Option<UserShared>,
    pub chat_shared: Option<ChatShared>,
    pub connected_website: Option<CompactString>,
    pub write_access_allowed: Option<WriteAccessAllowed>,
    pub passport_data: Option<PassportData>,
    pub proximity_alert_triggered: Option<ProximityAlertTriggered>,
    pub forum_topic_created: Option<ForumTopicCreated>,
    pub forum_topic_edited: Option<ForumTopicEdited>,
    pub forum_topic_closed: Option<ForumTopicClosed>,
    pub forum_topic_reopened: Option<ForumTopicReopened>,
    pub general_forum_topic_hidden: Option<GeneralForumTopicHidden>,
    pub general_forum_topic_unhidden: Option<GeneralForumTopicUnhidden>,
    pub video_chat_scheduled: Option<VideoChatScheduled>,
    pub video_chat_started: Option<VideoChatStarted>,
    pub video_chat_ended: Option<VideoChatEnded>,
    pub video_chat_participants_invited: Option<VideoChatParticipantsInvited>,
    pub web_app_data: Option<WebAppData>,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Message {
    /// First entity of the given type in the message text.
    pub fn entity(&self, entity_type: &MessageEntityType) -> Option<&MessageEntity> {
        self.entities
            .as_ref()?
            .iter()
            .find(|entity| &entity.entity_type == entity_type)
    }

    /// Text the entity covers, taken from the text or, failing that, the caption.
    pub fn parse_entity(&self, entity: &MessageEntity) -> Option<String> {
        let source = self.text.as_ref().or(self.caption.as_ref())?;
        entity.extract(source)
    }

    /// All text entities of the given types together with the text they cover.
    pub fn parse_entities(&self, types: &[MessageEntityType]) -> Vec<(&MessageEntity, String)> {
        let (Some(text), Some(entities)) = (self.text.as_ref(), self.entities.as_ref()) else {
            return vec![];
        };
        entities
            .iter()
            .filter(|entity| types.is_empty() || types.contains(&entity.entity_type))
            .filter_map(|entity| entity.extract(text).map(|part| (entity, part)))
            .collect()
    }

    pub fn is_forwarded(&self) -> bool {
        self.forward_origin.is_some()
    }

    /// The bot command entity the text starts with.
    pub fn command_entity(&self) -> Option<&MessageEntity> {
        self.entities
            .as_ref()?
            .first()
            .filter(|entity| entity.entity_type == MessageEntityType::BotCommand && entity.offset == 0)
    }

    pub fn is_command(&self) -> bool {
        self.command_entity().is_some()
    }

    pub fn date_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        crate::basic_types::date_time(self.date)
    }

    /// Link to the message, only available for supergroups and channels.
    pub fn link(&self) -> Option<CompactString> {
        if !matches!(self.chat.chat_type, ChatType::Supergroup | ChatType::Channel) {
            return None;
        }
        let link = match &self.chat.username {
            Some(username) => {
                compact_str::format_compact!("https://t.me/{username}/{}", self.message_id)
            }
            None => {
                // private supergroup ids look like -100<id>
                let id = self.chat.id.to_string();
                let id = id.strip_prefix("-100").unwrap_or(id.as_str());
                compact_str::format_compact!("https://t.me/c/{id}/{}", self.message_id)
            }
        };
        Some(link)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordVoice,
    UploadVoice,
    UploadDocument,
    ChooseSticker,
    FindLocation,
    RecordVideoNote,
    UploadVideoNote,
}

/// This object represents a bot command.
/// https://core.telegram.org/bots/api#botcommand
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BotCommand {
    pub command: CompactString,
    pub description: CompactString,
}

/// This object represents the scope to which bot commands are applied.
/// https://core.telegram.org/bots/api#botcommandscope
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum BotCommandScope {
    Default,
    AllPrivateChats,
    AllGroupChats,
    AllChatAdministrators,
    Chat {
        chat_id: ChatId,
    },
    ChatAdministrators {
        chat_id: ChatId,
    },
    ChatMember {
        chat_id: ChatId,
        #[serde(deserialize_with = "deserialize_number_from_string")]
        user_id: UserId,
    },
}

impl Default for BotCommandScope {
    fn default() -> Self {
        BotCommandScope::Default
    }
}

/// Describes the current status of a webhook.
/// https://core.telegram.org/bots/api#webhookinfo
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookInfo {
    pub url: CompactString,
    pub has_custom_certificate: bool,
    pub pending_update_count: u32,
    pub ip_address: Option<CompactString>,
    pub last_error_date: Option<Date>,
    pub last_error_message: Option<CompactString>,
    pub last_synchronization_error_date: Option<Date>,
    pub max_connections: Option<u32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
}
