use crate::connector::{method_url, send_multipart, send_request, BASE_URL};
use api::{
    basic_types::{MessageId, MessageThreadId, UserId},
    endpoints::{
        AnswerCallbackQuery, AnswerInlineQuery, AnswerPreCheckoutQuery, AnswerShippingQuery,
        CopyMessage, DeleteMessage, DeleteMyCommands, EditMessageText, Endpoint, ForwardMessage,
        GetChat, GetChatMember, GetFile, GetMe, GetMyCommands, SendAnimation, SendChatAction,
        SendDice, SendDocument, SendInvoice, SendLocation, SendMessage, SendPhoto, SendPoll,
        SetMyCommands,
    },
    files::GetFiles,
    inline::InlineQueryResult,
    payments::ShippingOption,
    proto::{
        BotCommand, BotCommandScope, Chat, ChatAction, ChatId, ChatMember, File, InputFile,
        Message, MessageEntity, ParseMode, ReplyMarkup, User,
    },
    request::{
        AnswerCallbackQueryRequest, AnswerInlineQueryRequest, AnswerPreCheckoutQueryRequest,
        AnswerShippingQueryRequest, CopyMessageRequest, DeleteMessageRequest,
        DeleteMyCommandsRequest, EditMessageTextRequest, EmptyRequest, ForwardMessageRequest,
        GetChatMemberRequest, GetChatRequest, GetFileRequest, GetMyCommandsRequest,
        SendAnimationRequest, SendChatActionRequest, SendDiceRequest, SendDocumentRequest,
        SendInvoiceRequest, SendLocationRequest, SendMessageRequest, SendPhotoRequest,
        SendPollRequest, SetMyCommandsRequest,
    },
    response::{CommonResponse, EditedMessage, MessageIdResponse},
};
use async_trait::async_trait;
use compact_str::{CompactString, ToCompactString};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Thin wrappers over the Bot API methods handlers use most.
#[async_trait]
pub trait Communicate: Send + Sync {
    async fn get_me(&self) -> eyre::Result<CommonResponse<User>>;

    async fn send_message(
        &self,
        text: &str,
        chat_id: ChatId,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn reply_message(
        &self,
        text: &str,
        chat_id: ChatId,
        reply_to_message_id: MessageId,
        parse_mode: Option<ParseMode>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_message_with_markup(
        &self,
        text: &str,
        chat_id: ChatId,
        reply_markup: ReplyMarkup,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_photo(
        &self,
        photo: InputFile,
        chat_id: ChatId,
        caption: Option<&str>,
        reply_to_message_id: Option<MessageId>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_animation(
        &self,
        animation: InputFile,
        chat_id: ChatId,
        reply_to_message_id: Option<MessageId>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_document(
        &self,
        document: InputFile,
        chat_id: ChatId,
        caption: Option<&str>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn forward_message(
        &self,
        to_chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: MessageId,
        disable_notification: Option<bool>,
        protect_content: Option<bool>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn copy_message(
        &self,
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: MessageId,
        caption: Option<CompactString>,
        caption_entities: Option<Vec<MessageEntity>>,
    ) -> eyre::Result<CommonResponse<MessageIdResponse>>;

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        message_thread_id: Option<MessageThreadId>,
        action: ChatAction,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn send_dice(
        &self,
        chat_id: ChatId,
        emoji: Option<&str>,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_location(
        &self,
        chat_id: ChatId,
        latitude: f32,
        longitude: f32,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn send_poll(&self, request: SendPollRequest) -> eyre::Result<CommonResponse<Message>>;

    async fn send_invoice(
        &self,
        request: SendInvoiceRequest,
    ) -> eyre::Result<CommonResponse<Message>>;

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> eyre::Result<CommonResponse<EditedMessage>>;

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: Vec<InlineQueryResult>,
        cache_time: Option<i32>,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn answer_shipping_query(
        &self,
        shipping_query_id: &str,
        result: Result<Vec<ShippingOption>, CompactString>,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn answer_pre_checkout_query(
        &self,
        pre_checkout_query_id: &str,
        error_message: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn get_chat(&self, chat_id: ChatId) -> eyre::Result<CommonResponse<Chat>>;

    async fn get_chat_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> eyre::Result<CommonResponse<ChatMember>>;

    async fn get_file(&self, file_id: &str) -> eyre::Result<CommonResponse<File>>;

    async fn set_my_commands(
        &self,
        commands: Vec<BotCommand>,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn get_my_commands(
        &self,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<Vec<BotCommand>>>;

    async fn delete_my_commands(
        &self,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>>;
}

#[derive(Clone)]
pub struct Communicator {
    client: reqwest::Client,
    base_url: Arc<CompactString>,
    token: Arc<CompactString>,
}

impl Communicator {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    /// Talks to a Bot API server other than the official one, e.g. a local one.
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url.trim_end_matches('/').into()),
            token: Arc::new(token.into()),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Sends any endpoint with a JSON body.
    pub async fn request<E>(&self, data: &E::Request) -> eyre::Result<CommonResponse<E::Response>>
    where
        E: Endpoint,
        E::Request: Serialize + Sync,
        E::Response: DeserializeOwned,
    {
        let url = method_url::<E>(&self.base_url, &self.token);
        send_request::<E>(&self.client, &url, data).await
    }

    /// Sends an endpoint that may carry files, as multipart only when something
    /// has to be uploaded.
    pub async fn upload<E>(&self, data: &E::Request) -> eyre::Result<CommonResponse<E::Response>>
    where
        E: Endpoint,
        E::Request: Serialize + GetFiles + Sync,
        E::Response: DeserializeOwned,
    {
        let url = method_url::<E>(&self.base_url, &self.token);
        if data.any_need_upload() {
            send_multipart::<E>(&self.client, &url, data).await
        } else {
            send_request::<E>(&self.client, &url, data).await
        }
    }

    /// Download link of a file returned by `getFile`.
    pub fn file_url(&self, file: &File) -> Option<String> {
        file.download_url(&self.base_url, &self.token)
    }
}

#[async_trait]
impl Communicate for Communicator {
    async fn get_me(&self) -> eyre::Result<CommonResponse<User>> {
        self.request::<GetMe>(&EmptyRequest {}).await
    }

    async fn send_message(
        &self,
        text: &str,
        chat_id: ChatId,
    ) -> eyre::Result<CommonResponse<Message>> {
        self.request::<SendMessage>(&SendMessageRequest::new(chat_id, text))
            .await
    }

    async fn reply_message(
        &self,
        text: &str,
        chat_id: ChatId,
        reply_to_message_id: MessageId,
        parse_mode: Option<ParseMode>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendMessageRequest {
            parse_mode,
            reply_to_message_id: Some(reply_to_message_id),
            ..SendMessageRequest::new(chat_id, text)
        };
        self.request::<SendMessage>(&request).await
    }

    async fn send_message_with_markup(
        &self,
        text: &str,
        chat_id: ChatId,
        reply_markup: ReplyMarkup,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendMessageRequest {
            reply_markup: Some(reply_markup),
            ..SendMessageRequest::new(chat_id, text)
        };
        self.request::<SendMessage>(&request).await
    }

    async fn send_photo(
        &self,
        photo: InputFile,
        chat_id: ChatId,
        caption: Option<&str>,
        reply_to_message_id: Option<MessageId>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendPhotoRequest {
            chat_id,
            photo,
            caption: caption.map(CompactString::from),
            reply_to_message_id,
            ..Default::default()
        };
        self.upload::<SendPhoto>(&request).await
    }

    async fn send_animation(
        &self,
        animation: InputFile,
        chat_id: ChatId,
        reply_to_message_id: Option<MessageId>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendAnimationRequest {
            chat_id,
            animation,
            reply_to_message_id,
            ..Default::default()
        };
        self.upload::<SendAnimation>(&request).await
    }

    async fn send_document(
        &self,
        document: InputFile,
        chat_id: ChatId,
        caption: Option<&str>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendDocumentRequest {
            chat_id,
            document,
            caption: caption.map(CompactString::from),
            ..Default::default()
        };
        self.upload::<SendDocument>(&request).await
    }

    async fn forward_message(
        &self,
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: MessageId,
        disable_notification: Option<bool>,
        protect_content: Option<bool>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = ForwardMessageRequest {
            chat_id,
            message_thread_id: None,
            from_chat_id,
            disable_notification,
            protect_content,
            message_id,
        };
        self.request::<ForwardMessage>(&request).await
    }

    async fn copy_message(
        &self,
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: MessageId,
        caption: Option<CompactString>,
        caption_entities: Option<Vec<MessageEntity>>,
    ) -> eyre::Result<CommonResponse<MessageIdResponse>> {
        let request = CopyMessageRequest {
            chat_id,
            message_thread_id: None,
            from_chat_id,
            message_id,
            caption,
            parse_mode: None,
            caption_entities,
            disable_notification: None,
            protect_content: None,
            reply_to_message_id: None,
            allow_sending_without_reply: None,
            reply_markup: None,
        };
        self.request::<CopyMessage>(&request).await
    }

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        message_thread_id: Option<MessageThreadId>,
        action: ChatAction,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = SendChatActionRequest {
            chat_id,
            message_thread_id,
            action,
        };
        self.request::<SendChatAction>(&request).await
    }

    async fn send_dice(
        &self,
        chat_id: ChatId,
        emoji: Option<&str>,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendDiceRequest {
            chat_id,
            message_thread_id: None,
            emoji: emoji.map(CompactString::from),
            disable_notification: None,
            protect_content: None,
            reply_to_message_id: None,
            allow_sending_without_reply: None,
            reply_markup: None,
        };
        self.request::<SendDice>(&request).await
    }

    async fn send_location(
        &self,
        chat_id: ChatId,
        latitude: f32,
        longitude: f32,
    ) -> eyre::Result<CommonResponse<Message>> {
        let request = SendLocationRequest {
            chat_id,
            message_thread_id: None,
            latitude,
            longitude,
            horizontal_accuracy: None,
            live_period: None,
            heading: None,
            proximity_alert_radius: None,
            disable_notification: None,
            protect_content: None,
            reply_to_message_id: None,
            allow_sending_without_reply: None,
            reply_markup: None,
        };
        self.request::<SendLocation>(&request).await
    }

    async fn send_poll(&self, request: SendPollRequest) -> eyre::Result<CommonResponse<Message>> {
        self.request::<SendPoll>(&request).await
    }

    async fn send_invoice(
        &self,
        request: SendInvoiceRequest,
    ) -> eyre::Result<CommonResponse<Message>> {
        self.request::<SendInvoice>(&request).await
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> eyre::Result<CommonResponse<EditedMessage>> {
        let request = EditMessageTextRequest {
            chat_id: Some(chat_id),
            message_id: Some(message_id),
            text: text.to_compact_string(),
            parse_mode,
            ..Default::default()
        };
        self.request::<EditMessageText>(&request).await
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = DeleteMessageRequest {
            chat_id,
            message_id,
        };
        self.request::<DeleteMessage>(&request).await
    }

    async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: callback_query_id.into(),
            text: text.map(CompactString::from),
            show_alert: Some(show_alert),
            ..Default::default()
        };
        self.request::<AnswerCallbackQuery>(&request).await
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        results: Vec<InlineQueryResult>,
        cache_time: Option<i32>,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = AnswerInlineQueryRequest {
            inline_query_id: inline_query_id.into(),
            results,
            cache_time,
            ..Default::default()
        };
        self.request::<AnswerInlineQuery>(&request).await
    }

    /// `Ok` carries the shipping options, `Err` the message explaining why
    /// the order cannot be delivered.
    async fn answer_shipping_query(
        &self,
        shipping_query_id: &str,
        result: Result<Vec<ShippingOption>, CompactString>,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = match result {
            Ok(options) => AnswerShippingQueryRequest {
                shipping_query_id: shipping_query_id.into(),
                ok: true,
                shipping_options: Some(options),
                error_message: None,
            },
            Err(error_message) => AnswerShippingQueryRequest {
                shipping_query_id: shipping_query_id.into(),
                ok: false,
                shipping_options: None,
                error_message: Some(error_message),
            },
        };
        self.request::<AnswerShippingQuery>(&request).await
    }

    async fn answer_pre_checkout_query(
        &self,
        pre_checkout_query_id: &str,
        error_message: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = AnswerPreCheckoutQueryRequest {
            pre_checkout_query_id: pre_checkout_query_id.into(),
            ok: error_message.is_none(),
            error_message: error_message.map(CompactString::from),
        };
        self.request::<AnswerPreCheckoutQuery>(&request).await
    }

    async fn get_chat(&self, chat_id: ChatId) -> eyre::Result<CommonResponse<Chat>> {
        self.request::<GetChat>(&GetChatRequest { chat_id }).await
    }

    async fn get_chat_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> eyre::Result<CommonResponse<ChatMember>> {
        self.request::<GetChatMember>(&GetChatMemberRequest { chat_id, user_id })
            .await
    }

    async fn get_file(&self, file_id: &str) -> eyre::Result<CommonResponse<File>> {
        let request = GetFileRequest {
            file_id: file_id.into(),
        };
        self.request::<GetFile>(&request).await
    }

    async fn set_my_commands(
        &self,
        commands: Vec<BotCommand>,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = SetMyCommandsRequest {
            commands,
            scope,
            language_code: language_code.map(CompactString::from),
        };
        self.request::<SetMyCommands>(&request).await
    }

    async fn get_my_commands(
        &self,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<Vec<BotCommand>>> {
        let request = GetMyCommandsRequest {
            scope,
            language_code: language_code.map(CompactString::from),
        };
        self.request::<GetMyCommands>(&request).await
    }

    async fn delete_my_commands(
        &self,
        scope: Option<BotCommandScope>,
        language_code: Option<&str>,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = DeleteMyCommandsRequest {
            scope,
            language_code: language_code.map(CompactString::from),
        };
        self.request::<DeleteMyCommands>(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::test_server;
    use assert2::{check, let_assert};
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Answers every call of `method` with `result`, keeping the request bodies.
    fn mock(method: &str, result: Value) -> (Communicator, Seen) {
        let seen = Seen::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            &format!("/bottoken/{method}"),
            post(move |Json(body): Json<Value>| {
                let result = result.clone();
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(body);
                    Json(json!({"ok": true, "result": result}))
                }
            }),
        );
        let base_url = test_server::spawn(app);
        (Communicator::with_base_url("token", &base_url), seen)
    }

    #[tokio::test]
    async fn reply_sets_reply_fields() {
        let (comm, seen) = mock(
            "sendMessage",
            json!({"message_id": 2, "date": 0, "chat": {"id": 5, "type": "private"}}),
        );
        let response = comm
            .reply_message("hi", ChatId::Int(5), 1, Some(ParseMode::Html))
            .await
            .unwrap();
        let_assert!(Ok(message) = response.into_result());
        check!(message.message_id == 2);
        insta::assert_json_snapshot!(seen.lock().unwrap()[0], @r###"
        {
          "chat_id": 5,
          "parse_mode": "HTML",
          "reply_to_message_id": 1,
          "text": "hi"
        }
        "###);
    }

    #[tokio::test]
    async fn shipping_answer_shapes() {
        let (comm, seen) = mock("answerShippingQuery", json!(true));
        comm.answer_shipping_query("q1", Err("no delivery to the moon".into()))
            .await
            .unwrap();
        insta::assert_json_snapshot!(seen.lock().unwrap()[0], @r###"
        {
          "error_message": "no delivery to the moon",
          "ok": false,
          "shipping_query_id": "q1"
        }
        "###);
    }

    #[tokio::test]
    async fn photo_by_url_stays_json() {
        let (comm, seen) = mock(
            "sendPhoto",
            json!({"message_id": 3, "date": 0, "chat": {"id": 5, "type": "private"}}),
        );
        comm.send_photo(
            InputFile::FileURL("https://example.org/cat.png".into()),
            ChatId::Str("@cats".into()),
            Some("cat"),
            None,
        )
        .await
        .unwrap();
        insta::assert_json_snapshot!(seen.lock().unwrap()[0], @r###"
        {
          "caption": "cat",
          "chat_id": "@cats",
          "photo": "https://example.org/cat.png"
        }
        "###);
    }

    #[test]
    fn file_url() {
        let comm = Communicator::with_base_url("token", "http://localhost:8081/");
        let file = File {
            file_id: "id".into(),
            file_unique_id: "unique".into(),
            file_size: None,
            file_path: Some("photos/file_1.jpg".into()),
        };
        check!(
            comm.file_url(&file).as_deref()
                == Some("http://localhost:8081/file/bottoken/photos/file_1.jpg")
        );
    }
}
