use http::Method;

use crate::{
    proto::{BotCommand, Chat, ChatMember, CommonUpdate, File, Message, User, WebhookInfo},
    request::{
        AnswerCallbackQueryRequest, AnswerInlineQueryRequest, AnswerPreCheckoutQueryRequest,
        AnswerShippingQueryRequest, CopyMessageRequest, DeleteMessageRequest,
        DeleteMyCommandsRequest, DeleteWebhookRequest, EditMessageTextRequest, EmptyRequest,
        ForwardMessageRequest, GetChatMemberRequest, GetChatRequest, GetFileRequest,
        GetMyCommandsRequest, GetUpdatesRequest, SendAnimationRequest, SendChatActionRequest,
        SendDiceRequest, SendDocumentRequest, SendInvoiceRequest, SendLocationRequest,
        SendMessageRequest, SendPhotoRequest, SendPollRequest, SetMyCommandsRequest,
        SetWebhookRequest,
    },
    response::{EditedMessage, MessageIdResponse},
};

pub trait Endpoint {
    type Request;
    type Response;

    const METHOD: Method;
    const PATH: &'static str;
}

macro_rules! endpoint {
    ($(#[$meta:meta])* $name:ident, $method:ident, $path:literal, $request:ty => $response:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl Endpoint for $name {
            type Request = $request;
            type Response = $response;

            const METHOD: Method = Method::$method;
            const PATH: &'static str = $path;
        }
    };
}

endpoint!(GetMe, GET, "getMe", EmptyRequest => User);
endpoint!(GetUpdates, GET, "getUpdates", GetUpdatesRequest => Vec<CommonUpdate>);
endpoint!(SetWebhook, POST, "setWebhook", SetWebhookRequest => bool);
endpoint!(DeleteWebhook, POST, "deleteWebhook", DeleteWebhookRequest => bool);
endpoint!(GetWebhookInfo, GET, "getWebhookInfo", EmptyRequest => WebhookInfo);

endpoint!(SendMessage, POST, "sendMessage", SendMessageRequest => Message);
endpoint!(ForwardMessage, POST, "forwardMessage", ForwardMessageRequest => Message);
endpoint!(CopyMessage, POST, "copyMessage", CopyMessageRequest => MessageIdResponse);
endpoint!(SendPhoto, POST, "sendPhoto", SendPhotoRequest => Message);
endpoint!(SendDocument, POST, "sendDocument", SendDocumentRequest => Message);
endpoint!(SendAnimation, POST, "sendAnimation", SendAnimationRequest => Message);
endpoint!(SendChatAction, POST, "sendChatAction", SendChatActionRequest => bool);
endpoint!(SendDice, POST, "sendDice", SendDiceRequest => Message);
endpoint!(SendLocation, POST, "sendLocation", SendLocationRequest => Message);
endpoint!(SendPoll, POST, "sendPoll", SendPollRequest => Message);
endpoint!(SendInvoice, POST, "sendInvoice", SendInvoiceRequest => Message);
endpoint!(
    /// Returns the edited message, or `true` for inline messages.
    EditMessageText, POST, "editMessageText", EditMessageTextRequest => EditedMessage
);
endpoint!(DeleteMessage, POST, "deleteMessage", DeleteMessageRequest => bool);

endpoint!(AnswerCallbackQuery, POST, "answerCallbackQuery", AnswerCallbackQueryRequest => bool);
endpoint!(AnswerInlineQuery, POST, "answerInlineQuery", AnswerInlineQueryRequest => bool);
endpoint!(AnswerShippingQuery, POST, "answerShippingQuery", AnswerShippingQueryRequest => bool);
endpoint!(
    AnswerPreCheckoutQuery, POST, "answerPreCheckoutQuery", AnswerPreCheckoutQueryRequest => bool
);

endpoint!(GetChat, GET, "getChat", GetChatRequest => Chat);
endpoint!(GetChatMember, GET, "getChatMember", GetChatMemberRequest => ChatMember);
endpoint!(GetFile, GET, "getFile", GetFileRequest => File);

endpoint!(SetMyCommands, POST, "setMyCommands", SetMyCommandsRequest => bool);
endpoint!(GetMyCommands, GET, "getMyCommands", GetMyCommandsRequest => Vec<BotCommand>);
endpoint!(DeleteMyCommands, POST, "deleteMyCommands", DeleteMyCommandsRequest => bool);
