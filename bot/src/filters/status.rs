//! Service messages: members joining, titles changing, chats migrating and so on.

use api::proto::Message;

use crate::filters::{message::has, Filter};

pub fn new_chat_members() -> Filter {
    has("StatusUpdate.NewChatMembers", |m| {
        m.new_chat_members.as_ref().is_some_and(|members| !members.is_empty())
    })
}

pub fn left_chat_member() -> Filter {
    has("StatusUpdate.LeftChatMember", |m| m.left_chat_member.is_some())
}

pub fn new_chat_title() -> Filter {
    has("StatusUpdate.NewChatTitle", |m| m.new_chat_title.is_some())
}

pub fn new_chat_photo() -> Filter {
    has("StatusUpdate.NewChatPhoto", |m| {
        m.new_chat_photo.as_ref().is_some_and(|photo| !photo.is_empty())
    })
}

pub fn delete_chat_photo() -> Filter {
    has("StatusUpdate.DeleteChatPhoto", |m| m.delete_chat_photo.unwrap_or(false))
}

/// Group, supergroup or channel created.
pub fn chat_created() -> Filter {
    has("StatusUpdate.ChatCreated", |m| {
        m.group_chat_created.unwrap_or(false)
            || m.supergroup_chat_created.unwrap_or(false)
            || m.channel_chat_created.unwrap_or(false)
    })
}

pub fn message_auto_delete_timer_changed() -> Filter {
    has("StatusUpdate.MessageAutoDeleteTimerChanged", |m| {
        m.message_auto_delete_timer_changed.is_some()
    })
}

/// Either side of a group to supergroup migration.
pub fn migrate() -> Filter {
    has("StatusUpdate.Migrate", |m| {
        m.migrate_to_chat_id.is_some() || m.migrate_from_chat_id.is_some()
    })
}

pub fn pinned_message() -> Filter {
    has("StatusUpdate.PinnedMessage", |m| m.pinned_message.is_some())
}

pub fn connected_website() -> Filter {
    has("StatusUpdate.ConnectedWebsite", |m| m.connected_website.is_some())
}

pub fn proximity_alert_triggered() -> Filter {
    has("StatusUpdate.ProximityAlertTriggered", |m| {
        m.proximity_alert_triggered.is_some()
    })
}

pub fn forum_topic_created() -> Filter {
    has("StatusUpdate.ForumTopicCreated", |m| m.forum_topic_created.is_some())
}

pub fn forum_topic_edited() -> Filter {
    has("StatusUpdate.ForumTopicEdited", |m| m.forum_topic_edited.is_some())
}

pub fn forum_topic_closed() -> Filter {
    has("StatusUpdate.ForumTopicClosed", |m| m.forum_topic_closed.is_some())
}

pub fn forum_topic_reopened() -> Filter {
    has("StatusUpdate.ForumTopicReopened", |m| m.forum_topic_reopened.is_some())
}

pub fn general_forum_topic_hidden() -> Filter {
    has("StatusUpdate.GeneralForumTopicHidden", |m| {
        m.general_forum_topic_hidden.is_some()
    })
}

pub fn general_forum_topic_unhidden() -> Filter {
    has("StatusUpdate.GeneralForumTopicUnhidden", |m| {
        m.general_forum_topic_unhidden.is_some()
    })
}

pub fn video_chat_scheduled() -> Filter {
    has("StatusUpdate.VideoChatScheduled", |m| m.video_chat_scheduled.is_some())
}

pub fn video_chat_started() -> Filter {
    has("StatusUpdate.VideoChatStarted", |m| m.video_chat_started.is_some())
}

pub fn video_chat_ended() -> Filter {
    has("StatusUpdate.VideoChatEnded", |m| m.video_chat_ended.is_some())
}

pub fn video_chat_participants_invited() -> Filter {
    has("StatusUpdate.VideoChatParticipantsInvited", |m| {
        m.video_chat_participants_invited.is_some()
    })
}

pub fn web_app_data() -> Filter {
    has("StatusUpdate.WebAppData", |m| m.web_app_data.is_some())
}

pub fn user_shared() -> Filter {
    has("StatusUpdate.UserShared", |m| m.user_shared.is_some())
}

pub fn chat_shared() -> Filter {
    has("StatusUpdate.ChatShared", |m| m.chat_shared.is_some())
}

pub fn write_access_allowed() -> Filter {
    has("StatusUpdate.WriteAccessAllowed", |m| m.write_access_allowed.is_some())
}

fn is_status_update(m: &Message) -> bool {
    m.new_chat_members.as_ref().is_some_and(|members| !members.is_empty())
        || m.left_chat_member.is_some()
        || m.new_chat_title.is_some()
        || m.new_chat_photo.as_ref().is_some_and(|photo| !photo.is_empty())
        || m.delete_chat_photo.unwrap_or(false)
        || m.group_chat_created.unwrap_or(false)
        || m.supergroup_chat_created.unwrap_or(false)
        || m.channel_chat_created.unwrap_or(false)
        || m.message_auto_delete_timer_changed.is_some()
        || m.migrate_to_chat_id.is_some()
        || m.migrate_from_chat_id.is_some()
        || m.pinned_message.is_some()
        || m.connected_website.is_some()
        || m.proximity_alert_triggered.is_some()
        || m.forum_topic_created.is_some()
        || m.forum_topic_edited.is_some()
        || m.forum_topic_closed.is_some()
        || m.forum_topic_reopened.is_some()
        || m.general_forum_topic_hidden.is_some()
        || m.general_forum_topic_unhidden.is_some()
        || m.video_chat_scheduled.is_some()
        || m.video_chat_started.is_some()
        || m.video_chat_ended.is_some()
        || m.video_chat_participants_invited.is_some()
        || m.web_app_data.is_some()
        || m.user_shared.is_some()
        || m.chat_shared.is_some()
        || m.write_access_allowed.is_some()
}

/// Any service message.
pub fn all() -> Filter {
    has("StatusUpdate.All", is_status_update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::proto::{Update, User, VideoChatStarted};
    use assert2::check;

    fn matches(filter: &Filter, message: Message) -> bool {
        filter
            .check(&Update::MessageUpdate(message))
            .unwrap()
            .is_match()
    }

    #[test]
    fn members() {
        let joined = || Message {
            new_chat_members: Some(vec![User::default()]),
            ..Default::default()
        };
        check!(matches(&new_chat_members(), joined()));
        check!(matches(&all(), joined()));
        check!(!matches(&left_chat_member(), joined()));
        check!(!matches(
            &new_chat_members(),
            Message {
                new_chat_members: Some(vec![]),
                ..Default::default()
            }
        ));
    }

    #[test]
    fn migrate_and_created() {
        let migrated = Message {
            migrate_from_chat_id: Some(-42),
            ..Default::default()
        };
        check!(matches(&migrate(), migrated));
        let created = Message {
            supergroup_chat_created: Some(true),
            ..Default::default()
        };
        check!(matches(&chat_created(), created));
        check!(!matches(&chat_created(), Message::default()));
    }

    #[test]
    fn plain_text_is_not_a_status_update() {
        let text = Message {
            text: Some("hi".into()),
            ..Default::default()
        };
        check!(!matches(&all(), text));
        let started = Message {
            video_chat_started: Some(VideoChatStarted {}),
            ..Default::default()
        };
        check!(matches(&video_chat_started(), started));
    }
}
