use chrono::{DateTime, TimeZone, Utc};

pub type UpdateId = i64;
pub type UserId = i64;
pub type ChatIntId = i64;
pub type MessageId = i32;
pub type MessageThreadId = i32;

/// Unix time in seconds, as Telegram sends it.
pub type Date = i64;

pub fn date_time(date: Date) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(date, 0).single()
}

pub fn now() -> Date {
    Utc::now().timestamp()
}
