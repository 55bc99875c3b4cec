//! Deep links start a conversation with a bot and hand it a payload.
//! https://core.telegram.org/bots/features#deep-linking

use eyre::{bail, ensure};

/// Payloads longer than this are rejected by Telegram.
pub const MAX_PAYLOAD_LEN: usize = 64;

fn is_payload_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Builds `https://t.me/<bot>?start=<payload>` (`startgroup` when `group` is set).
/// An empty payload yields the plain bot link.
pub fn create_deep_linked_url(bot_username: &str, payload: &str, group: bool) -> eyre::Result<String> {
    ensure!(
        bot_username.chars().count() > 3,
        "you must provide a valid bot username, got '{bot_username}'"
    );

    let base_url = format!("https://t.me/{bot_username}");
    if payload.is_empty() {
        return Ok(base_url);
    }

    if payload.len() > MAX_PAYLOAD_LEN {
        bail!("the deep-linking payload must not exceed {MAX_PAYLOAD_LEN} characters");
    }
    ensure!(
        payload.chars().all(is_payload_char),
        "only the following characters are allowed for deep-linked URLs: A-Z, a-z, 0-9, _ and -"
    );

    let key = if group { "startgroup" } else { "start" };
    Ok(format!("{base_url}?{key}={payload}"))
}
