//! Warnings about questionable usage. They are routed through `log` under a
//! dedicated target so applications can filter or silence them.

use std::fmt::Display;

pub const TARGET: &str = "tgbind::warnings";

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum WarningCategory {
    /// Something that will stop working in a later Bot API version.
    #[display(fmt = "deprecation")]
    Deprecation,
    /// Legal but probably not what the caller wants.
    #[display(fmt = "user")]
    User,
}

pub fn warn(category: WarningCategory, message: impl Display) {
    log::warn!(target: TARGET, "[{category}] {message}");
}

/// Warns once for every distinct call site.
#[macro_export]
macro_rules! warn_once {
    ($category:expr, $($arg:tt)+) => {{
        static ONCE: std::sync::Once = std::sync::Once::new();
        ONCE.call_once(|| $crate::warnings::warn($category, format_args!($($arg)+)));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn category_names() {
        check!(WarningCategory::Deprecation.to_string() == "deprecation");
        check!(WarningCategory::User.to_string() == "user");
    }

    #[test]
    fn repeated_warning_does_not_panic() {
        for _ in 0..3 {
            warn_once!(WarningCategory::User, "short polling");
        }
        warn(WarningCategory::Deprecation, "old field");
    }
}
