/// Value of an `Option`, or the fallback expression (usually `return`/`continue`) when `None`.
#[macro_export]
macro_rules! ward {
    ($opt:expr, $fallback:expr $(,)?) => {
        match $opt {
            Some(value) => value,
            None => $fallback,
        }
    };
}

/// Inside a loop: value of a `Result`, or log the error and `continue`.
/// An optional format string prefixes the logged error.
#[macro_export]
macro_rules! skip {
    ($res:expr $(,)?) => {
        match $res {
            Ok(value) => value,
            Err(err) => {
                log::error!("{}", err);
                continue;
            }
        }
    };
    ($res:expr, $($ctx:tt)+) => {
        match $res {
            Ok(value) => value,
            Err(err) => {
                log::error!("{}, {}", format_args!($($ctx)+), err);
                continue;
            }
        }
    };
}
