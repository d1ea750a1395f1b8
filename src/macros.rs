/// File name part of a path, the text after the last `/`.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Logs at `level` with the caller's file name and line.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(
            $level,
            $crate::file_name(::core::file!()),
            ::core::line!(),
            ::core::format_args!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
