// Logging macros: format the message, redact it, then hand it to tracing.
#[macro_export]
macro_rules! redacted_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!("{}", $crate::redact(&format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! redacted_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!("{}", $crate::redact(&format!($($arg)*)))
    };
}
