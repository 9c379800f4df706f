//! utility helpers
use tracing::Level;

/// convert a string log level to a [`tracing::Level`], used when setting up
/// tracing in the app module (see [`crate::app::logging`])
pub fn string_to_log_level(lvl: &str) -> Level {
    match lvl.to_lowercase().as_str() {
        "d" | "debug" | "dbg" => Level::DEBUG,
        "t" | "trace" | "trc" => Level::TRACE,
        "e" | "error" | "err" => Level::ERROR,
        "i" | "info" | "inf" => Level::INFO,
        "w" | "warn" | "wrn" => Level::WARN,
        _ => Level::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_aliases() {
        assert_eq!(string_to_log_level("debug"), Level::DEBUG);
        assert_eq!(string_to_log_level("DBG"), Level::DEBUG);
        assert_eq!(string_to_log_level("w"), Level::WARN);
        assert_eq!(string_to_log_level("nonsense"), Level::ERROR);
    }
}
