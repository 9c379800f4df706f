//! error handling stuff
use thiserror::Error;

/// result type for themeloom operations
pub type Result<T, U = ThemeError> = miette::Result<T, U>;

#[derive(Debug, Error)]
/// An error
pub enum ThemeError {
    /// the theme source could not produce a definition
    #[error("theme source unavailable: {0}")]
    SourceUnavailable(String),

    /// persisting a new theme selection failed
    #[error("theme switch failed: {0}")]
    SwitchFailed(String),

    /// a font asset failed to load (recorded per family, never fatal)
    #[error("font load failed for '{family}': {reason}")]
    FontLoadFailed {
        /// the font family that failed to load
        family: String,
        /// why the load failed
        reason: String,
    },

    /// a theme payload that cannot be normalized
    #[error("malformed theme definition: {0}")]
    MalformedTheme(String),

    /// an http error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// a json error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// an IO error
    #[error("i/o error: {0}")]
    IO(#[from] std::io::Error),
}
