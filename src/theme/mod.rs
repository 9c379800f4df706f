//! theme data model stuff
pub mod definition;
pub mod fallback;
pub mod normalize;

pub use {
    definition::{CssVarGroups, ThemeDefinition, TokenMap},
    fallback::{FALLBACK_THEME_NAME, fallback_theme},
    normalize::normalize,
};
