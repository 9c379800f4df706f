//! theme definition value types
use {
    hashbrown::HashMap,
    serde::{Deserialize, Serialize},
};

/// a named group of css custom property values
pub type TokenMap = HashMap<String, String>;

/// the three css variable groups every theme carries
///
/// token names are unique within a group; values are opaque CSS-legal
/// strings (color expressions, font stacks, lengths)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssVarGroups {
    /// tokens shared across light/dark (fonts, radius, misc)
    #[serde(default)]
    pub theme: TokenMap,

    /// tokens for light mode
    #[serde(default)]
    pub light: TokenMap,

    /// tokens for dark mode
    #[serde(default)]
    pub dark: TokenMap,
}

/// an immutable resolved theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    /// unique theme id
    pub name: String,

    /// human readable label
    pub display_name: String,

    /// the css variable groups
    pub css_vars: CssVarGroups,
}
