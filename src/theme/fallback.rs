//! the hard-coded fallback theme
use {
    crate::theme::definition::{CssVarGroups, ThemeDefinition, TokenMap},
    std::sync::LazyLock,
};

/// the name of the fallback theme
pub const FALLBACK_THEME_NAME: &str = "fallback";

/// the fallback theme definition, the only theme never fetched over i/o
static FALLBACK: LazyLock<ThemeDefinition> = LazyLock::new(build_fallback);

/// get a copy of the fallback theme
///
/// substituted by the resolution controller when no external source can be
/// resolved, so content always has a renderable palette
pub fn fallback_theme() -> ThemeDefinition {
    FALLBACK.clone()
}

/// build one token group from static entries
fn group(entries: &[(&str, &str)]) -> TokenMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// build the fallback definition
fn build_fallback() -> ThemeDefinition {
    ThemeDefinition {
        name: FALLBACK_THEME_NAME.to_string(),
        display_name: "Fallback Theme".to_string(),
        css_vars: CssVarGroups {
            theme: group(&[
                ("font-sans", "system-ui, sans-serif"),
                ("font-serif", "Georgia, serif"),
                ("font-mono", "monospace"),
                ("radius", "0.375rem"),
            ]),
            light: group(&[
                ("background", "oklch(1.0000 0 0)"),
                ("foreground", "oklch(0.15 0 0)"),
                ("primary", "oklch(0.6231 0.1880 259.8145)"),
                ("secondary", "oklch(0.9670 0.0029 264.5419)"),
                ("accent", "oklch(0.9514 0.0250 236.8242)"),
                ("muted", "oklch(0.9608 0.0155 264.5380)"),
                ("card", "oklch(1.0000 0 0)"),
                ("border", "oklch(0.9216 0.0266 264.5312)"),
            ]),
            dark: group(&[
                ("background", "oklch(0.0902 0 0)"),
                ("foreground", "oklch(0.9216 0.0266 264.5312)"),
                ("primary", "oklch(0.6231 0.1880 259.8145)"),
                ("secondary", "oklch(0.1725 0.0118 264.5419)"),
                ("accent", "oklch(0.1686 0.0157 236.8242)"),
                ("muted", "oklch(0.1412 0.0166 264.5380)"),
                ("card", "oklch(0.0902 0 0)"),
                ("border", "oklch(0.1725 0.0118 264.5419)"),
            ]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let theme = fallback_theme();

        assert_eq!(theme.name, FALLBACK_THEME_NAME);
        assert!(theme.css_vars.theme.contains_key("font-sans"));
        assert!(theme.css_vars.light.contains_key("background"));
        assert!(theme.css_vars.dark.contains_key("background"));
    }

    #[test]
    fn test_fallback_is_stable() {
        assert_eq!(fallback_theme(), fallback_theme());
    }
}
