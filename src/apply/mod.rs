//! css token application stuff
use {
    crate::theme::definition::{CssVarGroups, ThemeDefinition, TokenMap},
    hashbrown::HashMap,
    std::sync::{Arc, RwLock},
    tracing::debug,
};

/// a live style sink, the single point where this crate touches
/// presentation
///
/// no other component may write to the underlying style state directly
pub trait StyleTarget: Send + Sync {
    /// set a global custom property on the document root
    fn set_root_property(&self, name: &str, value: &str);

    /// set the document base font size
    fn set_base_font_size(&self, _value: &str) {}

    /// replace the injected stylesheet wholesale
    fn set_stylesheet(&self, css: &str);
}

/// in-memory model of the injected style element and the root element's
/// inline custom properties
///
/// lifecycle matches the live document equivalent: created on first apply,
/// contents replaced on every subsequent apply, never removed for the
/// session's duration
#[derive(Debug, Default)]
pub struct DocumentStyle {
    /// inline custom properties on the root element
    root_vars: RwLock<HashMap<String, String>>,

    /// document base font size, when a theme sets one
    base_font_size: RwLock<Option<String>>,

    /// the current injected stylesheet text
    stylesheet: RwLock<String>,
}

impl DocumentStyle {
    /// make an empty document style
    pub fn new() -> Self {
        Self::default()
    }

    /// read back a root custom property
    pub fn root_property(&self, name: &str) -> Option<String> {
        self.root_vars
            .read()
            .expect("style target lock poisoned")
            .get(name)
            .cloned()
    }

    /// read back the document base font size
    pub fn base_font_size(&self) -> Option<String> {
        self.base_font_size
            .read()
            .expect("style target lock poisoned")
            .clone()
    }

    /// read back the injected stylesheet text
    pub fn stylesheet(&self) -> String {
        self.stylesheet
            .read()
            .expect("style target lock poisoned")
            .clone()
    }
}

impl StyleTarget for DocumentStyle {
    fn set_root_property(&self, name: &str, value: &str) {
        self.root_vars
            .write()
            .expect("style target lock poisoned")
            .insert(name.to_string(), value.to_string());
    }

    fn set_base_font_size(&self, value: &str) {
        *self
            .base_font_size
            .write()
            .expect("style target lock poisoned") = Some(value.to_string());
    }

    fn set_stylesheet(&self, css: &str) {
        *self.stylesheet.write().expect("style target lock poisoned") = css.to_string();
    }
}

/// writes resolved themes into a style target
#[derive(Clone)]
pub struct TokenApplier {
    /// the style sink
    target: Arc<dyn StyleTarget>,
}

impl TokenApplier {
    /// make an applier over the given style target
    pub fn new(target: Arc<dyn StyleTarget>) -> Self {
        Self { target }
    }

    /// apply a resolved theme
    ///
    /// the shared `theme` group becomes root custom properties, the
    /// `light` group one `:root` rule block and the `dark` group one
    /// `.dark` block. idempotent and overwrite-safe: the previous injected
    /// rule set is fully replaced, nothing accumulates
    pub fn apply(&self, theme: &ThemeDefinition) {
        for (name, value) in sorted_entries(&theme.css_vars.theme) {
            self.target
                .set_root_property(&format!("--{name}"), value);

            // font-size also scales the document globally
            if name == "font-size" {
                self.target.set_base_font_size(value);
            }
        }

        self.target
            .set_stylesheet(&render_stylesheet(&theme.css_vars));
        debug!(theme = %theme.name, "applied theme tokens");
    }
}

/// render the mode-scoped rule blocks for a theme's variable groups
///
/// the light group scopes to `:root`, the dark group to `.dark`, so the
/// same token name resolves differently depending on which mode selector
/// is active at read time; which mode is active is decided outside this
/// crate
pub fn render_stylesheet(vars: &CssVarGroups) -> String {
    format!(
        "{}\n\n{}",
        render_rule(":root", &vars.light),
        render_rule(".dark", &vars.dark)
    )
}

/// render one css rule block, keys in sorted order so repeated renders are
/// byte-identical
fn render_rule(selector: &str, tokens: &TokenMap) -> String {
    let mut css = String::with_capacity(tokens.len() * 32);
    css.push_str(selector);
    css.push_str(" {\n");

    for (name, value) in sorted_entries(tokens) {
        css.push_str(&format!("  --{name}: {value};\n"));
    }

    css.push('}');
    css
}

/// iterate a token map in stable name order
fn sorted_entries(tokens: &TokenMap) -> Vec<(&String, &String)> {
    let mut entries: Vec<_> = tokens.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
