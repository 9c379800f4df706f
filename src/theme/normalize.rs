//! normalization of loosely-shaped theme payloads
use {
    crate::{
        error::{Result, ThemeError},
        theme::definition::{CssVarGroups, ThemeDefinition, TokenMap},
    },
    serde_json::{Map, Value},
};

/// normalize a loosely-shaped theme payload into a [`ThemeDefinition`]
///
/// source payloads vary in casing and nesting (`cssVars` vs `css_vars`,
/// `theme_name` vs `name`); everything past this function sees only the
/// canonical shape. absent token groups become empty maps, scalar values
/// are coerced to strings
pub fn normalize(value: &Value) -> Result<ThemeDefinition> {
    let obj = value
        .as_object()
        .ok_or_else(|| ThemeError::MalformedTheme("payload is not a json object".into()))?;

    let name = string_field(obj, &["name", "theme_name", "themeName"])
        .ok_or_else(|| ThemeError::MalformedTheme("missing theme name".into()))?;

    let display_name =
        string_field(obj, &["display_name", "displayName"]).unwrap_or_else(|| name.clone());

    let vars = obj
        .get("css_vars")
        .or_else(|| obj.get("cssVars"))
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ThemeError::MalformedTheme(format!("theme '{name}' has no css vars object"))
        })?;

    Ok(ThemeDefinition {
        name,
        display_name,
        css_vars: CssVarGroups {
            theme: token_group(vars, "theme"),
            light: token_group(vars, "light"),
            dark: token_group(vars, "dark"),
        },
    })
}

/// the first present string field among a set of aliases
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}

/// read one token group, coercing scalar values to strings
fn token_group(vars: &Map<String, Value>, group: &str) -> TokenMap {
    let mut tokens = TokenMap::new();

    if let Some(entries) = vars.get(group).and_then(Value::as_object) {
        for (name, value) in entries {
            if let Some(value) = scalar_to_string(value) {
                tokens.insert(name.clone(), value);
            }
        }
    }

    tokens
}

/// css values arrive as strings or bare numbers depending on the source
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
