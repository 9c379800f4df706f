//! the bundled theme catalog (local mode)
use {
    crate::{
        error::{Result, ThemeError},
        getopt,
        source::ThemeSource,
        theme::{ThemeDefinition, normalize::normalize},
    },
    async_trait::async_trait,
    hashbrown::HashMap,
    tokio::sync::RwLock,
    tracing::debug,
};

/// the bundled theme documents, keyed by name
pub struct ThemeCatalog {
    /// raw json for each bundled theme
    themes: HashMap<&'static str, &'static str>,
}

impl ThemeCatalog {
    /// make a catalog of every bundled theme
    pub fn new() -> Self {
        let mut catalog = Self {
            themes: HashMap::new(),
        };

        catalog.register("vercel", include_str!("../../resources/themes/vercel.json"));
        catalog.register("ocean", include_str!("../../resources/themes/ocean.json"));
        catalog.register(
            "modern-minimal",
            include_str!("../../resources/themes/modern-minimal.json"),
        );

        catalog
    }

    /// register a bundled theme document
    pub fn register(&mut self, name: &'static str, raw: &'static str) {
        self.themes.insert(name, raw);
    }

    /// parse and normalize a bundled theme by name
    pub fn get(&self, name: &str) -> Result<ThemeDefinition> {
        let raw = self.themes.get(name).ok_or_else(|| {
            ThemeError::SourceUnavailable(format!("no bundled theme named '{name}'"))
        })?;

        let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
            ThemeError::SourceUnavailable(format!("bundled theme '{name}' is malformed: {e}"))
        })?;

        normalize(&value)
            .map_err(|e| ThemeError::SourceUnavailable(format!("bundled theme '{name}': {e}")))
    }

    /// whether a bundled theme exists
    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// list the bundled theme names
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.themes.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// local-mode source backed by the bundled catalog
///
/// switching is realized by re-fetching under a different bundled name;
/// nothing is persisted outside the session
pub struct CatalogSource {
    /// the bundled catalog
    catalog: ThemeCatalog,

    /// the currently selected bundled name
    current: RwLock<String>,
}

impl CatalogSource {
    /// make a source starting at the given bundled name
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            catalog: ThemeCatalog::new(),
            current: RwLock::new(initial.into()),
        }
    }

    /// make a source from the configured local theme name
    pub fn from_config() -> Self {
        Self::new(getopt!(source.local_theme))
    }
}

#[async_trait]
impl ThemeSource for CatalogSource {
    async fn fetch_current(&self) -> Result<ThemeDefinition> {
        let name = self.current.read().await.clone();
        self.catalog.get(&name)
    }

    async fn set_current(&self, name: &str) -> Result<()> {
        if !self.catalog.contains(name) {
            return Err(ThemeError::SourceUnavailable(format!(
                "no bundled theme named '{name}'"
            )));
        }

        *self.current.write().await = name.to_string();
        debug!(theme = %name, "selected bundled theme");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.catalog.names().into_iter().map(str::to_owned).collect())
    }
}
