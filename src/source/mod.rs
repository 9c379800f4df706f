//! theme source adapter stuff
pub mod catalog;
pub mod remote;

use {
    crate::{config::options::SourceMode, error::Result, getopt, theme::ThemeDefinition},
    async_trait::async_trait,
    std::sync::Arc,
};

pub use {catalog::CatalogSource, remote::RemoteSource};

/// a place theme definitions come from
///
/// the adapter never substitutes a default and never caches; every fetch
/// re-reads the source. fallback is the caller's job
#[async_trait]
pub trait ThemeSource: Send + Sync {
    /// fetch the currently selected theme
    async fn fetch_current(&self) -> Result<ThemeDefinition>;

    /// persist a new current selection
    async fn set_current(&self, name: &str) -> Result<()>;

    /// list the selectable theme names
    async fn list(&self) -> Result<Vec<String>>;
}

/// build the source selected by the boot-time configuration flag
pub fn source_from_config() -> Result<Arc<dyn ThemeSource>> {
    match getopt!(source.mode) {
        SourceMode::Local => Ok(Arc::new(CatalogSource::from_config())),
        SourceMode::Remote => Ok(Arc::new(RemoteSource::from_config()?)),
    }
}
