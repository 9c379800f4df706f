//! the font loading facility boundary
use {
    crate::{
        error::{Result, ThemeError},
        getopt,
        source::remote::build_http_client,
    },
    async_trait::async_trait,
    reqwest::Client,
    tracing::debug,
};

/// the platform capability to request a font family be loaded and await
/// its settlement
#[async_trait]
pub trait FontLoader: Send + Sync {
    /// request the family's asset and wait for the load to settle
    async fn load(&self, family: &str) -> Result<()>;
}

/// loader that probes an http font provider for the family's stylesheet
pub struct HttpFontLoader {
    /// the http client
    client: Client,

    /// base url of the provider (google fonts css2 style)
    provider_url: String,
}

impl HttpFontLoader {
    /// make a loader against the given provider url
    pub fn new(provider_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            provider_url: provider_url.into(),
        })
    }

    /// make a loader from the configured font provider
    pub fn from_config() -> Result<Self> {
        Self::new(getopt!(fonts.provider_url))
    }
}

#[async_trait]
impl FontLoader for HttpFontLoader {
    async fn load(&self, family: &str) -> Result<()> {
        let url = format!(
            "{}?family={}&display=swap",
            self.provider_url,
            family.replace(' ', "+")
        );

        debug!(family = %family, "requesting font stylesheet");
        let response = self.client.get(&url).send().await.map_err(|e| {
            ThemeError::FontLoadFailed {
                family: family.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(ThemeError::FontLoadFailed {
                family: family.to_string(),
                reason: format!("provider returned {}", response.status()),
            });
        }

        Ok(())
    }
}

/// loader for environments without a font facility; every family settles
/// immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFontLoader;

#[async_trait]
impl FontLoader for NoopFontLoader {
    async fn load(&self, _family: &str) -> Result<()> {
        Ok(())
    }
}
