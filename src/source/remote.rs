//! the remote theme service client (remote mode)
use {
    crate::{
        error::{Result, ThemeError},
        getopt,
        source::ThemeSource,
        theme::{ThemeDefinition, normalize::normalize},
    },
    async_trait::async_trait,
    reqwest::Client,
    serde_json::json,
    std::time::Duration,
    tracing::{debug, info},
    url::Url,
};

/// build an http client from the global http config
pub fn build_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(getopt!(http.user_agent))
        .timeout(Duration::from_secs(getopt!(http.timeout_secs)))
        .connect_timeout(Duration::from_secs(getopt!(http.connect_timeout_secs)))
        .pool_max_idle_per_host(getopt!(http.pool_max_idle_per_host))
        .build()
        .map_err(ThemeError::Http)
}

/// remote-mode source talking to the theme service
///
/// `GET  {base}/api/v1/themes/current/`     returns the active theme
/// `POST {base}/api/v1/themes/set-current/` persists a new selection
/// `GET  {base}/api/v1/themes/`             lists selectable themes
pub struct RemoteSource {
    /// the http client
    client: Client,

    /// base url of the theme service
    base_url: Url,
}

impl RemoteSource {
    /// make a source against the given service base url
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ThemeError::SourceUnavailable(format!("invalid theme service url '{base_url}': {e}"))
        })?;

        Ok(Self {
            client: build_http_client()?,
            base_url,
        })
    }

    /// make a source from the configured remote api
    pub fn from_config() -> Result<Self> {
        Self::new(&getopt!(source.remote_api))
    }

    /// absolute url for a theme service endpoint
    fn endpoint(&self, path: &str) -> String {
        format!("{}api/v1/themes/{path}", self.base_url)
    }
}

#[async_trait]
impl ThemeSource for RemoteSource {
    async fn fetch_current(&self) -> Result<ThemeDefinition> {
        let url = self.endpoint("current/");
        debug!(url = %url, "fetching current theme");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ThemeError::SourceUnavailable(format!("theme fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ThemeError::SourceUnavailable(format!(
                "theme service returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ThemeError::SourceUnavailable(format!("malformed theme body: {e}")))?;

        normalize(&payload)
            .map_err(|e| ThemeError::SourceUnavailable(format!("malformed theme body: {e}")))
    }

    async fn set_current(&self, name: &str) -> Result<()> {
        let url = self.endpoint("set-current/");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "theme_name": name }))
            .send()
            .await
            .map_err(|e| ThemeError::SwitchFailed(format!("could not reach theme service: {e}")))?;

        // only success matters; the response body is not required
        if !response.status().is_success() {
            return Err(ThemeError::SwitchFailed(format!(
                "theme service returned {}",
                response.status()
            )));
        }

        info!(theme = %name, "persisted theme selection");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let url = self.endpoint("");

        let payload: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ThemeError::SourceUnavailable(format!("theme list failed: {e}")))?
            .json()
            .await
            .map_err(|e| ThemeError::SourceUnavailable(format!("malformed theme list: {e}")))?;

        // the service wraps the list in {count, results}
        let results = payload
            .get("results")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| {
                ThemeError::SourceUnavailable("malformed theme list: missing results".into())
            })?;

        Ok(results
            .iter()
            .filter_map(|entry| entry.get("name").and_then(serde_json::Value::as_str))
            .map(str::to_owned)
            .collect())
    }
}
