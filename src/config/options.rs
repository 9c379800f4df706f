//! every available configuration option and its type is listed in this file
use {
    crate::config::validate::{Validate, format_validation_errors},
    color_eyre::{
        Section,
        eyre::{Context, OptionExt, Result, eyre},
    },
    config::{Config, ConfigBuilder},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    smart_default::SmartDefault,
    std::path::PathBuf,
    tracing::info,
};

/// where theme definitions come from
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema, SmartDefault)]
pub enum SourceMode {
    /// load a named definition from the bundled catalog
    #[default]
    Local,

    /// fetch from the remote theme service
    Remote,
}

/// Settings for the theme source
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct SourceConfig {
    /// Which source mode to resolve themes from
    #[default(Some(SourceMode::Local))]
    pub mode: Option<SourceMode>,

    /// The bundled theme to use in local mode
    #[default(Some(String::from("vercel")))]
    pub local_theme: Option<String>,

    /// Base URL of the theme service used in remote mode
    #[default(Some(String::from("http://localhost:8000")))]
    pub remote_api: Option<String>,
}

/// Configuration options for making HTTP requests
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[default(Some(30))]
    pub timeout_secs: Option<u64>,

    /// Connection timeout in seconds
    #[default(Some(10))]
    pub connect_timeout_secs: Option<u64>,

    /// Connection pool size per host
    #[default(Some(8))]
    pub pool_max_idle_per_host: Option<usize>,

    /// The user agent to send with requests
    #[default(Some(String::from(concat!("themeloom/", env!("CARGO_PKG_VERSION")))))]
    pub user_agent: Option<String>,
}

/// Settings for font resolution
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct FontConfig {
    /// Confirm font availability before reporting a theme ready
    #[default(Some(true))]
    pub enable: Option<bool>,

    /// Base URL of the font provider (google fonts css2 style)
    #[default(Some(String::from("https://fonts.googleapis.com/css2")))]
    pub provider_url: Option<String>,

    /// Per-family load timeout in seconds (0 disables the bound)
    #[default(Some(10))]
    pub timeout_secs: Option<u64>,
}

/// The format to log in
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, SmartDefault)]
pub enum LoggingFormat {
    /// Use the compact output format
    #[default]
    Compact,

    /// Use an excessively pretty output format
    Pretty,
}

/// Settings for logging
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct LoggingConfig {
    /// Enable logging
    #[default(Some(true))]
    pub enable: Option<bool>,

    /// The max level to log at
    #[default(Some(String::from("info")))]
    pub level: Option<String>,

    /// The output format to log in
    #[default(Some(LoggingFormat::Compact))]
    pub format: Option<LoggingFormat>,

    /// Enable ANSI escape codes in log output
    #[default(Some(true))]
    pub ansi: Option<bool>,

    /// Display event targets in log messages
    #[default(Some(false))]
    pub event_targets: Option<bool>,

    /// Display line numbers in log messages
    #[default(Some(false))]
    pub line_numbers: Option<bool>,
}

/// the full themeloom configuration
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct Themeloom {
    /// Theme source settings
    #[default(Some(SourceConfig::default()))]
    pub source: Option<SourceConfig>,

    /// HTTP client settings
    #[default(Some(HttpConfig::default()))]
    pub http: Option<HttpConfig>,

    /// Font resolution settings
    #[default(Some(FontConfig::default()))]
    pub fonts: Option<FontConfig>,

    /// Logging settings
    #[default(Some(LoggingConfig::default()))]
    pub logging: Option<LoggingConfig>,
}

impl Themeloom {
    /// load config from default locations
    ///
    /// load prio: local > global > defaults
    pub fn load() -> Result<Self> {
        let global_config_path = Self::global_config_path()?;
        let defaults = Self::load_defaults()?;
        let mut builder = Self::create_builder(defaults.clone())?;

        builder = builder.add_source(
            config::File::with_name(global_config_path.to_string_lossy().as_ref()).required(false),
        );

        if let Some(local_config) = Self::find_local_config()? {
            builder = builder.add_source(
                config::File::with_name(local_config.to_string_lossy().as_ref()).required(false),
            );
        }

        builder = builder.add_source(config::Environment::with_prefix("THEMELOOM"));

        let settings = builder.build().wrap_err("Failed to build configuration")?;
        let cfg: Themeloom = settings
            .try_deserialize::<Themeloom>()
            .wrap_err("Failed to deserialize configuration")?;

        cfg.run_validation()?;
        info!("Configuration validation successful");

        Ok(cfg)
    }

    /// get the global config file path
    fn global_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_eyre("Unable to determine system config directory")
            .suggestion("Ensure XDG_CONFIG_HOME or HOME environment variables are set")
            .suggestion("On Windows, APPDATA should be set")?;

        Ok(config_dir.join("themeloom.toml"))
    }

    /// load default config from the embedded default config file
    fn load_defaults() -> Result<Self> {
        toml::from_str(include_str!("../../resources/themeloom.default.toml"))
            .wrap_err("Failed to parse embedded default configuration")
            .note("This is a bug - the embedded defaults are malformed")
    }

    /// create a config builder with defaults
    fn create_builder(defaults: Themeloom) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder();
        let config_source = config::Config::try_from(&defaults)
            .wrap_err("Failed to convert default Themeloom struct to config source")?;

        Ok(builder.add_source(config_source))
    }

    /// run validation and return a pretty error if it fails
    fn run_validation(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| {
                let formatted = format_validation_errors(&errors);
                eyre!(formatted)
            })
            .wrap_err("config validation failed")
            .suggestion("Check your themeloom.toml for invalid values")
            .suggestion("Run with default config to see valid options")
    }

    /// find the local config file by walking the ancestor directories
    fn find_local_config() -> Result<Option<PathBuf>> {
        let curr_dir = std::env::current_dir()
            .wrap_err("Failed to get current working directory")
            .suggestion("Ensure the current directory exists and is accessible")?;

        for ancestor in curr_dir.ancestors() {
            let config_path = ancestor.join("themeloom.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let defaults = Themeloom::load_defaults().unwrap();
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_defaults_match_struct_defaults() {
        let embedded = Themeloom::load_defaults().unwrap();
        let derived = Themeloom::default();

        let source = embedded.source.unwrap();
        assert_eq!(source.mode, derived.source.unwrap().mode);
        assert_eq!(source.local_theme.as_deref(), Some("vercel"));
    }

    #[test]
    fn test_validation_catches_bad_values() {
        let mut cfg = Themeloom::default();
        cfg.http.as_mut().unwrap().timeout_secs = Some(0);
        assert!(cfg.validate().is_err());
    }
}
