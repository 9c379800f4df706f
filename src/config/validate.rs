//! configuration validation stuff
use {
    crate::{config::options::*, validator, validator_nested},
    color_eyre::Result,
};

/// trait for validating config structs
pub trait Validate {
    /// validate the config
    fn validate(&self) -> Result<(), Vec<String>>;

    /// check if the config is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

validator! { SourceConfig,
    local_theme => |v: &String| !v.trim().is_empty(),
        "must not be empty";
    remote_api => |v: &String| v.starts_with("http://") || v.starts_with("https://"),
        "must be a valid http(s) url";
}

validator! { HttpConfig,
    timeout_secs => |v: &u64| *v > 0,
        "must be greater than 0";
    connect_timeout_secs => |v: &u64| *v > 0,
        "must be greater than 0";
    pool_max_idle_per_host => |v: &usize| *v > 0,
        "must be greater than 0";
    user_agent => |v: &String| !v.trim().is_empty(),
        "must not be empty";
}

validator! { FontConfig,
    provider_url => |v: &String| v.starts_with("http://") || v.starts_with("https://"),
        "must be a valid http(s) url";
}

/// valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

validator! { LoggingConfig,
    level => |v: &String| VALID_LOG_LEVELS.contains(&v.to_lowercase().as_str()),
        "must be one of: trace, debug, info, warn, error";
}

validator_nested! { Themeloom,
    fields: { }
    nested: {
        source;
        http;
        fonts;
        logging;
    }
}

/// format a list of validation errors into a readable report
pub fn format_validation_errors(errors: &[String]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, err) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, err));
    }
    output
}
