//! TOML configuration file loading
//!
//! The configuration file is optional. When no path is given the default
//! location under the user's config directory is used if it exists;
//! an explicitly given path must exist.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error_handling::ContextualError;
use crate::core::retry::RetryPolicy;
use crate::core::validation::{validate_category, validate_positive, ValidationError};
use crate::messaging::SmsSettings;
use crate::serving::api::{
    QueueSettings, SlotPolicy, TrackingLinks, DEFAULT_CATEGORY, DEFAULT_SERVICE_MINUTES,
    DEFAULT_TRACKING_BASE_URL, MAX_SERVICE_MINUTES,
};

use super::args::Args;

const CONFIG_DIR_NAME: &str = "ClinicQueue";
const CONFIG_FILE_NAME: &str = "clinic-queue.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ConfigError::Invalid(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid(e) => Some(e.message()),
            _ => None,
        }
    }
}

/// SMS gateway section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmsConfig {
    pub gateway_url: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
    pub max_attempts: u64,
    pub retry_delay_ms: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            gateway_url: String::new(),
            auth_token: None,
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub service_minutes: u64,
    pub booked_per_walk_in: usize,
    pub default_category: String,
    pub tracking_base_url: String,
    pub sms: Option<SmsConfig>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_minutes: DEFAULT_SERVICE_MINUTES,
            booked_per_walk_in: SlotPolicy::DEFAULT_BOOKED_PER_WALK_IN,
            default_category: DEFAULT_CATEGORY.to_string(),
            tracking_base_url: DEFAULT_TRACKING_BASE_URL.to_string(),
            sms: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Default configuration file location, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load the configuration file, or defaults when there is none
    pub async fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Missing {
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let config = Self::from_toml(&contents, &path)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text; `path` is only used in error messages
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Command line values take precedence over the file
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(minutes) = args.service_minutes {
            self.service_minutes = minutes;
        }
        if let Some(run) = args.booked_per_walk_in {
            self.booked_per_walk_in = run;
        }
        if let Some(category) = &args.default_category {
            self.default_category = category.clone();
        }
        if let Some(url) = &args.tracking_base_url {
            self.tracking_base_url = url.clone();
        }
        if let Some(gateway) = &args.sms_gateway {
            let sms = self.sms.get_or_insert_with(SmsConfig::default);
            sms.gateway_url = gateway.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.level = Some(level.clone());
        }
        if let Some(format) = &args.log_format {
            self.logging.format = Some(format.clone());
        }
        if let Some(file) = &args.log_file {
            self.logging.file = Some(file.to_string_lossy().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_service_minutes(self.service_minutes)?;
        SlotPolicy::new(self.booked_per_walk_in)?;
        validate_category(Some(self.default_category.as_str()), DEFAULT_CATEGORY)?;
        validate_http_url(&self.tracking_base_url, "tracking_base_url")?;

        if let Some(sms) = &self.sms {
            validate_http_url(&sms.gateway_url, "sms.gateway_url")?;
            validate_positive(sms.timeout_secs, "sms.timeout_secs")?;
            validate_positive(sms.max_attempts, "sms.max_attempts")?;
        }
        Ok(())
    }

    pub fn queue_settings(&self) -> Result<QueueSettings, ValidationError> {
        Ok(QueueSettings {
            slot_policy: SlotPolicy::new(self.booked_per_walk_in)?,
            service_minutes: validate_service_minutes(self.service_minutes)?,
            default_category: validate_category(
                Some(self.default_category.as_str()),
                DEFAULT_CATEGORY,
            )?,
        })
    }

    pub fn tracking_links(&self) -> TrackingLinks {
        TrackingLinks::new(&self.tracking_base_url)
    }

    /// Gateway settings, or `None` when client messaging is off
    pub fn sms_settings(&self) -> Option<SmsSettings> {
        self.sms.as_ref().map(|sms| SmsSettings {
            gateway_url: sms.gateway_url.clone(),
            auth_token: sms.auth_token.clone(),
            timeout: Duration::from_secs(sms.timeout_secs),
            retry: RetryPolicy {
                max_attempts: sms.max_attempts as usize,
                delay: Duration::from_millis(sms.retry_delay_ms),
            },
        })
    }
}

fn validate_service_minutes(minutes: u64) -> Result<u64, ValidationError> {
    let minutes = validate_positive(minutes, "service_minutes")?;
    if minutes > MAX_SERVICE_MINUTES {
        return Err(ValidationError::new(format!(
            "'service_minutes' must be at most {MAX_SERVICE_MINUTES}, got {minutes}"
        )));
    }
    Ok(minutes)
}

fn validate_http_url(url: &str, field: &str) -> Result<(), ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::missing(field));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::new(format!(
            "'{field}' must be an http or https URL, got '{trimmed}'"
        )));
    }
    Ok(())
}
