//! Service configuration

use refguard_risk::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix; nesting uses `__`, e.g. `REFGUARD__RISK__MODEL_PATH`.
pub const ENV_PREFIX: &str = "REFGUARD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Root for per-project timeline and tuning files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Risk classifier backend selection
    #[serde(default)]
    pub risk: ClassifierConfig,

    #[serde(default)]
    pub compliance: ComplianceSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            risk: ClassifierConfig::default(),
            compliance: ComplianceSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSettings {
    /// JSON catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".refguard")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GovernorConfig {
    /// Defaults, then the optional file, then `REFGUARD__*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&GovernorConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
