//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Document engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// File store configuration for receipts and signatures.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Currency label applied to documents created without one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Zero-padding width of the sequence part of reference ids.
    #[serde(default = "default_reference_padding")]
    pub reference_padding: usize,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_reference_padding() -> usize {
    6
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            reference_padding: default_reference_padding(),
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// In-process memory (tests and local walkthroughs).
    #[default]
    Memory,
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3.
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
}

impl StorageBackend {
    /// Short backend name recorded alongside stored files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::LocalFs { .. } => "local",
            Self::S3 { .. } => "s3",
        }
    }
}

/// File store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Which backend to write files to.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types. `None` keeps the built-in list.
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_file_size: default_max_file_size(),
            allowed_mime_types: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "procura=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `PROCURA__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROCURA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
