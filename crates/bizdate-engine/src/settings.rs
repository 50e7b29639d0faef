//! Engine settings
//!
//! Layered with the `config` crate, lowest priority first:
//!
//! 1. Built-in defaults (`Settings::default`)
//! 2. An optional TOML file
//! 3. Environment variables `BIZDATE_<SECTION>__<KEY>`, e.g.
//!    `BIZDATE_PROVIDER__CACHE_ENABLED=false`
//!
//! ```toml
//! [database]
//! path = "var/bizdate.db"
//!
//! [provider]
//! table_name = "business_date"
//! segment_column_name = "segment"
//! date_column_name = "biz_date"
//! default_segment = "00"
//!
//! [string_resource]
//! table_name = "string_resource"
//!
//! [[properties]]
//! key = "BasicBusinessDateProvider.00"
//! value = "20990101"
//! ```
//!
//! `[[properties]]` is the process-wide key/value store the provider's
//! overrides are read from. It is an array of tables rather than a table so
//! that keys keep their case.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bizdate_core::{DateError, ProviderConfig, Result};
use bizdate_store::StringResourceConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables read by default
pub const ENV_PREFIX: &str = "BIZDATE";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Database location and connection behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bizdate.db"),
            busy_timeout_ms: 5_000,
        }
    }
}

impl DatabaseSettings {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// One entry of the process-wide key/value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

/// Complete engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub provider: ProviderConfig,
    pub string_resource: StringResourceConfig,
    pub properties: Vec<Property>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            provider: ProviderConfig {
                table_name: Some("business_date".to_string()),
                segment_column_name: Some("segment".to_string()),
                date_column_name: Some("biz_date".to_string()),
                default_segment: Some("00".to_string()),
                ..ProviderConfig::default()
            },
            string_resource: StringResourceConfig {
                table_name: Some("string_resource".to_string()),
                id_column_name: Some("id".to_string()),
                lang_column_name: Some("lang".to_string()),
                value_column_name: Some("value".to_string()),
                ..StringResourceConfig::default()
            },
            properties: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the `BIZDATE` environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the file is missing or malformed, or
    /// a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        SettingsLoader::new(path.map(Path::to_path_buf)).load()
    }

    /// Parse settings from TOML text, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the text is not valid settings.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Properties as a key/value map; later entries win
    pub fn property_map(&self) -> HashMap<String, String> {
        self.properties
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }
}

/// Where settings are read from
///
/// Kept around so the same sources can be read again on reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl SettingsLoader {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            file,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Read environment variables with another prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Read every source and merge them
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a source cannot be read or the
    /// merged values do not form valid settings.
    pub fn load(&self) -> Result<Settings> {
        let mut builder = Config::builder();
        if let Some(file) = &self.file {
            builder = builder.add_source(File::from(file.as_path()).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR),
        );
        let settings = build(builder)?;
        tracing::debug!(
            file = ?self.file,
            database = %settings.database.path.display(),
            properties = settings.properties.len(),
            "settings loaded"
        );
        Ok(settings)
    }
}

/// Merge `sources` over the built-in defaults and deserialize
fn build(sources: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let defaults = Config::try_from(&Settings::default()).map_err(invalid_configuration)?;
    Config::builder()
        .add_source(defaults)
        .add_source(sources.build().map_err(invalid_configuration)?)
        .build()
        .and_then(|config| config.try_deserialize::<Settings>())
        .map_err(invalid_configuration)
}

fn invalid_configuration(err: config::ConfigError) -> DateError {
    DateError::InvalidConfiguration {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_migrated_schema() {
        let settings = Settings::default();
        assert_eq!(settings.provider.table_name.as_deref(), Some("business_date"));
        assert_eq!(settings.provider.date_column_name.as_deref(), Some("biz_date"));
        assert!(settings.provider.cache_enabled);
        assert_eq!(settings.database.busy_timeout(), Duration::from_secs(5));
        assert_eq!(
            settings.string_resource.table_name.as_deref(),
            Some("string_resource")
        );
        assert_eq!(settings.string_resource.transaction_name, "transaction");
    }

    #[test]
    fn test_string_resource_section_overrides_one_column() {
        let settings =
            Settings::from_toml_str("[string_resource]\nvalue_column_name = \"message\"").unwrap();

        assert_eq!(
            settings.string_resource.value_column_name.as_deref(),
            Some("message")
        );
        assert_eq!(settings.string_resource.id_column_name.as_deref(), Some("id"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [provider]
            cache_enabled = false

            [[properties]]
            key = "BasicBusinessDateProvider.00"
            value = "20990101"
            "#,
        )
        .unwrap();

        assert!(!settings.provider.cache_enabled);
        assert_eq!(settings.provider.default_segment.as_deref(), Some("00"));
        assert_eq!(
            settings.property_map().get("BasicBusinessDateProvider.00"),
            Some(&"20990101".to_string())
        );
    }

    #[test]
    fn test_wrong_type_is_configuration_error() {
        let err = Settings::from_toml_str("[database]\nbusy_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, DateError::InvalidConfiguration { .. }));
    }
}
