use crate::error::{GeolayerError, Result};
use crate::models::Crs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "GEOLAYER_CONFIG";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the Geolayer service
///
/// Values are resolved defaults < file < environment.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub port: ConfigValue<u16>,
    pub database_url: ConfigValue<Option<String>>,
    pub cors_origins: ConfigValue<Vec<String>>,
    /// EPSG code assumed for coordinates that are not valid lon/lat
    pub source_crs: ConfigValue<u32>,
    pub target_crs: ConfigValue<u32>,
    /// Property sub-fields returned by the layer listing
    pub summary_fields: ConfigValue<Vec<String>>,
    pub normalize_query_geometry: ConfigValue<bool>,
    pub trace_coordinates: ConfigValue<bool>,
    /// Largest accepted upload body, in MiB
    pub max_upload_mb: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            port: ConfigValue::new(8000, ConfigSource::Default),
            database_url: ConfigValue::new(None, ConfigSource::Default),
            cors_origins: ConfigValue::new(
                vec!["http://localhost:4200".to_string()],
                ConfigSource::Default,
            ),
            source_crs: ConfigValue::new(25833, ConfigSource::Default),
            target_crs: ConfigValue::new(4326, ConfigSource::Default),
            summary_fields: ConfigValue::new(
                vec!["nome".to_string(), "vincolo".to_string()],
                ConfigSource::Default,
            ),
            normalize_query_geometry: ConfigValue::new(false, ConfigSource::Default),
            trace_coordinates: ConfigValue::new(false, ConfigSource::Default),
            max_upload_mb: ConfigValue::new(64, ConfigSource::Default),
        }
    }

    /// Defaults, then the file named by `GEOLAYER_CONFIG` if set, then the environment
    pub fn load() -> Result<Self> {
        let config = Self::with_defaults();
        let config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => config.load_from_file(path)?,
            Err(_) => config,
        };
        let config = config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeolayerError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeolayerError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(port) = file_config.port {
            self.port.update(port, ConfigSource::File);
        }

        if let Some(database_url) = file_config.database_url {
            self.database_url.update(Some(database_url), ConfigSource::File);
        }

        if let Some(origins) = file_config.cors_origins {
            self.cors_origins.update(origins, ConfigSource::File);
        }

        if let Some(crs) = file_config.source_crs {
            self.source_crs.update(crs, ConfigSource::File);
        }

        if let Some(crs) = file_config.target_crs {
            self.target_crs.update(crs, ConfigSource::File);
        }

        if let Some(fields) = file_config.summary_fields {
            self.summary_fields.update(fields, ConfigSource::File);
        }

        if let Some(flag) = file_config.normalize_query_geometry {
            self.normalize_query_geometry.update(flag, ConfigSource::File);
        }

        if let Some(flag) = file_config.trace_coordinates {
            self.trace_coordinates.update(flag, ConfigSource::File);
        }

        if let Some(limit) = file_config.max_upload_mb {
            self.max_upload_mb.update(limit, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(self) -> Self {
        self.load_from_lookup(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; invalid values are logged and skipped
    pub fn load_from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port_str) = lookup("GEOLAYER_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port.update(port, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOLAYER_PORT value '{}': expected a port number",
                    port_str
                ),
            }
        }

        if let Some(database_url) = lookup("DATABASE_URL") {
            if !database_url.trim().is_empty() {
                self.database_url.update(Some(database_url), ConfigSource::Environment);
            }
        }

        if let Some(origins) = lookup("GEOLAYER_CORS_ORIGINS") {
            let origins = parse_list(&origins);
            if origins.is_empty() {
                tracing::warn!("Ignoring empty GEOLAYER_CORS_ORIGINS");
            } else {
                self.cors_origins.update(origins, ConfigSource::Environment);
            }
        }

        if let Some(crs_str) = lookup("GEOLAYER_SOURCE_CRS") {
            match parse_epsg(&crs_str) {
                Ok(crs) => self.source_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOLAYER_SOURCE_CRS value '{}': expected EPSG code",
                    crs_str
                ),
            }
        }

        if let Some(crs_str) = lookup("GEOLAYER_TARGET_CRS") {
            match parse_epsg(&crs_str) {
                Ok(crs) => self.target_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOLAYER_TARGET_CRS value '{}': expected EPSG code",
                    crs_str
                ),
            }
        }

        if let Some(fields) = lookup("GEOLAYER_SUMMARY_FIELDS") {
            let fields = parse_list(&fields);
            if fields.is_empty() {
                tracing::warn!("Ignoring empty GEOLAYER_SUMMARY_FIELDS");
            } else {
                self.summary_fields.update(fields, ConfigSource::Environment);
            }
        }

        if let Some(flag_str) = lookup("GEOLAYER_NORMALIZE_QUERY") {
            match parse_bool(&flag_str) {
                Ok(flag) => self.normalize_query_geometry.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOLAYER_NORMALIZE_QUERY value '{}': expected true or false",
                    flag_str
                ),
            }
        }

        if let Some(flag_str) = lookup("GEOLAYER_TRACE_COORDINATES") {
            match parse_bool(&flag_str) {
                Ok(flag) => self.trace_coordinates.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOLAYER_TRACE_COORDINATES value '{}': expected true or false",
                    flag_str
                ),
            }
        }

        if let Some(limit_str) = lookup("GEOLAYER_MAX_UPLOAD_MB") {
            match limit_str.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => {
                    self.max_upload_mb.update(limit, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid GEOLAYER_MAX_UPLOAD_MB value '{}': expected a positive integer",
                    limit_str
                ),
            }
        }

        self
    }

    /// Reject combinations the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.cors_origins.value.is_empty() {
            return Err(GeolayerError::ConfigMissing { key: "cors_origins".to_string() });
        }

        if self.summary_fields.value.is_empty() {
            return Err(GeolayerError::ConfigMissing { key: "summary_fields".to_string() });
        }

        if self.max_upload_mb.value == 0 {
            return Err(GeolayerError::ConfigInvalid {
                key: "max_upload_mb".to_string(),
                reason: "upload limit must be positive".to_string(),
            });
        }

        // Normalized output must read as lon/lat and fit a PostGIS SRID
        if !self.target_crs().is_geographic() {
            return Err(GeolayerError::ConfigInvalid {
                key: "target_crs".to_string(),
                reason: format!(
                    "EPSG:{} is not a supported geographic CRS",
                    self.target_crs.value
                ),
            });
        }

        if self.source_crs.value == self.target_crs.value {
            return Err(GeolayerError::ConfigInvalid {
                key: "source_crs".to_string(),
                reason: format!(
                    "source and target CRS are both EPSG:{}",
                    self.target_crs.value
                ),
            });
        }

        Ok(())
    }

    pub fn source_crs(&self) -> Crs {
        Crs::from_epsg(self.source_crs.value)
    }

    pub fn target_crs(&self) -> Crs {
        Crs::from_epsg(self.target_crs.value)
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    port: Option<u16>,
    database_url: Option<String>,
    cors_origins: Option<Vec<String>>,
    source_crs: Option<u32>,
    target_crs: Option<u32>,
    summary_fields: Option<Vec<String>>,
    normalize_query_geometry: Option<bool>,
    trace_coordinates: Option<bool>,
    max_upload_mb: Option<usize>,
}

/// Parse an EPSG code, with or without the `EPSG:` prefix
pub fn parse_epsg(s: &str) -> Result<u32> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("EPSG:")
        .or_else(|| trimmed.strip_prefix("epsg:"))
        .unwrap_or(trimmed);

    digits.parse::<u32>().map_err(|_| GeolayerError::ConfigInvalid {
        key: "crs".to_string(),
        reason: format!("Invalid EPSG code: {}", s),
    })
}

/// Parse a boolean flag
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(GeolayerError::ConfigInvalid {
            key: "flag".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.port.value, 8000);
        assert_eq!(config.source_crs.value, 25833);
        assert_eq!(config.target_crs.value, 4326);
        assert_eq!(config.source_crs.source, ConfigSource::Default);
        assert_eq!(config.cors_origins.value, vec!["http://localhost:4200"]);
        assert_eq!(config.summary_fields.value, vec!["nome", "vincolo"]);
        assert!(!config.normalize_query_geometry.value);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // Lower precedence should not override
        value.update(400, ConfigSource::File);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port = 9000
source_crs = 32633
cors_origins = ["https://maps.example.org"]
normalize_query_geometry = true
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.port.value, 9000);
        assert_eq!(config.port.source, ConfigSource::File);
        assert_eq!(config.source_crs.value, 32633);
        assert_eq!(config.cors_origins.value, vec!["https://maps.example.org"]);
        assert!(config.normalize_query_geometry.value);
        assert_eq!(config.target_crs.source, ConfigSource::Default);
    }

    #[test]
    fn test_lookup_overrides_and_skips_invalid() {
        let vars: HashMap<&str, &str> = [
            ("GEOLAYER_SOURCE_CRS", "EPSG:32632"),
            ("GEOLAYER_PORT", "not-a-port"),
            ("GEOLAYER_SUMMARY_FIELDS", "name, category"),
            ("GEOLAYER_TRACE_COORDINATES", "yes"),
            ("GEOLAYER_MAX_UPLOAD_MB", "0"),
        ]
        .into_iter()
        .collect();

        let config = LayeredConfig::with_defaults()
            .load_from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.source_crs.value, 32632);
        assert_eq!(config.source_crs.source, ConfigSource::Environment);
        assert_eq!(config.port.value, 8000);
        assert_eq!(config.port.source, ConfigSource::Default);
        assert_eq!(config.summary_fields.value, vec!["name", "category"]);
        assert!(config.trace_coordinates.value);
        assert_eq!(config.max_upload_mb.value, 64);
    }

    #[test]
    fn test_validate_rejects_identical_crs() {
        let config = LayeredConfig::with_defaults()
            .load_from_lookup(|key| (key == "GEOLAYER_SOURCE_CRS").then(|| "4326".to_string()));
        assert!(matches!(config.validate(), Err(GeolayerError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_validate_rejects_projected_target() {
        let config = LayeredConfig::with_defaults()
            .load_from_lookup(|key| (key == "GEOLAYER_TARGET_CRS").then(|| "3857".to_string()));
        match config.validate() {
            Err(GeolayerError::ConfigInvalid { key, .. }) => assert_eq!(key, "target_crs"),
            other => panic!("Expected ConfigInvalid for target_crs, got {:?}", other),
        }

        let oversized = LayeredConfig::with_defaults().load_from_lookup(|key| {
            (key == "GEOLAYER_TARGET_CRS").then(|| u32::MAX.to_string())
        });
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_other_geographic_target() {
        let config = LayeredConfig::with_defaults()
            .load_from_lookup(|key| (key == "GEOLAYER_TARGET_CRS").then(|| "4258".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_epsg() {
        assert_eq!(parse_epsg("25833").unwrap(), 25833);
        assert_eq!(parse_epsg("EPSG:4326").unwrap(), 4326);
        assert_eq!(parse_epsg(" epsg:3857 ").unwrap(), 3857);
        assert!(parse_epsg("utm33").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
