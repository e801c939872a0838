// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_ADVERTISE_HOST, DEFAULT_BIND_HOST, DEFAULT_CORE_ADDRESS, DEFAULT_MAX_MESSAGE_BYTES,
    DEFAULT_MAX_WORKERS, DEFAULT_PORT, DEFAULT_PROCESSOR_NAME, DEFAULT_RUNTIME,
    ENV_ADVERTISE_HOST, ENV_CORE_ADDRESS, ENV_PORT,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Runtime settings for one processor process.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// processor listening on port 5377 that registers with a core on localhost.
///
/// # Example
/// ```yaml
/// name: ml_v2
/// port: 6000
/// advertise_host: ml-processor.internal
/// core_address: http://orca-core:5433
/// max_workers: 4
/// unit_timeout_seconds: 30
/// ```
///
/// The environment variables `ORCA_CORE`, `PROCESSOR_PORT` and
/// `PROCESSOR_ADDRESS` take precedence over the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    /// Processor name registered with the core
    pub name: String,
    /// Runtime descriptor registered with the core
    pub runtime: String,
    pub bind_host: String,
    pub port: u16,
    /// Host the core should dial; combined with `port` into the connection string
    pub advertise_host: String,
    pub core_address: String,
    pub max_workers: usize,
    /// Per-algorithm deadline; unset means algorithms may run indefinitely
    pub unit_timeout_seconds: Option<u64>,
    pub max_message_bytes: usize,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROCESSOR_NAME.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            advertise_host: DEFAULT_ADVERTISE_HOST.to_string(),
            core_address: DEFAULT_CORE_ADDRESS.to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            unit_timeout_seconds: None,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl ProcessorSettings {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(core_address) = lookup(ENV_CORE_ADDRESS) {
            self.core_address = core_address;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnv {
                    var: ENV_PORT,
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(host) = lookup(ENV_ADVERTISE_HOST) {
            self.advertise_host = host;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                field: "port",
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid {
                field: "max_workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.unit_timeout_seconds == Some(0) {
            return Err(ConfigError::Invalid {
                field: "unit_timeout_seconds",
                reason: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }

    /// Address the gRPC server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// Address advertised to the core in the registration payload.
    pub fn connection_str(&self) -> String {
        format!("{}:{}", self.advertise_host, self.port)
    }

    pub fn unit_timeout(&self) -> Option<Duration> {
        self.unit_timeout_seconds.map(Duration::from_secs)
    }
}

/// Load settings from a YAML file, apply environment overrides and validate.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<ProcessorSettings, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut settings = ProcessorSettings::from_yaml(&content)?;
    settings.apply_env_overrides()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = ProcessorSettings::from_yaml("").unwrap();

        assert_eq!(settings, ProcessorSettings::default());
        assert_eq!(settings.bind_address(), "0.0.0.0:5377");
        assert_eq!(settings.connection_str(), "localhost:5377");
        assert_eq!(settings.core_address, "http://localhost:5433");
        assert_eq!(settings.max_workers, 10);
        assert_eq!(settings.max_message_bytes, 50 * 1024 * 1024);
        assert_eq!(settings.unit_timeout(), None);
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
name: ml_v2
port: 6000
unit_timeout_seconds: 30
"#;
        let settings = ProcessorSettings::from_yaml(yaml).unwrap();

        assert_eq!(settings.name, "ml_v2");
        assert_eq!(settings.port, 6000);
        assert_eq!(settings.unit_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.bind_host, DEFAULT_BIND_HOST);
        assert_eq!(settings.max_workers, DEFAULT_MAX_WORKERS);
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let result = ProcessorSettings::from_yaml("port: not-a-port");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = ProcessorSettings::default();
        settings
            .apply_overrides_from(env(&[
                ("ORCA_CORE", "http://core.internal:7000"),
                ("PROCESSOR_PORT", "6123"),
                ("PROCESSOR_ADDRESS", "ml.internal"),
            ]))
            .unwrap();

        assert_eq!(settings.core_address, "http://core.internal:7000");
        assert_eq!(settings.connection_str(), "ml.internal:6123");
        assert_eq!(settings.bind_address(), "0.0.0.0:6123");
    }

    #[test]
    fn test_invalid_port_env() {
        let mut settings = ProcessorSettings::default();
        let error = settings
            .apply_overrides_from(env(&[("PROCESSOR_PORT", "70000")]))
            .unwrap_err();

        match error {
            ConfigError::InvalidEnv { var, value, .. } => {
                assert_eq!(var, "PROCESSOR_PORT");
                assert_eq!(value, "70000");
            }
            other => panic!("Expected InvalidEnv, got {:?}", other),
        }
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn test_validate() {
        struct TestCase {
            name: &'static str,
            settings: ProcessorSettings,
            invalid_field: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "defaults",
                settings: ProcessorSettings::default(),
                invalid_field: None,
            },
            TestCase {
                name: "empty name",
                settings: ProcessorSettings {
                    name: "  ".to_string(),
                    ..Default::default()
                },
                invalid_field: Some("name"),
            },
            TestCase {
                name: "zero port",
                settings: ProcessorSettings {
                    port: 0,
                    ..Default::default()
                },
                invalid_field: Some("port"),
            },
            TestCase {
                name: "zero workers",
                settings: ProcessorSettings {
                    max_workers: 0,
                    ..Default::default()
                },
                invalid_field: Some("max_workers"),
            },
            TestCase {
                name: "zero timeout",
                settings: ProcessorSettings {
                    unit_timeout_seconds: Some(0),
                    ..Default::default()
                },
                invalid_field: Some("unit_timeout_seconds"),
            },
        ];

        for test_case in test_cases {
            match (test_case.settings.validate(), test_case.invalid_field) {
                (Ok(()), None) => {}
                (Err(ConfigError::Invalid { field, .. }), Some(expected)) => {
                    assert_eq!(field, expected, "Test case '{}'", test_case.name)
                }
                (result, expected) => panic!(
                    "Test case '{}': expected {:?}, got {:?}",
                    test_case.name, expected, result
                ),
            }
        }
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name: file_proc\nmax_workers: 3").unwrap();

        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings.name, "file_proc");
        assert_eq!(settings.max_workers, 3);
    }

    #[test]
    fn test_load_settings_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_workers: 0").unwrap();

        assert!(matches!(
            load_settings(file.path()),
            Err(ConfigError::Invalid { field: "max_workers", .. })
        ));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let error = load_settings("/nonexistent/orca/settings.yaml").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert!(error.to_string().contains("/nonexistent/orca/settings.yaml"));
    }
}
