//! Configuration loading from disk and the command line.
//!
//! Sources are layered: defaults < TOML file < legacy properties file <
//! command-line overrides. Validation runs once on the merged result.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::schema::{BridgeConfig, DEFAULT_CONTROLLER_PORT};
use crate::config::validation::{is_host_port, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Properties { line: usize, content: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Properties { line, content } => write!(
                f,
                "Properties error on line {}: expected exactly one 'key = value', got '{}'",
                line, content
            ),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied on the command line. They win over every file source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub controller: Option<String>,
    pub base_address: Option<String>,
    pub log_level: Option<String>,
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let config = read_toml(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the effective configuration from every available source.
pub fn resolve_config(
    toml_path: Option<&Path>,
    properties_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<BridgeConfig, ConfigError> {
    let mut config = match toml_path {
        Some(path) => read_toml(path)?,
        None => BridgeConfig::default(),
    };

    if let Some(path) = properties_path {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let properties = parse_properties(&content)?;
        apply_properties(&mut config, &properties);
    }

    if let Some(controller) = &overrides.controller {
        config.controller.address = controller.clone();
    }
    if let Some(base) = &overrides.base_address {
        config.target.base_address = base.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_toml(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Parse the legacy `key = value` properties format.
///
/// Lines containing `##` are comments. The first occurrence of a key wins.
pub fn parse_properties(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut properties = HashMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.contains("##") {
            continue;
        }

        let parts: Vec<&str> = line.split('=').collect();
        if parts.len() != 2 {
            return Err(ConfigError::Properties {
                line: idx + 1,
                content: line.to_string(),
            });
        }

        properties
            .entry(parts[0].trim().to_string())
            .or_insert_with(|| parts[1].trim().to_string());
    }

    Ok(properties)
}

/// Map recognised legacy keys onto the configuration.
///
/// `serviceAddress` names the controller host; the default controller port
/// is appended unless the value already carries one. `ipAddr` is the target
/// base address.
pub fn apply_properties(config: &mut BridgeConfig, properties: &HashMap<String, String>) {
    if let Some(host) = properties.get("serviceAddress") {
        config.controller.address = if is_host_port(host) {
            host.clone()
        } else {
            format!("{}:{}", host, DEFAULT_CONTROLLER_PORT)
        };
    }
    if let Some(base) = properties.get("ipAddr") {
        config.target.base_address = base.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn properties_skip_comments_and_keep_first_value() {
        let props = parse_properties(
            "## controller\nserviceAddress = 10.0.0.9\n\nipAddr = http://a:1\nipAddr = http://b:2\n",
        )
        .unwrap();

        assert_eq!(props.get("serviceAddress").unwrap(), "10.0.0.9");
        assert_eq!(props.get("ipAddr").unwrap(), "http://a:1");
    }

    #[test]
    fn properties_reject_malformed_lines() {
        let err = parse_properties("serviceAddress = x\njust-a-key\n").unwrap_err();
        match err {
            ConfigError::Properties { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "just-a-key");
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(parse_properties("ipAddr = http://h/?a=b").is_err());
    }

    #[test]
    fn service_address_gets_default_port() {
        let mut config = BridgeConfig::default();
        let props = HashMap::from([("serviceAddress".to_string(), "10.0.0.9".to_string())]);
        apply_properties(&mut config, &props);
        assert_eq!(config.controller.address, "10.0.0.9:7777");

        let props = HashMap::from([("serviceAddress".to_string(), "10.0.0.9:9000".to_string())]);
        apply_properties(&mut config, &props);
        assert_eq!(config.controller.address, "10.0.0.9:9000");
    }

    #[test]
    fn layers_apply_in_order() {
        let mut toml_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            toml_file,
            "[controller]\naddress = \"toml-host:1000\"\n[target]\nbase_address = \"http://toml:1\""
        )
        .unwrap();

        let mut props_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(props_file, "ipAddr = http://props:2").unwrap();

        let overrides = Overrides {
            log_level: Some("debug".into()),
            ..Default::default()
        };

        let config =
            resolve_config(Some(toml_file.path()), Some(props_file.path()), &overrides).unwrap();

        assert_eq!(config.controller.address, "toml-host:1000");
        assert_eq!(config.target.base_address, "http://props:2");
        assert_eq!(config.observability.log_level, "debug");

        let overrides = Overrides {
            base_address: Some("http://cli:3".into()),
            ..Default::default()
        };
        let config =
            resolve_config(Some(toml_file.path()), Some(props_file.path()), &overrides).unwrap();
        assert_eq!(config.target.base_address, "http://cli:3");
    }

    #[test]
    fn invalid_merged_config_is_rejected() {
        let overrides = Overrides {
            base_address: Some("not a url".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(None, None, &overrides),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn config_errors_propagate_as_boxed_errors() {
        fn startup() -> Result<BridgeConfig, Box<dyn std::error::Error>> {
            let overrides = Overrides {
                controller: Some("no-port".into()),
                ..Default::default()
            };
            Ok(resolve_config(None, None, &overrides)?)
        }

        let err = startup().unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controller\naddress = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
