//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (SECURE_MEDIA__*)
//! 2. Configuration file (TOML)
//! 3. Default values

use crate::config::types::{AppConfig, PolicyConfig, PolicyRule};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "secure-media.toml",
    ".secure-media.toml",
    "~/.config/secure-media/config.toml",
    "/etc/secure-media/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        let expanded = shellexpand::tilde(path);
        if !Path::new(expanded.as_ref()).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. SECURE_MEDIA__SERVER__PORT, SECURE_MEDIA__REGISTRY__DEFAULT_ALLOW
    builder = builder.add_source(
        Environment::with_prefix("SECURE_MEDIA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if !config.server.media_url.starts_with('/') || config.server.media_mount().is_empty() {
        return Err(ConfigError::Invalid {
            message: format!(
                "server.media_url must be an absolute path other than \"/\", got: {}",
                config.server.media_url
            ),
        });
    }

    for policy in &config.policies {
        validate_policy(policy)?;
    }

    for (index, token) in config.auth.tokens.iter().enumerate() {
        if token.token.expose_secret().is_empty() {
            return Err(ConfigError::Missing {
                field: format!("auth.tokens[{}].token", index),
            });
        }
        if token.principal.is_empty() {
            return Err(ConfigError::Missing {
                field: format!("auth.tokens[{}].principal", index),
            });
        }
    }

    Ok(())
}

fn validate_policy(policy: &PolicyConfig) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPolicy {
        policy: policy.display_name(),
        reason: reason.to_string(),
    };

    if policy.prefixes.is_empty() {
        return Err(invalid("at least one prefix is required"));
    }

    // An empty prefix would govern every path
    if policy.prefixes.iter().any(String::is_empty) {
        return Err(invalid("prefixes must not be empty strings"));
    }

    match &policy.rule {
        PolicyRule::Principals(names) if names.is_empty() => {
            Err(invalid("principals rule needs at least one principal"))
        }
        PolicyRule::Groups(groups) if groups.is_empty() => {
            Err(invalid("groups rule needs at least one group"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[server]
port = 9000
media_url = "/files"

[registry]
default_allow = false

[[policies]]
name = "members"
prefixes = ["images/", "profiles/"]
rule = "authenticated"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.media_url, "/files");
        assert!(!config.registry.default_allow);
        assert_eq!(config.policies.len(), 1);
        assert_eq!(config.policies[0].rule, PolicyRule::Authenticated);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert!(config.registry.default_allow);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let toml = r#"
[[policies]]
name = "everything"
prefixes = [""]
rule = "deny"
"#;

        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy { ref policy, .. } if policy == "everything"));
    }

    #[test]
    fn test_missing_prefixes_rejected() {
        let toml = r#"
[[policies]]
prefixes = []
rule = "allow"
"#;

        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::InvalidPolicy { .. }
        ));
    }

    #[test]
    fn test_empty_principals_rejected() {
        let toml = r#"
[[policies]]
prefixes = ["private/"]
rule = { principals = [] }
"#;

        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::InvalidPolicy { .. }
        ));
    }

    #[test]
    fn test_unknown_rule_is_load_error() {
        let toml = r#"
[[policies]]
prefixes = ["private/"]
rule = "sometimes"
"#;

        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Load(_)
        ));
    }

    #[test]
    fn test_root_media_url_rejected() {
        let toml = r#"
[server]
media_url = "/"
"#;

        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_token_without_principal_rejected() {
        let toml = r#"
[[auth.tokens]]
token = "abc"
principal = ""
"#;

        assert!(matches!(
            load_config_from_str(toml).unwrap_err(),
            ConfigError::Missing { .. }
        ));
    }
}
