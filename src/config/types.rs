//! Configuration types for secure-media
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{
    AccessChecker, AccessPolicy, AllowAll, Authenticated, DenyAll, Groups, PolicyRegistry,
    Principals,
};
use crate::util::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Media server settings
    pub server: ServerConfig,

    /// Registry-wide settings
    pub registry: RegistryConfig,

    /// Access policies, in precedence order (first match wins)
    pub policies: Vec<PolicyConfig>,

    /// Bearer token authentication
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build a registry holding the configured policies, in file order
    pub fn build_registry(&self) -> PolicyRegistry {
        PolicyRegistry::with_policies(
            self.policies.iter().map(PolicyConfig::to_policy),
            self.registry.default_allow,
        )
    }
}

/// Media server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP host
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// URL prefix media files are served under
    pub media_url: String,

    /// Directory holding the media tree
    pub media_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            media_url: "/media".to_string(),
            media_root: PathBuf::from("media"),
        }
    }
}

impl ServerConfig {
    /// Media URL prefix without a trailing slash
    pub fn media_mount(&self) -> &str {
        self.media_url.trim_end_matches('/')
    }
}

/// Registry-wide configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Decision for paths no policy matches
    pub default_allow: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_allow: true,
        }
    }
}

/// One access policy
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Name used in logs
    #[serde(default)]
    pub name: Option<String>,

    /// Path prefixes governed by this policy
    pub prefixes: Vec<String>,

    /// Who may access the governed paths
    pub rule: PolicyRule,
}

impl PolicyConfig {
    /// Name used in logs and validation errors
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.prefixes.join(","))
    }

    pub fn to_policy(&self) -> AccessPolicy {
        let policy =
            AccessPolicy::with_shared_checker(self.prefixes.iter().cloned(), self.rule.checker());
        match &self.name {
            Some(name) => policy.with_name(name.clone()),
            None => policy,
        }
    }
}

/// Access rule applied by a configured policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRule {
    /// Allow everyone
    Allow,
    /// Deny everyone
    Deny,
    /// Allow authenticated requests
    Authenticated,
    /// Allow the listed principals
    Principals(Vec<String>),
    /// Allow members of the listed groups
    Groups(Vec<String>),
}

impl PolicyRule {
    pub fn checker(&self) -> Arc<dyn AccessChecker> {
        match self {
            PolicyRule::Allow => Arc::new(AllowAll),
            PolicyRule::Deny => Arc::new(DenyAll),
            PolicyRule::Authenticated => Arc::new(Authenticated),
            PolicyRule::Principals(names) => Arc::new(Principals::new(names.iter().cloned())),
            PolicyRule::Groups(groups) => Arc::new(Groups::new(groups.iter().cloned())),
        }
    }
}

/// Bearer token authentication configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accepted tokens and the identity each one authenticates as
    pub tokens: Vec<TokenConfig>,
}

/// A bearer token and its identity
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub token: SecretString,

    pub principal: String,

    #[serde(default)]
    pub groups: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
