//! Profile configuration.
//!
//! Profiles live in one TOML file, one table per profile:
//!
//! ```toml
//! [default]
//! service = "cloud"
//! public_api_key = "abcdef"
//! private_api_key = "00000000-0000-0000-0000-000000000000"
//! project_id = "5e2211c17a3e5a48f5497de3"
//!
//! [onprem]
//! service = "ops-manager"
//! ops_manager_url = "https://opsmanager.internal:8443/"
//! ```
//!
//! Any key can be overridden with a `DBPLANE_`-prefixed environment variable
//! (`DBPLANE_SERVICE`, `DBPLANE_PROJECT_ID`...).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dbplane_http::Credentials;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::Backend;

/// Profile used when none is named.
pub const DEFAULT_PROFILE: &str = "default";

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "DBPLANE_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but cannot be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The service name is not one of the known deployment modes.
    #[error("unknown service '{0}' (expected cloud, ops-manager or cloud-manager)")]
    UnknownService(String),

    /// The named profile is not in the file.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// A value is present but unusable.
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Deployment mode the CLI talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    /// The cloud-hosted database service.
    #[default]
    Cloud,
    /// A self-hosted ops-manager installation.
    OpsManager,
    /// The hosted cloud-manager flavour of the management plane.
    CloudManager,
}

impl Service {
    /// Every service, in declaration order.
    pub const ALL: [Self; 3] = [Self::Cloud, Self::OpsManager, Self::CloudManager];

    /// Configuration name of the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::OpsManager => "ops-manager",
            Self::CloudManager => "cloud-manager",
        }
    }

    /// The backend API this service is served by.
    #[must_use]
    pub const fn backend(self) -> Backend {
        match self {
            Self::Cloud => Backend::Atlas,
            Self::OpsManager | Self::CloudManager => Backend::OpsManager,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownService(s.to_string()))
    }
}

/// The resolved settings of one profile.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Profile name.
    pub name: String,
    /// Deployment mode.
    pub service: Service,
    /// Public API key, sent as the digest user name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_api_key: Option<String>,
    /// Private API key, sent as the digest password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_api_key: Option<String>,
    /// Base URL of a self-hosted ops-manager.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_manager_url: Option<String>,
    /// Override of the API base URL for any service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Default organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Default project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Default output format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("service", &self.service)
            .field("public_api_key", &self.public_api_key)
            .field("private_api_key", &self.private_api_key.as_ref().map(|_| "<redacted>"))
            .field("ops_manager_url", &self.ops_manager_url)
            .field("base_url", &self.base_url)
            .field("org_id", &self.org_id)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl Profile {
    /// An otherwise empty profile for `service`.
    #[must_use]
    pub fn new(name: impl Into<String>, service: Service) -> Self {
        Self {
            name: name.into(),
            service,
            ..Self::default()
        }
    }

    /// The deployment mode.
    #[must_use]
    pub const fn service(&self) -> Service {
        self.service
    }

    /// Digest credentials, when both halves of the key pair are set.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.public_api_key, &self.private_api_key) {
            (Some(public), Some(private)) => Some(Credentials::new(public, private)),
            _ => None,
        }
    }

    /// A copy safe to print: the private key is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut profile = self.clone();
        if let Some(key) = &mut profile.private_api_key {
            let visible = key.get(key.len().saturating_sub(4)..).unwrap_or_default();
            let masked = format!("********{visible}");
            *key = masked;
        }
        profile
    }

    /// Check the values that can be checked without contacting a server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.public_api_key.is_some() != self.private_api_key.is_some() {
            return Err(ConfigError::Invalid(
                "public_api_key and private_api_key must be set together".to_string(),
            ));
        }

        for (key, url) in [
            ("ops_manager_url", &self.ops_manager_url),
            ("base_url", &self.base_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid(format!(
                        "{key} must start with http:// or https://"
                    )));
                }
            }
        }

        if let Some(output) = &self.output {
            if !matches!(output.as_str(), "table" | "json") {
                return Err(ConfigError::Invalid(format!(
                    "output must be 'table' or 'json', got '{output}'"
                )));
            }
        }

        Ok(())
    }
}

/// One profile table as written in the file.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawProfile {
    service: Option<String>,
    public_api_key: Option<String>,
    private_api_key: Option<String>,
    ops_manager_url: Option<String>,
    base_url: Option<String>,
    org_id: Option<String>,
    project_id: Option<String>,
    output: Option<String>,
}

impl RawProfile {
    fn apply_env(&mut self, env: &HashMap<String, String>) {
        let fields: [(&str, &mut Option<String>); 8] = [
            ("SERVICE", &mut self.service),
            ("PUBLIC_API_KEY", &mut self.public_api_key),
            ("PRIVATE_API_KEY", &mut self.private_api_key),
            ("OPS_MANAGER_URL", &mut self.ops_manager_url),
            ("BASE_URL", &mut self.base_url),
            ("ORG_ID", &mut self.org_id),
            ("PROJECT_ID", &mut self.project_id),
            ("OUTPUT", &mut self.output),
        ];
        for (key, field) in fields {
            if let Some(value) = env.get(&format!("{ENV_PREFIX}{key}")) {
                if !value.is_empty() {
                    *field = Some(value.clone());
                }
            }
        }
    }

    fn resolve(self, name: &str) -> Result<Profile, ConfigError> {
        let service = match self.service.as_deref() {
            Some(service) => service.parse()?,
            None => Service::default(),
        };
        let profile = Profile {
            name: name.to_string(),
            service,
            public_api_key: self.public_api_key,
            private_api_key: self.private_api_key,
            ops_manager_url: self.ops_manager_url,
            base_url: self.base_url,
            org_id: self.org_id,
            project_id: self.project_id,
            output: self.output,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    profiles: BTreeMap<String, RawProfile>,
}

impl ConfigFile {
    /// Default location: `<config dir>/dbplane/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dbplane").join("config.toml"))
    }

    /// Load a configuration file; a missing file yields no profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let profiles = toml::from_str(content)?;
        Ok(Self { profiles })
    }

    /// Names of the profiles in the file.
    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Resolve a profile, applying environment overrides from `env`.
    ///
    /// The default profile may be absent from the file; any other name must
    /// be present.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is missing, names an unknown service or
    /// fails validation.
    pub fn profile(&self, name: &str, env: &HashMap<String, String>) -> Result<Profile, ConfigError> {
        let mut raw = match self.profiles.get(name) {
            Some(raw) => raw.clone(),
            None if name == DEFAULT_PROFILE => RawProfile::default(),
            None => return Err(ConfigError::ProfileNotFound(name.to_string())),
        };
        raw.apply_env(env);
        raw.resolve(name)
    }
}
