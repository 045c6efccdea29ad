//! Config command implementation.

use std::io::Write;

use dbplane_store::{ConfigFile, Profile};
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, Row, TableDisplay};

/// Config command executor.
pub struct ConfigCommand<'a> {
    config: &'a ConfigFile,
    profile: &'a Profile,
}

impl<'a> ConfigCommand<'a> {
    /// Create a new config command.
    #[must_use]
    pub const fn new(config: &'a ConfigFile, profile: &'a Profile) -> Self {
        Self { config, profile }
    }

    /// Execute a config subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ConfigCommands,
    ) -> Result<(), CliError> {
        match command {
            ConfigCommands::Describe => format.write(writer, &self.profile.redacted()),
            ConfigCommands::List => format.write(writer, &self.profiles()),
        }
    }

    fn profiles(&self) -> Vec<ProfileEntry> {
        let active = self.profile.name.as_str();
        let mut entries: Vec<ProfileEntry> = self
            .config
            .profile_names()
            .map(|name| ProfileEntry {
                name: name.to_string(),
                active: name == active,
            })
            .collect();
        // The default profile may be in effect without appearing in the file.
        if !entries.iter().any(|e| e.active) {
            entries.push(ProfileEntry {
                name: active.to_string(),
                active: true,
            });
        }
        entries
    }
}

// ============================================================================
// Output types
// ============================================================================

impl TableDisplay for Profile {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let fields = [
            ("Profile", Some(self.name.clone())),
            ("Service", Some(self.service.to_string())),
            ("Public API key", self.public_api_key.clone()),
            ("Private API key", self.private_api_key.clone()),
            ("Ops manager URL", self.ops_manager_url.clone()),
            ("Base URL", self.base_url.clone()),
            ("Org ID", self.org_id.clone()),
            ("Project ID", self.project_id.clone()),
            ("Output", self.output.clone()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                writeln!(writer, "{:<17}{value}", format!("{label}:"))?;
            }
        }
        Ok(())
    }
}

/// One profile in `config list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    /// Profile name.
    pub name: String,
    /// Whether this profile is in use.
    pub active: bool,
}

impl Row for ProfileEntry {
    const HEADERS: &'static [&'static str] = &["NAME", "ACTIVE"];

    fn cells(&self) -> Vec<String> {
        let active = if self.active { "*" } else { "" };
        vec![self.name.clone(), active.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use dbplane_store::Service;
    use std::collections::HashMap;

    const CONFIG: &str = r#"
        [default]
        service = "cloud"
        public_api_key = "pub"
        private_api_key = "0000-secret-9876"

        [onprem]
        service = "ops-manager"
        ops_manager_url = "https://om.internal:8443/"
    "#;

    fn resolve(name: &str) -> (ConfigFile, Profile) {
        let config = ConfigFile::from_toml(CONFIG).expect("valid toml");
        let profile = config.profile(name, &HashMap::new()).expect("profile exists");
        (config, profile)
    }

    #[test]
    fn describe_masks_private_key() {
        let (config, profile) = resolve("default");
        let cmd = ConfigCommand::new(&config, &profile);

        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &ConfigCommands::Describe)
            .expect("describe");
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("Service:"));
        assert!(out.contains("cloud"));
        assert!(out.contains("********9876"));
        assert!(!out.contains("0000-secret"));
    }

    #[test]
    fn describe_json_masks_private_key() {
        let (config, profile) = resolve("default");
        let cmd = ConfigCommand::new(&config, &profile);

        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::new(Format::Json), &ConfigCommands::Describe)
            .expect("describe");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["private_api_key"], "********9876");
    }

    #[test]
    fn list_marks_active_profile() {
        let (config, profile) = resolve("onprem");
        assert_eq!(profile.service(), Service::OpsManager);
        let cmd = ConfigCommand::new(&config, &profile);

        let entries = cmd.profiles();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.name == "onprem" && e.active));
        assert!(entries.iter().any(|e| e.name == "default" && !e.active));
    }

    #[test]
    fn list_includes_implicit_default() {
        let config = ConfigFile::default();
        let profile = config
            .profile(dbplane_store::DEFAULT_PROFILE, &HashMap::new())
            .expect("default is implicit");
        let cmd = ConfigCommand::new(&config, &profile);

        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &ConfigCommands::List)
            .expect("list");
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("NAME"));
        assert!(out.contains("default"));
    }
}
