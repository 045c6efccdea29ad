//! Provider region command implementation.

use std::io::Write;

use dbplane_store::CloudProviderRegionsLister;
use dbplane_store::atlas::{CloudProviders, RegionsOptions};

use super::Scope;
use crate::cli::RegionCommands;
use crate::error::CliError;
use crate::output::{OutputFormat, Row, TableDisplay, write_rows};

/// Region command executor.
pub struct RegionCommand<'a, S> {
    store: &'a S,
    scope: Scope<'a>,
}

impl<'a, S: CloudProviderRegionsLister + Sync> RegionCommand<'a, S> {
    /// Create a new region command.
    #[must_use]
    pub const fn new(store: &'a S, scope: Scope<'a>) -> Self {
        Self { store, scope }
    }

    /// Execute a region subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &RegionCommands,
    ) -> Result<(), CliError> {
        match command {
            RegionCommands::List {
                providers,
                tier,
                project,
            } => {
                let project_id = self.scope.project(project)?;
                let opts = RegionsOptions {
                    providers: providers.iter().map(|p| p.to_uppercase()).collect(),
                    tier: tier.as_ref().map(|t| t.to_uppercase()),
                };
                let regions = self.store.cloud_provider_regions(project_id, &opts).await?;
                format.write(writer, &regions)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Output types
// ============================================================================

struct RegionRow<'a> {
    provider: &'a str,
    tier: &'a str,
    region: &'a str,
    default: bool,
}

impl Row for RegionRow<'_> {
    const HEADERS: &'static [&'static str] = &["PROVIDER", "TIER", "REGION", "DEFAULT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.provider.to_string(),
            self.tier.to_string(),
            self.region.to_string(),
            if self.default { "yes" } else { "" }.to_string(),
        ]
    }
}

impl TableDisplay for CloudProviders {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let rows: Vec<RegionRow<'_>> = self
            .results
            .iter()
            .flat_map(|provider| {
                provider.instance_sizes.iter().flat_map(move |size| {
                    size.available_regions.iter().map(move |region| RegionRow {
                        provider: &provider.provider,
                        tier: &size.name,
                        region: &region.name,
                        default: region.default,
                    })
                })
            })
            .collect();
        write_rows(writer, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProjectArg;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use dbplane_store::Service;
    use dbplane_store::testing::store;
    use serde_json::json;

    #[tokio::test]
    async fn list_flattens_providers_tiers_regions() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/groups/p1/clusters/provider/regions",
            json!({"results": [{
                "provider": "AWS",
                "instanceSizes": [{
                    "name": "M10",
                    "availableRegions": [
                        {"name": "US_EAST_1", "default": true},
                        {"name": "EU_WEST_1", "default": false}
                    ]
                }]
            }]}),
        );
        let store = store(Service::Cloud, transport.clone());
        let cmd = RegionCommand::new(&store, Scope::new(Some("p1"), None));

        let command = RegionCommands::List {
            providers: vec!["aws".to_string()],
            tier: Some("m10".to_string()),
            project: ProjectArg::default(),
        };
        let mut out = Vec::new();
        cmd.execute(&mut out, &OutputFormat::default(), &command)
            .await
            .expect("list");

        let query = transport.last_request().map(|r| r.query).expect("sent");
        assert!(query.contains(&("providers".to_string(), "AWS".to_string())));
        assert!(query.contains(&("tier".to_string(), "M10".to_string())));

        let out = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("US_EAST_1") && lines[1].ends_with("yes"));
        assert!(lines[2].contains("EU_WEST_1"));
    }
}
