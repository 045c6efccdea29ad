//! Cloud provider regions available to a project.

use dbplane_http::{ApiRequest, Result, Transport};
use serde::{Deserialize, Serialize};

use crate::{Client, group_path};

/// Filters for [`RegionsService::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionsOptions {
    /// Restrict to these providers (`AWS`, `GCP`, `AZURE`).
    pub providers: Vec<String>,
    /// Restrict to one tier, e.g. `M10`.
    pub tier: Option<String>,
}

/// Providers with the tiers and regions they offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviders {
    /// One entry per provider.
    #[serde(default)]
    pub results: Vec<CloudProvider>,
    /// Number of providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// One cloud provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProvider {
    /// Provider name.
    pub provider: String,
    /// Tiers offered by this provider.
    #[serde(default)]
    pub instance_sizes: Vec<InstanceSize>,
}

/// A tier and the regions it is offered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSize {
    /// Tier name.
    pub name: String,
    /// Regions offering the tier.
    #[serde(default)]
    pub available_regions: Vec<AvailableRegion>,
}

/// A region offering a tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableRegion {
    /// Region name, e.g. `US_EAST_1`.
    pub name: String,
    /// Whether the region is the provider's default.
    #[serde(default)]
    pub default: bool,
}

impl CloudProviders {
    /// Whether `region` offers `tier` with `provider`.
    #[must_use]
    pub fn offers(&self, provider: &str, tier: &str, region: &str) -> bool {
        self.results
            .iter()
            .filter(|p| p.provider.eq_ignore_ascii_case(provider))
            .flat_map(|p| &p.instance_sizes)
            .filter(|size| size.name.eq_ignore_ascii_case(tier))
            .flat_map(|size| &size.available_regions)
            .any(|r| r.name.eq_ignore_ascii_case(region))
    }
}

/// `/groups/{id}/clusters/provider/regions`.
#[derive(Debug)]
pub struct RegionsService<'a, T> {
    pub(crate) client: &'a Client<T>,
}

impl<T: Transport> RegionsService<'_, T> {
    /// List the regions available to a project.
    pub async fn list(&self, group_id: &str, opts: &RegionsOptions) -> Result<CloudProviders> {
        let mut request = ApiRequest::get(group_path(group_id, "/clusters/provider/regions"));
        request.query.extend(
            opts.providers
                .iter()
                .map(|p| ("providers".to_string(), p.clone())),
        );
        if let Some(tier) = &opts.tier {
            request.query.push(("tier".to_string(), tier.clone()));
        }
        self.client.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbplane_http::Method;
    use dbplane_http::testing::RecordingTransport;
    use serde_json::json;

    fn regions_json() -> serde_json::Value {
        json!({
            "results": [{
                "provider": "AWS",
                "instanceSizes": [{
                    "name": "M10",
                    "availableRegions": [{"name": "US_EAST_1", "default": true}, {"name": "EU_WEST_1"}]
                }]
            }],
            "totalCount": 1
        })
    }

    #[tokio::test]
    async fn list_sends_filters() {
        let transport = RecordingTransport::new().with_response(
            Method::Get,
            "/api/atlas/v1.0/groups/p1/clusters/provider/regions",
            regions_json(),
        );
        let client = Client::new(transport.clone());
        let opts = RegionsOptions {
            providers: vec!["AWS".into()],
            tier: Some("M10".into()),
        };

        let providers = client.regions().list("p1", &opts).await.expect("list");
        assert!(providers.offers("aws", "M10", "eu_west_1"));
        assert!(!providers.offers("GCP", "M10", "EU_WEST_1"));
        assert!(!providers.offers("AWS", "M30", "US_EAST_1"));

        let request = transport.last_request().expect("sent");
        assert_eq!(
            request.query,
            vec![
                ("providers".to_string(), "AWS".to_string()),
                ("tier".to_string(), "M10".to_string()),
            ]
        );
    }
}
