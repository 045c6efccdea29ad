//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dbplane_store::{DEFAULT_PROFILE, ListOptions};

/// dbplane - manage database deployments in the cloud service, ops-manager
/// and cloud-manager from one tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "dbplane")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Profile to use from the configuration file.
    #[arg(short = 'P', long, global = true, env = "DBPLANE_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Configuration file.
    #[arg(long, global = true, env = "DBPLANE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format; defaults to the profile's, then to table.
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<Format>,

    /// Log at debug level to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Cloud service commands.
    Atlas {
        /// Cloud subcommand to execute.
        #[command(subcommand)]
        command: AtlasCommands,
    },

    /// Ops-manager and cloud-manager commands.
    #[command(name = "ops-manager", visible_aliases = ["om", "cloud-manager", "cm"])]
    OpsManager {
        /// Ops-manager subcommand to execute.
        #[command(subcommand)]
        command: OpsManagerCommands,
    },

    /// Projects and organization API keys.
    Iam {
        /// IAM subcommand to execute.
        #[command(subcommand)]
        command: IamCommands,
    },

    /// Inspect the configuration.
    Config {
        /// Config subcommand to execute.
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

// ============================================================================
// Shared arguments
// ============================================================================

/// Project selection.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectArg {
    /// Project ID; defaults to the profile's.
    #[arg(long = "project-id")]
    pub project_id: Option<String>,
}

/// Organization selection.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgArg {
    /// Organization ID; defaults to the profile's.
    #[arg(long = "org-id")]
    pub org_id: Option<String>,
}

/// Pagination.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageArgs {
    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page.
    #[arg(long)]
    pub limit: Option<u32>,
}

impl PageArgs {
    /// List options, if any pagination flag was given.
    #[must_use]
    pub const fn options(&self) -> Option<ListOptions> {
        if self.page.is_none() && self.limit.is_none() {
            return None;
        }
        Some(ListOptions {
            page_num: self.page,
            items_per_page: self.limit,
        })
    }
}

/// Access list entries given as flags.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryArgs {
    /// IP address to allow; repeatable.
    #[arg(long = "ip")]
    pub ips: Vec<String>,

    /// CIDR block to allow; repeatable.
    #[arg(long = "cidr")]
    pub cidrs: Vec<String>,
}

// ============================================================================
// atlas
// ============================================================================

/// Cloud service subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AtlasCommands {
    /// Manage clusters.
    Clusters {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Create a cluster with a database user and access list in one step.
    QuickStart(QuickStartArgs),

    /// Manage database users.
    Dbusers {
        /// Database user subcommand to execute.
        #[command(subcommand)]
        command: DbUserCommands,
    },

    /// Manage the project IP access list.
    AccessLists {
        /// Access list subcommand to execute.
        #[command(subcommand)]
        command: AccessListCommands,
    },

    /// Explore provider regions.
    Regions {
        /// Regions subcommand to execute.
        #[command(subcommand)]
        command: RegionCommands,
    },

    /// Manage backups.
    Backups {
        /// Backups subcommand to execute.
        #[command(subcommand)]
        command: AtlasBackupCommands,
    },

    /// Manage private endpoints.
    PrivateEndpoints {
        /// Private endpoint subcommand to execute.
        #[command(subcommand)]
        command: PrivateEndpointCommands,
    },
}

/// Cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommands {
    /// List the clusters of a project.
    List {
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one cluster.
    Describe {
        /// Cluster name.
        name: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Create a cluster.
    Create(ClusterCreateArgs),

    /// Modify a cluster.
    Update(ClusterUpdateArgs),

    /// Delete a cluster.
    Delete {
        /// Cluster name.
        name: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Pause a cluster.
    Pause {
        /// Cluster name.
        name: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Resume a paused cluster.
    Start {
        /// Cluster name.
        name: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Load the sample dataset.
    SampleData {
        /// Sample data subcommand to execute.
        #[command(subcommand)]
        command: SampleDataCommands,
    },
}

/// Arguments for `atlas clusters create`.
#[derive(Args, Debug, Clone)]
pub struct ClusterCreateArgs {
    /// Cluster name.
    pub name: String,

    /// Cloud provider.
    #[arg(long, default_value = "AWS")]
    pub provider: String,

    /// Provider region.
    #[arg(long, default_value = "US_EAST_1")]
    pub region: String,

    /// Instance tier.
    #[arg(long, default_value = "M10")]
    pub tier: String,

    /// Replica set members.
    #[arg(long, default_value_t = 3)]
    pub members: u32,

    /// Storage capacity in GB.
    #[arg(long)]
    pub disk_size_gb: Option<f64>,

    /// Major server version.
    #[arg(long)]
    pub mdb_version: Option<String>,

    /// Enable cloud provider snapshots.
    #[arg(long)]
    pub backup: bool,

    /// JSON cluster definition; flags above are ignored except the name.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Arguments for `atlas clusters update`.
#[derive(Args, Debug, Clone)]
pub struct ClusterUpdateArgs {
    /// Cluster name.
    pub name: String,

    /// New instance tier.
    #[arg(long)]
    pub tier: Option<String>,

    /// New storage capacity in GB.
    #[arg(long)]
    pub disk_size_gb: Option<f64>,

    /// New major server version.
    #[arg(long)]
    pub mdb_version: Option<String>,

    /// JSON partial cluster definition.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Sample data subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SampleDataCommands {
    /// Start loading the sample dataset into a cluster.
    Load {
        /// Cluster name.
        cluster_name: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Show a sample dataset load job.
    Describe {
        /// Job ID.
        job_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Arguments for `atlas quick-start`.
#[derive(Args, Debug, Clone)]
pub struct QuickStartArgs {
    /// Cluster name.
    #[arg(long, default_value = "Cluster0")]
    pub cluster_name: String,

    /// Cloud provider.
    #[arg(long, default_value = "AWS")]
    pub provider: String,

    /// Provider region.
    #[arg(long, default_value = "US_EAST_1")]
    pub region: String,

    /// Instance tier.
    #[arg(long, default_value = "M10")]
    pub tier: String,

    /// Replica set members.
    #[arg(long, default_value_t = 3)]
    pub members: u32,

    /// Database user to create.
    #[arg(long, default_value = "dbplane-user")]
    pub username: String,

    /// Password of the database user.
    #[arg(long, env = "DBPLANE_QUICK_START_PASSWORD")]
    pub password: String,

    #[command(flatten)]
    pub entries: EntryArgs,

    /// Wait for the cluster and load the sample dataset.
    #[arg(long)]
    pub sample_data: bool,

    /// Seconds between status checks.
    #[arg(long, default_value_t = 10)]
    pub poll_interval: u64,

    /// Give up waiting this many seconds after the run starts.
    #[arg(long, default_value_t = 1800)]
    pub timeout: u64,

    #[command(flatten)]
    pub project: ProjectArg,
}

/// Database user subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DbUserCommands {
    /// List database users.
    List {
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one database user.
    Describe {
        /// User name.
        username: String,
        /// Authentication database.
        #[arg(long, default_value = "admin")]
        auth_db: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Create a database user.
    Create {
        /// User name.
        username: String,
        /// Password.
        #[arg(long)]
        password: String,
        /// Role as `role[@db[.collection]]`; repeatable.
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
        /// Authentication database.
        #[arg(long, default_value = "admin")]
        auth_db: String,
        /// Delete the user after this date (ISO 8601).
        #[arg(long)]
        delete_after: Option<String>,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Delete a database user.
    Delete {
        /// User name.
        username: String,
        /// Authentication database.
        #[arg(long, default_value = "admin")]
        auth_db: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Project IP access list subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AccessListCommands {
    /// List entries.
    List {
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one entry.
    Describe {
        /// IP address or CIDR block.
        entry: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Add entries.
    Create {
        #[command(flatten)]
        entries: EntryArgs,
        /// Comment stored with every entry.
        #[arg(long)]
        comment: Option<String>,
        /// Remove the entries after this date (ISO 8601).
        #[arg(long)]
        delete_after: Option<String>,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Remove an entry.
    Delete {
        /// IP address or CIDR block.
        entry: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Region subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum RegionCommands {
    /// List the regions available per provider and tier.
    List {
        /// Restrict to a provider; repeatable.
        #[arg(long = "provider")]
        providers: Vec<String>,
        /// Restrict to a tier.
        #[arg(long)]
        tier: Option<String>,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Cloud backup subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AtlasBackupCommands {
    /// Cloud provider snapshots.
    Snapshots {
        /// Snapshot subcommand to execute.
        #[command(subcommand)]
        command: SnapshotCommands,
    },

    /// Legacy continuous backup snapshots.
    Continuous {
        /// Continuous snapshot subcommand to execute.
        #[command(subcommand)]
        command: ContinuousCommands,
    },
}

/// Cloud provider snapshot subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum SnapshotCommands {
    /// List the snapshots of a cluster.
    List {
        /// Cluster name.
        cluster_name: String,
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one snapshot.
    Describe {
        /// Cluster name.
        cluster_name: String,
        /// Snapshot ID.
        snapshot_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Take an on-demand snapshot.
    Create {
        /// Cluster name.
        cluster_name: String,
        /// Description.
        #[arg(long)]
        desc: Option<String>,
        /// Days to keep the snapshot.
        #[arg(long, default_value_t = 1)]
        retention: u32,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Delete a snapshot.
    Delete {
        /// Cluster name.
        cluster_name: String,
        /// Snapshot ID.
        snapshot_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Continuous snapshot subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ContinuousCommands {
    /// List snapshots of a cluster.
    List {
        /// Cluster name (cloud) or ID (ops-manager).
        cluster: String,
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one snapshot.
    Describe {
        /// Cluster name (cloud) or ID (ops-manager).
        cluster: String,
        /// Snapshot ID.
        snapshot_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Private endpoint subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PrivateEndpointCommands {
    /// List private endpoint services.
    List {
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Show one private endpoint service.
    Describe {
        /// Endpoint service ID.
        endpoint_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Create a private endpoint service.
    Create {
        /// Cloud provider.
        #[arg(long, default_value = "AWS")]
        provider: String,
        /// Provider region.
        #[arg(long)]
        region: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Delete a private endpoint service.
    Delete {
        /// Endpoint service ID.
        endpoint_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Manage interface endpoints.
    Interfaces {
        /// Interface endpoint subcommand to execute.
        #[command(subcommand)]
        command: InterfaceCommands,
    },
}

/// Interface endpoint subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InterfaceCommands {
    /// Show an interface endpoint.
    Describe {
        /// Endpoint service ID.
        endpoint_id: String,
        /// Provider-side interface endpoint ID.
        interface_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Attach an interface endpoint.
    Create {
        /// Endpoint service ID.
        endpoint_id: String,
        /// Provider-side interface endpoint ID.
        interface_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Detach an interface endpoint.
    Delete {
        /// Endpoint service ID.
        endpoint_id: String,
        /// Provider-side interface endpoint ID.
        interface_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

// ============================================================================
// ops-manager
// ============================================================================

/// Ops-manager subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OpsManagerCommands {
    /// Inspect clusters.
    Clusters {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: OmClusterCommands,
    },

    /// Manage backups.
    Backups {
        /// Backups subcommand to execute.
        #[command(subcommand)]
        command: OmBackupCommands,
    },

    /// Manage the automation configuration.
    Automation {
        /// Automation subcommand to execute.
        #[command(subcommand)]
        command: AutomationCommands,
    },
}

/// Ops-manager cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OmClusterCommands {
    /// List the clusters of a project, or of every project with `--all`.
    List {
        /// List clusters across every project.
        #[arg(long, conflicts_with = "project_id")]
        all: bool,
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one cluster.
    Describe {
        /// Cluster ID.
        cluster_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Ops-manager backup subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OmBackupCommands {
    /// Continuous backup snapshots.
    Snapshots {
        /// Snapshot subcommand to execute.
        #[command(subcommand)]
        command: ContinuousCommands,
    },

    /// Snapshot schedules.
    Schedule {
        /// Schedule subcommand to execute.
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Backup configurations.
    Config {
        /// Backup config subcommand to execute.
        #[command(subcommand)]
        command: BackupConfigCommands,
    },
}

/// Snapshot schedule subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ScheduleCommands {
    /// Show the schedule of a cluster.
    Describe {
        /// Cluster ID.
        cluster_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Change the schedule of a cluster.
    Update {
        /// Cluster ID.
        cluster_id: String,
        /// JSON schedule.
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Backup configuration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BackupConfigCommands {
    /// List backup configurations.
    List {
        #[command(flatten)]
        project: ProjectArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show the backup configuration of a cluster.
    Describe {
        /// Cluster ID.
        cluster_id: String,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Change the backup configuration of a cluster.
    Update {
        /// Cluster ID.
        cluster_id: String,
        /// New backup state, e.g. `STARTED` or `STOPPED`.
        #[arg(long, required_unless_present = "file")]
        status: Option<String>,
        /// JSON backup configuration.
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        project: ProjectArg,
    },
}

/// Automation subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AutomationCommands {
    /// Show the automation configuration.
    Describe {
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Publish a new automation configuration.
    Update {
        /// JSON automation configuration.
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        project: ProjectArg,
    },

    /// Show how far the agents are from the goal configuration.
    Status {
        #[command(flatten)]
        project: ProjectArg,
    },
}

// ============================================================================
// iam
// ============================================================================

/// IAM subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum IamCommands {
    /// Manage projects.
    Projects {
        /// Project subcommand to execute.
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage organizations.
    Organizations {
        /// Organization subcommand to execute.
        #[command(subcommand)]
        command: OrganizationCommands,
    },
}

/// Project subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectCommands {
    /// List projects, optionally only those of one organization.
    List {
        /// Only list the projects of this organization.
        #[arg(long = "org-id")]
        org_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one project.
    Describe {
        /// Project ID.
        project_id: String,
    },

    /// Create a project.
    Create {
        /// Project name.
        name: String,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Delete a project.
    Delete {
        /// Project ID.
        project_id: String,
    },
}

/// Organization subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OrganizationCommands {
    /// Manage API keys.
    Apikeys {
        /// API key subcommand to execute.
        #[command(subcommand)]
        command: ApiKeyCommands,
    },
}

/// Organization API key subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ApiKeyCommands {
    /// List API keys.
    List {
        #[command(flatten)]
        org: OrgArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one API key.
    Describe {
        /// Key ID.
        key_id: String,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Create an API key.
    Create {
        /// Description.
        #[arg(long)]
        desc: String,
        /// Role name; repeatable.
        #[arg(long = "role", required = true)]
        roles: Vec<String>,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Change the description or roles of an API key.
    Update {
        /// Key ID.
        key_id: String,
        /// New description.
        #[arg(long)]
        desc: Option<String>,
        /// New role name; repeatable.
        #[arg(long = "role")]
        roles: Vec<String>,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Delete an API key.
    Delete {
        /// Key ID.
        key_id: String,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Manage the access list of an API key.
    AccessLists {
        /// Access list subcommand to execute.
        #[command(subcommand)]
        command: ApiKeyAccessListCommands,
    },
}

/// API key access list subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ApiKeyAccessListCommands {
    /// List entries.
    List {
        /// Key ID.
        key_id: String,
        #[command(flatten)]
        org: OrgArg,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Add entries.
    Create {
        /// Key ID.
        key_id: String,
        #[command(flatten)]
        entries: EntryArgs,
        #[command(flatten)]
        org: OrgArg,
    },

    /// Remove an entry.
    Delete {
        /// Key ID.
        key_id: String,
        /// IP address or CIDR block.
        entry: String,
        #[command(flatten)]
        org: OrgArg,
    },
}

// ============================================================================
// config
// ============================================================================

/// Configuration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the active profile with the private key masked.
    Describe,

    /// List the profiles in the configuration file.
    List,
}
