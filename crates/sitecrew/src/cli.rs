//! Clap derive structures for the `sitecrew` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitecrew -- back-office coordinator for build-site assignments
#[derive(Debug, Parser)]
#[command(
    name = "sitecrew",
    version,
    about = "Coordinate build sites, field managers, and certificates",
    long_about = "Back-office tooling for a construction company.\n\n\
        Links field managers and professional certificates to build sites\n\
        with optimistic concurrency control, over a Google Sheets or\n\
        PostgREST backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Store backend (overrides the config file)
    #[arg(long, short = 'b', env = "SITECREW_BACKEND", global = true)]
    pub backend: Option<BackendOpt>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SITECREW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SITECREW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendOpt {
    /// In-process maps, state lost on exit (demos)
    Memory,
    /// Google Sheets spreadsheet
    Sheets,
    /// PostgREST endpoint (Supabase)
    Postgrest,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON, wrapped in the API envelope
    Json,
    /// Compact single-line JSON, wrapped in the API envelope
    JsonCompact,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage build sites
    #[command(alias = "s")]
    Sites(SitesArgs),

    /// Manage the field-manager pool
    #[command(alias = "p", alias = "managers")]
    Personnel(PersonnelArgs),

    /// Manage the certificate pool
    #[command(alias = "c")]
    Certs(CertsArgs),

    /// Assign a manager and certificate to a site
    Assign(AssignArgs),

    /// Clear a site's manager and certificate
    Unassign(UnassignArgs),

    /// Aggregate counts across all collections
    Stats,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List sites, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Exact match on the constructing company
        #[arg(long)]
        company: Option<String>,

        /// Exact match on the construction phase
        #[arg(long)]
        phase: Option<String>,

        /// Filter by assignment state
        #[arg(long, value_enum)]
        assignment: Option<AssignmentOpt>,

        /// Case-insensitive substring search over name and address
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one site in full, including its version token
    #[command(alias = "show")]
    Get {
        /// Site ID
        id: String,
    },

    /// Register a new site
    Create {
        /// Site name
        #[arg(long, required = true)]
        name: String,

        /// Owner's name
        #[arg(long)]
        owner: Option<String>,

        /// Constructing company
        #[arg(long)]
        company: Option<String>,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// Construction phase (free-form, e.g. "foundation")
        #[arg(long)]
        phase: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssignmentOpt {
    Assigned,
    Unassigned,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PERSONNEL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PersonnelArgs {
    #[command(subcommand)]
    pub command: PersonnelCommand,
}

#[derive(Debug, Subcommand)]
pub enum PersonnelCommand {
    /// List field managers
    #[command(alias = "ls")]
    List,

    /// Show one manager in full
    #[command(alias = "show")]
    Get {
        /// Personnel ID
        id: String,
    },

    /// Register a new field manager
    Create {
        /// Manager's name
        #[arg(long, required = true)]
        name: String,

        /// Role or trade
        #[arg(long)]
        role: Option<String>,

        /// Employer or subcontractor
        #[arg(long)]
        affiliation: Option<String>,

        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CERTIFICATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CertsArgs {
    #[command(subcommand)]
    pub command: CertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertsCommand {
    /// List certificates
    #[command(alias = "ls")]
    List,

    /// Show one certificate in full
    #[command(alias = "show")]
    Get {
        /// Certificate ID
        id: String,
    },

    /// Register a new certificate
    Create {
        /// Certificate name (e.g. "Architect License")
        #[arg(long, required = true)]
        name: String,

        /// Certificate holder's name
        #[arg(long)]
        owner: Option<String>,

        /// Holder's contact phone
        #[arg(long)]
        owner_phone: Option<String>,

        /// Issuing body
        #[arg(long)]
        issuer: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ASSIGN / UNASSIGN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Site ID to assign to
    pub site: String,

    /// Personnel ID of the manager
    #[arg(long, short = 'm', required = true)]
    pub manager: String,

    /// Certificate ID to pin to the site
    #[arg(long, short = 'c', required = true)]
    pub certificate: String,

    /// Version token last seen for the site; omit to skip the lock check
    #[arg(long, alias = "if-match")]
    pub expect_version: Option<String>,
}

#[derive(Debug, Args)]
pub struct UnassignArgs {
    /// Site ID to clear
    pub site: String,

    /// Version token last seen for the site; omit to skip the lock check
    #[arg(long, alias = "if-match")]
    pub expect_version: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a starter config file
    Init,
}
