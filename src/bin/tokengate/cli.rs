use clap::{Parser, Subcommand};
use std::path::PathBuf;

use TokenGateDB::{Affordance, AddressFamily};

/// Admin CLI for the TokenGateDB snapshot.
#[derive(Parser, Debug)]
#[command(name = "tokengate", version, about = "TokenGateDB admin CLI")]
pub struct Cli {
    /// Snapshot file (default: TG_SNAPSHOT_PATH or bot_database.json)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Toggle document (default: TG_UI_TOGGLES_PATH or ui_toggles.json)
    #[arg(long, global = true)]
    pub toggles: Option<PathBuf>,

    /// Wait for the snapshot lock instead of failing when it is held
    #[arg(long, global = true)]
    pub wait: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Create (or open) the snapshot; optionally define the stock codes
    Init {
        #[arg(long)]
        seed: bool,
    },
    /// Counts, degraded flag and metrics. --json prints one JSON object.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Activation codes
    Code {
        #[command(subcommand)]
        cmd: CodeCmd,
    },
    /// Redeem a code for a subscriber
    Redeem { code: String, id: i64 },
    /// Subscribers
    Sub {
        #[command(subcommand)]
        cmd: SubCmd,
    },
    /// Address inventory
    Addr {
        #[command(subcommand)]
        cmd: AddrCmd,
    },
    /// Per-location v4/v6 toggles
    Location {
        #[command(subcommand)]
        cmd: LocationCmd,
    },
    /// Endpoint pool
    Endpoint {
        #[command(subcommand)]
        cmd: EndpointCmd,
    },
    /// Recent activity, newest first
    Activity {
        #[arg(long)]
        json: bool,
    },
    /// Front-end affordance toggles
    Toggle {
        #[command(subcommand)]
        cmd: ToggleCmd,
    },
    /// Fold duplicate country buckets now
    Reconcile,
}

/// Kind of a code: either --unlimited or --tokens N.
#[derive(clap::Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
pub struct KindArgs {
    #[arg(long)]
    pub unlimited: bool,
    #[arg(long)]
    pub tokens: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum CodeCmd {
    Define {
        code: String,
        #[command(flatten)]
        kind: KindArgs,
    },
    Remove {
        code: String,
    },
    /// Change the kind of an existing code
    Update {
        code: String,
        #[command(flatten)]
        kind: KindArgs,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    /// Define the stock vouchers that are missing
    Seed,
}

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    Show { id: i64 },
    Grant { id: i64, amount: u64 },
    Consume {
        id: i64,
        #[arg(default_value_t = 1)]
        amount: u64,
    },
    Disable { id: i64 },
    Enable { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AddrCmd {
    /// Add an address under a free-form country name
    Add {
        country: String,
        address: String,
        /// Flag glyph shown next to the country
        #[arg(long, default_value = "")]
        flag: String,
    },
    Remove { key: String, address: String },
    List { key: String },
    Countries {
        #[arg(long)]
        json: bool,
    },
    RemoveCountry { key: String },
}

#[derive(Subcommand, Debug)]
pub enum LocationCmd {
    Disable { key: String, family: AddressFamily },
    Enable { key: String, family: AddressFamily },
    Show { key: String },
}

#[derive(Subcommand, Debug)]
pub enum EndpointCmd {
    Add { host: String },
    Remove { host: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum ToggleCmd {
    List,
    /// e.g. `toggle set get_ipv4 true`
    Set {
        name: Affordance,
        #[arg(action = clap::ArgAction::Set)]
        disabled: bool,
    },
}
