use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

mod cli;
mod util;
mod cmd_activity;
mod cmd_addr;
mod cmd_code;
mod cmd_endpoint;
mod cmd_init;
mod cmd_location;
mod cmd_reconcile;
mod cmd_redeem;
mod cmd_status;
mod cmd_sub;
mod cmd_toggle;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let files = util::Files {
        path: cli.path,
        toggles: cli.toggles,
        wait: cli.wait,
    };
    match cli.cmd {
        cli::Cmd::Init { seed } => cmd_init::exec(&files, seed),

        cli::Cmd::Status { json } => cmd_status::exec(&files, json),

        cli::Cmd::Code { cmd } => cmd_code::exec(&files, cmd),

        cli::Cmd::Redeem { code, id } => cmd_redeem::exec(&files, &code, id),

        cli::Cmd::Sub { cmd } => cmd_sub::exec(&files, cmd),

        cli::Cmd::Addr { cmd } => cmd_addr::exec(&files, cmd),

        cli::Cmd::Location { cmd } => cmd_location::exec(&files, cmd),

        cli::Cmd::Endpoint { cmd } => cmd_endpoint::exec(&files, cmd),

        cli::Cmd::Activity { json } => cmd_activity::exec(&files, json),

        cli::Cmd::Toggle { cmd } => cmd_toggle::exec(&files, cmd),

        cli::Cmd::Reconcile => cmd_reconcile::exec(&files),
    }
}
