use clap::Parser;
use moltbook_core::{ClientConfig, MoltbookClient};
use tracing_subscriber::EnvFilter;

mod cli_args;
mod cli_command;
mod modules;

use crate::cli_args::Cli;
use crate::cli_command::handle_command;
use crate::modules::system::{print_usage, CommandContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let verb = match cli.verb.as_deref() {
        None | Some("help") => {
            print_usage();
            return Ok(());
        }
        Some(verb) => verb,
    };

    let client = MoltbookClient::new(ClientConfig {
        base_url: cli.base_url.clone(),
        allow_insecure: cli.insecure,
    })?;
    let ctx = CommandContext { client: &client };

    handle_command(verb, &cli.args, &ctx).await
}

fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
