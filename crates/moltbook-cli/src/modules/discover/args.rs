use clap::Parser;

pub(crate) const DISCOVER_USAGE: &str =
    "moltbook discover <query> [--submolt <submolt>] [--limit <limit>]";

#[derive(Parser, Debug)]
#[command(name = "discover", no_binary_name = true)]
pub struct DiscoverArgs {
    pub query: String,
    #[arg(long)]
    pub submolt: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
}
