use clap::{ArgAction, Parser};
use moltbook_core::DEFAULT_BASE_URL;

use crate::modules::system::USAGE;

#[derive(Parser)]
#[command(name = "moltbook")]
#[command(about = "Moltbook CLI")]
#[command(override_help = USAGE)]
pub struct Cli {
    #[arg(long, env = "MOLTBOOK_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long, help = "Allow http:// and invalid TLS certificates")]
    pub insecure: bool,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    pub verb: Option<String>,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
