pub(crate) mod output;
pub(crate) mod types;
mod usage;

pub(crate) use output::{cli_error, print_envelope, usage_error};
pub(crate) use types::CommandContext;
pub(crate) use usage::{print_usage, USAGE};
