use clap::Parser;
use moltbook_core::{Envelope, ErrorKind, MoltbookError};

use super::args::{DiscoverArgs, DISCOVER_USAGE};
use crate::modules::system::{print_envelope, usage_error, CommandContext};

pub(crate) async fn handle_discover(
    raw: &[String],
    ctx: &CommandContext<'_>,
) -> anyhow::Result<()> {
    let args = DiscoverArgs::try_parse_from(raw).map_err(|err| {
        let rendered = err.to_string();
        let reason = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string();
        usage_error(format!("discover: {reason}"), DISCOVER_USAGE)
    })?;

    let result = ctx
        .client
        .discover(&args.query, args.submolt.as_deref(), args.limit)
        .await;
    match result {
        Ok(discovery) => {
            println!("{}", serde_json::to_string_pretty(&discovery)?);
            Ok(())
        }
        Err(MoltbookError::Application { status, message }) => {
            print_envelope(&Envelope::failure(status, message))
        }
        Err(err) if err.kind() == ErrorKind::Validation => {
            Err(usage_error(format!("discover: {err}"), DISCOVER_USAGE))
        }
        Err(err) => Err(err.into()),
    }
}
