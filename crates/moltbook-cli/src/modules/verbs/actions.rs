use moltbook_core::{catalog, MoltbookError, VerbDescriptor};

use super::bind_args;
use crate::modules::system::{cli_error, print_envelope, CommandContext};

pub(crate) async fn handle_verb(
    verb: &VerbDescriptor,
    raw: &[String],
    ctx: &CommandContext<'_>,
) -> anyhow::Result<()> {
    let args = bind_args(verb, raw)?;
    let envelope = catalog::invoke(ctx.client.dispatcher(), verb, &args)
        .await
        .map_err(cli_error)?;
    // Only application errors are relayed; unreadable replies fail the command.
    if envelope.is_malformed() {
        return Err(MoltbookError::MalformedResponse {
            status: envelope.status,
        }
        .into());
    }
    print_envelope(&envelope)
}
