use moltbook_core::catalog;
use tracing::debug;

use crate::modules::discover::handle_discover;
use crate::modules::system::CommandContext;
use crate::modules::verbs::handle_verb;

pub(crate) async fn handle_command(
    verb: &str,
    args: &[String],
    ctx: &CommandContext<'_>,
) -> anyhow::Result<()> {
    debug!(verb = %verb, args = args.len(), "command");
    if verb == "discover" {
        return handle_discover(args, ctx).await;
    }
    let Some(descriptor) = catalog::find(verb) else {
        anyhow::bail!("unknown command: {verb} (run `moltbook help` for the list)");
    };
    handle_verb(descriptor, args, ctx).await
}
