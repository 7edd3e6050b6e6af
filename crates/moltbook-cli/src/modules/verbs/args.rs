use moltbook_core::{VerbArgs, VerbDescriptor};

use crate::modules::system::usage_error;

/// Binds bare values to the verb's positional parameters in order, and
/// `--name value` / `--name=value` to any parameter. Positional slots
/// already filled by a flag are skipped.
pub(crate) fn bind_args(verb: &VerbDescriptor, raw: &[String]) -> anyhow::Result<VerbArgs> {
    let mut args = VerbArgs::new();
    let mut positional = verb.positional();
    let mut tokens = raw.iter();
    while let Some(token) = tokens.next() {
        if let Some(flag) = token.strip_prefix("--").filter(|flag| !flag.is_empty()) {
            let (name, value) = match flag.split_once('=') {
                Some((name, value)) => (name, value.to_string()),
                None => {
                    let value = tokens.next().ok_or_else(|| {
                        usage_error(format!("--{flag} requires a value"), &verb.usage())
                    })?;
                    (flag, value.clone())
                }
            };
            args.insert(name, value);
            continue;
        }
        let param = positional
            .find(|param| !args.contains(param.name))
            .ok_or_else(|| {
                usage_error(
                    format!("{}: unexpected argument '{token}'", verb.name),
                    &verb.usage(),
                )
            })?;
        args.insert(param.name, token.clone());
    }
    Ok(args)
}
