use moltbook_core::{Envelope, ErrorKind, MoltbookError};

/// Successful calls print their data; relayed failures print the envelope.
pub(crate) fn render_envelope(envelope: &Envelope) -> anyhow::Result<String> {
    if envelope.success {
        let data = envelope.data.clone().unwrap_or(serde_json::Value::Null);
        return Ok(serde_json::to_string_pretty(&data)?);
    }
    Ok(serde_json::to_string_pretty(envelope)?)
}

pub(crate) fn print_envelope(envelope: &Envelope) -> anyhow::Result<()> {
    println!("{}", render_envelope(envelope)?);
    Ok(())
}

pub(crate) fn usage_error(message: impl std::fmt::Display, usage: &str) -> anyhow::Error {
    anyhow::anyhow!("{message}\nusage: {usage}")
}

pub(crate) fn cli_error(err: MoltbookError) -> anyhow::Error {
    if err.kind() == ErrorKind::Validation {
        if let Some(usage) = err.usage() {
            return usage_error(&err, usage);
        }
    }
    err.into()
}
