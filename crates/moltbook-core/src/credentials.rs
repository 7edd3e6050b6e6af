use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::constants::{API_KEY_ENV, CREDENTIALS_FIELD, CREDENTIALS_FILE, REGISTER_URL};
use crate::error::{MoltbookError, Result};

/// Bearer token for one session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

pub trait CredentialSource: Send + Sync {
    fn resolve(&self) -> Result<Credential>;
}

/// A fixed token, for callers that already hold one.
pub struct StaticCredential(Credential);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Credential::new(token))
    }
}

impl CredentialSource for StaticCredential {
    fn resolve(&self) -> Result<Credential> {
        if self.0.expose().trim().is_empty() {
            return Err(no_credential(API_KEY_ENV, None));
        }
        Ok(self.0.clone())
    }
}

/// Environment variable first, then a JSON file holding an `api_key` field.
pub struct EnvFileCredentials {
    env_var: String,
    path: Option<PathBuf>,
}

impl EnvFileCredentials {
    pub fn new(env_var: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            env_var: env_var.into(),
            path,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_env(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn from_file(&self) -> Option<String> {
        let path = self.path.as_deref()?;
        read_token_file(path)
    }
}

impl Default for EnvFileCredentials {
    fn default() -> Self {
        Self::new(API_KEY_ENV, default_credentials_path())
    }
}

impl CredentialSource for EnvFileCredentials {
    fn resolve(&self) -> Result<Credential> {
        if let Some(token) = self.from_env() {
            debug!(source = %self.env_var, "credential resolved from environment");
            return Ok(Credential::new(token));
        }
        if let Some(token) = self.from_file() {
            debug!("credential resolved from credentials file");
            return Ok(Credential::new(token));
        }
        Err(no_credential(&self.env_var, self.path.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    api_key: Option<String>,
}

pub fn default_credentials_path() -> Option<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    Some(Path::new(&home).join(CREDENTIALS_FILE))
}

// Any failure here means "field absent".
fn read_token_file(path: &Path) -> Option<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path = %path.display(), "credentials file unreadable: {err}");
            return None;
        }
    };
    let file: CredentialsFile = match serde_json::from_str(&contents) {
        Ok(file) => file,
        Err(err) => {
            debug!(path = %path.display(), "credentials file could not be parsed: {err}");
            return None;
        }
    };
    file.api_key
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn no_credential(env_var: &str, path: Option<&Path>) -> MoltbookError {
    let file = path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| format!("~/{CREDENTIALS_FILE}"));
    MoltbookError::NoCredential {
        message: format!(
            "no API key found. Set {env_var}, or save {{\"{CREDENTIALS_FIELD}\": \"...\"}} to {file}. \
             Register an agent at {REGISTER_URL} to obtain a key."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;

    fn write_credentials(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("credentials.json");
        fs::write(&path, contents).expect("write credentials");
        path
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"api_key":"from-file"}"#);
        std::env::set_var("MOLTBOOK_TEST_KEY_ENV_WINS", "from-env");

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_ENV_WINS", Some(path));
        let credential = source.resolve().expect("resolve");
        assert_eq!(credential.expose(), "from-env");
    }

    #[test]
    fn file_is_used_when_env_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"api_key":"from-file","agent_name":"x"}"#);

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_1", Some(path));
        assert_eq!(source.resolve().expect("resolve").expose(), "from-file");
    }

    #[test]
    fn empty_env_falls_through_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"api_key":"from-file"}"#);
        std::env::set_var("MOLTBOOK_TEST_KEY_EMPTY", "  ");

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_EMPTY", Some(path));
        assert_eq!(source.resolve().expect("resolve").expose(), "from-file");
    }

    #[test]
    fn missing_everything_names_both_remediations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_2", Some(path));
        let err = source.resolve().expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::NoCredential);
        let message = err.to_string();
        assert!(message.contains("MOLTBOOK_TEST_KEY_UNSET_2"), "{message}");
        assert!(message.contains("absent.json"), "{message}");
        assert!(message.contains("api_key"), "{message}");
    }

    #[test]
    fn unparseable_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), "{not json");

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_3", Some(path));
        let err = source.resolve().expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::NoCredential);
    }

    #[test]
    fn non_string_field_is_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"api_key": 42}"#);

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_4", Some(path));
        assert!(source.resolve().is_err());
    }

    #[test]
    fn file_without_api_key_is_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"agent_name":"x"}"#);

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_6", Some(path));
        let err = source.resolve().expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::NoCredential);
    }

    #[test]
    fn resolution_is_repeatable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_credentials(dir.path(), r#"{"api_key":"stable"}"#);

        let source = EnvFileCredentials::new("MOLTBOOK_TEST_KEY_UNSET_5", Some(path));
        let first = source.resolve().expect("first");
        let second = source.resolve().expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn debug_output_hides_token() {
        let credential = Credential::new("secret-token");
        assert!(!format!("{credential:?}").contains("secret-token"));
    }
}
