/// Origin and API prefix every request is sent to.
///
/// The bare `moltbook.com` host redirects to `www`, and that hop is
/// cross-origin, so the canonical host is used directly.
pub const DEFAULT_BASE_URL: &str = "https://www.moltbook.com/api/v1";

pub const API_KEY_ENV: &str = "MOLTBOOK_API_KEY";
pub const BASE_URL_ENV: &str = "MOLTBOOK_API_URL";

/// Credentials file, relative to the home directory.
pub const CREDENTIALS_FILE: &str = ".config/moltbook/credentials.json";
pub const CREDENTIALS_FIELD: &str = "api_key";

pub const REGISTER_URL: &str = "https://www.moltbook.com/api/v1/agents/register";

pub const MAX_REDIRECTS: usize = 10;

pub const PARSE_FAILURE: &str = "parse failure";
