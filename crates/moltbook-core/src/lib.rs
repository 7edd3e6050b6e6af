#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod client;
pub mod constants;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::catalog::{
    find, lookup, normalize_list, BodyShape, HttpMethod, Location, Param, ParamKind,
    PreparedCall, VerbArgs, VerbDescriptor, VERBS,
};
pub use crate::client::{ClientConfig, MoltbookClient};
pub use crate::constants::*;
pub use crate::credentials::{Credential, CredentialSource, EnvFileCredentials, StaticCredential};
pub use crate::dispatch::{ensure_secure_addr, Dispatcher, Envelope};
pub use crate::error::{ErrorKind, MoltbookError, Result};
pub use crate::transport::{HttpTransport, RawResponse, Request, Transport};
pub use crate::types::*;
