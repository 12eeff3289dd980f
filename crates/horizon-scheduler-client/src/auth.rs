//! Credential forwarding and client identification metadata.
//!
//! The transport never mints or refreshes credentials. It accepts
//! pre-resolved material from the caller (or loads it from a file the
//! caller points at) and forwards it on every call as an `authorization`
//! bearer entry. Acquiring and refreshing tokens is the job of an outside
//! collaborator.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tonic::metadata::{Ascii, KeyAndValueRef, MetadataMap, MetadataValue};

use crate::error::{Result, SchedulerError};

/// Scope requested when the caller does not supply an explicit list.
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Environment variable consulted for ambient credential resolution. Its
/// value is a path to a credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Pre-resolved credentials attached to every call.
///
/// The token is treated as opaque: it is forwarded verbatim and never
/// inspected, validated or refreshed here.
#[derive(Clone)]
pub struct Credentials {
    token: String,
    scopes: Vec<String>,
}

/// On-disk shape of a credentials file. Only the token is required; the
/// remaining fields of the various file formats are irrelevant here.
#[derive(Deserialize)]
struct CredentialsFile {
    token: String,
}

impl Credentials {
    /// Wrap an already-resolved bearer token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scopes: Vec::new(),
        }
    }

    /// Load credentials from a JSON file.
    ///
    /// The requested scopes are recorded alongside the token so the
    /// resolving collaborator can be audited later.
    pub fn from_file(path: impl AsRef<Path>, scopes: &[String]) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SchedulerError::Credentials(format!(
                "failed to read credentials file {}: {e}",
                path.display()
            ))
        })?;
        let file: CredentialsFile = serde_json::from_str(&contents).map_err(|e| {
            SchedulerError::Credentials(format!(
                "failed to parse credentials file {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            token: file.token,
            scopes: scopes.to_vec(),
        })
    }

    /// Resolve credentials from the ambient environment.
    ///
    /// Follows the `GOOGLE_APPLICATION_CREDENTIALS` convention: the
    /// variable names a credentials file to load. Fails when the variable
    /// is unset rather than guessing.
    pub fn ambient(scopes: &[String]) -> Result<Self> {
        let path = std::env::var(CREDENTIALS_ENV).map_err(|_| {
            SchedulerError::Credentials(format!(
                "no credentials supplied and {CREDENTIALS_ENV} is not set"
            ))
        })?;
        Self::from_file(path, scopes)
    }

    /// The opaque bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Scopes these credentials were resolved for. Empty when the token
    /// was supplied directly by the caller.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Identifies this client library to the service.
///
/// Rendered into the `x-goog-api-client` metadata entry. Construct one
/// explicitly to report a different library name or version; `Default`
/// uses the package metadata of this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientInfo {
    /// Library name reported to the service.
    pub library_name: String,
    /// Library version reported to the service.
    pub library_version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            library_name: env!("CARGO_PKG_NAME").to_string(),
            library_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ClientInfo {
    /// The metadata value sent as `x-goog-api-client`.
    pub fn as_header_value(&self) -> String {
        format!("gl-rust {}/{}", self.library_name, self.library_version)
    }
}

/// Baseline metadata attached to every outgoing request: authorization,
/// quota project and client identification. Assembled once at transport
/// construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallContext {
    metadata: MetadataMap,
}

impl CallContext {
    pub(crate) fn new(
        credentials: Option<&Credentials>,
        quota_project_id: Option<&str>,
        client_info: &ClientInfo,
    ) -> Result<Self> {
        let mut metadata = MetadataMap::new();
        if let Some(credentials) = credentials {
            let value: MetadataValue<Ascii> = format!("Bearer {}", credentials.token())
                .parse()
                .map_err(|_| {
                    SchedulerError::Configuration(
                        "credential token is not a valid metadata value".into(),
                    )
                })?;
            metadata.insert("authorization", value);
        }
        if let Some(project) = quota_project_id {
            let value: MetadataValue<Ascii> = project.parse().map_err(|_| {
                SchedulerError::Configuration(
                    "quota project id is not a valid metadata value".into(),
                )
            })?;
            metadata.insert("x-goog-user-project", value);
        }
        let value: MetadataValue<Ascii> =
            client_info.as_header_value().parse().map_err(|_| {
                SchedulerError::Configuration(
                    "client info is not a valid metadata value".into(),
                )
            })?;
        metadata.insert("x-goog-api-client", value);
        Ok(Self { metadata })
    }

    /// Copy the baseline entries into an outgoing request's metadata.
    pub(crate) fn apply(&self, target: &mut MetadataMap) {
        for entry in self.metadata.iter() {
            if let KeyAndValueRef::Ascii(key, value) = entry {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }
}
