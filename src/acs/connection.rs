use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use url::Url;

use crate::infra::error::AppError;

/// Parsed `endpoint=…;accesskey=…` connection string of a Communication
/// Services resource.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    endpoint: Url,
    access_key: Vec<u8>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut endpoint = None;
        let mut access_key = None;

        for part in raw.split(';').map(str::trim).filter(|part| !part.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(invalid("connection string segments must look like key=value"));
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "endpoint" => endpoint = Some(value.trim()),
                "accesskey" => access_key = Some(value.trim()),
                other => tracing::debug!(key = other, "ignoring connection string segment"),
            }
        }

        let endpoint = endpoint.ok_or_else(|| invalid("connection string has no endpoint"))?;
        let access_key = access_key.ok_or_else(|| invalid("connection string has no accesskey"))?;

        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            access_key: STANDARD
                .decode(access_key)
                .map_err(|_| invalid("connection string accesskey is not valid base64"))?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn access_key(&self) -> &[u8] {
        &self.access_key
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

/// Parses a resource endpoint, normalising it to end with `/` so relative
/// joins keep the full path.
pub fn parse_endpoint(raw: &str) -> Result<Url, AppError> {
    let mut endpoint = Url::parse(raw).map_err(|source| AppError::ConfigInvalid {
        details: format!("endpoint {raw:?} is not a valid URL: {source}"),
    })?;

    if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
        return Err(invalid("endpoint must use http or https"));
    }
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }

    Ok(endpoint)
}

fn invalid(details: &str) -> AppError {
    AppError::ConfigInvalid {
        details: details.to_owned(),
    }
}
