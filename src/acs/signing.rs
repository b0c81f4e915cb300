//! HMAC-SHA256 request signing for the identity API.
//!
//! The string to sign is `VERB\npath?query\ndate;host;content-hash`, keyed
//! with the decoded access key of the connection string.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use crate::usecases::contracts::GatewayError;

type HmacSha256 = Hmac<Sha256>;

pub const DATE_HEADER: &str = "x-ms-date";
pub const CONTENT_HASH_HEADER: &str = "x-ms-content-sha256";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub date: String,
    pub content_hash: String,
    pub authorization: String,
}

pub fn sign(
    method: &str,
    url: &Url,
    body: &[u8],
    access_key: &[u8],
    at: DateTime<Utc>,
) -> Result<SignedHeaders, GatewayError> {
    let date = at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    let content_hash = STANDARD.encode(Sha256::digest(body));

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => {
            return Err(GatewayError::NotConfigured(
                "identity endpoint has no host".to_owned(),
            ))
        }
    };
    let path_and_query = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    };
    let string_to_sign = format!(
        "{}\n{path_and_query}\n{date};{host};{content_hash}",
        method.to_ascii_uppercase()
    );

    let mut mac = HmacSha256::new_from_slice(access_key)
        .map_err(|_| GatewayError::NotConfigured("access key cannot be used".to_owned()))?;
    mac.update(string_to_sign.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(SignedHeaders {
        authorization: format!(
            "HMAC-SHA256 SignedHeaders={DATE_HEADER};host;{CONTENT_HASH_HEADER}&Signature={signature}"
        ),
        date,
        content_hash,
    })
}
