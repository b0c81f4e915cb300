use std::time::Duration;

use chrono::Utc;
use reqwest::{header::RETRY_AFTER, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::runtime::{Builder, Runtime};
use url::Url;

use super::{
    connection::ConnectionString,
    signing::{self, CONTENT_HASH_HEADER, DATE_HEADER},
};
use crate::{
    infra::{config::RetryConfig, error::AppError, secrets::redact_text},
    usecases::contracts::GatewayError,
};

const USER_AGENT: &str = concat!("acs-chat/", env!("CARGO_PKG_VERSION"));
pub const API_VERSION_PARAM: &str = "api-version";
const MAX_ERROR_MESSAGE_LEN: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`; a server hint wins when present.
    pub fn delay_after(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint.min(self.max_delay);
        }

        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Credential a request is sent under.
pub enum Auth<'a> {
    Hmac(&'a ConnectionString),
    Bearer(&'a str),
}

pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
    pub headers: Vec<(&'static str, String)>,
    /// Safe to resend after the service may already have acted on it.
    pub idempotent: bool,
    /// Named in the not-found error, e.g. "thread 19:abc".
    pub resource: String,
}

impl RequestSpec {
    pub fn new(method: Method, url: Url, resource: impl Into<String>) -> Self {
        Self {
            idempotent: method == Method::GET,
            method,
            url,
            body: None,
            headers: Vec::new(),
            resource: resource.into(),
        }
    }

    pub fn json_body(mut self, body: &impl serde::Serialize) -> Result<Self, GatewayError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|error| GatewayError::InvalidData(format!("request encoding: {error}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }
}

/// HTTP plumbing shared by the identity and chat adapters.
///
/// Calls are driven to completion on a private current-thread runtime, so
/// the adapters stay synchronous and only one request is ever in flight.
pub struct AcsTransport {
    runtime: Runtime,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl AcsTransport {
    pub fn new(request_timeout: Duration, retry: RetryPolicy) -> Result<Self, AppError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| AppError::TransportInit(source.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| AppError::TransportInit(source.to_string()))?;

        Ok(Self {
            runtime,
            client,
            retry,
        })
    }

    pub fn send_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        auth: &Auth<'_>,
    ) -> Result<T, GatewayError> {
        let body = self.send(spec, auth)?;
        decode(&body)
    }

    /// Sends `spec`, retrying transient failures per the retry policy, and
    /// returns the body of the first successful response.
    pub fn send(&self, spec: &RequestSpec, auth: &Auth<'_>) -> Result<Vec<u8>, GatewayError> {
        self.runtime.block_on(async {
            let mut attempt = 1;
            loop {
                let outcome = self.send_once(spec, auth).await;
                let (error, retry_after, resend_safe) = match outcome {
                    Ok(body) => return Ok(body),
                    Err(failure) => failure,
                };

                let retryable = matches!(error, GatewayError::Transient { .. })
                    && (spec.idempotent || resend_safe);
                if !retryable || attempt >= self.retry.attempts {
                    return Err(error);
                }

                let delay = self.retry.delay_after(attempt, retry_after);
                tracing::warn!(
                    method = %spec.method,
                    path = spec.url.path(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    code = error.code(),
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        })
    }

    /// On failure also returns the server's retry hint and whether the
    /// request certainly was not processed.
    async fn send_once(
        &self,
        spec: &RequestSpec,
        auth: &Auth<'_>,
    ) -> Result<Vec<u8>, (GatewayError, Option<Duration>, bool)> {
        let request = self
            .build_request(spec, auth)
            .map_err(|error| (error, None, false))?;

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                let never_sent = source.is_connect();
                return Err((classify_transport(&source), None, never_sent));
            }
        };

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response
            .bytes()
            .await
            .map_err(|source| (classify_transport(&source), None, false))?;

        tracing::debug!(
            method = %spec.method,
            path = spec.url.path(),
            status = status.as_u16(),
            "service responded"
        );

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let throttled = status == StatusCode::TOO_MANY_REQUESTS;
        Err((
            classify_status(status.as_u16(), &body, &spec.resource),
            retry_after,
            throttled,
        ))
    }

    fn build_request(
        &self,
        spec: &RequestSpec,
        auth: &Auth<'_>,
    ) -> Result<reqwest::RequestBuilder, GatewayError> {
        let body = spec.body.clone().unwrap_or_default();
        let mut request = self.client.request(spec.method.clone(), spec.url.clone());

        request = match auth {
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::Hmac(connection) => {
                let signed = signing::sign(
                    spec.method.as_str(),
                    &spec.url,
                    &body,
                    connection.access_key(),
                    Utc::now(),
                )?;
                request
                    .header(DATE_HEADER, signed.date)
                    .header(CONTENT_HASH_HEADER, signed.content_hash)
                    .header(reqwest::header::AUTHORIZATION, signed.authorization)
            }
        };

        for (name, value) in &spec.headers {
            request = request.header(*name, value);
        }
        if spec.body.is_some() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        Ok(request)
    }
}

/// Appends `segments` to the endpoint path, each one percent-encoded as a
/// single segment, and names the api version.
pub fn service_url(
    endpoint: &Url,
    segments: &[&str],
    api_version: &str,
) -> Result<Url, GatewayError> {
    if let Some(bad) = segments.iter().find(|segment| is_relative_segment(segment)) {
        return Err(GatewayError::Validation {
            message: format!("{bad:?} is not a valid id"),
        });
    }

    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidData(format!("endpoint {endpoint} has no path")))?
        .pop_if_empty()
        .extend(segments);
    url.query_pairs_mut()
        .append_pair(API_VERSION_PARAM, api_version);
    Ok(url)
}

/// Empty, `.` and `..` segments (encoded or not) would be dropped or
/// collapsed by the URL parser.
fn is_relative_segment(segment: &str) -> bool {
    let decoded = segment.replace("%2e", ".").replace("%2E", ".");
    decoded.is_empty() || decoded == "." || decoded == ".."
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|error| GatewayError::InvalidData(format!("response decoding: {error}")))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Maps a non-success status and its body onto the gateway taxonomy.
pub fn classify_status(status: u16, body: &[u8], resource: &str) -> GatewayError {
    let message = service_message(status, body);

    match status {
        401 | 403 => GatewayError::Unauthorized { status },
        404 => GatewayError::NotFound {
            resource: resource.to_owned(),
        },
        408 => GatewayError::Transient {
            code: "CHAT_TIMEOUT",
            message,
        },
        429 => GatewayError::Transient {
            code: "CHAT_THROTTLED",
            message,
        },
        500..=599 => GatewayError::Transient {
            code: "CHAT_UNAVAILABLE",
            message,
        },
        _ => GatewayError::Validation { message },
    }
}

fn service_message(status: u16, body: &[u8]) -> String {
    let message = match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match (error.code, error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(text), None) | (None, Some(text)) => text,
            (None, None) => format!("HTTP {status}"),
        },
        Err(_) if body.is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", String::from_utf8_lossy(body)),
    };

    let mut message = redact_text(&message);
    if message.len() > MAX_ERROR_MESSAGE_LEN {
        let mut cut = MAX_ERROR_MESSAGE_LEN;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
        message.push('…');
    }
    message
}

fn classify_transport(error: &reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Transient {
            code: "CHAT_TIMEOUT",
            message: "request timed out".to_owned(),
        }
    } else if error.is_connect() {
        GatewayError::Transient {
            code: "CHAT_UNREACHABLE",
            message: "could not connect to the service".to_owned(),
        }
    } else if error.is_decode() {
        GatewayError::InvalidData(error.to_string())
    } else {
        GatewayError::Transient {
            code: "CHAT_TRANSPORT",
            message: redact_text(&error.to_string()),
        }
    }
}
