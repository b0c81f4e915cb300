use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    acs::connection::{parse_endpoint, ConnectionString},
    domain::menu::InvalidChoicePolicy,
    infra::error::AppError,
};

pub const DEFAULT_IDENTITY_API_VERSION: &str = "2023-10-01";
pub const DEFAULT_CHAT_API_VERSION: &str = "2021-09-07";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub service: ServiceConfig,
    pub retry: RetryConfig,
    pub menu: MenuConfig,
    pub listing: ListingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.service.request_timeout_ms == 0 {
            return Err(invalid("service.request_timeout_ms must be greater than zero"));
        }
        if self.retry.attempts == 0 {
            return Err(invalid("retry.attempts must be at least 1"));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(invalid("retry.base_delay_ms must not exceed retry.max_delay_ms"));
        }
        if self.menu.input_attempts == 0 {
            return Err(invalid("menu.input_attempts must be at least 1"));
        }
        if !(1..=200).contains(&self.listing.page_size) {
            return Err(invalid("listing.page_size must be between 1 and 200"));
        }
        if self.listing.thread_lookback_days == 0 {
            return Err(invalid("listing.thread_lookback_days must be at least 1"));
        }

        self.service.connection()?;
        self.service.chat_endpoint()?;
        Ok(())
    }
}

fn invalid(details: &str) -> AppError {
    AppError::ConfigInvalid {
        details: details.to_owned(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// Log file; defaults to `acs-chat.log` in the state log directory.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    pub connection_string: Option<String>,
    /// Chat endpoint; derived from the connection string when absent.
    pub endpoint: Option<String>,
    pub identity_api_version: String,
    pub chat_api_version: String,
    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            endpoint: None,
            identity_api_version: DEFAULT_IDENTITY_API_VERSION.to_owned(),
            chat_api_version: DEFAULT_CHAT_API_VERSION.to_owned(),
            request_timeout_ms: 30_000,
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoint", &self.endpoint)
            .field("identity_api_version", &self.identity_api_version)
            .field("chat_api_version", &self.chat_api_version)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl ServiceConfig {
    pub fn connection(&self) -> Result<Option<ConnectionString>, AppError> {
        self.connection_string
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(ConnectionString::parse)
            .transpose()
    }

    /// Explicit endpoint first, then the connection string's endpoint.
    pub fn chat_endpoint(&self) -> Result<Option<Url>, AppError> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|raw| !raw.trim().is_empty()) {
            return parse_endpoint(endpoint.trim()).map(Some);
        }

        Ok(self
            .connection()?
            .map(|connection| connection.endpoint().clone()))
    }

    /// Host of the chat endpoint, safe to log.
    pub fn endpoint_label(&self) -> String {
        match self.chat_endpoint() {
            Ok(Some(endpoint)) => endpoint.host_str().unwrap_or("unknown").to_owned(),
            Ok(None) => "unset".to_owned(),
            Err(_) => "invalid".to_owned(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuConfig {
    pub invalid_choice: InvalidChoicePolicy,
    pub input_attempts: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            invalid_choice: InvalidChoicePolicy::default(),
            input_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingConfig {
    pub page_size: u32,
    pub thread_lookback_days: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            thread_lookback_days: 5,
        }
    }
}
