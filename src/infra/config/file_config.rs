use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    domain::menu::InvalidChoicePolicy,
    infra::config::{AppConfig, ListingConfig, LogConfig, MenuConfig, RetryConfig, ServiceConfig},
};

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub service: Option<FileServiceConfig>,
    pub retry: Option<FileRetryConfig>,
    pub menu: Option<FileMenuConfig>,
    pub listing: Option<FileListingConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(service) = self.service {
            service.merge_into(&mut config.service);
        }

        if let Some(retry) = self.retry {
            retry.merge_into(&mut config.retry);
        }

        if let Some(menu) = self.menu {
            menu.merge_into(&mut config.menu);
        }

        if let Some(listing) = self.listing {
            listing.merge_into(&mut config.listing);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = Some(file);
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileServiceConfig {
    pub connection_string: Option<String>,
    pub endpoint: Option<String>,
    pub identity_api_version: Option<String>,
    pub chat_api_version: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileServiceConfig {
    fn merge_into(self, config: &mut ServiceConfig) {
        if let Some(connection_string) = self.connection_string {
            config.connection_string = Some(connection_string);
        }

        if let Some(endpoint) = self.endpoint {
            config.endpoint = Some(endpoint);
        }

        if let Some(version) = self.identity_api_version {
            config.identity_api_version = version;
        }

        if let Some(version) = self.chat_api_version {
            config.chat_api_version = version;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileRetryConfig {
    pub attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

impl FileRetryConfig {
    fn merge_into(self, config: &mut RetryConfig) {
        if let Some(attempts) = self.attempts {
            config.attempts = attempts;
        }

        if let Some(delay) = self.base_delay_ms {
            config.base_delay_ms = delay;
        }

        if let Some(delay) = self.max_delay_ms {
            config.max_delay_ms = delay;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileMenuConfig {
    pub invalid_choice: Option<InvalidChoicePolicy>,
    pub input_attempts: Option<usize>,
}

impl FileMenuConfig {
    fn merge_into(self, config: &mut MenuConfig) {
        if let Some(policy) = self.invalid_choice {
            config.invalid_choice = policy;
        }

        if let Some(attempts) = self.input_attempts {
            config.input_attempts = attempts;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileListingConfig {
    pub page_size: Option<u32>,
    pub thread_lookback_days: Option<u32>,
}

impl FileListingConfig {
    fn merge_into(self, config: &mut ListingConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }

        if let Some(days) = self.thread_lookback_days {
            config.thread_lookback_days = days;
        }
    }
}
