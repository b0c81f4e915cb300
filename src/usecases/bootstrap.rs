use std::path::Path;

use chrono::Duration;

use crate::{
    acs::{
        chat::HttpChatGateway,
        identity::HttpIdentityGateway,
        transport::{AcsTransport, RetryPolicy},
    },
    domain::menu::InvalidChoicePolicy,
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::ConfigAdapter,
        error::AppError,
        storage_layout::StorageLayout,
    },
    usecases::{context::AppContext, menu_loop::MenuSettings},
};

/// Command-line values that win over every config source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub invalid_choice: Option<InvalidChoicePolicy>,
}

pub fn bootstrap(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<AppContext, AppError> {
    let mut context = build_context(config_path, overrides)?;

    let log_file = match context.config.logging.file.clone() {
        Some(file) => file,
        None => {
            let layout = StorageLayout::resolve()?;
            layout.ensure_dirs()?;
            layout.log_file()
        }
    };
    context.log_guard = Some(infra::logging::init(&context.config.logging, &log_file)?);
    tracing::info!(log_file = %log_file.display(), "logging initialised");

    Ok(context)
}

fn build_context(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let mut config = config_adapter.load().map_err(AppError::Other)?;

    if let Some(policy) = overrides.invalid_choice {
        config.menu.invalid_choice = policy;
    }

    Ok(AppContext::new(config))
}

pub fn build_transport(config: &AppConfig) -> Result<AcsTransport, AppError> {
    AcsTransport::new(
        config.service.request_timeout(),
        RetryPolicy::from(&config.retry),
    )
}

pub fn identity_gateway<'a>(
    transport: &'a AcsTransport,
    config: &AppConfig,
) -> Result<HttpIdentityGateway<'a>, AppError> {
    Ok(HttpIdentityGateway::new(
        transport,
        config.service.connection()?,
        config.service.identity_api_version.clone(),
    ))
}

pub fn chat_gateway<'a>(
    transport: &'a AcsTransport,
    config: &AppConfig,
) -> Result<HttpChatGateway<'a>, AppError> {
    Ok(HttpChatGateway::new(
        transport,
        config.service.chat_endpoint()?,
        config.service.chat_api_version.clone(),
        config.listing.page_size,
    ))
}

pub fn menu_settings(config: &AppConfig) -> MenuSettings {
    MenuSettings {
        invalid_choice: config.menu.invalid_choice,
        input_attempts: config.menu.input_attempts,
        thread_lookback: Duration::days(i64::from(config.listing.thread_lookback_days)),
    }
}
