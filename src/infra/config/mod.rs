mod adapter;
mod app_config;
mod file_config;
mod loader;

pub use adapter::FileConfigAdapter;
pub use app_config::{AppConfig, ListingConfig, LogConfig, MenuConfig, RetryConfig, ServiceConfig};
pub use loader::load;
