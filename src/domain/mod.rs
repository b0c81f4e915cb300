//! Domain layer: session context, chat entities and menu rules.

pub mod identity;
pub mod menu;
pub mod message;
pub mod session;
pub mod thread;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
