//! Communication Services integration layer: REST clients and wire mapping.

pub mod chat;
pub mod connection;
pub mod identity;
mod signing;
pub mod transport;
mod wire;

/// Returns the acs module name for smoke checks.
pub fn module_name() -> &'static str {
    "acs"
}
