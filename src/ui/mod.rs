//! UI layer: console I/O and menu rendering.

mod menu_view;
pub mod shell;
pub mod terminal;

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
