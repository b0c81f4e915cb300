//! Use case layer: menu actions, gateway contracts and orchestration.

pub mod add_member;
pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod create_thread;
pub mod create_user;
pub mod list_threads;
pub mod listing;
pub mod menu_loop;
pub mod paging;
pub mod prompts;
pub mod send_message;
pub mod set_token;
pub mod set_user;
pub mod view_members;
pub mod view_messages;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
