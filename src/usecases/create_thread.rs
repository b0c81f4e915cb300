use super::{
    contracts::ChatGateway,
    prompts::{prompt_required, require_token, ActionError, Echo, OperatorConsole},
};
use crate::domain::{session::Session, thread::ChatThread};

/// Creates a thread with the active user as its only member.
pub fn create_thread(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    attempts: usize,
) -> Result<ChatThread, ActionError> {
    console.print_line("")?;
    console.print_line("# Creating a new chat thread")?;
    let credential = require_token(session)?;
    let creator = session.active_member().ok_or(ActionError::MissingUser)?;

    let topic = prompt_required(
        console,
        "Enter thread topic: ",
        "topic",
        attempts,
        Echo::Visible,
    )?;

    let thread = chat.create_thread(credential, &topic, std::slice::from_ref(&creator))?;
    tracing::info!(thread_id = %thread.id, "chat thread created");
    console.print_line(&format!("Chat thread ID: {}", thread.id))?;

    Ok(thread)
}
