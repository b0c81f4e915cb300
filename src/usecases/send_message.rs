//! Sends a text message to a thread on behalf of the active session.

use super::{
    contracts::ChatGateway,
    prompts::{prompt_required, require_token, ActionError, Echo, OperatorConsole},
};
use crate::domain::{
    message::{MessagePriority, OutgoingMessage},
    session::Session,
    thread::ThreadRef,
};

/// Prompts for a thread and a text, sends it with normal priority under the
/// session display name and returns the id the service assigned.
pub fn send_message(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    attempts: usize,
) -> Result<String, ActionError> {
    console.print_line("")?;
    console.print_line("# Sending a new message to a thread")?;
    let credential = require_token(session)?;

    let thread_id = prompt_required(
        console,
        "Enter thread id: ",
        "thread id",
        attempts,
        Echo::Visible,
    )?;
    let content = prompt_required(console, "Enter message: ", "message", attempts, Echo::Visible)?;

    let message = OutgoingMessage {
        content,
        priority: MessagePriority::Normal,
        sender_display_name: session.display_name().map(str::to_owned),
    };
    let thread = ThreadRef::new(thread_id);
    let message_id = chat.send_message(credential, &thread, &message)?;

    tracing::info!(thread_id = thread.id(), message_id = %message_id, "message sent");
    console.print_line(&format!("Message sent: {message_id}"))?;

    Ok(message_id)
}
