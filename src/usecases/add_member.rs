use super::{
    contracts::ChatGateway,
    prompts::{prompt_required, require_token, ActionError, Echo, OperatorConsole},
};
use crate::domain::{
    identity::UserId,
    session::Session,
    thread::{ThreadMember, ThreadRef},
};

pub fn add_member(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    attempts: usize,
) -> Result<ThreadMember, ActionError> {
    console.print_line("")?;
    console.print_line("# Adding a user to a chat thread")?;
    let credential = require_token(session)?;

    let thread_id = prompt_required(
        console,
        "Enter thread id: ",
        "thread id",
        attempts,
        Echo::Visible,
    )?;
    let user_id = prompt_required(console, "Enter user id: ", "user id", attempts, Echo::Visible)?;
    let display_name = prompt_required(
        console,
        "Enter display name: ",
        "display name",
        attempts,
        Echo::Visible,
    )?;

    let thread = ThreadRef::new(thread_id);
    let member = ThreadMember {
        user_id: UserId::new(user_id),
        display_name,
    };
    chat.add_members(credential, &thread, std::slice::from_ref(&member))?;

    tracing::info!(
        thread_id = thread.id(),
        user_id = %member.user_id,
        "member added to chat thread"
    );
    console.print_line(&format!("User {} added to thread", member.display_name))?;

    Ok(member)
}
