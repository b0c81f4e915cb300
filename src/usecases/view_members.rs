use super::{
    contracts::ChatGateway,
    listing::print_pages,
    prompts::{prompt_required, require_token, ActionError, Echo, OperatorConsole},
};
use crate::domain::{session::Session, thread::ThreadRef};

pub fn view_members(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    attempts: usize,
) -> Result<usize, ActionError> {
    console.print_line("")?;
    console.print_line("# Viewing members in a thread")?;
    let credential = require_token(session)?;

    let thread_id = prompt_required(
        console,
        "Enter thread id: ",
        "thread id",
        attempts,
        Echo::Visible,
    )?;
    let thread = ThreadRef::new(thread_id);

    let count = print_pages(
        console,
        chat.list_members(credential, &thread),
        "members",
        |member| member.display_name.clone(),
    )?;
    tracing::debug!(thread_id = thread.id(), count, "members listed");

    Ok(count)
}
