use super::prompts::{prompt_required, ActionError, Echo, OperatorConsole};
use crate::domain::session::{Session, SessionToken};

/// Stores a token pasted by the operator. Nothing is checked remotely.
pub fn set_token(
    console: &mut dyn OperatorConsole,
    session: &mut Session,
    attempts: usize,
) -> Result<(), ActionError> {
    console.print_line("")?;
    console.print_line("# Setting token")?;
    let token = prompt_required(console, "Enter token: ", "token", attempts, Echo::Hidden)?;

    session.set_token(SessionToken::manual(token));
    tracing::info!("session token replaced manually");
    console.print_line("Token set.")?;

    Ok(())
}
