use super::prompts::{prompt_required, ActionError, Echo, OperatorConsole};
use crate::domain::{identity::UserId, session::Session};

/// Selects the user later actions run as. The id is not checked against the
/// token in the session.
pub fn set_user(
    console: &mut dyn OperatorConsole,
    session: &mut Session,
    attempts: usize,
) -> Result<(), ActionError> {
    console.print_line("")?;
    console.print_line("# Setting user")?;
    let user_id = prompt_required(console, "Enter user id: ", "user id", attempts, Echo::Visible)?;
    let display_name = prompt_required(
        console,
        "Enter display name: ",
        "display name",
        attempts,
        Echo::Visible,
    )?;

    tracing::info!(user_id = %user_id, "active user replaced");
    session.set_user(UserId::new(user_id), display_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::session::SessionToken, test_support::ScriptedConsole};

    #[test]
    fn sets_user_and_display_name() {
        let mut console = ScriptedConsole::new(vec![Some("8:acs:bob"), Some("Bob")]);
        let mut session = Session::default();

        set_user(&mut console, &mut session, 3).expect("user must be set");

        assert_eq!(session.user_id(), Some(&UserId::new("8:acs:bob")));
        assert_eq!(session.display_name(), Some("Bob"));
    }

    #[test]
    fn leaves_token_untouched() {
        let mut console = ScriptedConsole::new(vec![Some("8:acs:bob"), Some("Bob")]);
        let mut session = Session::default();
        session.set_token(SessionToken::manual("token-of-someone-else"));

        set_user(&mut console, &mut session, 3).expect("user must be set");

        assert_eq!(
            session.token().map(SessionToken::value),
            Some("token-of-someone-else")
        );
    }

    #[test]
    fn cancel_during_display_name_changes_nothing() {
        let mut console = ScriptedConsole::new(vec![Some("8:acs:bob"), None]);
        let mut session = Session::default();

        let result = set_user(&mut console, &mut session, 3);

        assert!(matches!(result, Err(ActionError::Cancelled)));
        assert!(session.user_id().is_none());
    }
}
