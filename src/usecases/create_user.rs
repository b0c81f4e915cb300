use super::{
    contracts::IdentityGateway,
    prompts::{prompt_required, ActionError, Echo, OperatorConsole},
};
use crate::domain::{
    identity::{TokenScope, UserId},
    session::{Session, SessionToken},
};

const ISSUED_SCOPES: [TokenScope; 1] = [TokenScope::Chat];

/// Provisions a user, issues it a chat token and makes both current.
///
/// The session is only touched once both remote calls succeeded, so a failed
/// token request leaves the previous user and token in place.
pub fn create_user(
    console: &mut dyn OperatorConsole,
    session: &mut Session,
    identity: &dyn IdentityGateway,
    attempts: usize,
) -> Result<UserId, ActionError> {
    console.print_line("")?;
    console.print_line("# Provisioning a user")?;
    let username = prompt_required(
        console,
        "Enter user name: ",
        "user name",
        attempts,
        Echo::Visible,
    )?;

    let user_id = identity.create_user()?;
    tracing::info!(user_id = %user_id, "user provisioned");
    console.print_line("")?;
    console.print_line(&format!("Created a {username} user with ID: {user_id}"))?;

    console.print_line("Getting the authentication token")?;
    let token = identity.issue_token(&user_id, &ISSUED_SCOPES)?;
    let expires_on = token.expires_on;
    let token = SessionToken::issued(token);

    console.print_line("")?;
    console.print_line(&format!(
        "Issued a token with 'chat' scope that expires at {}:",
        expires_on.format("%Y-%m-%d %H:%M:%S UTC")
    ))?;
    console.print_line("Token: ")?;
    console.print_line(token.value())?;

    session.set_user(user_id.clone(), username);
    session.set_token(token);

    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_support::{FakeService, ScriptedConsole},
        usecases::contracts::GatewayError,
    };

    #[test]
    fn makes_new_user_and_chat_token_current() {
        let service = FakeService::default();
        let mut console = ScriptedConsole::new(vec![Some("alice")]);
        let mut session = Session::default();

        let user_id =
            create_user(&mut console, &mut session, &service, 3).expect("user must be created");

        assert_eq!(session.user_id(), Some(&user_id));
        assert_eq!(session.display_name(), Some("alice"));
        let token = session.token().expect("token must be stored");
        assert!(!token.value().is_empty());
        assert!(token.expires_on().is_some());
        assert_eq!(service.calls(), vec!["create_user", "issue_token"]);
    }

    #[test]
    fn prints_id_and_token() {
        let service = FakeService::default();
        let mut console = ScriptedConsole::new(vec![Some("alice")]);
        let mut session = Session::default();

        let user_id =
            create_user(&mut console, &mut session, &service, 3).expect("user must be created");

        assert!(console.printed(&format!("Created a alice user with ID: {user_id}")));
        assert!(console.printed("Issued a token with 'chat' scope"));
        assert!(console.printed(&format!("token-for-{user_id}")));
    }

    #[test]
    fn failed_provisioning_leaves_session_alone() {
        let service = FakeService::default();
        service.fail_next(GatewayError::Unauthorized { status: 401 });
        let mut console = ScriptedConsole::new(vec![Some("alice")]);
        let mut session = Session::default();

        let result = create_user(&mut console, &mut session, &service, 3);

        assert!(matches!(
            result,
            Err(ActionError::Gateway(GatewayError::Unauthorized { .. }))
        ));
        assert_eq!(session, Session::default());
    }

    #[test]
    fn blank_name_never_reaches_the_service() {
        let service = FakeService::default();
        let mut console = ScriptedConsole::new(vec![Some(""), Some("")]);
        let mut session = Session::default();

        let result = create_user(&mut console, &mut session, &service, 2);

        assert!(matches!(result, Err(ActionError::BlankInput { .. })));
        assert!(service.calls().is_empty());
    }
}
