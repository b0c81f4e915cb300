use super::{
    contracts::ChatGateway,
    listing::print_pages,
    prompts::{prompt_required, require_token, ActionError, Echo, OperatorConsole},
};
use crate::domain::{session::Session, thread::ThreadRef};

/// Prints `id: sender: content` for every message of a thread, page by page.
pub fn view_messages(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    attempts: usize,
) -> Result<usize, ActionError> {
    console.print_line("")?;
    console.print_line("# Viewing messages in a thread")?;
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
        chat.list_messages(credential, &thread),
        "messages",
        |message| {
            format!(
                "{}: {}: {}",
                message.id,
                message.sender_label(),
                message.content
            )
        },
    )?;
    tracing::debug!(thread_id = thread.id(), count, "messages listed");

    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        domain::{identity::UserId, session::SessionToken},
        test_support::{FakeService, ScriptedConsole},
        usecases::{contracts::GatewayError, send_message::send_message},
    };

    fn session() -> Session {
        let mut session = Session::default();
        session.set_user(UserId::new("8:acs:alice"), "Alice");
        session.set_token(SessionToken::manual("token"));
        session
    }

    #[test]
    fn sent_message_shows_up_in_listing() {
        let service = FakeService::default();
        service.seed_thread("19:t", "Topic", Duration::minutes(1));
        let session = session();
        let mut console = ScriptedConsole::new(vec![Some("19:t"), Some("hello"), Some("19:t")]);

        let id = send_message(&mut console, &session, &service, 3).expect("message sent");
        let count = view_messages(&mut console, &session, &service, 3).expect("messages listed");

        assert_eq!(count, 1);
        assert!(console.printed(&format!("{id}: 8:acs:token: hello")));
        let listed = service
            .list_messages("token", &ThreadRef::new("19:t"))
            .collect_items()
            .expect("messages must list");
        assert_eq!(listed[0].sender_display_name.as_deref(), Some("Alice"));
        assert_eq!(listed[0].content, "hello");
    }

    #[test]
    fn prints_all_pages_in_service_order() {
        let service = FakeService::with_page_size(2);
        service.seed_thread("19:t", "Topic", Duration::minutes(1));
        let session = session();
        let mut console = ScriptedConsole::new(vec![
            Some("19:t"),
            Some("one"),
            Some("19:t"),
            Some("two"),
            Some("19:t"),
            Some("three"),
            Some("19:t"),
        ]);
        for _ in 0..3 {
            send_message(&mut console, &session, &service, 3).expect("message sent");
        }
        console.output.clear();

        let count = view_messages(&mut console, &session, &service, 3).expect("messages listed");

        assert_eq!(count, 3);
        let contents: Vec<&str> = console
            .output
            .iter()
            .filter_map(|line| line.rsplit(": ").next())
            .filter(|tail| ["one", "two", "three"].contains(tail))
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert!(console.printed("-- page 2 --"));
    }

    #[test]
    fn expired_token_is_reported() {
        let service = FakeService::default();
        service.fail_next(GatewayError::Unauthorized { status: 401 });
        let mut console = ScriptedConsole::new(vec![Some("19:t")]);

        let error =
            view_messages(&mut console, &session(), &service, 3).expect_err("must be rejected");

        assert_eq!(error.code(), "CHAT_UNAUTHORIZED");
    }
}
