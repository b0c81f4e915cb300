use std::io;

use chrono::Duration;

use super::{
    add_member::add_member,
    contracts::{ChatGateway, FailureClass, IdentityGateway},
    create_thread::create_thread,
    create_user::create_user,
    list_threads::{list_threads, DEFAULT_LOOKBACK_DAYS},
    prompts::{ActionError, OperatorConsole},
    send_message::send_message,
    set_token::set_token,
    set_user::set_user,
    view_members::view_members,
    view_messages::view_messages,
};
use crate::{
    domain::{
        menu::{InvalidChoicePolicy, MenuChoice},
        session::Session,
    },
    infra::secrets::redact_text,
};

const AUTH_HINT: &str = "Set a token with option 0 or create a user and token with option 2.";
const TRANSIENT_HINT: &str = "The service did not answer after several attempts. Try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSettings {
    pub invalid_choice: InvalidChoicePolicy,
    pub input_attempts: usize,
    pub thread_lookback: Duration,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            invalid_choice: InvalidChoicePolicy::default(),
            input_attempts: 3,
            thread_lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
        }
    }
}

/// Why the menu stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    Quit,
    InputClosed,
    InvalidChoice,
}

impl MenuExit {
    /// Process status: 0, or -1 as the platform reports it.
    pub fn status(self) -> u8 {
        match self {
            Self::Quit | Self::InputClosed => 0,
            Self::InvalidChoice => 255,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuStep {
    Continue,
    Exit(MenuExit),
}

/// Owns the session and turns menu keys into actions.
///
/// Failures of an action are reported on the console and the menu carries
/// on; only console I/O errors escape.
pub struct MenuOrchestrator<'a> {
    session: Session,
    identity: &'a dyn IdentityGateway,
    chat: &'a dyn ChatGateway,
    settings: MenuSettings,
    strike_pending: bool,
}

impl<'a> MenuOrchestrator<'a> {
    pub fn new(
        identity: &'a dyn IdentityGateway,
        chat: &'a dyn ChatGateway,
        settings: MenuSettings,
    ) -> Self {
        Self {
            session: Session::default(),
            identity,
            chat,
            settings,
            strike_pending: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handle_key(
        &mut self,
        console: &mut dyn OperatorConsole,
        key: char,
    ) -> io::Result<MenuStep> {
        let Some(choice) = MenuChoice::from_key(key) else {
            return self.handle_invalid(console, key);
        };

        tracing::debug!(choice = ?choice, "menu choice");
        if choice == MenuChoice::Exit {
            return Ok(MenuStep::Exit(MenuExit::Quit));
        }

        self.dispatch(console, choice)?;

        if self.strike_pending {
            return Ok(MenuStep::Exit(MenuExit::InvalidChoice));
        }
        Ok(MenuStep::Continue)
    }

    fn handle_invalid(
        &mut self,
        console: &mut dyn OperatorConsole,
        key: char,
    ) -> io::Result<MenuStep> {
        tracing::warn!(key = ?key, policy = ?self.settings.invalid_choice, "invalid menu choice");

        match self.settings.invalid_choice {
            InvalidChoicePolicy::Reprompt => {
                console.print_line("")?;
                console.print_line("Unknown option. Choose a number from 0 to 9.")?;
                Ok(MenuStep::Continue)
            }
            InvalidChoicePolicy::Exit => Ok(MenuStep::Exit(MenuExit::InvalidChoice)),
            InvalidChoicePolicy::RetryOnce if self.strike_pending => {
                Ok(MenuStep::Exit(MenuExit::InvalidChoice))
            }
            InvalidChoicePolicy::RetryOnce => {
                self.strike_pending = true;
                Ok(MenuStep::Continue)
            }
        }
    }

    fn dispatch(
        &mut self,
        console: &mut dyn OperatorConsole,
        choice: MenuChoice,
    ) -> io::Result<()> {
        let attempts = self.settings.input_attempts;
        let result = match choice {
            MenuChoice::SetToken => set_token(console, &mut self.session, attempts),
            MenuChoice::SetUser => set_user(console, &mut self.session, attempts),
            MenuChoice::CreateUser => {
                create_user(console, &mut self.session, self.identity, attempts).map(drop)
            }
            MenuChoice::CreateThread => {
                create_thread(console, &self.session, self.chat, attempts).map(drop)
            }
            MenuChoice::AddMember => {
                add_member(console, &self.session, self.chat, attempts).map(drop)
            }
            MenuChoice::SendMessage => {
                send_message(console, &self.session, self.chat, attempts).map(drop)
            }
            MenuChoice::ViewMessages => {
                view_messages(console, &self.session, self.chat, attempts).map(drop)
            }
            MenuChoice::ViewMembers => {
                view_members(console, &self.session, self.chat, attempts).map(drop)
            }
            MenuChoice::ViewThreads => list_threads(
                console,
                &self.session,
                self.chat,
                self.settings.thread_lookback,
            )
            .map(drop),
            MenuChoice::Exit => Ok(()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(ActionError::Console(source)) => Err(source),
            Err(error) => report_failure(console, choice, &error),
        }
    }
}

fn report_failure(
    console: &mut dyn OperatorConsole,
    choice: MenuChoice,
    error: &ActionError,
) -> io::Result<()> {
    let message = redact_text(&error.to_string());
    tracing::warn!(
        choice = ?choice,
        code = error.code(),
        class = ?error.class(),
        error = %message,
        "menu action failed"
    );

    console.print_line("")?;
    if matches!(error, ActionError::Cancelled) {
        return console.print_line("Input cancelled. Back to the menu.");
    }

    console.print_line(&format!("{}: {message}", error.code()))?;
    match error.class() {
        FailureClass::Authentication => console.print_line(AUTH_HINT),
        FailureClass::Transient => console.print_line(TRANSIENT_HINT),
        FailureClass::NotFound => console.print_line("Check the id and try again."),
        FailureClass::Validation => Ok(()),
    }
}
