use std::io;

use thiserror::Error;

use super::contracts::{FailureClass, GatewayError};
use crate::domain::session::Session;

/// Line-oriented console the operator drives the menu through.
pub trait OperatorConsole {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    /// Returns `None` when input is closed.
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    /// Like `prompt_line`, without echoing what is typed.
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
    /// Reads a single key-press for the menu.
    fn read_choice(&mut self, prompt: &str) -> io::Result<Option<char>>;
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no token is set")]
    MissingToken,
    #[error("no active user is set")]
    MissingUser,
    #[error("{field} was left empty {attempts} times")]
    BlankInput { field: &'static str, attempts: usize },
    #[error("input cancelled")]
    Cancelled,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("console failure: {0}")]
    Console(#[from] io::Error),
}

impl ActionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "CHAT_NO_TOKEN",
            Self::MissingUser => "CHAT_NO_USER",
            Self::BlankInput { .. } => "INPUT_BLANK",
            Self::Cancelled => "INPUT_CANCELLED",
            Self::Gateway(error) => error.code(),
            Self::Console(_) => "CONSOLE_FAILURE",
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            Self::MissingToken => FailureClass::Authentication,
            Self::Gateway(error) => error.class(),
            _ => FailureClass::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    Visible,
    Hidden,
}

/// Prompts until a non-blank answer is given, at most `attempts` times.
pub fn prompt_required(
    console: &mut dyn OperatorConsole,
    prompt: &str,
    field: &'static str,
    attempts: usize,
    echo: Echo,
) -> Result<String, ActionError> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        let answer = match echo {
            Echo::Visible => console.prompt_line(prompt)?,
            Echo::Hidden => console.prompt_secret(prompt)?,
        };
        let Some(answer) = answer else {
            return Err(ActionError::Cancelled);
        };

        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_owned());
        }

        let left = attempts - attempt;
        if left > 0 {
            console.print_line(&format!("The {field} cannot be empty. Attempts left: {left}"))?;
        }
    }

    Err(ActionError::BlankInput { field, attempts })
}

pub fn require_token(session: &Session) -> Result<&str, ActionError> {
    session
        .token()
        .map(|token| token.value())
        .ok_or(ActionError::MissingToken)
}
