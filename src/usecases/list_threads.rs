use chrono::{Duration, Utc};

use super::{
    contracts::ChatGateway,
    listing::print_pages,
    prompts::{require_token, ActionError, OperatorConsole},
};
use crate::domain::session::Session;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 5;

/// Prints `id: topic` for every thread with activity inside the look-back
/// window.
pub fn list_threads(
    console: &mut dyn OperatorConsole,
    session: &Session,
    chat: &dyn ChatGateway,
    lookback: Duration,
) -> Result<usize, ActionError> {
    console.print_line("")?;
    console.print_line("# Viewing all threads")?;
    let credential = require_token(session)?;

    let since = Utc::now() - lookback;
    let count = print_pages(
        console,
        chat.list_threads(credential, since),
        "threads",
        |thread| format!("{}: {}", thread.id, thread.topic),
    )?;
    tracing::debug!(since = %since, count, "threads listed");

    Ok(count)
}
