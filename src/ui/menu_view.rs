use crate::domain::{menu::MenuChoice, session::Session};

pub const CHOICE_PROMPT: &str = "Enter choice: ";

/// Lines shown every time the menu comes up: session summary, then options.
pub fn render(session: &Session) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "# Azure Communication Services - Demo".to_owned(),
        String::new(),
        format!("# Token: {}", token_label(session)),
        format!(
            "# User: {}",
            session.user_id().map(|id| id.as_str()).unwrap_or_default()
        ),
        format!("# Display name: {}", session.display_name().unwrap_or_default()),
        String::new(),
        "Select option: ".to_owned(),
    ];

    lines.extend(
        MenuChoice::ALL
            .iter()
            .map(|choice| format!(" {}) {}", choice.key(), choice.label())),
    );
    lines
}

fn token_label(session: &Session) -> String {
    match session.token() {
        None => "False".to_owned(),
        Some(token) => match token.expires_on() {
            Some(expires_on) => format!(
                "True (expires {})",
                expires_on.format("%Y-%m-%d %H:%M UTC")
            ),
            None => "True".to_owned(),
        },
    }
}
