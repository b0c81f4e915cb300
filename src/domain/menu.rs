use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SetToken,
    SetUser,
    CreateUser,
    CreateThread,
    AddMember,
    SendMessage,
    ViewMessages,
    ViewMembers,
    ViewThreads,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 10] = [
        Self::SetToken,
        Self::SetUser,
        Self::CreateUser,
        Self::CreateThread,
        Self::AddMember,
        Self::SendMessage,
        Self::ViewMessages,
        Self::ViewMembers,
        Self::ViewThreads,
        Self::Exit,
    ];

    pub fn from_key(key: char) -> Option<Self> {
        let index = key.to_digit(10)? as usize;
        Self::ALL.get(index).copied()
    }

    pub fn key(self) -> char {
        match self {
            Self::SetToken => '0',
            Self::SetUser => '1',
            Self::CreateUser => '2',
            Self::CreateThread => '3',
            Self::AddMember => '4',
            Self::SendMessage => '5',
            Self::ViewMessages => '6',
            Self::ViewMembers => '7',
            Self::ViewThreads => '8',
            Self::Exit => '9',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SetToken => "Set token",
            Self::SetUser => "Set user",
            Self::CreateUser => "Create new user and token",
            Self::CreateThread => "Create new chat thread",
            Self::AddMember => "Add user to an existing chat thread",
            Self::SendMessage => "Send message to a thread",
            Self::ViewMessages => "View messages in a thread",
            Self::ViewMembers => "View members in a thread",
            Self::ViewThreads => "View all threads",
            Self::Exit => "Exit",
        }
    }
}

/// What the menu does with a key that maps to no option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidChoicePolicy {
    /// Show the menu again.
    #[default]
    Reprompt,
    /// Terminate with a failure status straight away.
    Exit,
    /// Show the menu one more time, handle that input, then terminate with a
    /// failure status.
    RetryOnce,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_options_in_menu_order() {
        for (index, choice) in MenuChoice::ALL.iter().enumerate() {
            let key = char::from_digit(index as u32, 10).expect("single digit");
            assert_eq!(MenuChoice::from_key(key), Some(*choice));
            assert_eq!(choice.key(), key);
        }
    }

    #[test]
    fn non_digit_keys_map_to_nothing() {
        for key in ['a', 'q', ' ', '\n', '-'] {
            assert_eq!(MenuChoice::from_key(key), None);
        }
    }

    #[test]
    fn invalid_choice_policy_reads_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: InvalidChoicePolicy,
        }

        let parsed: Wrapper = toml::from_str("policy = \"retry-once\"").expect("must parse");

        assert_eq!(parsed.policy, InvalidChoicePolicy::RetryOnce);
    }
}
