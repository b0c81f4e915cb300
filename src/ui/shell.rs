use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    menu_loop::{MenuExit, MenuOrchestrator, MenuStep},
    prompts::OperatorConsole,
};

use super::menu_view;

/// Runs the menu until the operator quits, input ends or the invalid-choice
/// policy stops it.
pub fn start(
    context: &AppContext,
    console: &mut dyn OperatorConsole,
    orchestrator: &mut MenuOrchestrator<'_>,
) -> Result<MenuExit> {
    tracing::info!(
        log_level = %context.config.logging.level,
        endpoint = %context.config.service.endpoint_label(),
        "starting menu"
    );

    loop {
        for line in menu_view::render(orchestrator.session()) {
            console.print_line(&line)?;
        }

        let Some(key) = console.read_choice(menu_view::CHOICE_PROMPT)? else {
            tracing::info!("console input closed");
            return Ok(MenuExit::InputClosed);
        };

        if let MenuStep::Exit(exit) = orchestrator.handle_key(console, key)? {
            tracing::info!(exit = ?exit, "menu finished");
            return Ok(exit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::menu::InvalidChoicePolicy,
        infra::config::AppConfig,
        test_support::{FakeService, ScriptedConsole},
        usecases::menu_loop::MenuSettings,
    };

    fn run_script(
        inputs: Vec<Option<&str>>,
        policy: InvalidChoicePolicy,
    ) -> (MenuExit, ScriptedConsole) {
        let context = AppContext::new(AppConfig::default());
        let service = FakeService::default();
        let mut orchestrator = MenuOrchestrator::new(
            &service,
            &service,
            MenuSettings {
                invalid_choice: policy,
                ..MenuSettings::default()
            },
        );
        let mut console = ScriptedConsole::new(inputs);

        let exit = start(&context, &mut console, &mut orchestrator).expect("menu must run");
        (exit, console)
    }

    #[test]
    fn quits_on_nine() {
        let (exit, console) = run_script(vec![Some("9")], InvalidChoicePolicy::Reprompt);

        assert_eq!(exit, MenuExit::Quit);
        assert!(console.printed("# Azure Communication Services - Demo"));
    }

    #[test]
    fn closed_input_ends_the_menu_cleanly() {
        let (exit, _) = run_script(vec![], InvalidChoicePolicy::Reprompt);

        assert_eq!(exit, MenuExit::InputClosed);
        assert_eq!(exit.status(), 0);
    }

    #[test]
    fn full_session_flow_through_the_menu() {
        let (exit, console) = run_script(
            vec![
                Some("2"),
                Some("alice"),
                Some("3"),
                Some("Standup"),
                Some("5"),
                Some("19:thread-2"),
                Some("hello"),
                Some("6"),
                Some("19:thread-2"),
                Some("9"),
            ],
            InvalidChoicePolicy::Reprompt,
        );

        assert_eq!(exit, MenuExit::Quit);
        assert!(console.printed("Chat thread ID: 19:thread-2"));
        assert!(console.printed("Message sent: msg-3"));
        assert!(console.printed("msg-3: 8:acs:user-1: hello"));
        assert!(console.printed("# Display name: alice"));
    }

    #[test]
    fn invalid_key_with_reprompt_shows_menu_again() {
        let (exit, console) =
            run_script(vec![Some("x"), Some("9")], InvalidChoicePolicy::Reprompt);

        assert_eq!(exit, MenuExit::Quit);
        let menus = console
            .output
            .iter()
            .filter(|line| line.as_str() == "Select option: ")
            .count();
        assert_eq!(menus, 2);
    }

    #[test]
    fn invalid_key_with_exit_policy_fails() {
        let (exit, _) = run_script(vec![Some("x"), Some("9")], InvalidChoicePolicy::Exit);

        assert_eq!(exit, MenuExit::InvalidChoice);
    }
}
