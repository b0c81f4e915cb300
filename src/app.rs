use std::process::ExitCode;

use anyhow::Result;

use crate::{
    acs,
    cli::{Cli, Command},
    domain, infra, ui,
    usecases::{
        self,
        bootstrap::{self, Overrides},
        menu_loop::MenuOrchestrator,
    },
};

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command_or_default() {
        Command::Run => {
            let overrides = Overrides {
                invalid_choice: cli.invalid_choice,
            };
            let context = bootstrap::bootstrap(cli.config.as_deref(), &overrides)?;

            tracing::debug!(
                ui = ui::module_name(),
                domain = domain::module_name(),
                acs = acs::module_name(),
                usecases = usecases::module_name(),
                infra = infra::module_name(),
                "module boundaries loaded"
            );

            let transport = bootstrap::build_transport(&context.config)?;
            let identity = bootstrap::identity_gateway(&transport, &context.config)?;
            let chat = bootstrap::chat_gateway(&transport, &context.config)?;
            let mut orchestrator = MenuOrchestrator::new(
                &identity,
                &chat,
                bootstrap::menu_settings(&context.config),
            );

            let mut console = ui::terminal::StdConsole;
            let exit = ui::shell::start(&context, &mut console, &mut orchestrator)?;
            Ok(ExitCode::from(exit.status()))
        }
    }
}
