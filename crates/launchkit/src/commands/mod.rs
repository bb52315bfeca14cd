//! Command handlers

pub mod grammar;
pub mod projects;
pub mod run;
pub mod shell;

use anyhow::Result;
use dialoguer::{Confirm, Select};

use launchkit_core::ExecutionMode;
use launchkit_engine::{
    interpret, resolve, CommandOutcome, Error as EngineError, ModeController, ResolveOptions,
    ResolvedCommand,
};
use launchkit_lang::SlotValue;

use crate::context::AppContext;
use crate::output;

/// Per-invocation interaction policy
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunPolicy {
    /// Destructive confirmations are pre-answered (--yes)
    pub assume_yes: bool,
    /// Fail on ambiguity instead of prompting (--no-input)
    pub no_input: bool,
    /// Execution mode for this command
    pub mode: ExecutionMode,
}

/// Interpret one phrase and carry it through resolution and dispatch
///
/// Disambiguation and destructive-action confirmation are pause-points:
/// the resolver hands back a value, the prompt runs here, and resolution
/// restarts with the narrowed target or the confirmation recorded.
pub(crate) async fn run_phrase(ctx: &AppContext, line: &str, policy: RunPolicy) -> Result<()> {
    let mut candidate = interpret(&ctx.table, line)?;
    let mut assume_yes = policy.assume_yes;

    loop {
        let resolved = resolve(
            &candidate,
            ctx.dispatcher.store(),
            ResolveOptions {
                assume_yes,
                mode: policy.mode,
            },
        )?;

        match resolved {
            ResolvedCommand::Action(request) => {
                let controller = ModeController::new(policy.mode);
                let description = request.describe();

                let spinner = (policy.mode == ExecutionMode::Execute)
                    .then(|| output::spinner(&format!("Running: {description}")));
                let outcome = controller.run(&ctx.dispatcher, &request).await;
                if let Some(spinner) = spinner {
                    spinner.finish_and_clear();
                }

                match outcome? {
                    CommandOutcome::Explained(plan) => output::plan(&plan),
                    CommandOutcome::Executed(report) => output::success(&report.message),
                }
                return Ok(());
            }

            ResolvedCommand::NeedsConfirmation(request) => {
                if policy.no_input {
                    anyhow::bail!(
                        "'{}' needs confirmation; re-run with --yes",
                        request.describe()
                    );
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!("Are you sure you want to {}?", request.describe()))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output::info("Cancelled");
                    return Ok(());
                }
                assume_yes = true;
            }

            ResolvedCommand::NeedsSelection { names } => {
                if policy.no_input {
                    return Err(EngineError::AmbiguousTarget { names }.into());
                }
                let mut items = names.clone();
                items.push("Cancel".to_string());
                let selection = Select::new()
                    .with_prompt("Which project did you mean?")
                    .items(&items)
                    .default(0)
                    .interact()?;
                if selection == names.len() {
                    // Left unresolved on purpose; nothing was touched
                    return Err(EngineError::AmbiguousTarget { names }.into());
                }
                candidate
                    .slots
                    .insert("name", SlotValue::Ident(names[selection].clone()));
            }

            ResolvedCommand::List { kind, records } => {
                projects::render_list(kind, &records);
                return Ok(());
            }

            ResolvedCommand::Show(record) => {
                projects::render_details(&record);
                return Ok(());
            }
        }
    }
}
