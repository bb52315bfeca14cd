//! Interactive command shell
//!
//! A read-eval loop over the same pipeline the one-shot command uses.
//! Per-command errors are printed and the session continues; only a
//! corrupt registry ends it.

use anyhow::Result;
use console::style;
use dialoguer::Input;

use launchkit_core::ExecutionMode;
use launchkit_engine::{Error as EngineError, ModeController};

use crate::cli::ShellArgs;
use crate::context::AppContext;
use crate::output;

use super::{run_phrase, RunPolicy};

pub async fn run(args: ShellArgs, ctx: &AppContext, default_mode: ExecutionMode) -> Result<()> {
    let initial = if args.explain {
        ExecutionMode::Explain
    } else {
        default_mode
    };
    let mut controller = ModeController::new(initial);

    println!("LaunchKit shell — type a command, 'help' for examples, 'quit' to exit");
    println!("Mode: {}", controller.mode());

    loop {
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()?;
        let trimmed = line.trim();

        match trimmed {
            "" => continue,
            "quit" | "exit" | "q" => {
                output::info("Goodbye");
                return Ok(());
            }
            "help" => {
                print_help();
                continue;
            }
            "mode" => {
                output::kv("mode", controller.mode().as_str());
                continue;
            }
            _ => {}
        }

        // Mode switches apply from the next resolved command
        if let Some(mode) = trimmed.strip_prefix("mode ") {
            match mode.trim().parse::<ExecutionMode>() {
                Ok(mode) => {
                    controller.set_mode(mode);
                    output::info(&format!("Mode set to {mode}"));
                }
                Err(err) => output::error(&err.to_string()),
            }
            continue;
        }

        let policy = RunPolicy {
            assume_yes: false,
            no_input: false,
            mode: controller.mode(),
        };
        if let Err(err) = run_phrase(ctx, trimmed, policy).await {
            output::error(&format!("{err:#}"));
            if let Some(engine_err) = err.downcast_ref::<EngineError>() {
                if engine_err.is_fatal() {
                    return Err(err);
                }
            }
        }
    }
}

fn print_help() {
    println!("\n{}", style("Commands").bold().underlined());
    println!("  create <stack> project <name>    Scaffold a new project");
    println!("  create container for <name>      Create a container for a project");
    println!("  create deployment for <name>     Create a deployment");
    println!("  build image for <name>           Build a project's image");
    println!("  deploy <name>                    Apply a project's manifest");
    println!("  scale <name> to <n> instances    Change the replica count");
    println!("  update project <name>            Pull the latest changes");
    println!("  delete project <name>            Delete a project (asks first)");
    println!("  list projects                    Show the registry");
    println!("  show project <name>              Project details");
    println!("\n{}", style("Session").bold().underlined());
    println!("  mode [execute|explain]           Show or switch execution mode");
    println!("  help                             This text");
    println!("  quit                             Exit the shell");
    println!("\nPhrases are forgiving: 'spin up a mern project shop',");
    println!("'tear down project shop', and 'Scale down to 1 instance' all work.");
}
