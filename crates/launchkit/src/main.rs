//! LaunchKit CLI - English-phrase driven project automation
//!
//! This is the main entry point for the LaunchKit command-line interface.

mod cli;
mod commands;
mod context;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, GrammarCommands, ProjectsCommands};
use context::AppContext;

// Exit codes for scripted callers; 0 is a successful dispatch or explain
const EXIT_UNRECOGNIZED: u8 = 2;
const EXIT_AMBIGUOUS: u8 = 3;
const EXIT_VALIDATION: u8 = 4;
const EXIT_HANDLER: u8 = 5;
const EXIT_NO_TARGET: u8 = 6;
const EXIT_DUPLICATE: u8 = 7;
const EXIT_REGISTRY: u8 = 8;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // Grammar check validates a file on its own, before any context loads
        Commands::Grammar(GrammarCommands::Check(args)) => commands::grammar::check(args).await,

        command => {
            let (ctx, default_mode) =
                AppContext::init(cli.registry.as_ref(), cli.grammar.as_ref())?;

            match command {
                Commands::Run(args) => commands::run::run(args, &ctx, default_mode).await,
                Commands::Shell(args) => commands::shell::run(args, &ctx, default_mode).await,
                Commands::Projects(ProjectsCommands::List(args)) => {
                    commands::projects::list(args, &ctx).await
                }
                Commands::Projects(ProjectsCommands::Info(args)) => {
                    commands::projects::info(args, &ctx).await
                }
                Commands::Grammar(GrammarCommands::Show(args)) => {
                    commands::grammar::show(args, &ctx).await
                }
                Commands::Grammar(GrammarCommands::Check(_)) => unreachable!("handled above"),
            }
        }
    }
}

/// Map the error taxonomy onto distinct exit codes
fn exit_code(err: &anyhow::Error) -> u8 {
    use launchkit_engine::Error as EngineError;
    use launchkit_registry::Error as RegistryError;

    if let Some(engine_err) = err.downcast_ref::<EngineError>() {
        return match engine_err {
            EngineError::UnrecognizedCommand { .. } => EXIT_UNRECOGNIZED,
            EngineError::AmbiguousTarget { .. } => EXIT_AMBIGUOUS,
            EngineError::Validation { .. } => EXIT_VALIDATION,
            EngineError::HandlerFailure { .. }
            | EngineError::ToolMissing { .. }
            | EngineError::UnsupportedAction { .. } => EXIT_HANDLER,
            EngineError::NoSuchTarget { .. } => EXIT_NO_TARGET,
            EngineError::Registry(RegistryError::DuplicateProject { .. }) => EXIT_DUPLICATE,
            EngineError::Registry(RegistryError::NotFound { .. }) => EXIT_NO_TARGET,
            EngineError::Registry(_) => EXIT_REGISTRY,
            EngineError::Io(_) => 1,
        };
    }

    if let Some(registry_err) = err.downcast_ref::<RegistryError>() {
        return match registry_err {
            RegistryError::DuplicateProject { .. } => EXIT_DUPLICATE,
            RegistryError::NotFound { .. } => EXIT_NO_TARGET,
            _ => EXIT_REGISTRY,
        };
    }

    1
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
