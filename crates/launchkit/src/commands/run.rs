//! One-shot phrase command

use anyhow::Result;

use launchkit_core::ExecutionMode;

use crate::cli::RunArgs;
use crate::context::AppContext;

use super::{run_phrase, RunPolicy};

pub async fn run(args: RunArgs, ctx: &AppContext, default_mode: ExecutionMode) -> Result<()> {
    let line = args.phrase.join(" ");
    let mode = if args.explain {
        ExecutionMode::Explain
    } else {
        default_mode
    };

    run_phrase(
        ctx,
        &line,
        RunPolicy {
            assume_yes: args.yes,
            no_input: args.no_input,
            mode,
        },
    )
    .await
}
