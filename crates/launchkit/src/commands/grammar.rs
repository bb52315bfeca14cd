//! Grammar table utilities

use anyhow::{Context, Result};

use launchkit_lang::GrammarTable;

use crate::cli::{GrammarCheckArgs, GrammarShowArgs};
use crate::context::AppContext;
use crate::output;

/// `launchkit grammar check <file>`
pub async fn check(args: GrammarCheckArgs) -> Result<()> {
    let table = GrammarTable::load(args.file.as_std_path())
        .with_context(|| format!("Grammar file {} is invalid", args.file))?;

    output::success(&format!(
        "{} is valid: {} rule(s), {} synonym(s)",
        args.file,
        table.rules.len(),
        table.synonyms.len()
    ));
    Ok(())
}

/// `launchkit grammar show`
pub async fn show(args: GrammarShowArgs, ctx: &AppContext) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ctx.table)?);
        return Ok(());
    }

    output::header("Grammar rules");
    for rule in &ctx.table.rules {
        println!("  {:<40} -> {} {}", rule.pattern, rule.verb, rule.resource);
    }
    Ok(())
}
