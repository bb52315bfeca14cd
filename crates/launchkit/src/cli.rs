//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// LaunchKit - English-phrase driven project automation
#[derive(Parser, Debug)]
#[command(name = "launchkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the project registry file
    #[arg(long, global = true)]
    pub registry: Option<Utf8PathBuf>,

    /// Path to a grammar file replacing the built-in table
    #[arg(long, global = true)]
    pub grammar: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interpret and run one command phrase
    Run(RunArgs),

    /// Interactive command shell
    Shell(ShellArgs),

    /// Inspect the project registry
    #[command(subcommand)]
    Projects(ProjectsCommands),

    /// Grammar table utilities
    #[command(subcommand)]
    Grammar(GrammarCommands),
}

// Run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// The command phrase, e.g. "create mern project shop"
    #[arg(required = true)]
    pub phrase: Vec<String>,

    /// Explain what would run instead of executing
    #[arg(long)]
    pub explain: bool,

    /// Skip destructive-action confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Fail instead of prompting when a target is ambiguous
    #[arg(long)]
    pub no_input: bool,
}

// Shell command
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Start the session in explain mode
    #[arg(long)]
    pub explain: bool,
}

// Projects commands
#[derive(Subcommand, Debug)]
pub enum ProjectsCommands {
    /// List registered projects
    List(ProjectsListArgs),

    /// Show details for one project
    Info(ProjectsInfoArgs),
}

#[derive(Args, Debug)]
pub struct ProjectsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProjectsInfoArgs {
    /// Project name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Grammar commands
#[derive(Subcommand, Debug)]
pub enum GrammarCommands {
    /// Validate a grammar file
    Check(GrammarCheckArgs),

    /// Print the loaded grammar rules
    Show(GrammarShowArgs),
}

#[derive(Args, Debug)]
pub struct GrammarCheckArgs {
    /// Path to the grammar YAML file
    pub file: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct GrammarShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
