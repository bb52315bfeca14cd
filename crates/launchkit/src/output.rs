//! Terminal output utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use launchkit_engine::ActionPlan;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Render an explain-mode plan: summary plus the equivalent commands
pub fn plan(plan: &ActionPlan) {
    info(&format!("Would: {}", plan.summary));
    if plan.commands.is_empty() {
        println!("  {}", style("(no external commands)").dim());
    }
    for command in &plan.commands {
        println!("  {} {}", style("$").dim(), command);
    }
}

/// Create a spinner shown while a handler blocks on an external process
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
