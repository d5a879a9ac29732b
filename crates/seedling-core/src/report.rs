//! Progress and failure lines

use crate::config::{Step, Steps};
use colored::Colorize;
use std::fmt::Display;

/// Format the progress line for `step`
///
/// The uppercased key is followed by a tab, the configured description and
/// `extra` appended directly, then a period.
pub fn format_step(steps: &Steps, step: Step, extra: &str) -> String {
    format!(
        "{} {}{}.",
        format!("{}\t", step.key().to_uppercase()).cyan().bold(),
        steps.describe(step),
        extra
    )
}

/// Print the progress line for `step` to stdout
pub fn report(steps: &Steps, step: Step, extra: &str) {
    println!("{}", format_step(steps, step, extra));
}

/// Print a failure line to stderr
pub fn report_failure(what: impl Display, error: impl Display) {
    eprintln!("{} {}: {}", "Error:".red().bold(), what, error);
}
