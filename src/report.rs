//! Step Reporting
//!
//! Console reporting for the bootstrap and CI orchestrators. Every step
//! gets a timestamped, colored status line; the first failing step turns
//! into a fatal abort after an operator acknowledgment.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use dialoguer::Input;

/// A single named step in an orchestrated sequence.
pub struct Step<'a> {
    pub name: &'a str,
    pub run: Box<dyn FnMut() -> Result<()> + 'a>,
}

impl<'a> Step<'a> {
    pub fn new(name: &'a str, run: impl FnMut() -> Result<()> + 'a) -> Self {
        Step {
            name,
            run: Box::new(run),
        }
    }
}

/// The first failing step of a sequence, with its underlying error.
#[derive(Debug)]
pub struct FailedStep {
    pub name: String,
    pub source: anyhow::Error,
}

/// Run steps strictly in order, reporting each one.
///
/// Stops at the first failure and returns it; steps after the failing one
/// never run. Returns `Ok(())` once every step has succeeded.
pub fn run_steps(steps: Vec<Step>) -> Result<(), FailedStep> {
    for mut step in steps {
        match (step.run)() {
            Ok(()) => report_step(step.name, true),
            Err(err) => {
                report_step(step.name, false);
                return Err(FailedStep {
                    name: step.name.to_string(),
                    source: err,
                });
            }
        }
    }
    Ok(())
}

/// Print a timestamped pass/fail line for a step.
pub fn report_step(name: &str, ok: bool) {
    let now = Utc::now().to_rfc3339();
    if ok {
        println!("[{}] {} {}", now, "ok".green(), name);
    } else {
        println!("[{}] {} {}", now, "FAILED".red().bold(), name);
    }
}

/// Report a fatal failure, wait for operator acknowledgment, and exit
/// with a non-zero status.
///
/// Under non-interactive operation the acknowledgment prompt is skipped
/// and the process exits immediately.
pub fn fatal_abort(failed: &FailedStep, interactive: bool) -> ! {
    let now = Utc::now().to_rfc3339();
    eprintln!(
        "[{}] {}",
        now,
        format!("Fatal: step '{}' failed: {:#}", failed.name, failed.source)
            .red()
            .bold()
    );
    if interactive {
        acknowledge("Press Enter to exit");
    }
    std::process::exit(1);
}

/// Block until the operator presses Enter. Purely informational.
pub fn acknowledge(message: &str) {
    let _ = Input::<String>::new()
        .with_prompt(format!("  {} {}", "\u{2192}".cyan(), message.white()))
        .allow_empty(true)
        .interact_text();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_all_steps_run_in_order() {
        let log = RefCell::new(Vec::new());
        let steps = vec![
            Step::new("first", || {
                log.borrow_mut().push("first");
                Ok(())
            }),
            Step::new("second", || {
                log.borrow_mut().push("second");
                Ok(())
            }),
        ];

        assert!(run_steps(steps).is_ok());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_later_steps_never_run_after_failure() {
        let log = RefCell::new(Vec::new());
        let steps = vec![
            Step::new("formatting", || {
                log.borrow_mut().push("formatting");
                anyhow::bail!("reformat required")
            }),
            Step::new("import order", || {
                log.borrow_mut().push("import order");
                Ok(())
            }),
            Step::new("style", || {
                log.borrow_mut().push("style");
                Ok(())
            }),
        ];

        let failed = run_steps(steps).unwrap_err();
        assert_eq!(failed.name, "formatting");
        assert_eq!(*log.borrow(), vec!["formatting"]);
    }

    #[test]
    fn test_empty_sequence_succeeds() {
        assert!(run_steps(Vec::new()).is_ok());
    }
}
