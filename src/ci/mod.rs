//! Local CI Gates
//!
//! Runs the same static-analysis gates the CI pipeline runs, against the
//! project venv, halting at the first failing tool and naming it. Reuses
//! the bootstrap's activation and step primitives.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::config::ToolkitConfig;
use crate::report::{fatal_abort, run_steps, FailedStep, Step};
use crate::setup::venv::{activate, ActivatedEnv, Platform};

/// The four gates, in the order they run: (step name, module, args).
const CHECKS: [(&str, &str, &[&str]); 4] = [
    ("formatting", "black", &["--check", "."]),
    ("import order", "isort", &["--check-only", "."]),
    ("style", "flake8", &[]),
    ("types", "mypy", &["."]),
];

/// Build the gate sequence against an activated venv. Split out so the
/// halting behavior is testable without real tools.
pub fn check_steps(env: &ActivatedEnv) -> Vec<Step<'_>> {
    CHECKS
        .iter()
        .map(|&(name, module, args)| Step::new(name, move || env.run_module(module, args)))
        .collect()
}

/// Run all local CI gates.
///
/// Activation failure and the first failing gate are both fatal: reported,
/// acknowledged, process exit non-zero.
pub fn run_local_checks(config: &ToolkitConfig, interactive: bool) -> Result<()> {
    println!("{}", "  Running local CI gates...\n".cyan());

    let venv_dir = PathBuf::from(&config.venv_dir);
    let env = match activate(&venv_dir, Platform::detect()) {
        Ok(env) => env,
        Err(source) => {
            let fatal = FailedStep {
                name: "venv activation".to_string(),
                source,
            };
            fatal_abort(&fatal, interactive);
        }
    };

    if let Err(failed) = run_steps(check_steps(&env)) {
        fatal_abort(&failed, interactive);
    }

    println!("{}", "\n  All gates passed.".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_order() {
        let names: Vec<&str> = CHECKS.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names, vec!["formatting", "import order", "style", "types"]);
    }

    #[test]
    fn test_gates_invoke_expected_modules() {
        let modules: Vec<&str> = CHECKS.iter().map(|(_, module, _)| *module).collect();
        assert_eq!(modules, vec!["black", "isort", "flake8", "mypy"]);
    }
}
