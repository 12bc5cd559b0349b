//! Bootstrap Orchestrator
//!
//! Drives the one-time developer environment setup: interpreter
//! validation, venv creation, activation, pip upgrade, dependency
//! installation, and commit-hook installation. Strictly linear; the
//! first failing step aborts the whole run. Safe to re-run at any time.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::config::ToolkitConfig;
use crate::report::{acknowledge, fatal_abort, run_steps, FailedStep, Step};
use crate::setup::interpreter::{validate_interpreter, ValidateError};
use crate::setup::venv::{activate, ensure_venv, Platform};

/// Run the full bootstrap sequence.
///
/// Never returns on failure: the failing step is reported and the process
/// exits non-zero after operator acknowledgment.
pub fn run_setup(config: &ToolkitConfig, interactive: bool) -> Result<()> {
    println!(
        "{}",
        "  Dugout environment bootstrap. This may take a few minutes.\n".white()
    );

    // ---- 1. Validate the interpreter ---------------------------------------
    println!(
        "{}",
        format!("  [1/4] Validating Python {}...", config.python_version).cyan()
    );
    let interpreter = match validate_interpreter(&config.python_version, interactive) {
        Ok(path) => path,
        Err(err) => {
            let fatal = FailedStep {
                name: "interpreter validation".to_string(),
                source: match err {
                    ValidateError::Query(e) => e,
                    mismatch @ ValidateError::VersionMismatch { .. } => mismatch.into(),
                },
            };
            fatal_abort(&fatal, interactive);
        }
    };
    println!(
        "{}",
        format!("  Using {}\n", interpreter.display()).green()
    );

    // ---- 2. Create the venv if absent ---------------------------------------
    println!("{}", "  [2/4] Preparing virtual environment...".cyan());
    let venv_dir = PathBuf::from(&config.venv_dir);
    if let Err(source) = ensure_venv(&venv_dir, &interpreter) {
        let fatal = FailedStep {
            name: "venv creation".to_string(),
            source,
        };
        fatal_abort(&fatal, interactive);
    }

    // ---- 3. Activate ---------------------------------------------------------
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
    info!(python = %env.python().display(), "virtual environment activated");
    println!(
        "{}",
        format!("  Activated {}\n", env.python().display()).green()
    );

    // ---- 4-6. Install tooling ------------------------------------------------
    println!("{}", "  [3/4] Installing dependencies...".cyan());
    let manifest = PathBuf::from(&config.requirements_file);
    let steps = vec![
        Step::new("pip upgrade", || env.upgrade_pip()),
        Step::new("dependency install", || env.install_requirements(&manifest)),
        Step::new("pre-commit hook install", || env.install_hooks()),
    ];
    if let Err(failed) = run_steps(steps) {
        fatal_abort(&failed, interactive);
    }

    // ---- 7. Done --------------------------------------------------------------
    println!("{}", "\n  [4/4] Setup complete.".green());
    if interactive {
        acknowledge("Press Enter to finish");
    }
    Ok(())
}
