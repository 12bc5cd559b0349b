//! Interpreter Validation
//!
//! Guarantees that the exact pinned Python version is used for every later
//! bootstrap step. A version mismatch is recoverable: the operator is shown
//! what was found and asked for a corrected path. A failed version query is
//! fatal.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Interpreter names probed on PATH, in order.
const INTERPRETER_NAMES: &[&str] = &["python3", "python"];

#[derive(Debug, Error)]
pub enum ValidateError {
    /// The discovered interpreter runs but is the wrong version. Recoverable
    /// by pointing the loop at a different installation.
    #[error("found Python {found} at {path}, need {pinned}")]
    VersionMismatch {
        found: String,
        path: PathBuf,
        pinned: String,
    },
    /// The version query itself failed. Fatal.
    #[error("could not query interpreter version: {0}")]
    Query(#[from] anyhow::Error),
}

/// Outcome of probing one interpreter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Version string equals the pinned version.
    Match,
    /// Interpreter ran but reported a different version.
    Mismatch { found: String },
}

/// Locate an interpreter on the command search path.
pub fn discover_interpreter() -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for name in INTERPRETER_NAMES {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "discovered interpreter");
                return Some(candidate);
            }
            #[cfg(windows)]
            {
                let exe = dir.join(format!("{}.exe", name));
                if exe.is_file() {
                    return Some(exe);
                }
            }
        }
    }
    None
}

/// Run `<path> --version` and compare the reported version to `pinned`.
///
/// An interpreter that cannot be executed, exits non-zero, or prints
/// something unparseable is an error; a wrong version is a `Mismatch`.
pub fn probe_interpreter(path: &Path, pinned: &str) -> Result<Probe> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .with_context(|| format!("failed to execute {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "{} --version exited with {}: {}",
            path.display(),
            output.status,
            stderr.trim()
        );
    }

    // Python 2 printed the version on stderr; check both streams.
    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    let found = parse_version(&text)
        .with_context(|| format!("unrecognized version output from {}", path.display()))?;

    if found == pinned {
        Ok(Probe::Match)
    } else {
        Ok(Probe::Mismatch { found })
    }
}

/// Extract `X.Y.Z` from a `Python X.Y.Z` version banner.
pub fn parse_version(text: &str) -> Result<String> {
    let re = Regex::new(r"Python (\d+\.\d+\.\d+)")?;
    let caps = re
        .captures(text)
        .with_context(|| format!("no version string in {:?}", text.trim()))?;
    Ok(caps[1].to_string())
}

/// The validation loop, written against injected probe and prompt closures.
///
/// Probes `start`; on a mismatch, asks for a corrected path and retries.
/// There is no iteration limit -- the loop is bounded only by the operator.
/// A probe error aborts the loop immediately.
pub fn validation_loop<P, A>(
    start: PathBuf,
    mut probe: P,
    mut ask: A,
) -> Result<PathBuf, ValidateError>
where
    P: FnMut(&Path) -> Result<Probe>,
    A: FnMut(&str, &Path) -> Result<PathBuf, ValidateError>,
{
    let mut current = start;
    loop {
        match probe(&current)? {
            Probe::Match => return Ok(current),
            Probe::Mismatch { found } => {
                current = ask(&found, &current)?;
            }
        }
    }
}

/// Validate the interpreter interactively, prompting the operator for a
/// corrected path on every mismatch.
///
/// With `interactive` off, a mismatch becomes an immediate error instead
/// of a prompt.
pub fn validate_interpreter(pinned: &str, interactive: bool) -> Result<PathBuf, ValidateError> {
    let start = discover_interpreter()
        .ok_or_else(|| anyhow::anyhow!("no python interpreter found on PATH"))?;

    let pinned_owned = pinned.to_string();
    validation_loop(
        start,
        |path| probe_interpreter(path, pinned),
        move |found, path| {
            if !interactive {
                return Err(ValidateError::VersionMismatch {
                    found: found.to_string(),
                    path: path.to_path_buf(),
                    pinned: pinned_owned.clone(),
                });
            }
            println!(
                "{}",
                format!(
                    "  Found Python {} at {}, but {} is required.",
                    found,
                    path.display(),
                    pinned_owned
                )
                .yellow()
            );
            let entered: String = Input::new()
                .with_prompt(format!(
                    "  {} {}",
                    "\u{2192}".cyan(),
                    format!("Path to a Python {} installation", pinned_owned).white()
                ))
                .interact_text()
                .map_err(|e| ValidateError::Query(e.into()))?;
            Ok(PathBuf::from(entered.trim()))
        },
    )
}
