//! Virtual Environment
//!
//! Creation and activation of the project's isolated dependency
//! environment. Activation is a platform strategy: the venv lays its
//! interpreter under `bin/` on POSIX hosts and `Scripts/` on Windows-like
//! hosts, and "activating" means resolving and verifying those paths
//! rather than mutating the process environment.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// The host platform flavor the activation strategy is selected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    WindowsLike,
}

impl Platform {
    /// Detect the platform of the current host.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Platform::WindowsLike
        } else {
            Platform::Posix
        }
    }

    /// Directory inside a venv that holds executables.
    fn scripts_dir(self) -> &'static str {
        match self {
            Platform::Posix => "bin",
            Platform::WindowsLike => "Scripts",
        }
    }

    fn python_name(self) -> &'static str {
        match self {
            Platform::Posix => "python",
            Platform::WindowsLike => "python.exe",
        }
    }
}

/// Handle to an activated virtual environment.
///
/// Holds the resolved interpreter path; every later step runs tools as
/// `<venv python> -m <tool>` so nothing depends on shell activation state.
#[derive(Debug, Clone)]
pub struct ActivatedEnv {
    python: PathBuf,
}

impl ActivatedEnv {
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Run `python -m <module> <args>` inside the venv, streaming output to
    /// the operator's terminal. Non-zero exit is an error naming the module.
    pub fn run_module(&self, module: &str, args: &[&str]) -> Result<()> {
        debug!(module, ?args, "running venv module");
        let status = Command::new(&self.python)
            .arg("-m")
            .arg(module)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute {} -m {}", self.python.display(), module))?;

        if !status.success() {
            anyhow::bail!("{} exited with {}", module, status);
        }
        Ok(())
    }

    /// Upgrade pip itself to latest.
    pub fn upgrade_pip(&self) -> Result<()> {
        self.run_module("pip", &["install", "--upgrade", "pip"])
    }

    /// Install the pinned dependency manifest.
    pub fn install_requirements(&self, manifest: &Path) -> Result<()> {
        if !manifest.is_file() {
            anyhow::bail!("dependency manifest {} not found", manifest.display());
        }
        self.run_module(
            "pip",
            &["install", "-r", &manifest.to_string_lossy()],
        )
    }

    /// Install the pre-commit hooks into the local git checkout.
    pub fn install_hooks(&self) -> Result<()> {
        self.run_module("pre_commit", &["install"])
    }
}

/// Create the venv at `dir` with the validated interpreter, unless it
/// already exists. Creation is verified: a reported success without the
/// directory on disk is still a failure.
pub fn ensure_venv(dir: &Path, interpreter: &Path) -> Result<()> {
    if dir.exists() {
        info!(dir = %dir.display(), "virtual environment already present, skipping creation");
        return Ok(());
    }

    let status = Command::new(interpreter)
        .arg("-m")
        .arg("venv")
        .arg(dir)
        .status()
        .with_context(|| format!("failed to execute {} -m venv", interpreter.display()))?;

    if !status.success() {
        anyhow::bail!("venv creation exited with {}", status);
    }
    if !dir.exists() {
        anyhow::bail!(
            "venv creation reported success but {} does not exist",
            dir.display()
        );
    }
    Ok(())
}

/// Activate the venv at `dir` using the platform's path layout.
///
/// Fails if the venv's interpreter is not where the layout says it
/// should be.
pub fn activate(dir: &Path, platform: Platform) -> Result<ActivatedEnv> {
    let python = dir.join(platform.scripts_dir()).join(platform.python_name());
    if !python.is_file() {
        anyhow::bail!(
            "activation failed: no interpreter at {}",
            python.display()
        );
    }
    Ok(ActivatedEnv { python })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_existing_dir_skips_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv");
        fs::create_dir(&venv).unwrap();

        // Interpreter path is bogus; it must never be invoked.
        ensure_venv(&venv, Path::new("/nonexistent/python")).unwrap();
    }

    #[test]
    fn test_missing_interpreter_fails_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv");

        let err = ensure_venv(&venv, Path::new("/nonexistent/python")).unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }

    #[test]
    fn test_posix_activation_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv");
        fs::create_dir_all(venv.join("bin")).unwrap();
        fs::write(venv.join("bin").join("python"), "").unwrap();

        let env = activate(&venv, Platform::Posix).unwrap();
        assert_eq!(env.python(), venv.join("bin").join("python"));
    }

    #[test]
    fn test_windows_activation_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv");
        fs::create_dir_all(venv.join("Scripts")).unwrap();
        fs::write(venv.join("Scripts").join("python.exe"), "").unwrap();

        let env = activate(&venv, Platform::WindowsLike).unwrap();
        assert!(env.python().ends_with("Scripts/python.exe"));
    }

    #[test]
    fn test_activation_without_interpreter_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let venv = tmp.path().join(".venv");
        fs::create_dir(&venv).unwrap();

        let err = activate(&venv, Platform::Posix).unwrap_err();
        assert!(err.to_string().contains("activation failed"));
    }
}
