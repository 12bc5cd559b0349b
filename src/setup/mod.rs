//! Setup Module
//!
//! One-time developer environment bootstrap: interpreter validation,
//! virtual environment creation and activation, dependency installation,
//! and commit-hook installation.

pub mod bootstrap;
pub mod interpreter;
pub mod venv;
