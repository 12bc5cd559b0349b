//! Dugout -- MLB 9 Innings Community Toolkit
//!
//! Developer environment bootstrap, a local CI gate runner,
//! and the stat calculators the community tools are built on.

pub mod ci;
pub mod config;
pub mod report;
pub mod setup;
pub mod stats;
