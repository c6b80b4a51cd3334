//! Core building blocks shared by every relnotes mode
//!
//! - **config**: relnotes.toml / relnotes.yaml parsing and validation
//! - **context**: Run context built once in main and passed to commands
//! - **error**: Error types with exit codes and contextual help messages
//! - **vcs**: Git access behind the `GitOracle` trait (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
