//! CLI modes for relnotes
//!
//! - **report**: Render release notes grouped by release (default)
//! - **lint**: Validate every note file
//! - **create**: Scaffold a new note for the current branch
//! - **check**: Require a release note on the current branch
//!
//! All modes accept `&NotesContext` so config is loaded once.

pub mod check;
pub mod create;
pub mod lint;
pub mod report;

pub use check::run_check;
pub use create::run_create;
pub use lint::run_lint;
pub use report::{ReportOptions, run_report};
