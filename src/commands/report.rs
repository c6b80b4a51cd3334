//! `relnotes` (default mode) - render release notes grouped by release
//!
//! Resolves release boundaries from tag history, attributes every note file
//! to the release that introduced it and prints the report to stdout.

use crate::core::context::NotesContext;
use crate::core::error::NotesResult;
use crate::core::vcs::{GitOracle, SystemGit};
use crate::notes::collector::NoteCollector;
use crate::notes::report::{ReportFormat, ReportRenderer};
use crate::notes::resolver::{VersionRequest, VersionResolver};
use crate::notes::schema::NoteSchema;

/// Options for a report run
#[derive(Debug, Clone)]
pub struct ReportOptions {
  pub request: VersionRequest,
  /// Overrides the configured version regex
  pub version_regex: Option<String>,
  pub format: ReportFormat,
  pub blame: bool,
}

/// Run the report command
pub fn run_report(ctx: &NotesContext, opts: &ReportOptions) -> NotesResult<()> {
  let git = SystemGit::open(&ctx.cwd)?;
  let output = generate_report(ctx, &git, opts)?;
  print!("{}", output);
  Ok(())
}

/// Build the rendered report without printing it
///
/// Nothing is written anywhere until the whole report rendered, so an invalid
/// note leaves stdout empty.
pub fn generate_report(ctx: &NotesContext, git: &dyn GitOracle, opts: &ReportOptions) -> NotesResult<String> {
  let matcher = ctx.config.version_matcher(opts.version_regex.as_deref())?;
  let boundaries = VersionResolver::new(git, matcher).resolve(&opts.request)?;

  let notes_dir = ctx.notes_dir.within(git.toplevel())?;
  let collector = NoteCollector::new(git, NoteSchema::new(&ctx.config), notes_dir, opts.blame);
  let report = collector.collect(&boundaries)?;

  ReportRenderer::new(&ctx.config, opts.blame).render(&report, opts.format)
}
