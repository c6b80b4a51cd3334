mod commands;
mod core;
mod notes;
mod utils;

use clap::{ArgGroup, Parser};
use crate::core::context::NotesContext;
use crate::core::error::{NotesError, print_error};
use crate::notes::report::ReportFormat;
use crate::notes::resolver::VersionRequest;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Collect per-change release note fragments from git history into a changelog
#[derive(Parser)]
#[command(name = "relnotes")]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
#[command(group(ArgGroup::new("mode").args(["lint", "create", "check"]).multiple(false)))]
#[command(group(ArgGroup::new("format").args(["yaml", "json"]).multiple(false)))]
struct Cli {
  /// Release tag to report on (default: current branch and uncommitted changes)
  #[arg(long, value_name = "TAG")]
  version: Option<String>,

  /// Older release tag to report back to, or TAIL for all history
  #[arg(long, value_name = "TAG")]
  previous: Option<String>,

  /// Pattern tags must match to count as releases
  #[arg(long, value_name = "REGEX")]
  version_regex: Option<String>,

  /// Directory holding release note files [default: releasenotes]
  #[arg(long, alias = "rel-notes-dir", value_name = "DIR")]
  notes_dir: Option<PathBuf>,

  /// Config file to load instead of searching the working directory
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Log git commands and attribution decisions to stderr
  #[arg(long)]
  debug: bool,

  /// Output the report as YAML
  #[arg(long)]
  yaml: bool,

  /// Output the report as JSON
  #[arg(long)]
  json: bool,

  /// Show the author and commit that last touched each note
  #[arg(long)]
  blame: bool,

  /// Validate every note file and report all problems
  #[arg(long)]
  lint: bool,

  /// Create a new note file for the current branch
  #[arg(long)]
  create: bool,

  /// Open the created note in $VISUAL / $EDITOR
  #[arg(long, requires = "create")]
  edit: bool,

  /// Fail unless the current branch adds a release note
  #[arg(long)]
  check: bool,

  /// Branch the check compares against [default: $GITHUB_BASE_REF, then main]
  #[arg(long, value_name = "REF", requires = "check")]
  target: Option<String>,
}

impl Cli {
  fn format(&self) -> ReportFormat {
    if self.yaml {
      ReportFormat::Yaml
    } else if self.json {
      ReportFormat::Json
    } else {
      ReportFormat::Text
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr; RUST_LOG wins over --debug
fn init_tracing(debug: bool) {
  let filter = if debug { "relnotes=debug" } else { "relnotes=warn" };
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
    .with(
      tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.debug);

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(NotesError::from(e).context("Failed to get current directory")),
  };

  let ctx = match NotesContext::build(&cwd, cli.config.as_deref(), cli.notes_dir.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = if cli.lint {
    commands::run_lint(&ctx)
  } else if cli.create {
    commands::run_create(&ctx, cli.edit)
  } else if cli.check {
    commands::run_check(&ctx, cli.target.clone())
  } else {
    let opts = commands::ReportOptions {
      request: VersionRequest {
        version: cli.version.clone(),
        previous: cli.previous.clone(),
      },
      version_regex: cli.version_regex.clone(),
      format: cli.format(),
      blame: cli.blame,
    };
    commands::run_report(&ctx, &opts)
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: NotesError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
