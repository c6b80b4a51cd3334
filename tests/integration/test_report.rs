//! Integration tests for report generation (default mode)

use crate::helpers::{TestRepo, git, run_relnotes, run_relnotes_failing};
use anyhow::Result;

const NOTE_A: &str = "features:\n  - feature A\n";
const NOTE_B: &str = "features:\n  - feature B\n";

/// Two releases, each adding one note
fn two_releases() -> Result<TestRepo> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("a.yaml", NOTE_A)?;
  repo.commit("Add note A")?;
  repo.tag("0.0.1")?;
  repo.add_note("b.yaml", NOTE_B)?;
  repo.commit("Add note B")?;
  repo.tag("0.0.2")?;
  Ok(repo)
}

#[test]
fn test_unborn_repo_reports_only_current_branch() -> Result<()> {
  let repo = TestRepo::new()?;
  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n");
  Ok(())
}

#[test]
fn test_empty_notes_dir_without_tags() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n");
  Ok(())
}

#[test]
fn test_previous_tail_reports_each_release_with_its_own_note() -> Result<()> {
  let repo = two_releases()?;

  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert_eq!(
    stdout,
    "# 0.0.2\n\n## New Features\n\n- feature B\n\n# 0.0.1\n\n## New Features\n\n- feature A\n\n"
  );
  Ok(())
}

#[test]
fn test_deleting_note_removes_its_release() -> Result<()> {
  let repo = two_releases()?;
  repo.remove_note("a.yaml")?;

  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert_eq!(stdout, "# 0.0.2\n\n## New Features\n\n- feature B\n\n");

  // Same once the deletion is committed
  repo.commit("Drop note A")?;
  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert!(!stdout.contains("0.0.1"));
  assert!(stdout.contains("- feature B"));
  Ok(())
}

#[test]
fn test_default_report_covers_latest_release_only() -> Result<()> {
  let repo = two_releases()?;
  repo.add_note("c.yaml", "fixes: fix C\n")?;
  repo.commit("Add note C")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n## Bug Fixes\n\n- fix C\n\n");
  Ok(())
}

#[test]
fn test_staged_note_is_uncommitted_until_committed() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("staged.yaml", "release_summary: staged summary\n")?;
  repo.stage("releasenotes/staged.yaml")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(
    stdout,
    "# Uncommitted\n\n## Release Summary\n\n- staged summary\n\n# Current Branch\n\n"
  );

  repo.commit("Add staged note")?;
  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n## Release Summary\n\n- staged summary\n\n");
  assert!(!stdout.contains("Uncommitted"));
  Ok(())
}

#[test]
fn test_staged_note_in_unborn_repo() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.add_note("first.yaml", "features: [first]\n")?;
  repo.stage("releasenotes/first.yaml")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Uncommitted\n\n## New Features\n\n- first\n\n# Current Branch\n\n");
  Ok(())
}

#[test]
fn test_untracked_note_is_not_reported() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("untracked.yaml", "features: [not yet]\n")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n");
  Ok(())
}

#[test]
fn test_uncommitted_edit_of_released_note() -> Result<()> {
  let repo = two_releases()?;
  repo.add_note("b.yaml", "features:\n  - feature B reworded\n")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert!(stdout.starts_with("# Uncommitted\n\n## New Features\n\n- feature B reworded\n\n"));
  assert!(!stdout.contains("- feature B\n"));
  Ok(())
}

#[test]
fn test_edited_note_stays_in_its_release_with_released_text() -> Result<()> {
  let repo = two_releases()?;
  repo.add_note("a.yaml", "features:\n  - feature A amended\n")?;
  repo.commit("Amend note A")?;

  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert!(stdout.contains("# 0.0.1\n\n## New Features\n\n- feature A\n\n"));
  assert!(!stdout.contains("amended"));
  Ok(())
}

#[test]
fn test_explicit_version_and_previous() -> Result<()> {
  let repo = two_releases()?;
  repo.add_note("c.yaml", "fixes: fix C\n")?;
  repo.commit("Add note C")?;
  repo.tag("0.0.3")?;

  let stdout = run_relnotes(&repo.path, &["--version", "0.0.2"])?;
  assert_eq!(stdout, "# 0.0.2\n\n## New Features\n\n- feature B\n\n");

  let stdout = run_relnotes(&repo.path, &["--version", "0.0.3", "--previous", "0.0.1"])?;
  assert_eq!(
    stdout,
    "# 0.0.3\n\n## Bug Fixes\n\n- fix C\n\n# 0.0.2\n\n## New Features\n\n- feature B\n\n"
  );
  Ok(())
}

#[test]
fn test_version_named_like_a_file() -> Result<()> {
  let repo = two_releases()?;
  repo.write_file("0.0.2", "not a note\n")?;
  repo.commit("Add file named like a tag")?;

  let stdout = run_relnotes(&repo.path, &["--version", "0.0.2"])?;
  assert_eq!(stdout, "# 0.0.2\n\n## New Features\n\n- feature B\n\n");
  Ok(())
}

#[test]
fn test_unknown_version_is_user_error() -> Result<()> {
  let repo = two_releases()?;

  let (code, stderr) = run_relnotes_failing(&repo.path, &["--version", "9.9.9"])?;
  assert_eq!(code, 1);
  assert!(stderr.contains("9.9.9"));

  let (code, stderr) = run_relnotes_failing(&repo.path, &["--previous", "nope"])?;
  assert_eq!(code, 1);
  assert!(stderr.contains("nope"));
  Ok(())
}

#[test]
fn test_annotated_and_non_release_tags() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("a.yaml", NOTE_A)?;
  repo.commit("Add note A")?;
  repo.annotated_tag("v1.0.0")?;
  repo.add_note("b.yaml", NOTE_B)?;
  repo.commit("Add note B")?;
  repo.tag("nightly")?;

  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert_eq!(
    stdout,
    "# Current Branch\n\n## New Features\n\n- feature B\n\n# v1.0.0\n\n## New Features\n\n- feature A\n\n"
  );

  // A regex that matches nothing collapses history into one boundary
  let stdout = run_relnotes(&repo.path, &["--version-regex", "^release-"])?;
  assert_eq!(
    stdout,
    "# Current Branch\n\n## New Features\n\n- feature A\n- feature B\n\n"
  );
  Ok(())
}

#[test]
fn test_yaml_output() -> Result<()> {
  let repo = two_releases()?;

  let stdout = run_relnotes(&repo.path, &["--previous", "TAIL", "--yaml"])?;
  let doc: serde_yaml::Value = serde_yaml::from_str(&stdout)?;
  assert_eq!(doc["0.0.2"]["features"][0]["note"].as_str(), Some("feature B"));
  assert_eq!(doc["0.0.1"]["features"][0]["note"].as_str(), Some("feature A"));
  assert!(doc["0.0.1"]["features"][0].get("author").is_none());
  Ok(())
}

#[test]
fn test_json_output_with_blame() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("a.yaml", NOTE_A)?;
  let sha = repo.commit("Add note A")?;

  let stdout = run_relnotes(&repo.path, &["--json", "--blame"])?;
  let doc: serde_json::Value = serde_json::from_str(&stdout)?;
  let entry = &doc["HEAD"]["features"][0];
  assert_eq!(entry["note"], "feature A");
  assert_eq!(entry["author"], "Test User");
  let short = entry["commit"].as_str().unwrap_or_default();
  assert!(!short.is_empty() && sha.starts_with(short));
  Ok(())
}

#[test]
fn test_text_blame() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("a.yaml", NOTE_A)?;
  repo.commit("Add note A")?;
  let short = git(&repo.path, &["rev-parse", "--short", "HEAD"])?;
  let short = String::from_utf8_lossy(&short.stdout).trim().to_string();

  let stdout = run_relnotes(&repo.path, &["--blame"])?;
  assert!(stdout.contains(&format!("- feature A (by Test User, {})", short)));
  Ok(())
}

#[test]
fn test_invalid_note_fails_without_output() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("good.yaml", NOTE_A)?;
  repo.add_note("bad.yaml", "releaxxxxx: rel\n")?;
  repo.commit("Add notes")?;

  let output = crate::helpers::run_relnotes_raw(&repo.path, &[])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(output.stdout.is_empty());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("releasenotes/bad.yaml"));
  assert!(stderr.contains("is not a valid section"));
  assert_eq!(stderr.lines().count(), 1, "{}", stderr);
  Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> Result<()> {
  let repo = two_releases()?;
  repo.add_note("c.yaml", "fixes: [one, two]\nfeatures: three\n")?;
  repo.commit("Add note C")?;

  let first = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  let second = run_relnotes(&repo.path, &["--previous", "TAIL"])?;
  assert_eq!(first, second);

  let first = run_relnotes(&repo.path, &["--previous", "TAIL", "--yaml", "--blame"])?;
  let second = run_relnotes(&repo.path, &["--previous", "TAIL", "--yaml", "--blame"])?;
  assert_eq!(first, second);
  Ok(())
}

#[test]
fn test_custom_config_and_notes_dir() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.write_file(
    "relnotes.toml",
    r#"notes_dir = "docs/notes"

[[sections]]
name = "changed"
title = "Changed"

[[sections]]
name = "removed"
title = "Removed"
"#,
  )?;
  repo.write_file("docs/notes/x.yaml", "removed: old api\nchanged: [new api]\n")?;
  repo.commit("Add config and note")?;

  let stdout = run_relnotes(&repo.path, &[])?;
  assert_eq!(stdout, "# Current Branch\n\n## Changed\n\n- new api\n\n## Removed\n\n- old api\n\n");
  Ok(())
}

#[test]
fn test_missing_notes_dir_is_user_error() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  let (code, stderr) = run_relnotes_failing(&repo.path, &["--notes-dir", "nowhere"])?;
  assert_eq!(code, 1);
  assert!(stderr.contains("nowhere"));
  Ok(())
}

#[test]
fn test_outside_git_repo_is_system_error() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  std::fs::create_dir(dir.path().join("releasenotes"))?;

  let (code, stderr) = run_relnotes_failing(dir.path(), &[])?;
  assert_eq!(code, 2);
  assert!(stderr.contains("ERROR"));
  Ok(())
}
