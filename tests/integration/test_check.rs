//! Integration tests for `relnotes --check`

use crate::helpers::{TestRepo, run_relnotes, run_relnotes_failing};
use anyhow::Result;
use std::process::Command;

/// Repository on branch `topic`, forked from `main` after one commit
fn topic_branch() -> Result<TestRepo> {
  let repo = TestRepo::with_initial_commit()?;
  repo.checkout_new_branch("topic")?;
  repo.write_file("src.txt", "change\n")?;
  repo.commit("Code change")?;
  Ok(repo)
}

#[test]
fn test_check_fails_without_note() -> Result<()> {
  let repo = topic_branch()?;
  let (code, stderr) = run_relnotes_failing(&repo.path, &["--check"])?;
  assert_eq!(code, 3);
  assert!(stderr.contains("No release note found"));
  assert!(stderr.contains("'main'"));
  Ok(())
}

#[test]
fn test_check_passes_with_committed_note() -> Result<()> {
  let repo = topic_branch()?;
  repo.add_note("topic.yaml", "features: [topic work]\n")?;
  repo.commit("Add note")?;

  let stdout = run_relnotes(&repo.path, &["--check"])?;
  assert!(stdout.contains("1 release note(s)"));
  assert!(stdout.contains("releasenotes/topic.yaml"));
  Ok(())
}

#[test]
fn test_check_counts_staged_but_not_untracked_notes() -> Result<()> {
  let repo = topic_branch()?;
  repo.add_note("topic.yaml", "fixes: staged fix\n")?;
  run_relnotes_failing(&repo.path, &["--check"])?;

  repo.stage("releasenotes/topic.yaml")?;
  run_relnotes(&repo.path, &["--check"])?;
  Ok(())
}

#[test]
fn test_check_rejects_invalid_note() -> Result<()> {
  let repo = topic_branch()?;
  repo.add_note("topic.yaml", "fixes: {nested: map}\n")?;
  repo.commit("Add bad note")?;

  let (code, stderr) = run_relnotes_failing(&repo.path, &["--check"])?;
  assert_eq!(code, 3);
  assert!(stderr.contains("of entries"));
  Ok(())
}

#[test]
fn test_check_ignores_notes_already_on_target() -> Result<()> {
  let repo = TestRepo::with_initial_commit()?;
  repo.add_note("old.yaml", "features: [old]\n")?;
  repo.commit("Old note on main")?;
  repo.checkout_new_branch("topic")?;
  repo.write_file("src.txt", "change\n")?;
  repo.commit("Code change")?;

  run_relnotes_failing(&repo.path, &["--check"])?;
  Ok(())
}

#[test]
fn test_check_explicit_and_unknown_target() -> Result<()> {
  let repo = topic_branch()?;
  repo.checkout_new_branch("next")?;
  repo.add_note("next.yaml", "features: [next]\n")?;
  repo.commit("Add note on next")?;

  // Relative to topic the note is new
  run_relnotes(&repo.path, &["--check", "--target", "topic"])?;

  let (code, stderr) = run_relnotes_failing(&repo.path, &["--check", "--target", "nope"])?;
  assert_eq!(code, 1);
  assert!(stderr.contains("nope"));
  Ok(())
}

#[test]
fn test_check_target_from_ci_environment() -> Result<()> {
  let repo = topic_branch()?;
  repo.checkout_new_branch("next")?;
  repo.add_note("next.yaml", "features: [next]\n")?;
  repo.commit("Add note on next")?;
  repo.checkout_new_branch("final")?;

  // Against `next` there is nothing new on `final`
  let output = Command::new(env!("CARGO_BIN_EXE_relnotes"))
    .current_dir(&repo.path)
    .arg("--check")
    .env("GITHUB_BASE_REF", "next")
    .env_remove("CI_MERGE_REQUEST_TARGET_BRANCH_NAME")
    .output()?;
  assert_eq!(output.status.code(), Some(3));
  assert!(String::from_utf8_lossy(&output.stderr).contains("'next'"));

  let output = Command::new(env!("CARGO_BIN_EXE_relnotes"))
    .current_dir(&repo.path)
    .arg("--check")
    .env_remove("GITHUB_BASE_REF")
    .env("CI_MERGE_REQUEST_TARGET_BRANCH_NAME", "topic")
    .output()?;
  assert!(output.status.success());
  Ok(())
}
