use std::path::{Path, PathBuf};
use std::process::Command;

fn skylint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_skylint"))
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/demo")
}

fn copy_tree(src: &Path, dst: &Path) {
    std::fs::create_dir_all(dst).unwrap();
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
}

#[test]
fn check_reports_incompatibilities() {
    let output = skylint_cmd()
        .arg("check")
        .arg("--path")
        .arg(fixture_path())
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(2), "stdout: {stdout}");
    assert!(stdout.contains("scroll-view"), "stdout: {stdout}");
    assert!(stdout.contains("display-inline"), "stdout: {stdout}");
    assert!(stdout.contains("position-fixed"), "stdout: {stdout}");
    assert!(stdout.contains("IMPORTED"), "stdout: {stdout}");
}

#[test]
fn check_clean_selection_exits_zero() {
    let output = skylint_cmd()
        .arg("check")
        .arg("--path")
        .arg(fixture_path())
        .args(["--pages", "pages/about/about"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    // The about page only gets an info-level renderer finding.
    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("renderer-skyline"), "stdout: {stdout}");
}

#[test]
fn fix_rewrites_offending_sources() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("demo");
    copy_tree(&fixture_path(), &root);

    let output = skylint_cmd().arg("fix").arg("--path").arg(&root).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let patched = std::fs::read_to_string(root.join("pages/home/home.wxss")).unwrap();
    assert!(patched.contains("border-box"));
    assert!(!patched.contains("content-box"));

    let recheck = skylint_cmd().arg("check").arg("--path").arg(&root).output().unwrap();
    let stdout = String::from_utf8_lossy(&recheck.stdout);
    assert!(!stdout.contains("box-sizing"), "stdout: {stdout}");
}

#[test]
fn fix_inserts_missing_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("demo");
    copy_tree(&fixture_path(), &root);

    let output = skylint_cmd()
        .arg("fix")
        .arg("--path")
        .arg(&root)
        .args(["--pages", "pages/about/about"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let patched = std::fs::read_to_string(root.join("pages/about/about.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&patched).unwrap();
    assert_eq!(value["renderer"], "skyline");
}

#[test]
fn rules_lists_the_registry() {
    let output = skylint_cmd().arg("rules").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("box-sizing"));
    assert!(stdout.contains("renderer-skyline"));
    assert!(stdout.contains("markup"));
}
