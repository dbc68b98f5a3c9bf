//! Integration tests for the CLI surface.
//!
//! Runs the binary through `cargo run` against temporary fixtures, the
//! same way ebuilds invoke it.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn run_patcher(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

fn setup_build_xml() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("build.xml");
    fs::write(
        &path,
        r#"<project name="widget">
  <target name="compile" depends="init">
    <javac srcdir="src" destdir="build"/>
  </target>
</project>
"#,
    )
    .unwrap();
    (dir, path)
}

#[test]
fn test_rewrite_help() {
    let output = run_patcher(&["rewrite", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rewrite attributes"));
}

#[test]
fn test_rewrite_file_in_place() {
    let (_dir, path) = setup_build_xml();

    let output = run_patcher(&[
        "rewrite",
        "-f",
        path.to_str().unwrap(),
        "-c",
        "-e",
        "javac",
        "-a",
        "srcdir",
        "-v",
        "${gentoo.src}",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rewritten"));
    assert!(stdout.contains("Summary:"));

    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains(r#"srcdir="${gentoo.src}""#));
}

#[test]
fn test_rewrite_reports_unchanged() {
    let (_dir, path) = setup_build_xml();

    let output = run_patcher(&[
        "rewrite",
        "-f",
        path.to_str().unwrap(),
        "-c",
        "-e",
        "nothing-here",
        "-a",
        "attr",
        "-v",
        "value",
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("unchanged"));
}

#[test]
fn test_rewrite_no_action_is_an_error() {
    let (_dir, path) = setup_build_xml();

    let output = run_patcher(&["rewrite", "-f", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no action"));
}

#[test]
fn test_rewrite_arity_mismatch_is_an_error() {
    let (_dir, path) = setup_build_xml();

    let output = run_patcher(&[
        "rewrite",
        "-f",
        path.to_str().unwrap(),
        "-c",
        "-e",
        "javac",
        "-a",
        "srcdir",
        "-a",
        "destdir",
        "-v",
        "only-one",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_rewrite_from_rules_file() {
    let (dir, path) = setup_build_xml();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        r#"[global]
elements = ["javac"]
attributes = ["destdir"]
values = ["${gentoo.dest}"]
"#,
    )
    .unwrap();

    let output = run_patcher(&[
        "rewrite",
        "-f",
        path.to_str().unwrap(),
        "--rules",
        rules.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains(r#"destdir="${gentoo.dest}""#));
}

#[test]
fn test_buildparser_lists_and_reads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("build.properties");
    fs::write(&path, "source.. = src\nbin.includes = META-INF/,.\n").unwrap();

    let output = run_patcher(&["buildparser", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("source.."));
    assert!(stdout.contains("bin.includes"));

    let output = run_patcher(&["buildparser", "bin.includes", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "META-INF/,."
    );
}

#[test]
fn test_buildparser_replaces_manifest_value_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("MANIFEST.MF");
    fs::write(&path, "Manifest-Version: 1.0\nBundle-Name: Old\n").unwrap();

    let output = run_patcher(&[
        "buildparser",
        "--in-place",
        "Bundle-Name",
        "New",
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("Bundle-Name: New"));
}

#[test]
fn test_cvv_reports_bad_classes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("New.class");
    // Magic, minor 0, major 52 (Java 8).
    let mut bytes = 0xCAFE_BABE_u32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 52]);
    fs::write(&path, bytes).unwrap();

    let output = run_patcher(&["cvv", "-t", "1.4", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bad:"));
    assert!(stdout.contains("Checked: 1 Good: 0 Bad: 1"));
}

#[test]
fn test_cvv_help_notes_jar_archives_are_skipped() {
    let output = run_patcher(&["cvv", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("jar archives are not inspected"));
}

#[test]
fn test_cvv_requires_target() {
    let output = run_patcher(&["cvv", "some.class"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_pom_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pom.xml");
    fs::write(
        &path,
        r#"<project>
  <groupId>org.example</groupId>
  <artifactId>widget</artifactId>
  <version>1.0</version>
</project>
"#,
    )
    .unwrap();

    let output = run_patcher(&["pom", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pom group:org.example"));
    assert!(stdout.contains("pom artifact:widget"));
    assert!(stdout.contains("pom ischild:false"));
}
