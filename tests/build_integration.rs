//! Integration tests for `mdsite build`, `render` and `check`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn mdsite_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mdsite"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Create a scratch project with a template, static files and nested content.
fn scratch_site(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("mdsite-build-test").join(name);
    // Clean up from previous runs
    let _ = fs::remove_dir_all(&dir);

    fs::create_dir_all(dir.join("content/blog")).unwrap();
    fs::create_dir_all(dir.join("static/images")).unwrap();

    fs::write(
        dir.join("template.html"),
        "<html><head><title>{{ Title }}</title></head><body>{{ Content }}</body></html>",
    )
    .unwrap();
    fs::write(dir.join("static/index.css"), "body { margin: 0; }").unwrap();
    fs::write(dir.join("static/images/logo.png"), [0u8, 1, 2, 3]).unwrap();
    fs::copy(fixture("basic.md"), dir.join("content/index.md")).unwrap();
    fs::write(
        dir.join("content/blog/first.md"),
        "# First Post\n\nHello *there*.\n\n- one\n- two\n",
    )
    .unwrap();

    dir
}

fn build(root: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(mdsite_bin())
        .args(["build", "--quiet", "--root", root.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("failed to run mdsite build")
}

#[test]
fn build_produces_expected_tree() {
    let site = scratch_site("tree");
    let output = build(&site, &[]);
    assert!(output.status.success(), "build failed: {}", String::from_utf8_lossy(&output.stderr));

    let out = site.join("public");
    assert!(out.join("index.html").is_file(), "index.html should exist");
    assert!(out.join("blog/first.html").is_file(), "blog/first.html should exist");
    assert!(out.join("index.css").is_file(), "static css should be copied");
    assert_eq!(fs::read(out.join("images/logo.png")).unwrap(), vec![0u8, 1, 2, 3]);

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn pages_fill_template() {
    let site = scratch_site("template");
    assert!(build(&site, &[]).status.success());

    let html = fs::read_to_string(site.join("public/blog/first.html")).unwrap();
    assert_eq!(
        html,
        "<html><head><title>First Post</title></head><body><div><h1>First Post</h1><p>Hello <i>there</i>.</p><ul><li>one</li><li>two</li></ul></div></body></html>"
    );

    let index = fs::read_to_string(site.join("public/index.html")).unwrap();
    assert!(index.contains("<title>Tolkien Fan Club</title>"));
    assert!(index.contains("<ol><li>Gandalf</li><li>Bilbo</li><li>Sam</li></ol>"));

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn build_clears_stale_output() {
    let site = scratch_site("stale");
    fs::create_dir_all(site.join("public")).unwrap();
    fs::write(site.join("public/old.html"), "stale").unwrap();

    assert!(build(&site, &[]).status.success());
    assert!(!site.join("public/old.html").exists(), "stale output should be removed");

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn config_file_and_flags_choose_directories() {
    let site = scratch_site("config");
    fs::write(site.join("site.json"), r#"{ "outDir": "dist" }"#).unwrap();

    assert!(build(&site, &[]).status.success());
    assert!(site.join("dist/index.html").is_file());

    assert!(build(&site, &["--out", "other"]).status.success());
    assert!(site.join("other/index.html").is_file());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn page_without_title_fails_build() {
    let site = scratch_site("no-title");
    fs::write(site.join("content/untitled.md"), "## not a title\n\ntext").unwrap();

    let output = build(&site, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("untitled.md"), "error should name the file: {stderr}");

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn out_dir_overlapping_sources_is_refused() {
    let site = scratch_site("overlap");

    let output = build(&site, &["--out", "content"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Refusing to delete"), "unexpected stderr: {stderr}");
    assert!(site.join("content/index.md").is_file());
    assert!(site.join("content/blog/first.md").is_file());

    // The project root holds every source.
    let output = build(&site, &["--out", "."]);
    assert!(!output.status.success());
    assert!(site.join("template.html").is_file());
    assert!(site.join("static/index.css").is_file());

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn malformed_page_fails_build() {
    let site = scratch_site("malformed");
    fs::write(site.join("content/broken.md"), "# Broken\n\nthis is **not closed").unwrap();

    let output = build(&site, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unclosed inline delimiter"), "unexpected stderr: {stderr}");

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn render_prints_fragment() {
    let output = Command::new(mdsite_bin())
        .args(["render", fixture("basic.md").to_str().unwrap()])
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<div><h1>Tolkien Fan Club</h1>"));
}

#[test]
fn render_tree_is_json() {
    let output = Command::new(mdsite_bin())
        .args(["render", "--format", "tree", fixture("basic.md").to_str().unwrap()])
        .output()
        .expect("failed to run mdsite render");
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["kind"], "parent");
    assert_eq!(tree["tag"], "div");
    assert_eq!(tree["children"][0]["tag"], "h1");
    assert_eq!(tree["children"][0]["value"], "Tolkien Fan Club");
}

#[test]
fn check_reports_failures() {
    let site = scratch_site("check");
    let broken = site.join("broken.md");
    fs::write(&broken, "# T\n\n`open").unwrap();

    let ok = Command::new(mdsite_bin())
        .args(["check", fixture("basic.md").to_str().unwrap()])
        .output()
        .unwrap();
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("OK"));

    let bad = Command::new(mdsite_bin())
        .args(["check", broken.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stdout).contains("error"));

    let _ = fs::remove_dir_all(&site);
}

#[test]
fn check_continues_past_unreadable_files() {
    let site = scratch_site("check-missing");
    let missing = site.join("missing.md");

    let output = Command::new(mdsite_bin())
        .args([
            "check",
            missing.to_str().unwrap(),
            fixture("basic.md").to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "one line per file: {stdout}");
    assert!(lines[0].contains("missing.md") && lines[0].contains("error"));
    assert!(lines[1].contains("basic.md") && lines[1].contains("OK"));

    let _ = fs::remove_dir_all(&site);
}
