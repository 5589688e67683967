use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const INPUT: &str = "./test/example_page.html";

fn cmd() -> Command {
    Command::cargo_bin("picture-polyfill").unwrap()
}

#[test]
fn test_rewrites_page_to_stdout() {
    cmd()
        .args([INPUT, "--width", "1200", "--pixel-ratio", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"src="images/robot-large-2x.png""#))
        .stdout(predicate::str::contains(
            r#"data-original-src="images/robot-fallback.png""#,
        ))
        .stdout(predicate::str::contains(r#"alt="A robot waving""#))
        .stdout(predicate::str::contains(r#"data-cache-index="0""#));
}

#[test]
fn test_report_after_resize() {
    cmd()
        .args([INPUT, "--resize", "800", "--resize", "640", "--report"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""src": "images/robot-medium.png""#))
        .stdout(predicate::str::contains(r#""cache_hits": 2"#));
}

#[test]
fn test_config_file_disables_cache() {
    cmd()
        .args([
            INPUT,
            "--config",
            "./test/config.json",
            "--resize",
            "500",
            "--report",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""extracted": 4"#))
        .stdout(predicate::str::contains(r#""cache_hits": 0"#));
}

#[test]
fn test_writes_output_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("nested").join("page.html");

    cmd()
        .args([INPUT, "--output"])
        .arg(&output)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.contains(r#"src="images/robot-large.png""#));
    dir.close().unwrap();
}

#[test]
fn test_missing_input_fails() {
    cmd()
        .arg("/tmp/bad/path/page.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to process"));
}

#[test]
fn test_invalid_pixel_ratio_fails() {
    cmd()
        .args([INPUT, "--pixel-ratio", "-1"])
        .assert()
        .failure();
}
