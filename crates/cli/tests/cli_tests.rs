//! CLI integration tests
use std::fs;
use std::path::Path;

use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("lawdispatch");
    cmd.env_remove("LAWDISPATCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

/// Copies the fixture law setup into `dir` so runs can write next to it.
fn copy_fixtures(dir: &Path) {
    for name in ["config.toml", "law_page.html", "template.txt"] {
        fs::copy(get_fixture_path(name), dir.join(name)).unwrap();
    }
}

#[test]
fn test_cli_render_file_without_template() {
    cmd()
        .args(["-c", &get_fixture_path("config.toml")])
        .args(["--input", &get_fixture_path("law_page.html"), "--no-template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[anchor=aI_s1][/anchor]Section 1."))
        .stdout(predicate::str::contains("[list][*]flooding[*]advertising[/list]"))
        .stdout(predicate::str::contains("{% extends").not())
        .stdout(predicate::str::contains("signature").not());
}

#[test]
fn test_cli_render_stdin_input() {
    let html = fs::read_to_string(get_fixture_path("law_page.html")).unwrap();
    cmd()
        .args(["-c", &get_fixture_path("config.toml"), "-i", "-", "--no-template"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("[b][anchor=aII][/anchor]Article II. Offences[/b]"));
}

#[test]
fn test_cli_render_with_template() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml", "-i", "law_page.html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{% extends \"law_base.txt\" %}"))
        .stdout(predicate::str::contains("[anchor=aI][/anchor]Article I."))
        .stdout(predicate::str::contains("[law]").not());
}

#[test]
fn test_cli_render_output_file() {
    let tmp = TempDir::new().unwrap();
    let output_path = tmp.path().join("act.txt");

    cmd()
        .args(["-c", &get_fixture_path("config.toml")])
        .args(["-i", &get_fixture_path("law_page.html"), "--no-template"])
        .args(["-o", output_path.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.contains("[align=center][b]THE PUBLIC ORDER ACT[/b]"));
}

#[test]
fn test_cli_render_missing_input() {
    cmd()
        .args(["-c", &get_fixture_path("config.toml"), "-i", "/nonexistent/law.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_cli_render_missing_template() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());
    fs::remove_file(tmp.path().join("template.txt")).unwrap();

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml", "-i", "law_page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find standard law dispatch template file"));
}

#[test]
fn test_cli_update_all_laws() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Update Summary"))
        .stderr(predicate::str::contains("public_order_act"));

    let dispatch = fs::read_to_string(tmp.path().join("out/public_order_act.txt")).unwrap();
    assert!(dispatch.starts_with("{% extends \"law_base.txt\" %}"));
    assert!(dispatch.contains("[anchor=aI_s1_b][/anchor](b) including visitors."));

    let registry = fs::read_to_string(tmp.path().join("dispatch_config.toml")).unwrap();
    assert!(registry.contains("laws/public_order_act"));
    assert!(registry.contains("title = \"The Public Order Act\""));
}

#[test]
fn test_cli_update_skip_registry() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml", "--skip-registry"])
        .assert()
        .success();

    assert!(tmp.path().join("out/public_order_act.txt").exists());
    assert!(!tmp.path().join("dispatch_config.toml").exists());
}

#[test]
fn test_cli_update_failed_law_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());
    fs::remove_file(tmp.path().join("law_page.html")).unwrap();

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml", "--delay", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be generated"));
}

#[test]
fn test_cli_update_unknown_law_selects_nothing() {
    let tmp = TempDir::new().unwrap();
    copy_fixtures(tmp.path());

    cmd()
        .current_dir(tmp.path())
        .args(["-c", "config.toml", "--law", "no_such_act", "--skip-registry"])
        .assert()
        .success();

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_cli_missing_config() {
    cmd()
        .args(["-c", "/nonexistent/config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/config.toml"));
}

#[test]
fn test_cli_config_from_env() {
    cmd()
        .env("LAWDISPATCH_CONFIG", get_fixture_path("config.toml"))
        .args(["-i", &get_fixture_path("law_page.html"), "--no-template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[anchor=aI_s2][/anchor]Section 2. Definitions."));
}

#[cfg(target_os = "linux")]
#[test]
fn test_cli_first_run_writes_default_config() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .env("XDG_CONFIG_HOME", tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("First time run?"));

    let written = fs::read_to_string(tmp.path().join("lawdispatch/config.toml")).unwrap();
    assert!(written.contains("[bb_lookup]"));
}

#[test]
fn test_cli_no_template_requires_input() {
    cmd().arg("--no-template").assert().failure();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-c", &get_fixture_path("config.toml")])
        .args(["-i", &get_fixture_path("law_page.html"), "--no-template", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("lawdispatch"))
        .stderr(predicate::str::contains("Rendering BBCode"));
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--law"))
        .stdout(predicate::str::contains("--input"));
}
