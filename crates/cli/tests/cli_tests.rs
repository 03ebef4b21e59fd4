//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("harvest")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn products() -> String {
    get_fixture_path("products.html")
}

#[test]
fn test_cli_first_match() {
    cmd()
        .args(["-s", "heading=h1", &products()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"heading\": \"Garden Tools\""));
}

#[test]
fn test_cli_stdin_input() {
    cmd()
        .args(["-s", "title=h1", "--compact", "-"])
        .write_stdin("<html><body><h1>From stdin</h1></body></html>")
        .assert()
        .success()
        .stdout(predicate::eq("{\"data\":{\"title\":\"From stdin\"}}\n"));
}

#[test]
fn test_cli_all_matches() {
    let output = cmd()
        .args(["-s", "names=.product .name", "--all", "names", "--compact", &products()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["data"]["names"],
        serde_json::json!(["Trowel", "Pruning shears", "Watering can"])
    );
}

#[test]
fn test_cli_order_and_no_strip() {
    let output = cmd()
        .args([
            "-s",
            "price=.price",
            "--order",
            "price=2",
            "-s",
            "name=.name",
            "--no-strip",
            "name",
            &products(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"]["price"], "$18.75");
    assert_eq!(json["data"]["name"], "  Trowel  ");
}

#[test]
fn test_cli_kebab_case_flags() {
    let temp_dir = TempDir::new().unwrap();
    let rules_dir = temp_dir.path().to_str().unwrap();

    cmd()
        .args([
            "-s",
            "name=.name",
            "--no-strip",
            "name",
            "--rules-dir",
            rules_dir,
            "--user-agent",
            "bot/1",
            "--compact",
            &products(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"  Trowel  \""));
}

#[test]
fn test_cli_missing_is_null() {
    cmd()
        .args(["-s", "reviews=.review", "--compact", &products()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reviews\":null"));
}

#[test]
fn test_cli_index_out_of_range_fails() {
    cmd()
        .args(["-s", "price=.price", "--order", "price=5", &products()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("matched 3"));
}

#[test]
fn test_cli_rules_file() {
    let output = cmd()
        .args(["-r", &get_fixture_path("products.rules.json"), &products()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"]["heading"], "Garden Tools");
    assert_eq!(json["data"]["second_price"], "$24.50");
    assert!(json["data"]["reviews"].is_null());
}

#[test]
fn test_cli_contradictory_rules_file() {
    let tmp = TempDir::new().unwrap();
    let rules = tmp.path().join("rules.json");
    std::fs::write(&rules, r#"{"items": {"query": "li", "all": true, "order": 1}}"#).unwrap();

    cmd()
        .args(["-r", rules.to_str().unwrap(), &products()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("choose one of `all` or `order`"));
}

#[test]
fn test_cli_invalid_selector() {
    cmd()
        .args(["-s", "bad=[[invalid", &products()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rules"));
}

#[test]
fn test_cli_text_format() {
    cmd()
        .args(["-f", "text", "-s", "heading=h1", "-s", "prices=.price", "--all", "prices", &products()])
        .assert()
        .success()
        .stdout(predicate::str::contains("heading: Garden Tools"))
        .stdout(predicate::str::contains("  - $12.00"));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("output.json");

    cmd()
        .args(["-o", output.to_str().unwrap(), "-s", "heading=h1"])
        .arg(products())
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Garden Tools"));
}

#[test]
fn test_cli_no_rules() {
    cmd().arg(products()).assert().failure();
}

#[test]
fn test_cli_invalid_file() {
    cmd().args(["-s", "heading=h1", "nonexistent.html"]).assert().failure();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "-s", "heading=h1", "-s", "reviews=.review", &products()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Harvest"))
        .stderr(predicate::str::contains("reviews: no match"));
}
