use predicates::prelude::*;
use std::fs;
use assert_cmd::Command;
use tempfile::TempDir;

fn quote_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("quote"))
}

const MARIA_DRAFT: &str = r#"
date = "2024-03-05"
misc = 20
notes = "Pagamento na entrega"

[client]
name = "Maria"
address = "Rua das Flores, 10"

[services.cameras]
amount = "150.00"
detail = "trocar fechadura"

[[items]]
description = "Fechadura"
amount = 45.50
"#;

fn write_draft(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("draft.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help() {
    quote_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Service quote builder"));
}

#[test]
fn test_version() {
    quote_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quote"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized quote config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("output").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_services_list() {
    quote_cmd()
        .arg("services")
        .assert()
        .success()
        .stdout(predicate::str::contains("cameras"))
        .stdout(predicate::str::contains("Cerca Elétrica"))
        .stdout(predicate::str::contains("Serviços Elétricos"))
        .stdout(predicate::str::contains("serv_manutencao"));
}

#[test]
fn test_render_maria() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");
    let draft = write_draft(&temp_dir, MARIA_DRAFT);
    let output = temp_dir.path().join("maria.html");

    quote_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "render",
            draft.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Client: Maria"))
        .stdout(predicate::str::contains("215,50"));

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>Orçamento - Maria</title>"));
    assert!(html.contains("Detalhes: <span>trocar fechadura</span>"));
    assert!(html.contains("<td>Fechadura</td>"));
    assert!(html.contains("R$\u{a0}20,00"));
    assert!(html.contains("TOTAL: R$\u{a0}215,50"));
    assert!(html.contains("05/03/2024"));
    assert!(html.contains("Pagamento na entrega"));
    assert!(html.contains("window.print()"));
}

#[test]
fn test_render_default_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");
    let draft = write_draft(&temp_dir, MARIA_DRAFT);

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "render", draft.to_str().unwrap()])
        .assert()
        .success();

    let written: Vec<_> = fs::read_dir(config_path.join("output"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("ORCAMENTO-maria-"));
}

#[test]
fn test_render_respects_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");
    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    fs::write(
        config_path.join("config.toml"),
        r#"
[company]
name = "Eletro Sertão"
phone = "(87) 3000-0000"
attendant = "João"

[quote]
validity_days = 7
auto_print = false
"#,
    )
    .unwrap();

    let draft = write_draft(&temp_dir, MARIA_DRAFT);
    let output = temp_dir.path().join("out.html");
    quote_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "render",
            draft.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("-- Eletro Sertão --"));
    assert!(html.contains("válido por 7 dias"));
    assert!(!html.contains("window.print()"));
}

#[test]
fn test_render_json() {
    let temp_dir = TempDir::new().unwrap();
    let draft = write_draft(&temp_dir, MARIA_DRAFT);

    let output = quote_cmd()
        .args([
            "-C",
            temp_dir.path().join("cfg").to_str().unwrap(),
            "render",
            draft.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["client"]["name"], "Maria");
    assert_eq!(value["categories"][0]["services"][0]["amount"], 150.0);
    assert_eq!(value["items"][0]["amount"], 45.5);
    assert_eq!(value["misc_cost"], 20.0);
    assert_eq!(value["date"], "2024-03-05");
}

#[test]
fn test_render_invalid_item() {
    let temp_dir = TempDir::new().unwrap();
    let draft = write_draft(
        &temp_dir,
        r#"
[[items]]
description = "Cabo"
amount = -5
"#,
    );

    quote_cmd()
        .args([
            "-C",
            temp_dir.path().join("cfg").to_str().unwrap(),
            "render",
            draft.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid amount"));
}

#[test]
fn test_render_missing_draft() {
    let temp_dir = TempDir::new().unwrap();
    quote_cmd()
        .args([
            "-C",
            temp_dir.path().join("cfg").to_str().unwrap(),
            "render",
            temp_dir.path().join("nope.toml").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Draft file not found"));
}

#[test]
fn test_malformed_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[quote\n").unwrap();
    let draft = write_draft(&temp_dir, MARIA_DRAFT);

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "render", draft.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_session_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quote-config");

    let script = "\
client name Maria
date 2024-03-05
check cameras
amount val_cameras 150.00
detail cameras trocar fechadura
add Fechadura 45.50
add \"\" 10
misc 20
print --no-open
quit
";

    quote_cmd()
        .args(["-C", config_path.to_str().unwrap(), "session"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: R$\u{a0}215,50"))
        .stdout(predicate::str::contains("Saved quote to"))
        .stderr(predicate::str::contains("Error: Please fill in a description"));

    let reports: Vec<_> = fs::read_dir(config_path.join("output")).unwrap().collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn test_session_toggle_clears_detail() {
    let temp_dir = TempDir::new().unwrap();
    let script = "\
check cerca
detail cerca fio novo
uncheck cerca
check cerca
json
";

    quote_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap(), "session"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"detail\": null"))
        .stdout(predicate::str::contains("fio novo").not());
}

#[test]
fn test_session_hidden_detail_is_rejected() {
    let temp_dir = TempDir::new().unwrap();

    quote_cmd()
        .args(["-C", temp_dir.path().join("cfg").to_str().unwrap(), "session"])
        .write_stdin("detail cameras oi\ntotal\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: R$\u{a0}0,00"))
        .stderr(predicate::str::contains("is not selected"));
}
