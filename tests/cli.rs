use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const REIMBURSEMENTS: &str = "\
document_id,issue_date,congressperson_id,congressperson_name,supplier,subquota_description,cnpj_cpf,total_net_value
1001,2016-03-01T00:00:00,10,JOÃO RODRIGUES,João Rodrigues,Fuels and lubricants,11222333000181,50.00
1002,2016-03-02T00:00:00,20,TIRIRICA,Posto João Rodrigues Filho,Fuels and lubricants,22333444000192,120.00
1003,2016-03-03T00:00:00,20,TIRIRICA,Auto Posto Central,Fuels and lubricants,33444555000103,80.00
1004,2016-03-04T00:00:00,,LIDERANÇA DO PT,Restaurante Bom Sabor,Congressperson meal,44555666000114,35.50
";

const COMPANIES: &str = "\
cnpj,name,trade_name,legal_entity
11.222.333/0001-81,JOÃO RODRIGUES,,213-5 - EMPRESARIO (INDIVIDUAL)
33.444.555/0001-03,CENTRAL COMBUSTIVEIS LTDA,Ana Paula Souza,206-2 - SOCIEDADE EMPRESARIA LIMITADA
";

const DEPUTIES: &str = "\
congressperson_id,civil_name
10,JOÃO RODRIGUES
20,FRANCISCO EVERARDO OLIVEIRA SILVA
30,ANA PAULA SOUZA
";

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("reimbursements.csv"), REIMBURSEMENTS).unwrap();
    std::fs::write(data.join("companies.csv"), COMPANIES).unwrap();
    std::fs::write(data.join("deputies.csv"), DEPUTIES).unwrap();
    let config = dir.path().join(".config").join("namesake");
    std::fs::create_dir_all(&config).unwrap();
    std::fs::write(
        config.join("settings.json"),
        r#"{"reimbursements_file": "reimbursements.csv", "companies_file": "companies.csv", "deputies_file": "deputies.csv"}"#,
    )
    .unwrap();
    dir
}

fn namesake(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("namesake").unwrap();
    cmd.env("HOME", home)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--data-dir")
        .arg(home.join("data"));
    cmd
}

#[test]
fn test_exact_lists_only_exact_supplier() {
    let home = setup();
    namesake(home.path())
        .args(["--format", "csv", "exact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1001"))
        .stdout(predicate::str::contains("joao rodrigues"))
        .stdout(predicate::str::contains("1002").not());
}

#[test]
fn test_scan_includes_longer_supplier_names() {
    let home = setup();
    namesake(home.path())
        .args(["--format", "csv", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1001"))
        .stdout(predicate::str::contains("posto joao rodrigues filho"))
        .stdout(predicate::str::contains("1003").not());
}

#[test]
fn test_suspects_reports_legal_entity() {
    let home = setup();
    namesake(home.path())
        .args(["--format", "csv", "suspects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("legal_entity"))
        .stdout(predicate::str::contains("1003"))
        .stdout(predicate::str::contains("206-2 - SOCIEDADE EMPRESARIA LIMITADA"));

    namesake(home.path())
        .args(["--format", "csv", "suspects", "--sole-proprietors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1001"))
        .stdout(predicate::str::contains("1003").not());
}

#[test]
fn test_self_named_table() {
    let home = setup();
    namesake(home.path())
        .arg("self-named")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1)"))
        .stdout(predicate::str::contains("R$ 50,00"));
}

#[test]
fn test_run_json_has_every_section() {
    let home = setup();
    let output = namesake(home.path())
        .args(["--format", "json", "run"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let counts: Vec<u64> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["count"].as_u64().unwrap())
        .collect();
    assert_eq!(counts, vec![1, 2, 2, 1]);
    assert_eq!(value[0]["report"], "exact");
}

#[test]
fn test_verbose_logging_keeps_stdout_clean() {
    let home = setup();
    let output = namesake(home.path())
        .args(["-vv", "--format", "json", "run"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
    assert_eq!(value[0]["count"], 1);
    assert_eq!(value[1]["count"], 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loaded dataset"));
}

#[test]
fn test_deputy_lookup_ignores_accents() {
    let home = setup();
    namesake(home.path())
        .args(["deputy", "João Rodrigues"])
        .assert()
        .success()
        .stdout(predicate::str::contains("joao rodrigues"))
        .stdout(predicate::str::contains("10"));
}

#[test]
fn test_status_shows_row_counts() {
    let home = setup();
    namesake(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("reimbursements"))
        .stdout(predicate::str::contains("Unique suppliers:         4"))
        .stdout(predicate::str::contains("Reference civil names:    3"));
}

#[test]
fn test_missing_dataset_is_fatal() {
    let home = setup();
    std::fs::remove_file(home.path().join("data").join("companies.csv")).unwrap();
    namesake(home.path())
        .arg("exact")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Dataset 'companies' not found"));
}

#[test]
fn test_init_saves_data_dir() {
    let home = setup();
    let target = home.path().join("elsewhere");
    Command::cargo_bin("namesake")
        .unwrap()
        .env("HOME", home.path())
        .args(["init", "--data-dir"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Data directory:"));
    assert!(target.is_dir());
    let saved = std::fs::read_to_string(home.path().join(".config/namesake/settings.json")).unwrap();
    let settings: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert!(settings["data_dir"].as_str().unwrap().ends_with("elsewhere"));
    assert_eq!(settings["deputies_file"], "deputies.csv");
}
