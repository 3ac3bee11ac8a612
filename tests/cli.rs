//! End-to-end tests for the bin-forge binary, run offline against a temp database

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE_CSV: &str = "\
BIN,Brand,Type,Category,Issuer,isoCode2,CountryName
457173,VISA,DEBIT,CLASSIC,JYSKE BANK,DK,DENMARK
";

fn database() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn bin_forge(db: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("bin-forge").unwrap();
    cmd.env("BIN_FORGE_OFFLINE", "1")
        .env("BIN_FORGE_DB", db.path())
        .env_remove("BINTABLE_API_KEY")
        .env_remove("BIN_FORGE_GEN_COUNT")
        .env_remove("RUST_LOG");
    cmd
}

fn luhn_valid(number: &str) -> bool {
    let sum: u32 = number
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let d = c.to_digit(10).unwrap();
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[test]
fn test_help() {
    let db = database();
    bin_forge(&db)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"))
        .stdout(predicate::str::contains("gen <PATTERN>"));
}

#[test]
fn test_no_arguments_prints_help() {
    let db = database();
    bin_forge(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
fn test_gen_prints_ten_valid_cards() {
    let db = database();
    let output = bin_forge(&db)
        .args(["gen", "457173|05|2027"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let cards: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("457173") && line.matches('|').count() == 3)
        .collect();

    assert_eq!(cards.len(), 10, "{}", stdout);
    for card in cards {
        let fields: Vec<&str> = card.split('|').collect();
        assert_eq!(fields[0].len(), 16);
        assert!(luhn_valid(fields[0]), "{}", card);
        assert_eq!(fields[1], "05");
        assert_eq!(fields[2], "27");
    }
    assert!(stdout.contains("JYSKE BANK"));
    assert!(stdout.contains("DENMARK"));
}

#[test]
fn test_gen_count_flag() {
    let db = database();
    let output = bin_forge(&db)
        .args(["gen", "457173", "--count", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let cards = stdout
        .lines()
        .filter(|line| line.starts_with("457173") && line.matches('|').count() == 3)
        .count();
    assert_eq!(cards, 3);
}

#[test]
fn test_gen_rejects_bad_bin() {
    let db = database();
    bin_forge(&db)
        .args(["gen", "12ab56"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BIN"));
}

#[test]
fn test_bin_lookup_from_local_database() {
    let db = database();
    bin_forge(&db)
        .args(["bin", "45717360"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JYSKE BANK"))
        .stdout(predicate::str::contains("VISA"))
        .stdout(predicate::str::contains("local"));
}

#[test]
fn test_bin_lookup_unknown_prefix() {
    let db = database();
    bin_forge(&db)
        .args(["bin", "999999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No information found"));
}

#[test]
fn test_bin_rejects_short_input() {
    let db = database();
    bin_forge(&db)
        .args(["bin", "1234"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_command() {
    let db = database();
    bin_forge(&db)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}
