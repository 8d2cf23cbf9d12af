use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/replay.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "seller,available,pending,total_earned,total_withdrawn",
        ))
        // s1 earned 95.00 of 100.00 at 5%, then withdrew 60.00.
        .stdout(predicate::str::contains("s1,35.00,0.00,95.00,60.00"))
        // s2 earned 36.00 of 40.00 at 10%.
        .stdout(predicate::str::contains("s2,36.00,0,36.00,0"));

    Ok(())
}

#[test]
fn test_cli_missing_file() {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/does-not-exist.csv");

    cmd.assert().failure();
}
