use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

mod common;

#[test]
fn test_confirmed_purchase_credits_net_amount() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, buyer, seller, reference, amount, rate, method, outcome").unwrap();
    writeln!(file, "initiate, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "confirm, , , course-9, , , , success").unwrap();

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path());

    // 100.00 at 5% commission: seller nets 95.00.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,95.00,0,95.00,0"));
}

#[test]
fn test_failed_confirmation_leaves_balance_untouched() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, buyer, seller, reference, amount, rate, method, outcome").unwrap();
    writeln!(file, "initiate, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "confirm, , , course-9, , , , failure").unwrap();

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,0,0,0,0"));
}

#[test]
fn test_declined_order_marks_purchase_failed() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, buyer, seller, reference, amount, rate, method, outcome").unwrap();
    writeln!(file, "initiate, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "confirm, , , course-9, , , , success").unwrap();

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path()).arg("--decline-over").arg("50.00");

    // Order creation is declined above the limit, so the confirmation finds
    // a FAILED transaction and nothing is credited.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,0,0,0,0"));
}

#[test]
fn test_duplicate_confirmation_credits_once() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, buyer, seller, reference, amount, rate, method, outcome").unwrap();
    writeln!(file, "initiate, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "confirm, , , course-9, , , , success").unwrap();
    writeln!(file, "confirm, , , course-9, , , , success").unwrap();

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,95.00,0,95.00,0"));
}

#[test]
fn test_malformed_line_does_not_stop_the_stream() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "op, buyer, seller, reference, amount, rate, method, outcome").unwrap();
    writeln!(file, "teleport, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "initiate, b1, s1, course-9, 100.00, 5, card, ").unwrap();
    writeln!(file, "confirm, , , course-9, , , , success").unwrap();

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,95.00,0,95.00,0"));
}

#[test]
fn test_many_purchases_accumulate() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new()?;
    common::generate_purchase_csv(file.path(), 3, 20)?;

    let mut cmd = Command::new(cargo_bin!("marketpay"));
    cmd.arg(file.path());

    // 20 purchases of 100.00 at 5% each: 20 * 95.00 = 1900.00 per seller.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,1900.00,0,1900.00,0"))
        .stdout(predicate::str::contains("s2,1900.00,0,1900.00,0"))
        .stdout(predicate::str::contains("s3,1900.00,0,1900.00,0"));

    Ok(())
}
