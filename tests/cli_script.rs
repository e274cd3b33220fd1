mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::temp_dir;

const BIN: &str = "pocket_ledger_cli";

fn script(home: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin(BIN)
        .unwrap()
        .env("POCKET_LEDGER_HOME", home)
        .env("POCKET_LEDGER_CLI_SCRIPT", "1")
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_salary_groceries_rent_flow() {
    let home = temp_dir();
    let input = "login asha\n\
                 credit 1000 bank Salary\n\
                 debit 200 bank Groceries\n\
                 debit 900 bank Rent\n\
                 balance\n\
                 categories\n\
                 exit\n";

    script(&home, input)
        .success()
        .stdout(contains("Welcome, asha."))
        .stdout(contains("₹1000.00 added to bank balance."))
        .stdout(contains("₹200.00 spent from bank."))
        .stdout(contains("₹800.00"))
        .stdout(contains("Groceries"))
        .stderr(contains("Insufficient funds"));

    let stored = fs::read_to_string(home.join("store").join("%40transactions.json")).unwrap();
    assert!(stored.contains("\"Groceries\""));
    assert!(!stored.contains("\"Rent\""));
}

#[test]
fn history_survives_between_runs_until_logout() {
    let home = temp_dir();
    script(&home, "login asha\ncredit 50 cash Gift \"from grandma\"\nexit\n").success();

    script(&home, "login asha\nhistory\nlogout\nexit\n")
        .success()
        .stdout(contains("1 transaction(s) loaded."))
        .stdout(contains("from grandma"))
        .stdout(contains("Local history cleared."));

    assert!(!home.join("store").join("%40transactions.json").exists());
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = temp_dir();
    script(&home, "ballance\nexit\n")
        .success()
        .stderr(contains("Unknown command `ballance`"))
        .stdout(contains("Suggestion: `balance`?"));
}

#[test]
fn commands_before_login_are_reported() {
    let home = temp_dir();
    script(&home, "debit 10 cash Food\nexit\n")
        .success()
        .stderr(contains("Not logged in"));
}

#[test]
fn config_changes_are_written_to_the_home_directory() {
    let home = temp_dir();
    script(&home, "config currency_symbol $\nlogin kai\ncredit 5 bank Tips\nexit\n")
        .success()
        .stdout(contains("$5.00 added to bank balance."))
        .stdout(contains("₹").not());

    let config = fs::read_to_string(home.join("config.json")).unwrap();
    assert!(config.contains("\"currency_symbol\": \"$\""));
}
