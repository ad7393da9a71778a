// Integration tests for the banquet binary

use assert_cmd::Command;
use predicates::prelude::*;

fn banquet() -> Command {
    Command::cargo_bin("banquet").unwrap()
}

#[test]
fn test_rejects_missing_arguments() {
    banquet()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_rejects_out_of_range_count() {
    banquet()
        .args(["0", "200", "100", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 200"));
}

#[test]
fn test_rejects_short_timings() {
    banquet()
        .args(["4", "59", "100", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 60ms"));
}

#[test]
fn test_lone_philosopher_takes_fork_and_dies() {
    banquet()
        .args(["1", "100", "100", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 has taken a fork"))
        .stdout(predicate::str::ends_with(" 1 died\n"));
}

#[test]
fn test_small_table_reaches_meal_target() {
    banquet()
        .args(["2", "600", "60", "60", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is eating"))
        .stdout(predicate::str::contains("died").not());
}
