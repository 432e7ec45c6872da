//! CLI integration tests using assert_cmd.
//!
//! None of these need a database: without DATABASE_URL the binary uses the
//! in-memory store. DATABASE_URL is removed explicitly so a developer's `.env`
//! or shell cannot redirect them.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn primefinder() -> Command {
    let mut cmd = Command::cargo_bin("primefinder").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("MAX_THREADS_TO_USE")
        .env_remove("REPORT_INTERVAL_SECS")
        .env_remove("LOG_FORMAT");
    cmd
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    primefinder().arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("check"))
            .and(predicate::str::contains("search"))
            .and(predicate::str::contains("--max-threads")),
    );
}

#[test]
fn help_search_shows_args() {
    primefinder()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--threads").and(predicate::str::contains("--until")));
}

#[test]
fn help_serve_shows_port_default() {
    primefinder()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port").and(predicate::str::contains("7001")));
}

#[test]
fn missing_subcommand_fails() {
    primefinder().assert().failure();
}

#[test]
fn zero_max_threads_is_rejected() {
    primefinder()
        .args(["--max-threads", "0", "check", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-threads"));
}

#[test]
fn search_requires_until() {
    primefinder()
        .args(["search", "--threads", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--until"));
}

// --- check ---

#[test]
fn check_prime() {
    primefinder()
        .args(["check", "6091"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("6091 is prime")
                .and(predicate::str::contains("closest prime at or below 6091: 6091")),
        );
}

#[test]
fn check_composite_reports_closest_prime() {
    primefinder()
        .args(["check", "5020"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("5020 is not prime")
                .and(predicate::str::contains("closest prime at or below 5020: 5011")),
        );
}

#[test]
fn check_negative_number() {
    primefinder()
        .args(["check", "--", "-5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("-5 is not prime")
                .and(predicate::str::contains("no prime at or below -5")),
        );
}

// --- search ---

#[test]
fn search_prints_primes_up_to_bound() {
    primefinder()
        .args(["search", "--threads", "2", "--until", "30"])
        .assert()
        .success()
        .stdout("2\n3\n5\n7\n11\n13\n17\n19\n23\n29\n");
}

#[test]
fn search_above_thread_ceiling_fails() {
    primefinder()
        .args(["--max-threads", "2", "search", "--threads", "3", "--until", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Maximum threads for searching cannot be more than 2!",
        ));
}

#[test]
fn search_reads_ceiling_from_env() {
    primefinder()
        .env("MAX_THREADS_TO_USE", "1")
        .args(["search", "--threads", "2", "--until", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Maximum threads for searching cannot be more than 1!",
        ));
}
