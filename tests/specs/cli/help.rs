//! `beaconctl` help output specs — argument parsing only, no daemon needed.

use predicates::prelude::*;

use crate::prelude::beaconctl;

#[test]
fn no_args_exits_nonzero_and_shows_usage() {
    beaconctl().assert().failure().stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_shows_usage() {
    beaconctl().arg("--help").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn help_lists_every_subcommand() {
    let assert = beaconctl().arg("--help").assert().success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for name in ["status", "start", "stop", "pause", "resume", "config", "logs", "stats", "smtp"] {
        assert!(output.contains(name), "help text missing subcommand {name}");
    }
}

#[test]
fn config_set_requires_at_least_one_website() {
    beaconctl()
        .args(["config", "set", "--email", "a@b.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("website"));
}

#[test]
fn version_shows_version() {
    beaconctl().arg("--version").assert().success().stdout(predicate::str::contains("0.1"));
}
