//! End-to-end tests for the fixture-gate binary.
//!
//! Each test writes a project root with a `fixture_gate.toml` pointing the
//! toolchain at the stand-in compiler, then checks stdout, stderr and the
//! exit status the way a CI job would see them.

#![cfg(unix)]

mod common;

use std::fs;

use assert_cmd::Command;
use common::{BUILD_ERROR, FixtureTree};
use predicates::prelude::*;

/// Get a Command for the fixture-gate binary.
#[allow(deprecated)]
fn gate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fixture-gate").unwrap();
    cmd.env_remove("FIXTURE_GATE_ROOT")
        .env_remove("FIXTURE_GATE_CONFIG")
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config that builds with the stand-in compiler
fn write_config(tree: &FixtureTree, extra: &str) {
    let toolchain = tree.fake_toolchain();
    let text = format!(
        "[toolchain]\ncompiler = '{}'\nflags = ['{}']\n{extra}",
        toolchain.compiler, toolchain.flags[0]
    );
    fs::write(tree.root().join("fixture_gate.toml"), text).unwrap();
}

fn gate_in(tree: &FixtureTree) -> Command {
    let mut cmd = gate_cmd();
    cmd.arg("--root").arg(tree.root()).arg("--no-color");
    cmd
}

// =============================================================================
// Exit Status Tests
// =============================================================================

mod exit_status {
    use super::*;
    use fixture_gate::prelude::Variant;

    #[test]
    fn test_all_passed_exits_zero() {
        let tree = FixtureTree::new();
        tree.passing("a", "1 2 3\n").passing("b", "4\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a", "--case", "b"])
            .assert()
            .code(0)
            .stdout(
                "Case a Accepted!\n\
                 Case_memcheck a Accepted!\n\
                 Case b Accepted!\n\
                 Case_memcheck b Accepted!\n\
                 Passed all tests!\n",
            );
    }

    #[test]
    fn test_wrong_answer_exits_one() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n")
            .variant("b", Variant::Standard, "2\n", "3\n")
            .variant("b", Variant::MemCheck, "2\n", "2\n")
            .passing("c", "c\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a", "--case", "b", "--case", "c"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("WA on Case b"))
            .stdout(predicate::str::contains("Case c").not())
            .stdout(predicate::str::contains("Passed all tests!").not());
    }

    #[test]
    fn test_build_error_exits_one() {
        let tree = FixtureTree::new();
        tree.variant("a", Variant::Standard, BUILD_ERROR, "1\n")
            .variant("a", Variant::MemCheck, "1\n", "1\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Build failed on Case a"));
    }

    #[test]
    fn test_missing_fixtures_exit_three() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a", "--case", "missing"])
            .assert()
            .code(3)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("fixture directory not found"));
    }

    #[test]
    fn test_default_suite_without_data_exits_three() {
        let tree = FixtureTree::new();
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--suite", "priority-queue"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("one"));
    }

    #[test]
    fn test_unknown_flag_exits_two() {
        gate_cmd().arg("--bogus").assert().code(2);
    }

    #[test]
    fn test_invalid_case_name_exits_three() {
        let tree = FixtureTree::new();
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "../escape"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("invalid case name"));
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod configuration {
    use super::*;
    use fixture_gate::prelude::Variant;

    #[test]
    fn test_cases_from_config_file() {
        let tree = FixtureTree::new();
        tree.passing("x", "x\n").passing("y", "y\n");
        write_config(&tree, "[suite]\ncases = ['y', 'x']\n");

        gate_in(&tree)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Case y Accepted!\n"));
    }

    #[test]
    fn test_explicit_config_path() {
        let tree = FixtureTree::new();
        tree.passing("x", "x\n");
        write_config(&tree, "[suite]\ncases = ['x']\n");
        let moved = tree.root().join("other.toml");
        fs::rename(tree.root().join("fixture_gate.toml"), &moved).unwrap();

        gate_in(&tree)
            .arg("--config")
            .arg(&moved)
            .assert()
            .success()
            .stdout(predicate::str::contains("Passed all tests!"));
    }

    #[test]
    fn test_invalid_config_exits_three() {
        let tree = FixtureTree::new();
        fs::write(tree.root().join("fixture_gate.toml"), "[nope]\n").unwrap();

        gate_in(&tree)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("invalid config"));
    }

    #[test]
    fn test_colliding_file_names_exit_three() {
        let tree = FixtureTree::new();
        tree.variant("a", Variant::Standard, "WRONG\n", "right\n")
            .variant("a", Variant::MemCheck, "WRONG\n", "right\n");
        write_config(&tree, "[files]\ncaptured = 'answer.txt'\n");

        gate_in(&tree)
            .args(["--case", "a"])
            .assert()
            .code(3)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("invalid file name"));
        assert_eq!(
            tree.files_in("a", Variant::Standard),
            ["answer.txt", "code.cpp"]
        );
    }

    #[test]
    fn test_whitespace_flag_overrides_config() {
        let tree = FixtureTree::new();
        tree.variant("a", Variant::Standard, "12 3\n", "1 2 3\n")
            .variant("a", Variant::MemCheck, "1\n", "1\n");
        write_config(&tree, "[compare]\nwhitespace = 'ignore-all'\n");

        gate_in(&tree).args(["--case", "a"]).assert().success();
        gate_in(&tree)
            .args(["--case", "a", "--whitespace", "collapse"])
            .assert()
            .code(1);
    }
}

// =============================================================================
// Output Format Tests
// =============================================================================

mod output {
    use super::*;
    use fixture_gate::prelude::Variant;

    #[test]
    fn test_json_lines() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n");
        write_config(&tree, "");

        let assert = gate_in(&tree)
            .args(["--case", "a", "--format", "json"])
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let entries: Vec<serde_json::Value> = stdout
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["case"], "a");
        assert_eq!(entries[0]["variant"], "standard");
        assert_eq!(entries[2]["verdict"], "all_passed");
    }

    #[test]
    fn test_no_color_env_disables_colors() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n");
        write_config(&tree, "");

        gate_cmd()
            .env("NO_COLOR", "1")
            .arg("--root")
            .arg(tree.root())
            .args(["--case", "a"])
            .assert()
            .code(0)
            .stdout("Case a Accepted!\nCase_memcheck a Accepted!\nPassed all tests!\n");
    }

    #[test]
    fn test_falsey_no_color_env_still_runs() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n");
        write_config(&tree, "");

        gate_cmd()
            .env("NO_COLOR", "0")
            .arg("--root")
            .arg(tree.root())
            .args(["--case", "a"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("Passed all tests!"));
    }

    #[test]
    fn test_show_output_on_wrong_answer() {
        let tree = FixtureTree::new();
        tree.variant("a", Variant::Standard, "mine\n", "theirs\n")
            .variant("a", Variant::MemCheck, "1\n", "1\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a", "--show-output"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Output of Case a:\nmine\n"));
    }

    #[test]
    fn test_verbose_logs_go_to_stderr() {
        let tree = FixtureTree::new();
        tree.passing("a", "1\n");
        write_config(&tree, "");

        gate_in(&tree)
            .args(["--case", "a", "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("run finished"))
            .stdout(predicate::str::contains("run finished").not());
    }
}
