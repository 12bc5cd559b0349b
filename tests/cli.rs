//! End-to-end CLI checks for the stat subcommands.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn gi_prints_distribution() {
    Command::cargo_bin("dugout")
        .unwrap()
        .args(["gi", "50", "60", "70", "80", "140", "--target", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GI distribution for target 20"))
        .stdout(predicate::str::contains("FLD/BRK  10"));
}

#[test]
fn gi_rejects_low_base_stat() {
    Command::cargo_bin("dugout")
        .unwrap()
        .args(["gi", "39", "60", "70", "80", "140", "--target", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 40"));
}

#[test]
fn train_prob_certain_condition() {
    Command::cargo_bin("dugout")
        .unwrap()
        .args([
            "train-prob",
            "0",
            "0",
            "0",
            "0",
            "0",
            "--level",
            "5",
            "--condition",
            "CON >= 0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.0000%"));
}

#[test]
fn train_prob_rejects_bad_condition() {
    Command::cargo_bin("dugout")
        .unwrap()
        .args([
            "train-prob",
            "0",
            "0",
            "0",
            "0",
            "0",
            "--level",
            "5",
            "--condition",
            "XYZ > 5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown stat"));
}

#[test]
fn win_prob_without_fitted_model_fails() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("dugout")
        .unwrap()
        .current_dir(tmp.path())
        .args(["win-prob", "--pr", "1500", "--opponents", "1000,2000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fit"));
}

#[test]
fn win_prob_fits_and_predicts() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("input");
    std::fs::create_dir(&input).unwrap();

    let mut csv = String::from("Gear,PR,Opponent PR,Result\n");
    for own in (500..3500).step_by(300) {
        for opp in (500..3500).step_by(300) {
            let result = if own - opp > 200 {
                "W"
            } else if opp - own > 200 {
                "L"
            } else {
                "T"
            };
            csv.push_str(&format!("Y,{},{},{}\n", own, opp, result));
            csv.push_str(&format!("N,{},{},{}\n", own, opp, result));
        }
    }
    std::fs::write(input.join("ranked_results.csv"), csv).unwrap();

    Command::cargo_bin("dugout")
        .unwrap()
        .current_dir(tmp.path())
        .args([
            "win-prob",
            "--pr",
            "3000",
            "--gear",
            "--opponents",
            "600",
            "--tiers",
            "12",
            "--fit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Models fitted"))
        .stdout(predicate::str::contains("Expected points"));
}

#[test]
fn ci_without_venv_aborts_nonzero() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("dugout")
        .unwrap()
        .current_dir(tmp.path())
        .args(["--no-input", "ci"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("venv activation"));
}
