mod common;

use assert_cmd::Command;
use common::{closed_url, high_risk, Reply, StubEngine};

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("diapredict").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn assess_help_lists_vitals() {
    let mut cmd = Command::cargo_bin("diapredict").expect("binary exists");
    let output = cmd.args(["assess", "--help"]).output().unwrap();
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("--glucose"));
    assert!(help.contains("--diabetes-pedigree-function"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn assess_prints_the_text_report() {
    let engine = StubEngine::spawn(Reply::Json(high_risk())).await;
    let url = engine.url.clone();
    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("diapredict")
            .unwrap()
            .env("DIAPREDICT_REVEAL_DELAY_MS", "0")
            .args(["--api-url", url.as_str(), "assess", "--glucose", "150"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("82.0%"));
    assert!(stdout.contains("High Risk Level"));
    assert_eq!(engine.requests()[0]["Glucose"], 150.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ping_fails_when_engine_is_down() {
    let url = closed_url().await;
    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("diapredict")
            .unwrap()
            .args(["ping", "--api-url", url.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();
    assert!(!output.status.success());
}
