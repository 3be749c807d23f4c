//! End-to-end runs of the `pv` binary against a small snapshot on disk.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn snapshot_value() -> Value {
    json!({
        "topics": [
            {"topic_id": "T1", "name": "財政"},
            {"topic_id": "T2", "name": "防衛"}
        ],
        "positions": {
            "T1": {
                "topic": {"topic_id": "T1", "name": "財政"},
                "scores": [
                    {"entity_id": "A", "entity_name": "A党", "stance_label": "support", "stance_score": 60, "confidence": 0.8},
                    {"entity_id": "B", "entity_name": "B党", "stance_label": "oppose", "stance_score": -40, "confidence": 0.7}
                ]
            },
            "T2": {
                "topic": {"topic_id": "T2", "name": "防衛"},
                "scores": [
                    {"entity_id": "A", "entity_name": "A党", "stance_label": "oppose", "stance_score": -20, "confidence": 0.6},
                    {"entity_id": "B", "entity_name": "B党", "stance_label": "support", "stance_score": 80, "confidence": 0.9}
                ]
            }
        },
        "positions_mixed": {}
    })
}

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("snapshot.json");
    fs::write(&path, serde_json::to_vec(&snapshot_value()).unwrap()).unwrap();
    path
}

fn pv(snapshot: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pv").unwrap();
    cmd.env_remove("PV_SNAPSHOT")
        .env_remove("PV_PARAMS")
        .env_remove("PV_SCOPE")
        .env_remove("RUST_LOG")
        .arg("--quiet")
        .arg("--snapshot")
        .arg(snapshot);
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn radar_prints_canonical_json() {
    let dir = TempDir::new().unwrap();
    let snap = write_snapshot(&dir);
    let v = stdout_json(pv(&snap).args(["radar", "--entity", "A"]));
    assert_eq!(v["entity_id"], "A");
    assert_eq!(v["scope"], "official");
    assert_eq!(v["topic_included"], 2);
    assert_eq!(v["categories"].as_array().unwrap().len(), 6);
    assert_eq!(v["categories"][0]["median"], 60.0);
}

#[test]
fn topics_and_summaries() {
    let dir = TempDir::new().unwrap();
    let snap = write_snapshot(&dir);

    let topics = stdout_json(pv(&snap).arg("topics"));
    assert_eq!(topics.as_array().unwrap().len(), 2);

    let summaries = stdout_json(pv(&snap).arg("summaries"));
    assert_eq!(summaries[0]["near_party"], "B党");
    assert!(summaries[0]["summary_text"].as_str().unwrap().starts_with("平均より"));
}

#[test]
fn out_flag_writes_file() {
    let dir = TempDir::new().unwrap();
    let snap = write_snapshot(&dir);
    let out = dir.path().join("radar.json");
    pv(&snap)
        .args(["radar-all", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let v: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn unknown_party_exits_3() {
    let dir = TempDir::new().unwrap();
    let snap = write_snapshot(&dir);
    pv(&snap)
        .args(["radar", "--entity", "Z"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("party not found: Z"));
}

#[test]
fn missing_file_exits_4() {
    let dir = TempDir::new().unwrap();
    pv(&dir.path().join("absent.json")).arg("topics").assert().code(4);
}

#[test]
fn malformed_json_exits_2() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, b"{\"topics\": [").unwrap();
    pv(&path).arg("topics").assert().code(2).stderr(predicate::str::contains("json"));
}

#[test]
fn no_source_exits_2() {
    Command::cargo_bin("pv")
        .unwrap()
        .env_remove("PV_SNAPSHOT")
        .arg("topics")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--snapshot or --feed"));
}

#[test]
fn positions_without_mixed_run_falls_back() {
    let dir = TempDir::new().unwrap();
    let snap = write_snapshot(&dir);

    let v = stdout_json(pv(&snap).args(["--scope", "mixed", "positions", "--topic", "T1"]));
    assert_eq!(v["served_scope"], "official");
    assert_eq!(v["scores"].as_array().unwrap().len(), 2);

    let v = stdout_json(pv(&snap).args(["--scope", "mixed", "positions", "--topic", "T1", "--no-fallback"]));
    assert_eq!(v["served_scope"], Value::Null);
    assert!(v["scores"].as_array().unwrap().is_empty());
}
