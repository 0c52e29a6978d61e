//! End-to-end tests for the bratkb binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Two GENIA-style documents, one with an unresolvable event argument.
fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "PMID-1.txt", "EGFR binds HER2");
    write(
        dir.path(),
        "PMID-1.a1",
        "T1\tProtein 0 4\tEGFR\nT2\tProtein 11 15\tHER2\n",
    );
    write(
        dir.path(),
        "PMID-1.a2",
        "T3\tBinding 5 10\tbinds\nE1\tBinding:T3 Theme:T1 Theme2:T2\n*\tEquiv T1 T2\n",
    );
    write(dir.path(), "PMID-2.txt", "IL-2 expression");
    write(
        dir.path(),
        "PMID-2.ann",
        "T1\tProtein 0 4\tIL-2\nT2\tGene_expression 5 15\texpression\nE1\tGene_expression:T2 Theme:T1\n",
    );
    dir
}

fn bratkb() -> Command {
    Command::cargo_bin("bratkb").unwrap()
}

#[test]
fn test_help_lists_commands() {
    bratkb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("graph"));
}

#[test]
fn test_parse_prints_standoff_json() {
    let dir = corpus();
    bratkb()
        .arg("parse")
        .arg(dir.path().join("PMID-1.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_id\": \"PMID-1\""))
        .stdout(predicate::str::contains("\"id\": \"*1\""));
}

#[test]
fn test_convert_directory_to_jsonl() {
    let dir = corpus();
    let output = bratkb()
        .arg("convert")
        .arg(dir.path())
        .args(["--entity-type", "Protein"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["document_id"], "PMID-1");
    assert_eq!(lines[0]["entities"][0]["id"], "PMID-1_T1");
    assert_eq!(lines[0]["events"][0]["trigger"]["text"][0], "binds");
    assert_eq!(lines[0]["coreferences"][0]["entity_ids"][1], "PMID-1_T2");
    assert_eq!(lines[1]["passages"][0]["id"], "PMID-2__text");
}

#[test]
fn test_convert_with_config_file_and_output() {
    let dir = corpus();
    write(
        dir.path(),
        "corpus.toml",
        "entity_types = [\"Protein\"]\nannotation_suffixes = [\".a1\"]\npassage_type = \"title\"\n",
    );
    let out = dir.path().join("out.jsonl");
    bratkb()
        .arg("convert")
        .arg(dir.path().join("PMID-1.txt"))
        .arg("--config")
        .arg(dir.path().join("corpus.toml"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let doc: serde_json::Value =
        serde_json::from_str(fs::read_to_string(&out).unwrap().trim()).unwrap();
    assert_eq!(doc["passages"][0]["type"], "title");
    assert_eq!(doc["entities"].as_array().unwrap().len(), 2);
    // Only .a1 was read.
    assert!(doc["events"].as_array().unwrap().is_empty());
}

#[test]
fn test_convert_reports_malformed_and_fails() {
    let dir = corpus();
    write(dir.path(), "bad.txt", "x");
    write(dir.path(), "bad.ann", "Z1\tfoo\n");
    bratkb()
        .arg("convert")
        .arg(dir.path())
        .args(["-t", "Protein"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("PMID-2"))
        .stderr(predicate::str::contains("bad.ann:1"))
        .stderr(predicate::str::contains("1 of 3 documents failed"));
}

#[test]
fn test_convert_rejects_invalid_suffix() {
    let dir = corpus();
    bratkb()
        .arg("convert")
        .arg(dir.path())
        .args(["--suffix", "ann"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid annotation file suffix"));
}

#[test]
fn test_validate_clean_corpus() {
    let dir = corpus();
    bratkb()
        .arg("validate")
        .arg(dir.path())
        .args(["-t", "Protein"])
        .assert()
        .success()
        .stderr(predicate::str::contains("All valid"));
}

#[test]
fn test_validate_reports_offset_mismatch() {
    let dir = corpus();
    write(dir.path(), "PMID-3.txt", "p53 is mutated");
    write(dir.path(), "PMID-3.a1", "T1\tProtein 0 3\tp21\n");
    bratkb()
        .arg("validate")
        .arg(dir.path())
        .args(["-t", "Protein"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PMID-3_T1: text mismatch"));
}

#[test]
fn test_graph_cypher() {
    let dir = corpus();
    bratkb()
        .arg("graph")
        .arg(dir.path().join("PMID-1.txt"))
        .args(["-t", "Protein", "--format", "cypher"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE (nPMID_1_T1:Protein"))
        .stdout(predicate::str::contains("-[:Theme2]->"))
        .stdout(predicate::str::contains("-[:COREF"));
}

#[test]
fn test_graph_networkx_default() {
    let dir = corpus();
    let output = bratkb()
        .arg("graph")
        .arg(dir.path().join("PMID-1.txt"))
        .args(["-t", "Protein"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn test_missing_file_fails() {
    bratkb()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_validate_prints_each_issue_once() {
    let dir = corpus();
    write(dir.path(), "PMID-4.txt", "p53 binds");
    write(
        dir.path(),
        "PMID-4.ann",
        "T1\tProtein 0 3\tp53\nT2\tBinding 4 9\tbinds\nR1\tPart-of Arg1:T1 Arg2:T2\n",
    );
    let output = bratkb()
        .arg("validate")
        .arg(dir.path())
        .args(["-t", "Protein"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr
            .matches("PMID-4_R1: reference PMID-4_T2 does not resolve")
            .count(),
        1,
        "{stderr}"
    );
}

#[test]
fn test_convert_prints_projection_issues_once() {
    let dir = corpus();
    write(dir.path(), "PMID-5.txt", "p53 binds");
    write(
        dir.path(),
        "PMID-5.ann",
        "T1\tProtein 0 3\tp53\nE1\tBinding:T9 Theme:T1\n",
    );
    let output = bratkb()
        .arg("convert")
        .arg(dir.path().join("PMID-5.txt"))
        .args(["-t", "Protein"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("T9").count(), 1, "{stderr}");
}
