use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join(relative)
}

fn wattroute() -> Command {
    Command::cargo_bin("wattroute").unwrap()
}

fn arg(relative: &str) -> String {
    repo_path(relative).to_str().unwrap().to_string()
}

#[test]
fn graph_path_prefers_cheaper_route() {
    wattroute()
        .args(["graph", "path", &arg("test_data/topology.json"), "--from", "A", "--to", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A -> B -> C (cost 3)"));
}

#[test]
fn graph_path_reports_unreachable() {
    wattroute()
        .args(["graph", "path", &arg("test_data/topology.json"), "--from", "C", "--to", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path from C to A"));
}

#[test]
fn graph_stats_counts_undirected_links_once() {
    wattroute()
        .args(["graph", "stats", &arg("test_data/regions_grid.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes         : 7"))
        .stdout(predicate::str::contains("Links         : 7"))
        .stdout(predicate::str::contains("Directed      : false"));
}

#[test]
fn undirected_flag_overrides_document() {
    wattroute()
        .args(["graph", "stats", &arg("test_data/topology.json"), "--undirected"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directed      : false"));
}

#[test]
fn graph_export_writes_dot() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("grid.dot");
    wattroute()
        .args([
            "graph",
            "export",
            &arg("test_data/topology.json"),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph wattroute {"));
    assert!(dot.contains("n0 -> n1"));
}

#[test]
fn plan_prints_scenario_instruction() {
    wattroute()
        .args([
            "plan",
            &arg("test_data/topology.json"),
            &arg("test_data/node_data.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIRST HOP"))
        .stdout(predicate::str::contains("0.0120"));
}

#[test]
fn plan_json_reports_statuses_and_instruction() {
    let output = wattroute()
        .args([
            "plan",
            &arg("test_data/topology.json"),
            &arg("test_data/node_data.json"),
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let step = &reports[0];
    assert_eq!(step["statuses"]["A"], "surplus");
    assert_eq!(step["statuses"]["B"], "deficit");
    assert_eq!(step["statuses"]["C"], "unknown");
    assert_eq!(step["surpluses"]["A"], 6.0);
    assert_eq!(step["instructions"][0]["origin"], "A");
    assert_eq!(step["instructions"][0]["first_hop"], "B");
    assert!(step["statuses"].get("Z").is_none());
}

#[test]
fn plan_all_steps_covers_every_step() {
    let output = wattroute()
        .args([
            "plan",
            &arg("test_data/topology.json"),
            &arg("test_data/node_data.json"),
            "--all-steps",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1]["statuses"]["A"], "balanced");
    assert_eq!(reports[1]["statuses"]["B"], "unknown");
    assert!(reports[1]["instructions"].as_array().unwrap().is_empty());
}

#[test]
fn config_file_bounds_magnitude() {
    wattroute()
        .args([
            "--config",
            &arg("test_data/config.toml"),
            "plan",
            &arg("test_data/topology.json"),
            &arg("test_data/node_data.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5000"));
}

#[test]
fn plan_writes_instruction_csv() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("instructions.csv");
    wattroute()
        .args([
            "plan",
            &arg("test_data/regions_grid.json"),
            &arg("test_data/regions_node_data.json"),
            "--all-steps",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("step,origin,first_hop,destination,magnitude\n"));
    assert!(csv.contains("Paris"));
}

#[test]
fn malformed_weight_fails() {
    let dir = tempdir().unwrap();
    let topology = dir.path().join("bad.json");
    fs::write(&topology, r#"{"A": {"B": "heavy"}}"#).unwrap();
    wattroute()
        .args(["graph", "stats", topology.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed weight"));
}

#[test]
fn missing_config_file_fails() {
    wattroute()
        .args([
            "--config",
            &arg("test_data/absent.toml"),
            "graph",
            "stats",
            &arg("test_data/topology.json"),
        ])
        .assert()
        .failure();
}

#[test]
fn render_colours_nodes_and_pins_positions() {
    wattroute()
        .args([
            "render",
            &arg("test_data/topology.json"),
            &arg("test_data/node_data.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph wattroute"))
        .stdout(predicate::str::contains("fillcolor=\"green\""))
        .stdout(predicate::str::contains("pos=\"2,0!\""))
        .stdout(predicate::str::contains("[color=\"yellow\""));
}

#[test]
fn assess_table_joins_regions() {
    wattroute()
        .args([
            "assess",
            "--weather",
            &arg("test_data/weather.json"),
            "--cities",
            &arg("test_data/cities.csv"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Haute-Savoie"))
        .stdout(predicate::str::contains("wind"));
}

#[test]
fn assess_csv_drops_duplicate_cities() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("scores.csv");
    wattroute()
        .args([
            "assess",
            "--weather",
            &arg("test_data/weather.json"),
            "--cities",
            &arg("test_data/cities.csv"),
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("city,altitude,latitude"));
    assert_eq!(lines.iter().filter(|l| l.starts_with("Annecy,")).count(), 1);
    assert!(csv.contains("GAP,670"));
    assert!(csv.contains(",05,"));
    assert!(lines.iter().any(|l| l.starts_with("Millau,") && l.ends_with(",solar")));
    assert!(lines.iter().any(|l| l.starts_with("Nowhere,") && l.contains(",,,")));
}

#[test]
fn assess_without_source_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "").unwrap();
    wattroute()
        .args([
            "--config",
            config.to_str().unwrap(),
            "assess",
            "--cities",
            &arg("test_data/cities.csv"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no weather source"));
}

#[test]
fn completions_generate_for_bash() {
    wattroute()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wattroute"));
}
