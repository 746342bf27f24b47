use std::fs;

use rtsim::*;

mod common;

const TEXTBOOK_TOML: &str = r#"
mode = "rms"
sim_time = 20

[[tasks]]
name = "T1"
execution_time = 1
period = 4

[[tasks]]
name = "T2"
execution_time = 2
period = 5
deadline = 5

[[tasks]]
name = "T3"
execution_time = 1
period = 8
"#;

#[test]
fn test_load_toml_scenario() {
    common::setup_test();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("textbook.toml");
    fs::write(&path, TEXTBOOK_TOML).unwrap();

    let scenario = load_scenario(&path).unwrap();
    assert_eq!(scenario.mode, Mode::Rms);
    assert_eq!(scenario.sim_time, 20);
    assert_eq!(scenario.tasks.len(), 3);
    assert_eq!(scenario.tasks[2], Task::new("T3", 1, 8, 8));

    let result = scenario.run().unwrap();
    assert_eq!(result.idle_slots, 4);
    assert_eq!(result.total_misses, 0);
}

#[test]
fn test_load_json_scenario() {
    common::setup_test();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pair.json");
    fs::write(
        &path,
        r#"{
            "mode": "adaptive",
            "sim_time": 90,
            "util_threshold": 0.95,
            "tasks": [
                {"name": "hi", "execution_time": 3, "period": 6},
                {"name": "lo", "execution_time": 4, "period": 9}
            ]
        }"#,
    )
    .unwrap();

    let result = load_scenario(&path).unwrap().run().unwrap();
    assert_eq!(result.escalated_at, Some(45));
    assert_eq!(result.final_algorithm, Algorithm::Edf);
}

#[test]
fn test_load_errors() {
    common::setup_test();
    let dir = tempfile::tempdir().unwrap();

    let yaml = dir.path().join("set.yaml");
    fs::write(&yaml, "tasks: []").unwrap();
    assert!(matches!(
        load_scenario(&yaml),
        Err(SimError::UnknownFormat(_))
    ));

    let missing = dir.path().join("missing.toml");
    let err = load_scenario(&missing).unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));
    assert!(err.to_string().contains("missing.toml"));

    let zero = dir.path().join("zero.toml");
    fs::write(
        &zero,
        "[[tasks]]\nname = \"a\"\nexecution_time = 0\nperiod = 4\n",
    )
    .unwrap();
    // Parses fine; rejected when it runs.
    let scenario = load_scenario(&zero).unwrap();
    let err = scenario.run().unwrap_err();
    assert_eq!(
        err.to_string(),
        "task \"a\": execution time must be positive, got 0"
    );
}

#[test]
fn test_report_json() {
    common::setup_test();
    let scenario = parse_scenario(TEXTBOOK_TOML, ScenarioFormat::Toml).unwrap();
    let result = scenario.run().unwrap();
    let report = SimulationReport::from(&result);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["sim_time"], 20);
    assert_eq!(value["final_algorithm"], "RMS");
    assert_eq!(value["escalated_at"], serde_json::Value::Null);
    assert_eq!(value["schedule"][0], "T1");
    assert_eq!(value["schedule"][7], "IDLE");
    assert_eq!(value["segments"][1]["task"], "T2");
    assert_eq!(value["segments"][1]["start"], 1);
    assert_eq!(value["segments"][1]["end"], 3);
    assert_eq!(value["miss_counts"]["T2"], 0);
    assert_eq!(value["tasks"][0]["period"], 4);
}

#[test]
fn test_trace_stats() {
    common::setup_test();
    let result = parse_scenario(TEXTBOOK_TOML, ScenarioFormat::Toml)
        .unwrap()
        .run()
        .unwrap();
    let stats = TraceStats::from_result(&result);

    assert_eq!(stats.accounted_ticks(), stats.sim_time);
    let executed: Vec<u64> = stats.tasks.iter().map(|t| t.executed).collect();
    assert_eq!(executed, vec![5, 8, 3]);
    let bursts: Vec<u64> = stats.tasks.iter().map(|t| t.bursts).collect();
    assert_eq!(bursts, vec![5, 5, 3]);
    // T1 released at 0, 4, 8, 12, 16; every job done.
    assert_eq!(stats.tasks[0].released, 5);
    assert_eq!(stats.tasks[0].completed, 5);
    assert_eq!(stats.tasks[1].share_percent, 40.0);
    assert_eq!(stats.idle_slots, 4);
    assert_eq!(stats.context_switches, 10);
}

#[test]
fn test_timeline_rendering() {
    common::setup_test();
    let result = parse_scenario(TEXTBOOK_TOML, ScenarioFormat::Toml)
        .unwrap()
        .run()
        .unwrap();
    let chart = render_timeline(&result.segments(), &result.tasks);
    let lines: Vec<&str> = chart.lines().collect();
    assert_eq!(lines[2], "T1   | #...#...#...#...#...");
    assert_eq!(lines[3], "T2   | .##..##...##...#.#..");
    assert_eq!(lines[4], "T3   | ...#.....#........#.");
    assert_eq!(lines[5], "IDLE | .......#.....##....#");
}

#[test]
fn test_bundled_scenarios() {
    common::setup_test();
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");

    let textbook = load_scenario(&dir.join("textbook.toml")).unwrap();
    assert_eq!(textbook.mode, Mode::Adaptive);
    let result = textbook.run().unwrap();
    // U = 0.775 is above 0.69, so adaptive starts on EDF.
    assert_eq!(result.initial_algorithm, Algorithm::Edf);
    assert_eq!(result.total_misses, 0);

    let pair = load_scenario(&dir.join("adaptive_escalation.json")).unwrap();
    let result = pair.run().unwrap();
    assert_eq!(result.escalated_at, Some(45));
}
