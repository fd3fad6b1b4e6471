//! Benchmark harness end to end: run, summarize, write both reports.

use notepad_core::benchmark::{
    BenchmarkReport, REPORT_FILENAME, RESULTS_FILENAME, SessionCase, default_session_cases,
    run_benchmark, to_markdown_report, write_reports,
};

#[test]
fn default_run_matches_reference_summary() {
    let report = run_benchmark(&default_session_cases());
    let summary = &report.summary;

    assert_eq!(summary.session_count, 3);
    assert!((summary.average_harmony - 0.566_528).abs() < 2e-6);
    assert!((summary.average_volatility - 0.006_672).abs() < 2e-6);
    assert!((summary.average_low_harmony_rate - 1.0).abs() < 2e-6);
    assert!((summary.resonance_viability_score - 0.538_582).abs() < 2e-6);
}

#[test]
fn reports_land_in_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("docs");
    let report = run_benchmark(&default_session_cases());

    let paths = write_reports(&out, &report).expect("write");

    assert_eq!(paths.json, out.join(RESULTS_FILENAME));
    assert_eq!(paths.markdown, out.join(REPORT_FILENAME));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).expect("read json"))
            .expect("valid json");
    assert_eq!(json["summary"]["session_count"], 3);
    assert_eq!(json["sessions"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["sessions"][0]["name"], "draft_flow");

    let markdown = std::fs::read_to_string(&paths.markdown).expect("read md");
    assert!(markdown.starts_with("# Resonant Notepad Benchmark Report"));
    assert!(markdown.contains("| chaotic_input |"));
}

#[test]
fn custom_cases_keep_their_order() {
    let cases = [
        SessionCase::new("questions", ["Why?", "What next?"]),
        SessionCase::new("empty", Vec::<String>::new()),
    ];
    let report = run_benchmark(&cases);
    let names: Vec<&str> = report.sessions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["questions", "empty"]);
    assert_eq!(report.sessions[1].steps, 0);
    assert!(report.sessions[1].low_harmony_rate.abs() < f64::EPSILON);
}

#[test]
fn markdown_lists_every_session() {
    let report = BenchmarkReport::new("2026-01-01T00:00:00+00:00", Vec::new());
    let markdown = to_markdown_report(&report);
    assert!(markdown.contains("- Generated: 2026-01-01T00:00:00+00:00"));
    assert!(markdown.contains("- Sessions: 0\n"));
    assert!(markdown.contains("- Average Harmony: 0.0\n"));
}
