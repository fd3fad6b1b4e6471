//! Scripted session replay and reporting.
//!
//! Each case is replayed through a fresh [`ResonanceController`], one
//! `evaluate` per chunk. Results are trend indicators, not absolute truth.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use notepad_types::LOW_HARMONY_THRESHOLD;
use notepad_utils::{AtomicWriteOptions, atomic_write_with_options};

use crate::controller::ResonanceController;

pub const RESULTS_FILENAME: &str = "RESONANT_NOTEPAD_BENCHMARK_RESULTS.json";
pub const REPORT_FILENAME: &str = "RESONANT_NOTEPAD_BENCHMARK_REPORT.md";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write benchmark output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize benchmark results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A named sequence of text snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCase {
    pub name: String,
    pub chunks: Vec<String>,
}

impl SessionCase {
    pub fn new<I, S>(name: impl Into<String>, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub name: String,
    pub steps: usize,
    pub avg_harmony: f64,
    pub min_harmony: f64,
    pub max_harmony: f64,
    /// Population standard deviation of per-tick harmony.
    pub volatility: f64,
    /// Share of ticks with harmony below the low-harmony threshold.
    pub low_harmony_rate: f64,
    pub final_l: f64,
    pub final_j: f64,
    pub final_p: f64,
    pub final_w: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub session_count: usize,
    pub average_harmony: f64,
    pub average_volatility: f64,
    pub average_low_harmony_rate: f64,
    pub resonance_viability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_at_utc: String,
    pub summary: BenchmarkSummary,
    pub sessions: Vec<SessionMetrics>,
}

fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Replay `chunks` through a fresh controller.
///
/// With no chunks the untouched anchor harmony stands in for every statistic.
pub fn analyze_session<S: AsRef<str>>(name: &str, chunks: &[S]) -> SessionMetrics {
    let mut controller = ResonanceController::new();
    let mut harmonies = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        harmonies.push(controller.evaluate(chunk.as_ref()).harmony);
    }

    let state = controller.state();
    if harmonies.is_empty() {
        harmonies.push(state.harmony());
    }

    let low = harmonies
        .iter()
        .filter(|h| **h < LOW_HARMONY_THRESHOLD)
        .count();

    let metrics = SessionMetrics {
        name: name.to_string(),
        steps: chunks.len(),
        avg_harmony: mean(harmonies.iter().copied()),
        min_harmony: harmonies.iter().copied().fold(f64::INFINITY, f64::min),
        max_harmony: harmonies.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        volatility: stddev(&harmonies),
        low_harmony_rate: if chunks.is_empty() {
            0.0
        } else {
            low as f64 / chunks.len() as f64
        },
        final_l: state.l(),
        final_j: state.j(),
        final_p: state.p(),
        final_w: state.w(),
    };
    tracing::debug!(
        session = %metrics.name,
        steps = metrics.steps,
        avg_harmony = metrics.avg_harmony,
        "Analyzed benchmark session"
    );
    metrics
}

/// The built-in scripted sessions, in report order.
#[must_use]
pub fn default_session_cases() -> Vec<SessionCase> {
    vec![
        SessionCase::new(
            "draft_flow",
            [
                "Today I want to sketch the shape of this feature.",
                "It should be simple and clear, and it should help the user move quickly.",
                "What should the first interaction feel like?",
                "I will keep the core focused, then add detail where needed.",
            ],
        ),
        SessionCase::new(
            "dense_notes",
            [
                "Meeting notes: release prep, QA gaps, migration timing, owner mapping.",
                "Need status by team, timeline with blockers, and a final go/no-go rubric.",
                "Action items: verify rollback path; test cross-platform save semantics.",
                "Risks: rushed handoff, weak docs, unclear decision owner.",
            ],
        ),
        SessionCase::new(
            "chaotic_input",
            [
                "asdf asdf asdf ???",
                "random fragments and noise without structure and maybe many words",
                "!!!! maybe maybe maybe",
                "final burst; no clear thread; uncertain logic.",
            ],
        ),
    ]
}

impl BenchmarkSummary {
    #[must_use]
    pub fn from_sessions(sessions: &[SessionMetrics]) -> Self {
        let avg_harmony = mean(sessions.iter().map(|s| s.avg_harmony));
        let avg_volatility = mean(sessions.iter().map(|s| s.volatility));
        let avg_low_rate = mean(sessions.iter().map(|s| s.low_harmony_rate));
        let score = if sessions.is_empty() {
            0.0
        } else {
            (0.6 * avg_harmony + 0.2 * (1.0 - avg_volatility) + 0.2 * (1.0 - avg_low_rate))
                .clamp(0.0, 1.0)
        };

        Self {
            session_count: sessions.len(),
            average_harmony: round6(avg_harmony),
            average_volatility: round6(avg_volatility),
            average_low_harmony_rate: round6(avg_low_rate),
            resonance_viability_score: round6(score),
        }
    }
}

impl BenchmarkReport {
    #[must_use]
    pub fn new(generated_at_utc: impl Into<String>, sessions: Vec<SessionMetrics>) -> Self {
        Self {
            generated_at_utc: generated_at_utc.into(),
            summary: BenchmarkSummary::from_sessions(&sessions),
            sessions,
        }
    }
}

/// Analyze every case and summarize, stamped with the current UTC time.
#[must_use]
pub fn run_benchmark(cases: &[SessionCase]) -> BenchmarkReport {
    let sessions = cases
        .iter()
        .map(|case| analyze_session(&case.name, &case.chunks))
        .collect();
    BenchmarkReport::new(chrono::Utc::now().to_rfc3339(), sessions)
}

/// Shortest round-trip form; whole numbers keep a trailing `.0`.
fn float_text(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

#[must_use]
pub fn to_markdown_report(report: &BenchmarkReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    out.push_str("# Resonant Notepad Benchmark Report\n\n");
    let _ = writeln!(out, "- Generated: {}", report.generated_at_utc);
    let _ = writeln!(out, "- Sessions: {}", summary.session_count);
    let _ = writeln!(
        out,
        "- Average Harmony: {}",
        float_text(summary.average_harmony)
    );
    let _ = writeln!(
        out,
        "- Average Volatility: {}",
        float_text(summary.average_volatility)
    );
    let _ = writeln!(
        out,
        "- Average Low-Harmony Rate: {}",
        float_text(summary.average_low_harmony_rate)
    );
    let _ = writeln!(
        out,
        "- Resonance Viability Score: {}",
        float_text(summary.resonance_viability_score)
    );
    out.push_str("\n## Session Metrics\n\n");
    out.push_str(
        "| Session | Steps | Avg H | Min H | Max H | Volatility | Low-H Rate | Final L | Final J | Final P | Final W |\n",
    );
    out.push_str("|---|---:|---:|---:|---:|---:|---:|---:|---:|---:|---:|\n");
    for s in &report.sessions {
        let _ = writeln!(
            out,
            "| {} | {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |",
            s.name,
            s.steps,
            s.avg_harmony,
            s.min_harmony,
            s.max_harmony,
            s.volatility,
            s.low_harmony_rate,
            s.final_l,
            s.final_j,
            s.final_p,
            s.final_w,
        );
    }
    out.push_str("\n## Notes\n\n");
    out.push_str("- Higher harmony with lower volatility is preferred.\n");
    out.push_str("- Low-harmony rate tracks instability windows.\n");
    out.push_str("- Use results as trend indicators, not absolute truth.");
    out
}

fn report_write_options() -> AtomicWriteOptions {
    AtomicWriteOptions::durable_shared()
}

pub fn write_json(path: impl AsRef<Path>, report: &BenchmarkReport) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    atomic_write_with_options(path, json.as_bytes(), report_write_options())?;
    Ok(())
}

/// Where [`write_reports`] put its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub markdown: PathBuf,
}

/// Write the JSON results and the markdown report into `dir`, creating it if needed.
pub fn write_reports(dir: impl AsRef<Path>, report: &BenchmarkReport) -> Result<ReportPaths, ReportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let paths = ReportPaths {
        json: dir.join(RESULTS_FILENAME),
        markdown: dir.join(REPORT_FILENAME),
    };
    write_json(&paths.json, report)?;
    atomic_write_with_options(
        &paths.markdown,
        to_markdown_report(report).as_bytes(),
        report_write_options(),
    )?;

    tracing::info!(
        json = %paths.json.display(),
        markdown = %paths.markdown.display(),
        "Wrote benchmark reports"
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_benchmark_outputs_bounded_summary() {
        let report = run_benchmark(&default_session_cases());
        assert_eq!(report.summary.session_count, 3);
        assert_eq!(report.sessions.len(), 3);
        assert!((0.0..=1.0).contains(&report.summary.average_harmony));
        assert!((0.0..=1.0).contains(&report.summary.resonance_viability_score));
        assert!(!report.generated_at_utc.is_empty());
    }

    #[test]
    fn sessions_keep_case_order() {
        let report = run_benchmark(&default_session_cases());
        let names: Vec<&str> = report.sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["draft_flow", "dense_notes", "chaotic_input"]);
    }

    #[test]
    fn draft_flow_metrics_match_reference() {
        let case = &default_session_cases()[0];
        let metrics = analyze_session(&case.name, &case.chunks);
        assert_eq!(metrics.steps, 4);
        assert!((metrics.min_harmony - 0.555_554_737_846_947_2).abs() < 1e-9);
        assert!((metrics.max_harmony - 0.573_19).abs() < 1e-4);
        assert!((metrics.avg_harmony - 0.564_59).abs() < 1e-4);
        assert!((metrics.low_harmony_rate - 1.0).abs() < f64::EPSILON);
        assert!(metrics.volatility > 0.0);
    }

    #[test]
    fn summary_matches_reference_values() {
        let report = run_benchmark(&default_session_cases());
        assert!((report.summary.average_harmony - 0.566_528).abs() < 2e-6);
        assert!((report.summary.average_volatility - 0.006_672).abs() < 2e-6);
        assert!((report.summary.average_low_harmony_rate - 1.0).abs() < 1e-9);
        assert!((report.summary.resonance_viability_score - 0.538_582).abs() < 2e-6);
    }

    #[test]
    fn empty_session_uses_anchor_harmony() {
        let metrics = analyze_session::<&str>("empty", &[]);
        assert_eq!(metrics.steps, 0);
        assert_eq!(metrics.min_harmony, metrics.max_harmony);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.low_harmony_rate, 0.0);
        assert!(metrics.avg_harmony > 0.0);
    }

    #[test]
    fn empty_case_list_yields_zeroed_summary() {
        let report = run_benchmark(&[]);
        assert_eq!(report.summary.session_count, 0);
        assert_eq!(report.summary.average_harmony, 0.0);
        assert_eq!(report.summary.resonance_viability_score, 0.0);
    }

    #[test]
    fn stddev_is_population_deviation() {
        assert_eq!(stddev(&[]), 0.0);
        assert!((stddev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn markdown_report_has_sections_and_rows() {
        let report = run_benchmark(&default_session_cases());
        let md = to_markdown_report(&report);
        assert!(md.starts_with("# Resonant Notepad Benchmark Report"));
        assert!(md.contains("## Session Metrics"));
        assert!(md.contains("| draft_flow | 4 | 0.5646 |"));
        assert!(md.contains("## Notes"));
    }

    #[test]
    fn whole_number_summary_values_keep_a_decimal_point() {
        assert_eq!(float_text(1.0), "1.0");
        assert_eq!(float_text(0.0), "0.0");
        assert_eq!(float_text(0.25), "0.25");

        let report = run_benchmark(&default_session_cases());
        let md = to_markdown_report(&report);
        assert!(md.contains("- Average Low-Harmony Rate: 1.0\n"), "{md}");
    }

    #[test]
    fn write_reports_creates_both_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("docs");
        let report = BenchmarkReport::new(
            "2026-01-01T00:00:00+00:00",
            vec![analyze_session("one", &["hello there."])],
        );

        let paths = write_reports(&out, &report).expect("write reports");

        let json = fs::read_to_string(&paths.json).expect("read json");
        let parsed: BenchmarkReport = serde_json::from_str(&json).expect("parse json");
        assert_eq!(parsed, report);
        let md = fs::read_to_string(&paths.markdown).expect("read md");
        assert!(md.contains("- Generated: 2026-01-01T00:00:00+00:00"));
    }
}
