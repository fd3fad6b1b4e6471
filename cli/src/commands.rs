//! Non-interactive subcommands: `bench` and `score`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use notepad_core::ResonanceController;
use notepad_core::benchmark::{default_session_cases, run_benchmark, write_reports};

#[derive(Parser, Debug)]
#[command(name = "resonant-notepad", version)]
#[command(about = "Terminal notepad with live resonance feedback")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// File to open in the editor instead of the last session
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the resonance benchmark and write JSON and Markdown reports
    Bench {
        /// Report directory (defaults to `[benchmark] output_dir`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score each paragraph of a text file
    Score {
        /// Text file to score
        file: PathBuf,
    },
}

/// Blank-line separated paragraphs, trimmed, empties dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

pub fn run_bench(out_dir: &Path) -> Result<()> {
    let report = run_benchmark(&default_session_cases());
    let paths = write_reports(out_dir, &report)
        .with_context(|| format!("failed to write benchmark reports to {}", out_dir.display()))?;

    let summary = &report.summary;
    println!("Sessions:                   {}", summary.session_count);
    println!("Average harmony:            {:.6}", summary.average_harmony);
    println!("Average volatility:         {:.6}", summary.average_volatility);
    println!("Average low-harmony rate:   {:.6}", summary.average_low_harmony_rate);
    println!("Resonance viability score:  {:.6}", summary.resonance_viability_score);
    println!("Wrote {}", paths.json.display());
    println!("Wrote {}", paths.markdown.display());
    Ok(())
}

pub fn run_score(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let paragraphs = split_paragraphs(&text);
    if paragraphs.is_empty() {
        println!("{} has no paragraphs to score", path.display());
        return Ok(());
    }

    let mut controller = ResonanceController::new();
    for (i, paragraph) in paragraphs.iter().enumerate() {
        let reading = controller.evaluate(paragraph);
        println!(
            "[{}] L {:.3}  J {:.3}  P {:.3}  W {:.3}  H {:.3}  autosave {}s",
            i + 1,
            reading.l,
            reading.j,
            reading.p,
            reading.w,
            reading.harmony,
            controller.autosave_interval_seconds(paragraph),
        );
        println!("    {}", controller.guidance(paragraph));
    }
    tracing::info!(paragraphs = paragraphs.len(), path = %path.display(), "Scored file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("resonant-notepad").chain(args.iter().copied()))
    }

    #[test]
    fn no_args_opens_empty_editor() {
        let cli = parse(&[]).expect("parse");
        assert_eq!(cli.file, None);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn file_arg_opens_file() {
        let cli = parse(&["notes.md"]).expect("parse");
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn bench_with_and_without_out() {
        assert_eq!(
            parse(&["bench"]).expect("parse").command,
            Some(Commands::Bench { out: None })
        );
        assert_eq!(
            parse(&["bench", "--out", "reports"]).expect("parse").command,
            Some(Commands::Bench {
                out: Some(PathBuf::from("reports"))
            })
        );
        assert!(parse(&["bench", "--out"]).is_err());
        assert!(parse(&["bench", "--fast"]).is_err());
    }

    #[test]
    fn score_requires_file() {
        assert!(parse(&["score"]).is_err());
        assert_eq!(
            parse(&["score", "a.txt"]).expect("parse").command,
            Some(Commands::Score {
                file: PathBuf::from("a.txt")
            })
        );
        assert!(parse(&["score", "a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn file_and_subcommand_conflict() {
        assert!(parse(&["notes.md", "bench"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(
            parse(&["--verbose"]).expect_err("unknown flag").kind(),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            parse(&["--help"]).expect_err("help short-circuits").kind(),
            ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let text = "first line\nstill first\n\n\n  \nsecond  \n\nthird\n";
        assert_eq!(
            split_paragraphs(text),
            ["first line\nstill first", "second", "third"]
        );
        assert!(split_paragraphs("\n \n").is_empty());
    }
}
