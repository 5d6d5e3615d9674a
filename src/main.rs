//! Command-line entry point: read a Smogon-format team file, analyze it,
//! print the report.
//!
//! Usage: `poke-analyzer <team-file> [--format <slug>] [--data <dir>] [--json]`

use poke_analyzer::analysis::TeamAnalyzer;
use poke_analyzer::mcp_interface::render_report;
use poke_analyzer::parse_team;
use poke_analyzer::providers::{DexData, ResponseCache, UsageSnapshot};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_FORMAT: &str = "gen9vgc2025regh";

struct CliArgs {
    team_path: PathBuf,
    format: String,
    data_dir: PathBuf,
    json: bool,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut team_path = None;
    let mut format = DEFAULT_FORMAT.to_string();
    let mut data_dir = PathBuf::from("data");
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                format = args.next().ok_or("--format requires a value")?;
            }
            "--data" => {
                data_dir = PathBuf::from(args.next().ok_or("--data requires a value")?);
            }
            "--json" => json = true,
            "--help" | "-h" => {
                return Err(String::new());
            }
            other if team_path.is_none() => team_path = Some(PathBuf::from(other)),
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }

    Ok(CliArgs {
        team_path: team_path.ok_or("A team file path is required")?,
        format,
        data_dir,
        json,
    })
}

fn print_usage() {
    eprintln!("Usage: poke-analyzer <team-file> [--format <slug>] [--data <dir>] [--json]");
    eprintln!();
    eprintln!("Reads a Smogon-format team export and prints an analysis report.");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("Error: {}", message);
            }
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let team_text = match std::fs::read_to_string(&args.team_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", args.team_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let roster = match parse_team(&team_text) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error parsing team: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dex = match DexData::load(&args.data_dir) {
        Ok(dex) => Arc::new(dex),
        Err(e) => {
            eprintln!("Error loading dex data: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let lookup_cache = ResponseCache::new(256, Duration::from_secs(900));
    let usage = match UsageSnapshot::load_dir(&usage_dir(&args.data_dir)) {
        Ok(snapshot) => Arc::new(snapshot.with_cache(lookup_cache)),
        Err(e) => {
            // The analysis degrades without usage data; the report says so.
            eprintln!("Usage snapshots unavailable: {}", e);
            Arc::new(UsageSnapshot::empty())
        }
    };

    let analyzer = TeamAnalyzer::new(dex, usage);
    match analyzer.analyze(&roster, &args.format).await {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(payload) => println!("{}", payload),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", render_report(&report));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error analyzing team: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn usage_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("usage")
}
