mod reports;
mod runner;
mod scenarios;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use runner::{ScenarioResult, ScenarioRunner};
use scenarios::{find_scenario, list_scenarios};

#[derive(Debug, Parser)]
#[command(name = "throwdown-tester", version = "0.1.0")]
#[command(about = "Automated QA sweeps for the Throwdown match engine")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        print_scenario_list(&args)?;
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenario_keys = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;
    let results = run_scenarios(&args, &scenario_keys, &seeds);

    write_reports(&args, &results, start_time.elapsed())?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn print_scenario_list(args: &Args) -> Result<()> {
    let mut target = OutputTarget::new(args.output.clone())?;
    writeln!(target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(target.writer(), "  {key:25} - {description}")?;
    }
    target.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎮 Throwdown Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios::catalog()
            .iter()
            .map(|spec| spec.key().to_string())
            .collect()
    } else {
        scenarios
    }
}

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_seeds(seeds_arg: &str) -> Result<Vec<u64>> {
    let tokens = split_csv(seeds_arg);
    anyhow::ensure!(!tokens.is_empty(), "at least one seed is required");
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

fn run_scenarios(args: &Args, scenario_keys: &[String], seeds: &[u64]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let runner = ScenarioRunner::new(args.verbose);
    let mut results = Vec::new();
    for key in scenario_keys {
        if let Some(spec) = find_scenario(key) {
            results.extend(runner.run_scenario(&spec, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], total_duration: Duration) -> Result<()> {
    match args.report.as_str() {
        "json" => {
            let mut target = OutputTarget::new(args.output.clone())?;
            if results.is_empty() {
                writeln!(target.writer(), "[]")?;
            } else {
                reports::write_json_report(target.writer(), results)?;
            }
            target.flush_inner()?;
        }
        "markdown" => {
            let mut target = OutputTarget::new(args.output.clone())?;
            if results.is_empty() {
                writeln!(
                    target.writer(),
                    "# Throwdown Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::write_markdown_report(target.writer(), results)?;
            }
            target.flush_inner()?;
        }
        _ => reports::generate_console_report(results, total_duration),
    }

    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
