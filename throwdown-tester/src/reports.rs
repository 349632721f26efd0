use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::runner::ScenarioResult;

pub fn generate_console_report(results: &[ScenarioResult], total_duration: Duration) {
    println!();
    println!("{}", "📊 Scenario Results Summary".bright_cyan().bold());
    println!("{}", "===========================".cyan());

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();
    let failed_runs = total_runs - passed_runs;

    println!("Total runs: {total_runs}");
    println!("Passed: {}", passed_runs.to_string().green());
    println!("Failed: {}", failed_runs.to_string().red());
    #[allow(clippy::cast_precision_loss)]
    let success_rate = (passed_runs as f64 / total_runs as f64) * 100.0;
    println!("Success rate: {success_rate:.1}%");
    println!("Total time: {total_duration:?}");
    println!();

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        println!(
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        );
        println!(
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        );
        println!("   Average time: {:?}", result.average_duration());

        if !result.failures.is_empty() {
            println!("   Failures:");
            for failure in &result.failures {
                println!("     • {}", failure.red());
            }
        }
        println!();
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration_us);
    let slowest = results.iter().max_by_key(|r| r.average_duration_us);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        println!("{}", "⚡ Performance Summary".bright_yellow().bold());
        println!("{}", "=====================".yellow());
        println!(
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration()
        );
        println!(
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration()
        );
    }
}

/// Pretty-printed JSON array of every result.
///
/// # Errors
///
/// Returns serialization and write failures.
pub fn write_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// Markdown report suitable for CI job summaries.
///
/// # Errors
///
/// Returns write failures.
pub fn write_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> io::Result<()> {
    writeln!(out, "# Throwdown Logic Test Results\n")?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();
    let failed_runs = total_runs - passed_runs;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total_runs}")?;
    writeln!(out, "- **Passed**: {passed_runs}")?;
    writeln!(out, "- **Failed**: {failed_runs}")?;
    #[allow(clippy::cast_precision_loss)]
    let success_rate = (passed_runs as f64 / total_runs as f64) * 100.0;
    writeln!(out, "- **Success rate**: {success_rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration())?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<ScenarioResult> {
        vec![
            ScenarioResult {
                scenario_name: "smoke".to_string(),
                seed: 1337,
                passed: true,
                iterations_run: 2,
                successful_iterations: 2,
                failures: Vec::new(),
                average_duration_us: 420,
                iteration_durations_us: vec![400, 440],
            },
            ScenarioResult {
                scenario_name: "bias-distribution".to_string(),
                seed: 99,
                passed: false,
                iterations_run: 2,
                successful_iterations: 1,
                failures: vec!["Iteration 2 (seed 100): easy bias drifted".to_string()],
                average_duration_us: 900,
                iteration_durations_us: vec![900],
            },
        ]
    }

    #[test]
    fn markdown_report_lists_every_run() {
        let mut sink = Vec::new();
        write_markdown_report(&mut sink, &sample_results()).unwrap();
        let report = String::from_utf8(sink).unwrap();
        assert!(report.starts_with("# Throwdown Logic Test Results"));
        assert!(report.contains("- **Total runs**: 2"));
        assert!(report.contains("- **Success rate**: 50.0%"));
        assert!(report.contains("### ✅ smoke (seed 1337)"));
        assert!(report.contains("### ❌ bias-distribution (seed 99)"));
        assert!(report.contains("  - Iteration 2 (seed 100): easy bias drifted"));
    }

    #[test]
    fn json_report_round_trips() {
        let mut sink = Vec::new();
        write_json_report(&mut sink, &sample_results()).unwrap();
        let restored: Vec<ScenarioResult> = serde_json::from_slice(&sink).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].scenario_name, "smoke");
        assert!(!restored[1].passed);
    }

    #[test]
    fn console_report_handles_empty_input() {
        generate_console_report(&[], Duration::ZERO);
    }
}
