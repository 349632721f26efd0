//! Iterated scenario execution and per-seed result aggregation.

use std::time::{Duration, Instant};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::scenarios::{ScenarioCtx, ScenarioSpec};

/// Outcome of running one scenario against one base seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    /// Mean duration of the passing iterations, in microseconds.
    pub average_duration_us: u64,
    pub iteration_durations_us: Vec<u64>,
}

impl ScenarioResult {
    #[must_use]
    pub const fn average_duration(&self) -> Duration {
        Duration::from_micros(self.average_duration_us)
    }
}

pub struct ScenarioRunner {
    verbose: bool,
}

impl ScenarioRunner {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run `iterations` passes of a scenario for every base seed.
    ///
    /// Iteration `i` runs with seed `base.wrapping_add(i)` so reruns with the
    /// same arguments replay the exact same opponent streams.
    pub fn run_scenario(
        &self,
        spec: &ScenarioSpec,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Running scenario: {} (seed: {seed})",
                    spec.key().bright_white()
                );
            }
            results.push(self.run_single(spec, seed, iterations));
        }

        results
    }

    fn run_single(&self, spec: &ScenarioSpec, seed: u64, iterations: usize) -> ScenarioResult {
        let mut successes = 0usize;
        let mut failures = Vec::new();
        let mut durations: Vec<Duration> = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let ctx = ScenarioCtx {
                seed: iteration_seed,
                verbose: self.verbose,
            };
            let start_time = Instant::now();

            match spec.run(&ctx) {
                Ok(()) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    durations.push(duration);
                    if self.verbose {
                        println!("  ✅ Iteration {}/{iterations} passed ({duration:?})", i + 1);
                    }
                }
                Err(err) => {
                    let detail = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(detail);
                }
            }
        }

        let average = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: spec.key().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration_us: duration_to_us(average),
            iteration_durations_us: durations.iter().copied().map(duration_to_us).collect(),
        }
    }
}

fn duration_to_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
