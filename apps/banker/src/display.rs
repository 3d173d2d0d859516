//! Output formatting for command results

use crate::logging::fmt_sequence;
use crate::runner::RunSummary;
use banker_errors::UserFacingError;
use banker_resources::SafetyReport;
use banker_types::PoolSnapshot;
use serde_json::json;

/// Renders final results to stdout, as text or JSON
pub struct OutputRenderer {
    json: bool,
}

impl OutputRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render_check(&self, report: &SafetyReport, snapshot: &PoolSnapshot) {
        if self.json {
            let value = json!({
                "safe": report.safe,
                "sequence": report.sequence,
                "blocked": report.blocked,
                "pool": snapshot,
            });
            println!("{value:#}");
            return;
        }

        print_pool(snapshot);
        if report.safe {
            println!("state is safe: {}", fmt_sequence(&report.sequence));
        } else {
            println!("state is UNSAFE");
            if !report.sequence.is_empty() {
                println!("  can finish: {}", fmt_sequence(&report.sequence));
            }
            println!("  blocked:    {}", fmt_sequence(&report.blocked));
        }
    }

    pub fn render_run(&self, summary: &RunSummary) {
        if self.json {
            let steps: Vec<_> = summary
                .outcomes
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(()) => json!({
                        "index": outcome.index,
                        "step": outcome.step,
                        "granted": true,
                    }),
                    Err(e) => json!({
                        "index": outcome.index,
                        "step": outcome.step,
                        "granted": false,
                        "code": e.user_code(),
                        "message": e.user_message(),
                        "retryable": e.is_retryable(),
                    }),
                })
                .collect();
            let value = json!({
                "steps": steps,
                "pool": summary.snapshot,
                "monitor_checks": summary.monitor.map(|m| m.checks_passed),
                "grower_rounds": summary.grower_rounds,
            });
            println!("{value:#}");
            return;
        }

        for outcome in &summary.outcomes {
            match &outcome.result {
                Ok(()) => println!("step {}: {} -> ok", outcome.index, outcome.step.describe()),
                Err(e) => println!(
                    "step {}: {} -> refused: {}",
                    outcome.index,
                    outcome.step.describe(),
                    e.user_message()
                ),
            }
        }
        println!(
            "{} of {} steps succeeded",
            summary.granted(),
            summary.outcomes.len()
        );
        print_pool(&summary.snapshot);
        if let Some(monitor) = summary.monitor {
            println!("monitor: {} checks passed", monitor.checks_passed);
        }
        if let Some(rounds) = summary.grower_rounds {
            println!("grower: {rounds} rounds");
        }
    }
}

fn print_pool(snapshot: &PoolSnapshot) {
    println!(
        "pool: total {} available {}",
        snapshot.total, snapshot.available
    );
    for process in &snapshot.processes {
        println!(
            "  {}: max {} allocated {} need {}",
            process.id, process.max, process.allocated, process.need
        );
    }
}
