use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use crate::distribution::DistributionReport;
use crate::simulation::SimulationReport;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub distributions: Vec<DistributionReport>,
    pub simulation: Option<SimulationReport>,
    pub passed: bool,
}

impl RunReport {
    #[must_use]
    pub fn new(
        seed: u64,
        distributions: Vec<DistributionReport>,
        simulation: Option<SimulationReport>,
    ) -> Self {
        let passed = distributions.iter().all(|report| report.passed)
            && simulation.as_ref().is_none_or(|report| report.passed);
        Self {
            seed,
            distributions,
            simulation,
            passed,
        }
    }
}

fn percent(share: f64) -> String {
    format!("{:.2}%", share * 100.0)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &RunReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Selection Distribution".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    for dist in &report.distributions {
        let status = if dist.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} ({} draws, max drift {})",
            status,
            dist.category.label().bold(),
            dist.draws,
            percent(dist.max_drift)
        )?;
        if dist.rows.is_empty() {
            writeln!(out, "   {}", "no eligible candidates".yellow())?;
        }
        for row in &dist.rows {
            let drift = if row.drift > dist.tolerance {
                percent(row.drift).red()
            } else {
                percent(row.drift).normal()
            };
            writeln!(
                out,
                "   {:<12} expected {:>8}  observed {:>8}  drift {}",
                row.candidate,
                percent(row.expected),
                percent(row.observed),
                drift
            )?;
        }
        if dist.strays > 0 {
            writeln!(out, "   {} draws outside the eligible set", dist.strays.to_string().red())?;
        }
        writeln!(out)?;
    }

    if let Some(sim) = &report.simulation {
        writeln!(out, "{}", "🎰 Spin Simulation".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(out, "Spins: {}/{} completed", sim.completed, sim.spins)?;
        writeln!(out, "Reels checked: {}", sim.reels_checked)?;
        writeln!(out, "Longest spin: {:.0} ms", sim.longest_spin_ms)?;
        for mismatch in &sim.mismatches {
            writeln!(out, "     • {}", mismatch.red())?;
        }
        writeln!(out)?;
    }

    let verdict = if report.passed {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    writeln!(out, "Seed: {}", report.seed)?;
    writeln!(out, "Result: {verdict}")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &RunReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &RunReport) -> Result<()> {
    writeln!(out, "# Loot Wheel Tester Results\n")?;
    writeln!(out, "- **Seed**: {}", report.seed)?;
    writeln!(
        out,
        "- **Result**: {}\n",
        if report.passed { "✅ passed" } else { "❌ failed" }
    )?;

    writeln!(out, "## Selection Distribution\n")?;
    for dist in &report.distributions {
        let status = if dist.passed { "✅" } else { "❌" };
        writeln!(out, "### {} {}\n", status, dist.category.label())?;
        writeln!(
            out,
            "{} draws, tolerance {}\n",
            dist.draws,
            percent(dist.tolerance)
        )?;
        if dist.rows.is_empty() {
            writeln!(out, "_No eligible candidates._\n")?;
            continue;
        }
        writeln!(out, "| Candidate | Count | Expected | Observed | Drift |")?;
        writeln!(out, "|---|---:|---:|---:|---:|")?;
        for row in &dist.rows {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                row.candidate,
                row.count,
                percent(row.expected),
                percent(row.observed),
                percent(row.drift)
            )?;
        }
        writeln!(out)?;
    }

    if let Some(sim) = &report.simulation {
        writeln!(out, "## Spin Simulation\n")?;
        writeln!(out, "- **Spins completed**: {}/{}", sim.completed, sim.spins)?;
        writeln!(out, "- **Reels checked**: {}", sim.reels_checked)?;
        if !sim.mismatches.is_empty() {
            writeln!(out, "- **Mismatches**:")?;
            for mismatch in &sim.mismatches {
                writeln!(out, "  - {mismatch}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ShareRow;
    use lootwheel_core::Category;

    fn sample_report(passed: bool) -> RunReport {
        let dist = DistributionReport {
            category: Category::FSkills,
            draws: 100,
            tolerance: 0.02,
            rows: vec![ShareRow {
                candidate: "F1".to_string(),
                count: 100,
                expected: 1.0,
                observed: 1.0,
                drift: 0.0,
            }],
            max_drift: 0.0,
            strays: 0,
            passed,
        };
        RunReport::new(7, vec![dist], None)
    }

    #[test]
    fn overall_verdict_follows_every_section() {
        assert!(sample_report(true).passed);
        assert!(!sample_report(false).passed);
        let failing_sim = SimulationReport {
            mismatches: vec!["round 0".into()],
            ..SimulationReport::default()
        };
        assert!(!RunReport::new(1, Vec::new(), Some(failing_sim)).passed);
    }

    #[test]
    fn markdown_lists_candidate_rows() {
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &sample_report(true)).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Loot Wheel Tester Results"));
        assert!(text.contains("| F1 | 100 | 100.00% | 100.00% | 0.00% |"));
    }

    #[test]
    fn json_report_round_trips_through_serde_json() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &sample_report(true)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["seed"], 7);
        assert_eq!(value["distributions"][0]["category"], "fSkills");
    }
}
