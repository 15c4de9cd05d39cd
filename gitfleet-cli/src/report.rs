//! Plan and report printing.

use anyhow::{Context, Result};
use colored::Colorize;

use gitfleet_core::{ActionPlan, Phase};
use gitfleet_sync::{ItemMessage, PhaseReport, RunReport};

/// `N repos to sync` lines for the phases that have work.
pub fn print_plan(plan: &ActionPlan) {
    for phase in Phase::ORDER {
        let count = plan.items(phase).len();
        if count > 0 {
            println!("{count} repos to {}", phase.verb().to_lowercase());
        }
    }
    if plan.is_empty() {
        println!("Nothing to do");
    }
}

/// Human summary: warnings, then errors, then per-phase counts.
pub fn print_report(report: &RunReport) {
    let warnings = tagged(report, |p| &p.warnings);
    if !warnings.is_empty() {
        println!("{}", "Warnings:".yellow().bold());
        for line in &warnings {
            println!("  {line}");
        }
    }

    let failures = tagged(report, |p| &p.failures);
    if !failures.is_empty() {
        println!("{}", "Errors:".red().bold());
        for line in &failures {
            println!("  {line}");
        }
    }

    for line in report.summary_lines() {
        println!("{line}");
    }
}

pub fn print_json(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialise run report")?;
    println!("{json}");
    Ok(())
}

/// `<Phase verb> <repo>: <message>` for every message `select` picks.
fn tagged<F>(report: &RunReport, select: F) -> Vec<String>
where
    F: Fn(&PhaseReport) -> &Vec<ItemMessage>,
{
    report
        .phases
        .iter()
        .flat_map(|p| {
            select(p)
                .iter()
                .map(move |m| format!("{} {m}", p.phase.verb()))
        })
        .collect()
}
