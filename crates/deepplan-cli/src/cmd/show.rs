use crate::output::{print_json, truncate};
use anyhow::Context;
use deepplan_core::plan::{InsightAxis, Plan};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    super::warn_if_uninitialized(&store);
    let plan = store.load().context("failed to load plan")?;
    let decisions = store.decisions().context("failed to read decisions")?;
    let risks = store.risks().context("failed to read risks")?;
    let events = store.events().context("failed to read events")?;

    if json {
        #[derive(serde::Serialize)]
        struct ShowOutput<'a> {
            plan: &'a Plan,
            long_horizon: bool,
            axes_covered: usize,
            decisions: usize,
            risks: usize,
            events: usize,
        }

        return print_json(&ShowOutput {
            plan: &plan,
            long_horizon: plan.is_long_horizon(),
            axes_covered: plan.covered_axes().len(),
            decisions: decisions.len(),
            risks: risks.len(),
            events: events.len(),
        });
    }

    // -- Human-readable output ------------------------------------------------

    println!("Goal: {}", or_dash(&plan.goal));
    println!("Success Metric: {}", or_dash(&plan.success_metric));
    println!("Deadline: {}", or_dash(&plan.deadline));
    println!("Constraints: {}", or_dash(&plan.constraints));
    println!("Updated: {}", plan.updated_at.to_rfc3339());

    println!(
        "\nInsight Axes Covered: {}/{}",
        plan.covered_axes().len(),
        InsightAxis::ALL.len()
    );
    for axis in InsightAxis::ALL {
        let text = plan.insight(axis);
        let mark = if text.trim().is_empty() { " " } else { "x" };
        println!("  [{mark}] {:<16} {}", axis.as_str(), truncate(text, 60));
    }

    if plan.is_long_horizon() {
        println!("\nLong-horizon:");
        println!("  Planning Horizon: {}", or_dash(&plan.planning_horizon));
        println!("  Review Cadence: {}", or_dash(&plan.review_cadence));
        if plan.phase_plan.is_empty() {
            println!("  Phases: -");
        } else {
            println!("  Phases: {}", plan.phase_plan.join(" → "));
        }
    }

    if !plan.assumptions.is_empty() {
        println!("\nAssumptions:");
        for a in &plan.assumptions {
            println!("  - {a}");
        }
    }
    if !plan.definition_of_done.is_empty() {
        println!("\nDefinition of Done:");
        for d in &plan.definition_of_done {
            println!("  - {d}");
        }
    }
    if !plan.experiments.is_empty() {
        println!("\nExperiments:");
        for e in &plan.experiments {
            println!("  - {e}");
        }
    }

    println!(
        "\nReferences: {}  Evidence: {}  Decisions: {}  Risks: {}  Events: {}",
        plan.references.len(),
        plan.evidence.len(),
        decisions.len(),
        risks.len(),
        events.len()
    );
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}
