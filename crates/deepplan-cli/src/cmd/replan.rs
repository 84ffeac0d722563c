use super::{axis_values, PlanWithReport};
use crate::output::{print_json, print_report};
use anyhow::Context;
use clap::Args;
use deepplan_core::journal::EventKind;
use deepplan_core::plan::{InsightAxis, ReplanInput};
use std::path::Path;

#[derive(Args)]
pub struct ReplanArgs {
    /// Execution evidence that prompted the replan
    #[arg(long)]
    pub evidence: Option<String>,

    /// Reference (doc, case, benchmark) to add to the plan
    #[arg(long)]
    pub reference: Option<String>,

    #[arg(long)]
    pub direction_insight: Option<String>,
    #[arg(long)]
    pub market_insight: Option<String>,
    #[arg(long)]
    pub timing_insight: Option<String>,
    #[arg(long)]
    pub differentiation_insight: Option<String>,
    #[arg(long)]
    pub monetization_insight: Option<String>,
    #[arg(long)]
    pub constraint_insight: Option<String>,
    #[arg(long)]
    pub risk_signal_insight: Option<String>,
    #[arg(long)]
    pub evolution_insight: Option<String>,

    /// Fill every empty insight axis with a prompt to answer
    #[arg(long)]
    pub fill_gaps: bool,
}

pub fn run(root: &Path, args: ReplanArgs, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let input = ReplanInput {
        evidence: args.evidence.clone(),
        reference: args.reference.clone(),
        insights: axis_values([
            (InsightAxis::Direction, args.direction_insight),
            (InsightAxis::Market, args.market_insight),
            (InsightAxis::Timing, args.timing_insight),
            (InsightAxis::Differentiation, args.differentiation_insight),
            (InsightAxis::Monetization, args.monetization_insight),
            (InsightAxis::Constraint, args.constraint_insight),
            (InsightAxis::RiskSignal, args.risk_signal_insight),
            (InsightAxis::Evolution, args.evolution_insight),
        ]),
    };

    if input.is_empty() && !args.fill_gaps {
        anyhow::bail!(
            "nothing to replan: pass --evidence, --reference, an --<axis>-insight, or --fill-gaps"
        );
    }

    let mut replanned = None;
    if !input.is_empty() {
        replanned = Some(store.replan(&input).context("failed to replan")?);
    }
    let mut filled = Vec::new();
    if args.fill_gaps {
        let (gap_filled, axes) = store.fill_gaps().context("failed to fill insight gaps")?;
        replanned = Some(gap_filled);
        filled = axes;
    }
    let plan = match replanned {
        Some(plan) => plan,
        None => store.load().context("failed to load plan")?,
    };

    let axes: Vec<&str> = input.insights.keys().map(|a| a.as_str()).collect();
    let filled_names: Vec<&str> = filled.iter().map(|a| a.as_str()).collect();
    store
        .record_event(
            EventKind::Replan,
            serde_json::json!({
                "evidence": input.evidence.as_deref().unwrap_or("").trim(),
                "reference": input.reference.as_deref().unwrap_or("").trim(),
                "axes": axes,
                "filled": filled_names,
            }),
        )
        .context("failed to record event")?;

    let report = store.evaluate(&plan);
    if json {
        return print_json(&PlanWithReport {
            plan: &plan,
            report: &report,
        });
    }

    println!("Replanned.");
    if !filled_names.is_empty() {
        println!("Filled insight gaps: {}", filled_names.join(", "));
    }
    print_report(&report);
    Ok(())
}
