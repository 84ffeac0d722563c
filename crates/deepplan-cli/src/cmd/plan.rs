use super::{axis_values, trimmed, PlanWithReport};
use crate::output::{print_json, print_report};
use anyhow::Context;
use clap::Args;
use deepplan_core::journal::EventKind;
use deepplan_core::plan::{parse_list, InsightAxis, PlanUpdate};
use std::path::Path;

#[derive(Args)]
pub struct PlanArgs {
    /// Outcome the plan is driving toward
    #[arg(long)]
    pub goal: Option<String>,
    /// Measurable definition of done
    #[arg(long)]
    pub success_metric: Option<String>,
    /// Deadline (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub constraints: Option<String>,

    #[arg(long)]
    pub direction_insights: Option<String>,
    #[arg(long)]
    pub market_insights: Option<String>,
    #[arg(long)]
    pub timing_insights: Option<String>,
    #[arg(long)]
    pub differentiation_insights: Option<String>,
    #[arg(long)]
    pub monetization_insights: Option<String>,
    #[arg(long)]
    pub constraint_insights: Option<String>,
    #[arg(long)]
    pub risk_signal_insights: Option<String>,
    #[arg(long)]
    pub evolution_insights: Option<String>,

    /// Planning horizon, e.g. "12 weeks"
    #[arg(long)]
    pub planning_horizon: Option<String>,
    /// Review cadence, e.g. "weekly"
    #[arg(long)]
    pub review_cadence: Option<String>,
    /// Comma-separated phase names, in order
    #[arg(long)]
    pub phase_plan: Option<String>,

    /// Comma-separated assumptions
    #[arg(long)]
    pub assumptions: Option<String>,
    /// Comma-separated definition-of-done items
    #[arg(long)]
    pub definition_of_done: Option<String>,
    /// Comma-separated validation experiments
    #[arg(long)]
    pub experiments: Option<String>,
    /// Comma-separated references (docs, cases, benchmarks)
    #[arg(long)]
    pub references: Option<String>,
}

impl PlanArgs {
    fn into_update(self) -> PlanUpdate {
        let insights = axis_values([
            (InsightAxis::Direction, self.direction_insights),
            (InsightAxis::Market, self.market_insights),
            (InsightAxis::Timing, self.timing_insights),
            (InsightAxis::Differentiation, self.differentiation_insights),
            (InsightAxis::Monetization, self.monetization_insights),
            (InsightAxis::Constraint, self.constraint_insights),
            (InsightAxis::RiskSignal, self.risk_signal_insights),
            (InsightAxis::Evolution, self.evolution_insights),
        ]);
        PlanUpdate {
            goal: trimmed(self.goal),
            success_metric: trimmed(self.success_metric),
            deadline: trimmed(self.deadline),
            constraints: trimmed(self.constraints),
            insights,
            planning_horizon: trimmed(self.planning_horizon),
            review_cadence: trimmed(self.review_cadence),
            phase_plan: self.phase_plan.as_deref().map(parse_list),
            assumptions: self.assumptions.as_deref().map(parse_list),
            definition_of_done: self.definition_of_done.as_deref().map(parse_list),
            experiments: self.experiments.as_deref().map(parse_list),
            references: self.references.as_deref().map(parse_list),
        }
    }
}

pub fn run(root: &Path, args: PlanArgs, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let update = args.into_update();

    let plan = if update.is_empty() {
        if !json {
            println!("No fields given; plan unchanged.");
        }
        store.load().context("failed to load plan")?
    } else {
        let plan = store.merge(&update).context("failed to update plan")?;
        store
            .record_event(
                EventKind::PlanUpdated,
                serde_json::json!({ "fields": update.field_names(), "goal": plan.goal }),
            )
            .context("failed to record event")?;
        if !json {
            println!("Plan updated: {}", update.field_names().join(", "));
        }
        plan
    };

    let report = store.evaluate(&plan);
    if json {
        return print_json(&PlanWithReport {
            plan: &plan,
            report: &report,
        });
    }
    print_report(&report);
    Ok(())
}
