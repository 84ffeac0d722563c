use crate::output::{print_json, print_report};
use anyhow::Context;
use clap::Args;
use deepplan_core::config::MAX_IDEAS;
use deepplan_core::ideate::{IdeationContext, Ideator, PlanDraft, TemplateIdeator};
use deepplan_core::journal::EventKind;
use deepplan_core::plan::{parse_list, Plan};
use deepplan_core::qa::QaReport;
use std::path::Path;

#[derive(Args)]
pub struct IdeateArgs {
    /// Who is planning, e.g. "solo builder"
    #[arg(long)]
    pub profile: Option<String>,
    /// Comma-separated interests to build ideas around
    #[arg(long)]
    pub interests: Option<String>,
    /// Comma-separated existing skills
    #[arg(long)]
    pub skills: Option<String>,
    #[arg(long, default_value = "1h/day")]
    pub time_per_day: String,
    #[arg(long, default_value = "$0")]
    pub budget: String,
    /// Deadline (YYYY-MM-DD); defaults to the configured offset from today
    #[arg(long)]
    pub deadline: Option<String>,
    /// Number of ideas (1-10); defaults to ideate.default_count
    #[arg(long)]
    pub count: Option<usize>,
    /// Apply idea N (1-based) to the current plan
    #[arg(long)]
    pub apply: Option<usize>,
}

#[derive(serde::Serialize)]
struct IdeateOutput<'a> {
    ideas: &'a [PlanDraft],
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a QaReport>,
}

pub fn run(root: &Path, args: IdeateArgs, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let cfg = &store.config().ideate;

    let ctx = IdeationContext {
        profile: args.profile.clone(),
        interests: args.interests.as_deref().map(parse_list).unwrap_or_default(),
        skills: args.skills.as_deref().map(parse_list).unwrap_or_default(),
        time_per_day: args.time_per_day.trim().to_string(),
        budget: args.budget.trim().to_string(),
        deadline: args.deadline.clone(),
        count: args.count.unwrap_or(cfg.default_count),
    };
    if ctx.count == 0 || ctx.count > MAX_IDEAS {
        tracing::warn!("idea count {} clamped to 1..={MAX_IDEAS}", ctx.count);
    }

    let ideas = TemplateIdeator::new(cfg.deadline_days)
        .propose_ideas(&ctx)
        .context("failed to propose ideas")?;

    if let Some(n) = args.apply {
        if n == 0 || n > ideas.len() {
            anyhow::bail!("--apply must be between 1 and {}", ideas.len());
        }
    }

    store
        .record_event(
            EventKind::IdeasProposed,
            serde_json::json!({
                "count": ideas.len(),
                "profile": args.profile.as_deref().unwrap_or(""),
            }),
        )
        .context("failed to record event")?;

    let applied = match args.apply {
        Some(n) => {
            let draft = &ideas[n - 1];
            let plan = store
                .merge(&draft.fields)
                .context("failed to apply idea")?;
            store
                .record_event(
                    EventKind::IdeaApplied,
                    serde_json::json!({ "selected_index": n, "goal": plan.goal }),
                )
                .context("failed to record event")?;
            let report = store.evaluate(&plan);
            Some((n, plan, report))
        }
        None => None,
    };

    if json {
        return print_json(&IdeateOutput {
            ideas: &ideas,
            applied: applied.as_ref().map(|(n, _, _)| *n),
            plan: applied.as_ref().map(|(_, p, _)| p),
            report: applied.as_ref().map(|(_, _, r)| r),
        });
    }

    for (idx, idea) in ideas.iter().enumerate() {
        let f = &idea.fields;
        println!("[{}] {}", idx + 1, idea.title);
        println!("  Goal: {}", f.goal.as_deref().unwrap_or(""));
        println!("  Success Metric: {}", f.success_metric.as_deref().unwrap_or(""));
        println!("  Deadline: {}", f.deadline.as_deref().unwrap_or(""));
        println!("  Constraints: {}", f.constraints.as_deref().unwrap_or(""));
        println!();
    }

    if let Some((n, _, report)) = &applied {
        println!("Applied idea #{n} to current plan.");
        print_report(report);
    }
    Ok(())
}
