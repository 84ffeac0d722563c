use crate::output::{print_json, print_report};
use anyhow::Context;
use clap::Args;
use deepplan_core::ideate::{Ideator, TemplateIdeator};
use deepplan_core::journal::EventKind;
use deepplan_core::plan::{parse_list, Plan, PlanUpdate};
use deepplan_core::qa::QaReport;
use std::path::Path;

#[derive(Args)]
pub struct InsightArgs {
    /// Topic to derive insights for
    #[arg(long)]
    pub topic: String,
    /// Comma-separated references (docs, cases, benchmarks)
    #[arg(long)]
    pub references: Option<String>,
    /// Merge the proposed insights into the current plan
    #[arg(long)]
    pub apply: bool,
}

#[derive(serde::Serialize)]
struct InsightOutput<'a> {
    topic: &'a str,
    pack: &'a PlanUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a QaReport>,
}

pub fn run(root: &Path, args: InsightArgs, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let references = args.references.as_deref().map(parse_list).unwrap_or_default();
    let topic = args.topic.trim();

    let pack = TemplateIdeator::new(store.config().ideate.deadline_days)
        .propose_insight_pack(topic, &references)
        .context("failed to propose insights")?;

    store
        .record_event(
            EventKind::InsightProposed,
            serde_json::json!({ "topic": topic, "references": references }),
        )
        .context("failed to record event")?;

    let applied = if args.apply {
        let plan = store.merge(&pack).context("failed to apply insights")?;
        store
            .record_event(
                EventKind::InsightApplied,
                serde_json::json!({ "topic": topic, "fields": pack.field_names() }),
            )
            .context("failed to record event")?;
        let report = store.evaluate(&plan);
        Some((plan, report))
    } else {
        None
    };

    if json {
        return print_json(&InsightOutput {
            topic,
            pack: &pack,
            plan: applied.as_ref().map(|(p, _)| p),
            report: applied.as_ref().map(|(_, r)| r),
        });
    }

    println!("Insight pack: {topic}");
    for (axis, text) in &pack.insights {
        println!("  {:<16} {}", axis.as_str(), text);
    }
    if let Some(refs) = &pack.references {
        println!("  {:<16} {}", "references", refs.join(", "));
    }

    if let Some((_, report)) = &applied {
        println!("\nApplied insights to current plan.");
        print_report(report);
    }
    Ok(())
}
