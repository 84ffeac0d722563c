//! Idea and insight proposals.
//!
//! Proposal generation sits behind [`Ideator`] so an agent-backed source can
//! replace the local templates. Proposals are never applied here; callers
//! decide whether to merge a draft into the plan.

use crate::config::MAX_IDEAS;
use crate::error::{PlanError, Result};
use crate::plan::{is_blank, parse_deadline, InsightAxis, PlanUpdate, DEADLINE_FORMAT};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeationContext {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub time_per_day: String,
    pub budget: String,
    #[serde(default)]
    pub deadline: Option<String>,
    pub count: usize,
}

impl Default for IdeationContext {
    fn default() -> Self {
        Self {
            profile: None,
            interests: Vec::new(),
            skills: Vec::new(),
            time_per_day: "1h/day".to_string(),
            budget: "$0".to_string(),
            deadline: None,
            count: 5,
        }
    }
}

/// A candidate plan: a title plus the fields it would merge into the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    pub title: String,
    pub fields: PlanUpdate,
}

pub trait Ideator {
    fn propose_ideas(&self, ctx: &IdeationContext) -> Result<Vec<PlanDraft>>;

    fn propose_insight_pack(&self, topic: &str, references: &[String]) -> Result<PlanUpdate>;
}

// ---------------------------------------------------------------------------
// TemplateIdeator
// ---------------------------------------------------------------------------

struct IdeaTemplate {
    name: &'static str,
    goal: &'static str,
    metric: &'static str,
}

const TEMPLATES: [IdeaTemplate; 4] = [
    IdeaTemplate {
        name: "Workflow Automation",
        goal: "Automate one repetitive {focus} task end-to-end",
        metric: "Reduce manual time on {focus} by 30% by {deadline}",
    },
    IdeaTemplate {
        name: "Portfolio Artifact",
        goal: "Ship a public mini-project around {focus}",
        metric: "Publish a working demo and one write-up by {deadline}",
    },
    IdeaTemplate {
        name: "Learning Sprint",
        goal: "Complete a focused sprint to improve {focus} capability",
        metric: "Deliver 3 practical outputs proving {focus} improvement by {deadline}",
    },
    IdeaTemplate {
        name: "Insight Pipeline",
        goal: "Build a repeatable system to collect and summarize {focus} insights",
        metric: "Generate 10 curated insights and 3 actions by {deadline}",
    },
];

const DEFAULT_FOCUS: [&str; 3] = ["your workflow", "your learning", "your output quality"];

/// Deterministic, offline proposals built from fixed templates.
pub struct TemplateIdeator {
    today: NaiveDate,
    deadline_days: i64,
}

impl TemplateIdeator {
    pub fn new(deadline_days: i64) -> Self {
        Self::with_today(Utc::now().date_naive(), deadline_days)
    }

    pub fn with_today(today: NaiveDate, deadline_days: i64) -> Self {
        Self {
            today,
            deadline_days,
        }
    }

    fn default_deadline(&self) -> Result<String> {
        let days = u64::try_from(self.deadline_days.max(1)).unwrap_or(1);
        let date = self.today.checked_add_days(Days::new(days)).ok_or_else(|| {
            PlanError::Validation(format!(
                "deadline_days {} puts the default deadline out of range",
                self.deadline_days
            ))
        })?;
        Ok(date.format(DEADLINE_FORMAT).to_string())
    }
}

fn fill(template: &str, focus: &str, deadline: &str) -> String {
    template
        .replace("{focus}", focus)
        .replace("{deadline}", deadline)
}

impl Ideator for TemplateIdeator {
    fn propose_ideas(&self, ctx: &IdeationContext) -> Result<Vec<PlanDraft>> {
        let deadline = match ctx.deadline.as_deref().filter(|d| !is_blank(d)) {
            Some(d) => {
                let date = parse_deadline(d).ok_or_else(|| {
                    PlanError::Validation(format!(
                        "deadline '{d}' is not a valid date (expected YYYY-MM-DD)"
                    ))
                })?;
                date.format(DEADLINE_FORMAT).to_string()
            }
            None => self.default_deadline()?,
        };

        let profile = ctx
            .profile
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("solo builder");
        let focus_terms: Vec<&str> = if ctx.interests.is_empty() {
            DEFAULT_FOCUS.to_vec()
        } else {
            ctx.interests.iter().map(String::as_str).collect()
        };
        let count = ctx.count.clamp(1, MAX_IDEAS);

        let ideas = (0..count)
            .map(|i| {
                let t = &TEMPLATES[i % TEMPLATES.len()];
                let focus = focus_terms[i % focus_terms.len()];

                let mut assumptions = vec![
                    format!("{profile} can sustain {} for this project.", ctx.time_per_day),
                    format!(
                        "Budget stays within {} without external paid tooling.",
                        ctx.budget
                    ),
                ];
                if !ctx.skills.is_empty() {
                    let skills: Vec<&str> =
                        ctx.skills.iter().take(3).map(String::as_str).collect();
                    assumptions.push(format!(
                        "Existing skills ({}) are enough for MVP delivery.",
                        skills.join(", ")
                    ));
                }

                PlanDraft {
                    title: t.name.to_string(),
                    fields: PlanUpdate {
                        goal: Some(fill(t.goal, focus, &deadline)),
                        success_metric: Some(fill(t.metric, focus, &deadline)),
                        deadline: Some(deadline.clone()),
                        constraints: Some(format!(
                            "time: {}; budget: {}; scope: single focused outcome",
                            ctx.time_per_day, ctx.budget
                        )),
                        assumptions: Some(assumptions),
                        definition_of_done: Some(vec![
                            "Primary success metric is measured with before/after evidence."
                                .to_string(),
                            "At least one artifact (code/doc/demo) is published.".to_string(),
                        ]),
                        experiments: Some(vec!["Run a 7-day pilot and log outcomes.".to_string()]),
                        ..PlanUpdate::default()
                    },
                }
            })
            .collect();
        Ok(ideas)
    }

    fn propose_insight_pack(&self, topic: &str, references: &[String]) -> Result<PlanUpdate> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(PlanError::Validation("insight topic must not be empty".to_string()));
        }

        let mut insights = BTreeMap::new();
        for (i, axis) in InsightAxis::ALL.into_iter().enumerate() {
            let mut text = match axis {
                InsightAxis::Direction => {
                    format!("Why {topic} matters now and the outcome it must create.")
                }
                InsightAxis::Market => {
                    format!("Who feels the most pain around {topic} and what they use today.")
                }
                InsightAxis::Timing => {
                    format!("What makes {topic} timely now and what waiting would cost.")
                }
                InsightAxis::Differentiation => {
                    format!("One clear difference from existing {topic} options.")
                }
                InsightAxis::Monetization => {
                    format!("How value delivered through {topic} turns into revenue.")
                }
                InsightAxis::Constraint => {
                    format!("Execution limits for {topic} and the workaround for each.")
                }
                InsightAxis::RiskSignal => {
                    format!("The earliest signal that {topic} is failing and the response.")
                }
                InsightAxis::Evolution => {
                    format!("How the {topic} plan is revisited on a fixed cadence.")
                }
            };
            if !references.is_empty() {
                text.push_str(&format!(" (ref: {})", references[i % references.len()]));
            }
            insights.insert(axis, text);
        }

        Ok(PlanUpdate {
            insights,
            references: (!references.is_empty()).then(|| references.to_vec()),
            ..PlanUpdate::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
