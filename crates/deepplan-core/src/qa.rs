//! QA rule engine.
//!
//! Rules are plain data: an id, an applicability predicate, a pass check,
//! and a failure message builder. Every applicable rule runs; nothing
//! short-circuits. Adding a check is one more entry in [`default_rules`].

use crate::plan::{is_blank, parse_deadline, InsightAxis, Plan};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// When the `horizon_set` rule applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Only once the plan has been marked long-horizon.
    #[default]
    WhenLongHorizon,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QaPolicy {
    pub horizon: HorizonPolicy,
}

pub struct EvalContext<'a> {
    pub plan: &'a Plan,
    pub policy: &'a QaPolicy,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "SKIP",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule_id: String,
    pub status: CheckStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaFailure {
    pub rule_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaReport {
    pub passed: bool,
    pub checks: Vec<RuleCheck>,
    pub failures: Vec<QaFailure>,
}

impl QaReport {
    pub fn failed_rule_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

pub struct Rule {
    pub id: &'static str,
    /// Shown for passing and skipped checks.
    pub description: &'static str,
    pub applies: fn(&EvalContext) -> bool,
    pub check: fn(&Plan) -> bool,
    pub message: fn(&Plan) -> String,
}

fn always(_: &EvalContext) -> bool {
    true
}

fn horizon_applies(ctx: &EvalContext) -> bool {
    match ctx.policy.horizon {
        HorizonPolicy::WhenLongHorizon => ctx.plan.is_long_horizon(),
        HorizonPolicy::Always => true,
        HorizonPolicy::Never => false,
    }
}

fn deadline_valid(plan: &Plan) -> bool {
    !is_blank(&plan.deadline) && parse_deadline(&plan.deadline).is_some()
}

fn deadline_message(plan: &Plan) -> String {
    if is_blank(&plan.deadline) {
        "deadline is empty".to_string()
    } else {
        format!(
            "deadline '{}' is not a valid date (expected YYYY-MM-DD)",
            plan.deadline
        )
    }
}

fn axes_message(plan: &Plan) -> String {
    let missing: Vec<&str> = plan.missing_axes().iter().map(|a| a.as_str()).collect();
    format!(
        "{}/{} insight axes covered; missing: {}",
        InsightAxis::ALL.len() - missing.len(),
        InsightAxis::ALL.len(),
        missing.join(", ")
    )
}

fn horizon_complete(plan: &Plan) -> bool {
    !is_blank(&plan.planning_horizon)
        && !is_blank(&plan.review_cadence)
        && !plan.phase_plan.is_empty()
}

fn horizon_message(plan: &Plan) -> String {
    let mut missing = Vec::new();
    if is_blank(&plan.planning_horizon) {
        missing.push("planning_horizon");
    }
    if is_blank(&plan.review_cadence) {
        missing.push("review_cadence");
    }
    if plan.phase_plan.is_empty() {
        missing.push("phase_plan");
    }
    format!("long-horizon plan is missing: {}", missing.join(", "))
}

// ---------------------------------------------------------------------------
// Default rules (report order)
// ---------------------------------------------------------------------------

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "has_goal",
            description: "goal is set",
            applies: always,
            check: |p| !is_blank(&p.goal),
            message: |_| "goal is empty".to_string(),
        },
        Rule {
            id: "has_success_metric",
            description: "success metric is set",
            applies: always,
            check: |p| !is_blank(&p.success_metric),
            message: |_| "success metric is empty".to_string(),
        },
        Rule {
            id: "has_deadline",
            description: "deadline is a valid date",
            applies: always,
            check: deadline_valid,
            message: deadline_message,
        },
        Rule {
            id: "insight_axes_coverage",
            description: "all insight axes are covered",
            applies: always,
            check: |p| p.missing_axes().is_empty(),
            message: axes_message,
        },
        Rule {
            id: "horizon_set",
            description: "planning horizon, review cadence, and phase plan are set",
            applies: horizon_applies,
            check: horizon_complete,
            message: horizon_message,
        },
    ]
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct QaEngine {
    rules: Vec<Rule>,
    policy: QaPolicy,
}

impl Default for QaEngine {
    fn default() -> Self {
        Self::new(default_rules(), QaPolicy::default())
    }
}

impl QaEngine {
    pub fn new(rules: Vec<Rule>, policy: QaPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn evaluate(&self, plan: &Plan) -> QaReport {
        let ctx = EvalContext {
            plan,
            policy: &self.policy,
        };
        let mut checks = Vec::with_capacity(self.rules.len());
        let mut failures = Vec::new();

        for rule in &self.rules {
            let (status, message) = if !(rule.applies)(&ctx) {
                (CheckStatus::Skipped, rule.description.to_string())
            } else if (rule.check)(plan) {
                (CheckStatus::Pass, rule.description.to_string())
            } else {
                let message = (rule.message)(plan);
                failures.push(QaFailure {
                    rule_id: rule.id.to_string(),
                    message: message.clone(),
                });
                (CheckStatus::Fail, message)
            };
            checks.push(RuleCheck {
                rule_id: rule.id.to_string(),
                status,
                message,
            });
        }

        QaReport {
            passed: failures.is_empty(),
            checks,
            failures,
        }
    }
}

/// Evaluate with the default rule set and policy.
pub fn evaluate(plan: &Plan) -> QaReport {
    QaEngine::default().evaluate(plan)
}

pub fn evaluate_with(plan: &Plan, policy: &QaPolicy) -> QaReport {
    QaEngine::new(default_rules(), *policy).evaluate(plan)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
