use crate::error::{PlanError, Result};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const PLAN_VERSION: u32 = 1;
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// InsightAxis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightAxis {
    Direction,
    Market,
    Timing,
    Differentiation,
    Monetization,
    Constraint,
    RiskSignal,
    Evolution,
}

impl InsightAxis {
    /// Every axis, in report order. QA coverage and `show` iterate this.
    pub const ALL: [InsightAxis; 8] = [
        InsightAxis::Direction,
        InsightAxis::Market,
        InsightAxis::Timing,
        InsightAxis::Differentiation,
        InsightAxis::Monetization,
        InsightAxis::Constraint,
        InsightAxis::RiskSignal,
        InsightAxis::Evolution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InsightAxis::Direction => "direction",
            InsightAxis::Market => "market",
            InsightAxis::Timing => "timing",
            InsightAxis::Differentiation => "differentiation",
            InsightAxis::Monetization => "monetization",
            InsightAxis::Constraint => "constraint",
            InsightAxis::RiskSignal => "risk_signal",
            InsightAxis::Evolution => "evolution",
        }
    }

    /// Key of this axis in `plan.json`.
    pub fn field_name(self) -> &'static str {
        match self {
            InsightAxis::Direction => "direction_insights",
            InsightAxis::Market => "market_insights",
            InsightAxis::Timing => "timing_insights",
            InsightAxis::Differentiation => "differentiation_insights",
            InsightAxis::Monetization => "monetization_insights",
            InsightAxis::Constraint => "constraint_insights",
            InsightAxis::RiskSignal => "risk_signal_insights",
            InsightAxis::Evolution => "evolution_insights",
        }
    }

    fn gap_prompt(self) -> &'static str {
        match self {
            InsightAxis::Direction => {
                "State why this initiative matters now and what outcome it must create."
            }
            InsightAxis::Market => {
                "Identify the highest-pain user segment and current alternatives."
            }
            InsightAxis::Timing => {
                "Define why this timing is favorable now and what delay would cost."
            }
            InsightAxis::Differentiation => {
                "Describe one clear strategic difference versus existing options."
            }
            InsightAxis::Monetization => "Link user value to a concrete monetization path.",
            InsightAxis::Constraint => {
                "List execution constraints and the intended workaround strategy."
            }
            InsightAxis::RiskSignal => {
                "Define one early failure signal and the immediate response."
            }
            InsightAxis::Evolution => {
                "Define how the plan will be revised on a weekly or monthly cadence."
            }
        }
    }
}

impl fmt::Display for InsightAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PhasePlanMerge
// ---------------------------------------------------------------------------

/// How an incoming `phase_plan` combines with the stored one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePlanMerge {
    #[default]
    Replace,
    Append,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub version: u32,
    pub goal: String,
    pub success_metric: String,
    pub deadline: String,
    pub constraints: String,

    pub direction_insights: String,
    pub market_insights: String,
    pub timing_insights: String,
    pub differentiation_insights: String,
    pub monetization_insights: String,
    pub constraint_insights: String,
    pub risk_signal_insights: String,
    pub evolution_insights: String,

    pub planning_horizon: String,
    pub review_cadence: String,
    pub phase_plan: Vec<String>,
    /// Set once any horizon field has been populated. Merges never clear it.
    pub long_horizon: bool,

    pub assumptions: Vec<String>,
    pub definition_of_done: Vec<String>,
    pub experiments: Vec<String>,
    /// Docs, cases and benchmarks the plan draws on.
    pub references: Vec<String>,
    pub evidence: Vec<String>,

    pub updated_at: DateTime<Utc>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            version: PLAN_VERSION,
            goal: String::new(),
            success_metric: String::new(),
            deadline: String::new(),
            constraints: String::new(),
            direction_insights: String::new(),
            market_insights: String::new(),
            timing_insights: String::new(),
            differentiation_insights: String::new(),
            monetization_insights: String::new(),
            constraint_insights: String::new(),
            risk_signal_insights: String::new(),
            evolution_insights: String::new(),
            planning_horizon: String::new(),
            review_cadence: String::new(),
            phase_plan: Vec::new(),
            long_horizon: false,
            assumptions: Vec::new(),
            definition_of_done: Vec::new(),
            experiments: Vec::new(),
            references: Vec::new(),
            evidence: Vec::new(),
            updated_at: now(),
        }
    }
}

impl Plan {
    pub fn insight(&self, axis: InsightAxis) -> &str {
        match axis {
            InsightAxis::Direction => &self.direction_insights,
            InsightAxis::Market => &self.market_insights,
            InsightAxis::Timing => &self.timing_insights,
            InsightAxis::Differentiation => &self.differentiation_insights,
            InsightAxis::Monetization => &self.monetization_insights,
            InsightAxis::Constraint => &self.constraint_insights,
            InsightAxis::RiskSignal => &self.risk_signal_insights,
            InsightAxis::Evolution => &self.evolution_insights,
        }
    }

    pub fn insight_mut(&mut self, axis: InsightAxis) -> &mut String {
        match axis {
            InsightAxis::Direction => &mut self.direction_insights,
            InsightAxis::Market => &mut self.market_insights,
            InsightAxis::Timing => &mut self.timing_insights,
            InsightAxis::Differentiation => &mut self.differentiation_insights,
            InsightAxis::Monetization => &mut self.monetization_insights,
            InsightAxis::Constraint => &mut self.constraint_insights,
            InsightAxis::RiskSignal => &mut self.risk_signal_insights,
            InsightAxis::Evolution => &mut self.evolution_insights,
        }
    }

    pub fn covered_axes(&self) -> Vec<InsightAxis> {
        InsightAxis::ALL
            .into_iter()
            .filter(|a| !is_blank(self.insight(*a)))
            .collect()
    }

    pub fn missing_axes(&self) -> Vec<InsightAxis> {
        InsightAxis::ALL
            .into_iter()
            .filter(|a| is_blank(self.insight(*a)))
            .collect()
    }

    fn has_horizon_fields(&self) -> bool {
        !is_blank(&self.planning_horizon)
            || !is_blank(&self.review_cadence)
            || !self.phase_plan.is_empty()
    }

    pub fn is_long_horizon(&self) -> bool {
        self.long_horizon || self.has_horizon_fields()
    }

    /// Overwrite every field present in `update`; absent fields are untouched.
    pub fn merge(&mut self, update: &PlanUpdate, phase_merge: PhasePlanMerge) {
        fn set(slot: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut self.goal, &update.goal);
        set(&mut self.success_metric, &update.success_metric);
        set(&mut self.deadline, &update.deadline);
        set(&mut self.constraints, &update.constraints);
        for (axis, text) in &update.insights {
            *self.insight_mut(*axis) = text.clone();
        }
        set(&mut self.planning_horizon, &update.planning_horizon);
        set(&mut self.review_cadence, &update.review_cadence);
        if let Some(phases) = &update.phase_plan {
            match phase_merge {
                PhasePlanMerge::Replace => self.phase_plan = phases.clone(),
                PhasePlanMerge::Append => self.phase_plan.extend(phases.iter().cloned()),
            }
        }
        if let Some(v) = &update.assumptions {
            self.assumptions = v.clone();
        }
        if let Some(v) = &update.definition_of_done {
            self.definition_of_done = v.clone();
        }
        if let Some(v) = &update.experiments {
            self.experiments = v.clone();
        }
        if let Some(v) = &update.references {
            self.references = v.clone();
        }

        if self.has_horizon_fields() {
            self.long_horizon = true;
        }
    }

    /// Record execution evidence and extend axis insights.
    ///
    /// Axis text is appended on a new line rather than replaced.
    pub fn apply_replan(&mut self, input: &ReplanInput) {
        if let Some(evidence) = input.evidence.as_deref().map(str::trim) {
            if !evidence.is_empty() {
                self.evidence.push(evidence.to_string());
            }
        }
        if let Some(reference) = input.reference.as_deref().map(str::trim) {
            if !reference.is_empty() {
                self.references.push(reference.to_string());
            }
        }
        for (axis, text) in &input.insights {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let slot = self.insight_mut(*axis);
            if is_blank(slot) {
                *slot = text.to_string();
            } else {
                slot.push('\n');
                slot.push_str(text);
            }
        }
    }

    /// Fill every empty axis with a prompt the planner still has to answer.
    pub fn fill_insight_gaps(&mut self) -> Vec<InsightAxis> {
        let missing = self.missing_axes();
        for axis in &missing {
            *self.insight_mut(*axis) = axis.gap_prompt().to_string();
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// PlanUpdate
// ---------------------------------------------------------------------------

/// A partial plan. `None` (or a missing axis key) leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub insights: BTreeMap<InsightAxis, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning_horizon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_cadence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_plan: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_of_done: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,
}

impl PlanUpdate {
    pub fn is_empty(&self) -> bool {
        *self == PlanUpdate::default()
    }

    /// Plan keys this update touches, in document order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let scalars = [
            ("goal", self.goal.is_some()),
            ("success_metric", self.success_metric.is_some()),
            ("deadline", self.deadline.is_some()),
            ("constraints", self.constraints.is_some()),
        ];
        names.extend(scalars.iter().filter(|(_, set)| *set).map(|(n, _)| *n));
        names.extend(self.insights.keys().map(|a| a.field_name()));
        let rest = [
            ("planning_horizon", self.planning_horizon.is_some()),
            ("review_cadence", self.review_cadence.is_some()),
            ("phase_plan", self.phase_plan.is_some()),
            ("assumptions", self.assumptions.is_some()),
            ("definition_of_done", self.definition_of_done.is_some()),
            ("experiments", self.experiments.is_some()),
            ("references", self.references.is_some()),
        ];
        names.extend(rest.iter().filter(|(_, set)| *set).map(|(n, _)| *n));
        names
    }

    /// Reject input that must never reach disk. An empty deadline is allowed
    /// and clears the stored one.
    pub fn validate(&self) -> Result<()> {
        if let Some(deadline) = &self.deadline {
            if !is_blank(deadline) && parse_deadline(deadline).is_none() {
                return Err(PlanError::Validation(format!(
                    "deadline '{deadline}' is not a valid date (expected YYYY-MM-DD)"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ReplanInput
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplanInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub insights: BTreeMap<InsightAxis, String>,
}

impl ReplanInput {
    pub fn is_empty(&self) -> bool {
        self.evidence.as_deref().map_or(true, is_blank)
            && self.reference.as_deref().map_or(true, is_blank)
            && self.insights.values().all(|v| is_blank(v))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn parse_deadline(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DEADLINE_FORMAT).ok()
}

/// Split a comma-separated CLI value into trimmed, non-empty items.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(str::to_string)
        .collect()
}

/// Timestamps are stored with second precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_plan() -> Plan {
        let mut plan = Plan {
            goal: "Ship MVP".to_string(),
            success_metric: "CLI supports 4 commands by 2026-03-15".to_string(),
            deadline: "2026-03-15".to_string(),
            constraints: "solo, evenings only".to_string(),
            ..Plan::default()
        };
        for axis in InsightAxis::ALL {
            *plan.insight_mut(axis) = format!("{axis} notes");
        }
        plan
    }

    #[test]
    fn merge_overwrites_present_fields_only() {
        let mut plan = filled_plan();
        let update = PlanUpdate {
            goal: Some("Ship v2".to_string()),
            insights: BTreeMap::from([(InsightAxis::Market, "B2B devtools".to_string())]),
            ..PlanUpdate::default()
        };
        plan.merge(&update, PhasePlanMerge::Replace);

        assert_eq!(plan.goal, "Ship v2");
        assert_eq!(plan.market_insights, "B2B devtools");
        assert_eq!(plan.success_metric, "CLI supports 4 commands by 2026-03-15");
        assert_eq!(plan.deadline, "2026-03-15");
        assert_eq!(plan.constraints, "solo, evenings only");
        assert_eq!(plan.timing_insights, "timing notes");
    }

    #[test]
    fn phase_plan_replaced_wholesale() {
        let mut plan = Plan {
            phase_plan: vec!["discover".to_string(), "build".to_string()],
            ..Plan::default()
        };
        let update = PlanUpdate {
            phase_plan: Some(vec!["launch".to_string()]),
            ..PlanUpdate::default()
        };
        plan.merge(&update, PhasePlanMerge::Replace);
        assert_eq!(plan.phase_plan, vec!["launch"]);
    }

    #[test]
    fn phase_plan_append_policy() {
        let mut plan = Plan {
            phase_plan: vec!["discover".to_string()],
            ..Plan::default()
        };
        let update = PlanUpdate {
            phase_plan: Some(vec!["build".to_string()]),
            ..PlanUpdate::default()
        };
        plan.merge(&update, PhasePlanMerge::Append);
        assert_eq!(plan.phase_plan, vec!["discover", "build"]);
    }

    #[test]
    fn long_horizon_marker_is_sticky() {
        let mut plan = Plan::default();
        assert!(!plan.is_long_horizon());

        plan.merge(
            &PlanUpdate {
                planning_horizon: Some("12 weeks".to_string()),
                ..PlanUpdate::default()
            },
            PhasePlanMerge::Replace,
        );
        assert!(plan.long_horizon);

        plan.merge(
            &PlanUpdate {
                planning_horizon: Some(String::new()),
                ..PlanUpdate::default()
            },
            PhasePlanMerge::Replace,
        );
        assert!(plan.planning_horizon.is_empty());
        assert!(plan.is_long_horizon());
    }

    #[test]
    fn validate_rejects_bad_deadline() {
        let update = PlanUpdate {
            deadline: Some("next friday".to_string()),
            ..PlanUpdate::default()
        };
        assert!(matches!(update.validate(), Err(PlanError::Validation(_))));

        let update = PlanUpdate {
            deadline: Some("2026-02-30".to_string()),
            ..PlanUpdate::default()
        };
        assert!(update.validate().is_err());

        let update = PlanUpdate {
            deadline: Some("2026-03-15".to_string()),
            ..PlanUpdate::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn field_names_follow_document_order() {
        let update = PlanUpdate {
            review_cadence: Some("weekly".to_string()),
            goal: Some("Ship".to_string()),
            insights: BTreeMap::from([
                (InsightAxis::Evolution, "x".to_string()),
                (InsightAxis::Direction, "y".to_string()),
            ]),
            ..PlanUpdate::default()
        };
        assert_eq!(
            update.field_names(),
            vec![
                "goal",
                "direction_insights",
                "evolution_insights",
                "review_cadence"
            ]
        );
        assert!(PlanUpdate::default().field_names().is_empty());
    }

    #[test]
    fn unknown_and_missing_keys_tolerated() {
        let json = r#"{"goal": "Ship", "plan_tasks": ["a"], "options": []}"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.goal, "Ship");
        assert_eq!(plan.version, PLAN_VERSION);
        assert!(plan.phase_plan.is_empty());
    }

    #[test]
    fn insight_fields_use_axis_keys() {
        let plan = filled_plan();
        let value = serde_json::to_value(&plan).unwrap();
        for axis in InsightAxis::ALL {
            assert_eq!(value[axis.field_name()], format!("{axis} notes"));
        }
    }

    #[test]
    fn replan_appends_evidence_and_insight_lines() {
        let mut plan = filled_plan();
        let input = ReplanInput {
            evidence: Some("  pilot cut manual time by 20%  ".to_string()),
            reference: Some(" postmortem-2025 ".to_string()),
            insights: BTreeMap::from([
                (InsightAxis::Timing, "competitor launched".to_string()),
                (InsightAxis::Evolution, "   ".to_string()),
            ]),
        };
        plan.apply_replan(&input);

        assert_eq!(plan.evidence, vec!["pilot cut manual time by 20%"]);
        assert_eq!(plan.references, vec!["postmortem-2025"]);
        assert_eq!(plan.timing_insights, "timing notes\ncompetitor launched");
        assert_eq!(plan.evolution_insights, "evolution notes");
    }

    #[test]
    fn fill_gaps_only_touches_empty_axes() {
        let mut plan = Plan {
            market_insights: "indie devs".to_string(),
            ..Plan::default()
        };
        let filled = plan.fill_insight_gaps();
        assert_eq!(filled.len(), 7);
        assert!(!filled.contains(&InsightAxis::Market));
        assert_eq!(plan.market_insights, "indie devs");
        assert!(plan.missing_axes().is_empty());
    }

    #[test]
    fn experiments_and_references_merge_as_lists() {
        let mut plan = Plan {
            experiments: vec!["old pilot".to_string()],
            references: vec!["paper-a".to_string()],
            ..filled_plan()
        };
        let update = PlanUpdate {
            experiments: Some(vec!["Run a 7-day pilot and log outcomes.".to_string()]),
            ..PlanUpdate::default()
        };
        plan.merge(&update, PhasePlanMerge::Append);

        assert_eq!(plan.experiments, vec!["Run a 7-day pilot and log outcomes."]);
        assert_eq!(plan.references, vec!["paper-a"]);
        assert_eq!(update.field_names(), vec!["experiments"]);
    }

    #[test]
    fn parse_list_trims_and_drops_empties() {
        assert_eq!(parse_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }
}
