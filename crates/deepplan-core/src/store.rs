//! Plan Store: the single plan document plus its append-only logs.
//!
//! Every operation is a full read-modify-write against `.deepplan/`.
//! There is no locking; concurrent invocations race and the last writer wins.

use crate::config::Config;
use crate::error::{PlanError, Result};
use crate::io;
use crate::journal::{self, DecisionRecord, EventKind, EventRecord, LogKind, LogRecord, RiskRecord};
use crate::paths;
use crate::plan::{is_blank, now, InsightAxis, Plan, PlanUpdate, ReplanInput};
use crate::qa::{self, QaReport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitReport {
    pub state_dir: PathBuf,
    /// Files written by this call. Existing files are left alone.
    pub created: Vec<PathBuf>,
}

pub struct PlanStore {
    root: PathBuf,
    config: Config,
}

impl PlanStore {
    /// Open the store for a workspace root, reading its config if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = Config::load(&root)?;
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state_dir(&self) -> PathBuf {
        paths::state_dir(&self.root)
    }

    pub fn is_initialized(&self) -> bool {
        paths::plan_path(&self.root).exists()
    }

    // -----------------------------------------------------------------------
    // Initialization
    // -----------------------------------------------------------------------

    pub fn init(&self) -> Result<InitReport> {
        let state_dir = self.state_dir();
        io::ensure_dir(&state_dir)?;

        let mut created = Vec::new();

        let plan_path = paths::plan_path(&self.root);
        let plan_data = serde_json::to_string_pretty(&Plan::default())?;
        let plan_created = io::write_if_missing(&plan_path, plan_data.as_bytes())?;
        if plan_created {
            created.push(plan_path);
        }

        let config_path = paths::config_path(&self.root);
        let config_data = serde_yaml::to_string(&self.config)?;
        if io::write_if_missing(&config_path, config_data.as_bytes())? {
            created.push(config_path);
        }

        for kind in [LogKind::Decisions, LogKind::Risks, LogKind::Events] {
            let path = kind.path(&self.root);
            if io::write_if_missing(&path, b"")? {
                created.push(path);
            }
        }

        if plan_created {
            self.record_event(
                EventKind::Initialized,
                serde_json::json!({ "state_dir": state_dir.display().to_string() }),
            )?;
        }

        debug!(state_dir = %state_dir.display(), created = created.len(), "initialized state");
        Ok(InitReport { state_dir, created })
    }

    // -----------------------------------------------------------------------
    // Plan document
    // -----------------------------------------------------------------------

    /// Load the plan, or a default plan when none has been written yet.
    pub fn load(&self) -> Result<Plan> {
        let path = paths::plan_path(&self.root);
        if !path.exists() {
            debug!(path = %path.display(), "no plan on disk, using default");
            return Ok(Plan::default());
        }
        let data = io::read_file(&path)?;
        let plan = serde_json::from_slice(&data)
            .map_err(|source| PlanError::CorruptState { path, source })?;
        Ok(plan)
    }

    /// Stamp `updated_at` and overwrite `plan.json` in one atomic rename.
    pub fn save(&self, plan: &mut Plan) -> Result<()> {
        plan.updated_at = now();
        let path = paths::plan_path(&self.root);
        let data = serde_json::to_string_pretty(plan)?;
        io::atomic_write(&path, data.as_bytes())?;
        debug!(path = %path.display(), "saved plan");
        Ok(())
    }

    /// Validate, then load-merge-save. Invalid input writes nothing.
    pub fn merge(&self, update: &PlanUpdate) -> Result<Plan> {
        update.validate()?;
        let mut plan = self.load()?;
        plan.merge(update, self.config.policy.phase_plan);
        self.save(&mut plan)?;
        Ok(plan)
    }

    pub fn replan(&self, input: &ReplanInput) -> Result<Plan> {
        let mut plan = self.load()?;
        plan.apply_replan(input);
        self.save(&mut plan)?;
        Ok(plan)
    }

    /// Fill empty insight axes with prompts. Saves only when something changed.
    pub fn fill_gaps(&self) -> Result<(Plan, Vec<InsightAxis>)> {
        let mut plan = self.load()?;
        let filled = plan.fill_insight_gaps();
        if !filled.is_empty() {
            self.save(&mut plan)?;
        }
        Ok((plan, filled))
    }

    /// Run QA with this workspace's configured policy.
    pub fn evaluate(&self, plan: &Plan) -> QaReport {
        let report = qa::evaluate_with(plan, &self.config.policy.qa());
        debug!(passed = report.passed, failed = ?report.failed_rule_ids(), "evaluated plan");
        report
    }

    // -----------------------------------------------------------------------
    // Append-only logs
    // -----------------------------------------------------------------------

    pub fn append<R: LogRecord>(&self, record: &R) -> Result<()> {
        let path = R::KIND.path(&self.root);
        journal::append(&path, record)?;
        debug!(log = %R::KIND, id = record.id(), "appended record");
        Ok(())
    }

    pub fn read_log<R: LogRecord>(&self) -> Result<Vec<R>> {
        journal::read_all(&R::KIND.path(&self.root))
    }

    pub fn next_id(&self, kind: LogKind) -> Result<String> {
        journal::next_id(&kind.path(&self.root), kind)
    }

    pub fn record_decision(
        &self,
        text: &str,
        reason: Option<String>,
        rejected: Vec<String>,
    ) -> Result<DecisionRecord> {
        let text = required_text("decision", text)?;
        let record = DecisionRecord {
            id: self.next_id(LogKind::Decisions)?,
            text,
            reason: reason.filter(|r| !is_blank(r)),
            rejected,
            created_at: now(),
        };
        self.append(&record)?;
        Ok(record)
    }

    pub fn record_risk(
        &self,
        text: &str,
        signal: Option<String>,
        mitigation: Option<String>,
    ) -> Result<RiskRecord> {
        let text = required_text("risk", text)?;
        let record = RiskRecord {
            id: self.next_id(LogKind::Risks)?,
            text,
            signal: signal.filter(|s| !is_blank(s)),
            mitigation: mitigation.filter(|m| !is_blank(m)),
            created_at: now(),
        };
        self.append(&record)?;
        Ok(record)
    }

    pub fn record_event(&self, kind: EventKind, payload: serde_json::Value) -> Result<EventRecord> {
        let record = EventRecord {
            id: self.next_id(LogKind::Events)?,
            kind,
            payload,
            created_at: now(),
        };
        self.append(&record)?;
        Ok(record)
    }

    pub fn decisions(&self) -> Result<Vec<DecisionRecord>> {
        self.read_log()
    }

    pub fn risks(&self) -> Result<Vec<RiskRecord>> {
        self.read_log()
    }

    pub fn events(&self) -> Result<Vec<EventRecord>> {
        self.read_log()
    }
}

fn required_text(what: &str, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlanError::Validation(format!("{what} text must not be empty")));
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PhasePlanMerge;
    use std::collections::{BTreeMap, HashSet};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> PlanStore {
        PlanStore::open(dir.path()).unwrap()
    }

    #[test]
    fn load_without_state_returns_default() {
        let dir = TempDir::new().unwrap();
        let plan = store(&dir).load().unwrap();
        assert!(plan.goal.is_empty());
        assert!(!plan.is_long_horizon());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let mut plan = Plan {
            goal: "Ship MVP".to_string(),
            deadline: "2026-03-15".to_string(),
            phase_plan: vec!["discover".to_string(), "build".to_string()],
            long_horizon: true,
            evidence: vec!["pilot done".to_string()],
            ..Plan::default()
        };
        *plan.insight_mut(InsightAxis::Market) = "solo founders".to_string();
        s.save(&mut plan).unwrap();
        assert_eq!(s.load().unwrap(), plan);
    }

    #[test]
    fn corrupt_plan_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let path = paths::plan_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ goal: ").unwrap();

        let err = store(&dir).load().unwrap_err();
        assert!(matches!(err, PlanError::CorruptState { .. }));
        assert!(err.to_string().contains("plan.json"));
    }

    #[test]
    fn non_utf8_plan_is_corrupt_state() {
        let dir = TempDir::new().unwrap();
        let path = paths::plan_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [0xff, 0xfe, b'{', b'}']).unwrap();

        let err = store(&dir).load().unwrap_err();
        assert!(matches!(err, PlanError::CorruptState { .. }));
        assert!(err.to_string().contains("plan.json"));
    }

    #[test]
    fn unreadable_plan_is_read_error_with_path() {
        let dir = TempDir::new().unwrap();
        let path = paths::plan_path(dir.path());
        std::fs::create_dir_all(&path).unwrap();

        let err = store(&dir).load().unwrap_err();
        assert!(matches!(err, PlanError::Read { .. }));
        assert!(err.to_string().contains("plan.json"));
    }

    #[test]
    fn merge_updates_named_fields_and_keeps_the_rest() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.merge(&PlanUpdate {
            goal: Some("Ship MVP".to_string()),
            success_metric: Some("4 commands".to_string()),
            constraints: Some("evenings".to_string()),
            ..PlanUpdate::default()
        })
        .unwrap();

        s.merge(&PlanUpdate {
            success_metric: Some("5 commands".to_string()),
            insights: BTreeMap::from([(InsightAxis::Timing, "now".to_string())]),
            ..PlanUpdate::default()
        })
        .unwrap();

        let plan = s.load().unwrap();
        assert_eq!(plan.goal, "Ship MVP");
        assert_eq!(plan.success_metric, "5 commands");
        assert_eq!(plan.constraints, "evenings");
        assert_eq!(plan.timing_insights, "now");
    }

    #[test]
    fn invalid_merge_leaves_plan_file_untouched() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.merge(&PlanUpdate {
            goal: Some("Ship MVP".to_string()),
            ..PlanUpdate::default()
        })
        .unwrap();
        let before = std::fs::read(paths::plan_path(dir.path())).unwrap();

        let err = s
            .merge(&PlanUpdate {
                goal: Some("Something else".to_string()),
                deadline: Some("15/03/2026".to_string()),
                ..PlanUpdate::default()
            })
            .unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));

        let after = std::fs::read(paths::plan_path(dir.path())).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn configured_phase_plan_append() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.policy.phase_plan = PhasePlanMerge::Append;
        let s = PlanStore::with_config(dir.path(), config);

        for phase in ["discover", "build"] {
            s.merge(&PlanUpdate {
                phase_plan: Some(vec![phase.to_string()]),
                ..PlanUpdate::default()
            })
            .unwrap();
        }
        assert_eq!(s.load().unwrap().phase_plan, vec!["discover", "build"]);
    }

    #[test]
    fn three_decisions_read_back_in_order() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        for text in ["rust cli", "json state", "no daemon"] {
            s.record_decision(text, None, Vec::new()).unwrap();
        }

        let decisions = s.decisions().unwrap();
        assert_eq!(decisions.len(), 3);
        let texts: Vec<&str> = decisions.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["rust cli", "json state", "no daemon"]);
        let ids: HashSet<&str> = decisions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(decisions[0].id, "D1");
    }

    #[test]
    fn appending_does_not_rewrite_prior_lines() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.record_risk("scope drift", Some("new asks".to_string()), None)
            .unwrap();
        let first = std::fs::read_to_string(paths::risks_path(dir.path())).unwrap();
        s.record_risk("burnout", None, Some("cap hours".to_string()))
            .unwrap();
        let second = std::fs::read_to_string(paths::risks_path(dir.path())).unwrap();
        assert!(second.starts_with(&first));
        assert_eq!(s.risks().unwrap()[1].mitigation.as_deref(), Some("cap hours"));
    }

    #[test]
    fn blank_decision_rejected_without_write() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let err = s.record_decision("   ", None, Vec::new()).unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
        assert!(!paths::decisions_path(dir.path()).exists());
    }

    #[test]
    fn unwritable_state_dir_is_write_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(paths::STATE_DIR), b"not a directory").unwrap();
        let err = store(&dir)
            .record_event(EventKind::PlanUpdated, serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, PlanError::Write { .. }));
    }

    #[test]
    fn init_is_idempotent_and_logs_once() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let first = s.init().unwrap();
        assert!(s.is_initialized());
        assert!(first.created.contains(&paths::plan_path(dir.path())));
        assert!(paths::config_path(dir.path()).exists());

        let second = s.init().unwrap();
        assert!(second.created.is_empty());

        let events = s.events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Initialized);
    }

    #[test]
    fn fill_gaps_saves_once() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let (plan, filled) = s.fill_gaps().unwrap();
        assert_eq!(filled.len(), 8);
        assert!(plan.missing_axes().is_empty());

        let (_, filled_again) = s.fill_gaps().unwrap();
        assert!(filled_again.is_empty());
    }
}
