pub mod decide;
pub mod ideate;
pub mod init;
pub mod insight;
pub mod log;
pub mod plan;
pub mod qa;
pub mod replan;
pub mod risk;
pub mod show;

use anyhow::Context;
use deepplan_core::config::WarnLevel;
use deepplan_core::plan::{InsightAxis, Plan};
use deepplan_core::qa::QaReport;
use deepplan_core::store::PlanStore;
use std::collections::BTreeMap;
use std::path::Path;

/// Open the store and surface config problems as log warnings.
pub fn open_store(root: &Path) -> anyhow::Result<PlanStore> {
    let store = PlanStore::open(root).context("failed to open plan store")?;
    for w in store.config().validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("config: {}", w.message),
            WarnLevel::Error => tracing::error!("config: {}", w.message),
        }
    }
    Ok(store)
}

/// Warn when the workspace has no plan yet.
pub fn warn_if_uninitialized(store: &PlanStore) {
    if !store.is_initialized() {
        tracing::warn!(
            "no plan under {}; run `deepplan init` first",
            store.root().display()
        );
    }
}

/// Collect per-axis CLI values, dropping axes that were not given.
pub fn axis_values(
    values: [(InsightAxis, Option<String>); 8],
) -> BTreeMap<InsightAxis, String> {
    values
        .into_iter()
        .filter_map(|(axis, v)| v.map(|v| (axis, v.trim().to_string())))
        .collect()
}

pub fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[derive(serde::Serialize)]
pub struct PlanWithReport<'a> {
    pub plan: &'a Plan,
    pub report: &'a QaReport,
}
