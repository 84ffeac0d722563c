use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const STATE_DIR: &str = ".deepplan";

pub const PLAN_FILE: &str = "plan.json";
pub const CONFIG_FILE: &str = "config.yaml";
pub const DECISIONS_FILE: &str = "decisions.jsonl";
pub const RISKS_FILE: &str = "risks.jsonl";
pub const EVENTS_FILE: &str = "events.jsonl";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

pub fn plan_path(root: &Path) -> PathBuf {
    state_dir(root).join(PLAN_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    state_dir(root).join(CONFIG_FILE)
}

pub fn decisions_path(root: &Path) -> PathBuf {
    state_dir(root).join(DECISIONS_FILE)
}

pub fn risks_path(root: &Path) -> PathBuf {
    state_dir(root).join(RISKS_FILE)
}

pub fn events_path(root: &Path) -> PathBuf {
    state_dir(root).join(EVENTS_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
