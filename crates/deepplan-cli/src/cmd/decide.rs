use crate::output::print_json;
use anyhow::Context;
use deepplan_core::plan::parse_list;
use std::path::Path;

pub fn run(
    root: &Path,
    text: &str,
    reason: Option<String>,
    rejected: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let rejected = rejected.map(parse_list).unwrap_or_default();
    let record = store
        .record_decision(text, reason, rejected)
        .context("failed to record decision")?;

    if json {
        return print_json(&record);
    }
    println!("Decision recorded: {} {}", record.id, record.text);
    Ok(())
}
