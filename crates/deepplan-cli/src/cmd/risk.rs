use crate::output::print_json;
use anyhow::Context;
use std::path::Path;

pub fn run(
    root: &Path,
    text: &str,
    signal: Option<String>,
    mitigation: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let record = store
        .record_risk(text, signal, mitigation)
        .context("failed to record risk")?;

    if json {
        return print_json(&record);
    }
    println!("Risk recorded: {} {}", record.id, record.text);
    Ok(())
}
