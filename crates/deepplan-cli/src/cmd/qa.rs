use crate::output::{print_json, print_report};
use anyhow::Context;
use std::path::Path;

/// A failing report is still a successful run; only I/O and parse errors exit non-zero.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    super::warn_if_uninitialized(&store);
    let plan = store.load().context("failed to load plan")?;
    let report = store.evaluate(&plan);

    if json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}
