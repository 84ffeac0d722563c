use crate::output::print_json;
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root)?;
    let report = store.init().context("failed to initialize state")?;

    if json {
        return print_json(&report);
    }

    if report.created.is_empty() {
        println!("Already initialized: {}", report.state_dir.display());
    } else {
        println!("Initialized state in {}", report.state_dir.display());
        for path in &report.created {
            println!("  created {}", path.display());
        }
    }
    Ok(())
}
