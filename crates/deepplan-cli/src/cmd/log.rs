use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use deepplan_core::journal::LogKind;
use std::path::Path;

pub fn run(root: &Path, kind: &str, json: bool) -> anyhow::Result<()> {
    let kind: LogKind = kind.parse()?;
    let store = super::open_store(root)?;
    super::warn_if_uninitialized(&store);

    match kind {
        LogKind::Decisions => {
            let records = store.decisions().context("failed to read decisions")?;
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No decisions recorded.");
                return Ok(());
            }
            let rows = records
                .iter()
                .map(|d| {
                    vec![
                        d.id.clone(),
                        d.created_at.to_rfc3339(),
                        truncate(&d.text, 60),
                        d.reason.as_deref().map(|r| truncate(r, 40)).unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["ID", "CREATED", "DECISION", "REASON"], rows);
        }
        LogKind::Risks => {
            let records = store.risks().context("failed to read risks")?;
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No risks recorded.");
                return Ok(());
            }
            let rows = records
                .iter()
                .map(|r| {
                    vec![
                        r.id.clone(),
                        r.created_at.to_rfc3339(),
                        truncate(&r.text, 50),
                        r.signal.as_deref().map(|s| truncate(s, 30)).unwrap_or_default(),
                        r.mitigation.as_deref().map(|m| truncate(m, 30)).unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["ID", "CREATED", "RISK", "SIGNAL", "MITIGATION"], rows);
        }
        LogKind::Events => {
            let records = store.events().context("failed to read events")?;
            if json {
                return print_json(&records);
            }
            if records.is_empty() {
                println!("No events recorded.");
                return Ok(());
            }
            let rows = records
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        e.created_at.to_rfc3339(),
                        e.kind.to_string(),
                        truncate(&e.payload.to_string(), 60),
                    ]
                })
                .collect();
            print_table(&["ID", "CREATED", "TYPE", "PAYLOAD"], rows);
        }
    }
    Ok(())
}
