// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use serde_json::json;

use super::{Session, window_arg};
use crate::query::TransactionFilter;

pub async fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(session, sub).await,
        _ => Ok(()),
    }
}

async fn export_transactions(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map_or("csv", |s| s.as_str())
        .to_lowercase();
    let Some(out) = sub.get_one::<String>("out") else {
        bail!("--out is required");
    };

    let mut filter = TransactionFilter::all();
    if let Some(w) = window_arg(sub, session.today)? {
        filter = filter.within(w);
    }
    let rows = session.bridge.list_transactions(filter).await?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record(["id", "date", "description", "amount", "category"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.category.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date.to_string(), "description": t.description,
                        "amount": t.amount.to_string(), "category": t.category
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}
