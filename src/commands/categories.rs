// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use super::Session;
use crate::error::ValidationError;
use crate::models::{Category, CategoryKind, NewCategory};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, require};

pub async fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from_args(session, sub)?;
            ensure_unique(session, draft.kind, &draft.name).await?;
            let name = draft.name.clone();
            let id = session.bridge.insert_category(draft).await?;
            println!("Added category '{}' (#{})", name, id);
        }
        Some(("list", sub)) => list(session, sub).await?,
        Some(("edit", sub)) => edit(session, sub).await?,
        Some(("rm", sub)) => {
            let ids: Vec<i64> = sub.get_many::<i64>("id").into_iter().flatten().copied().collect();
            let n = session.bridge.delete_categories(ids).await?;
            println!("Removed {} categor{}", n, if n == 1 { "y" } else { "ies" });
        }
        _ => {}
    }
    Ok(())
}

/// Validates `category add` input against the session's target policy.
pub fn draft_from_args(session: &Session, sub: &clap::ArgMatches) -> Result<NewCategory> {
    let name = require("name", sub.get_one::<String>("name").map_or("", |s| s.as_str()))?;
    let kind = sub
        .get_one::<String>("type")
        .map_or("", |s| s.as_str())
        .parse::<CategoryKind>()?;
    let target = parse_decimal(sub.get_one::<String>("target").map_or("0", |s| s.as_str()))?;
    session.policy.check(kind, target)?;
    let colour = sub
        .get_one::<String>("colour")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(NewCategory {
        name,
        kind,
        target,
        colour,
    })
}

async fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<CategoryKind>())
        .transpose()?;
    let data = session.bridge.list_categories(kind).await?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.kind.to_string(),
                    fmt_money(&c.target),
                    c.colour.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Type", "Target", "Colour"], rows)
        );
    }
    Ok(())
}

/// Reads the current row, overlays the given fields and writes the whole row back.
async fn edit(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let current = find(session, id).await?;

    let name = match sub.get_one::<String>("name") {
        Some(n) => {
            let n = require("name", n)?;
            if n != current.name {
                ensure_unique(session, current.kind, &n).await?;
            }
            n
        }
        None => current.name,
    };
    let target = match sub.get_one::<String>("target") {
        Some(t) => parse_decimal(t)?,
        None => current.target,
    };
    session.policy.check(current.kind, target)?;
    let colour = match sub.get_one::<String>("colour") {
        Some(c) if c.trim().is_empty() => None,
        Some(c) => Some(c.trim().to_string()),
        None => current.colour,
    };

    session
        .bridge
        .update_category(id, name.clone(), target, colour)
        .await?;
    println!("Updated category #{} '{}'", id, name);
    Ok(())
}

/// Names are unique within a type; transactions refer to categories by name.
async fn ensure_unique(session: &Session, kind: CategoryKind, name: &str) -> Result<()> {
    let same_kind = session.bridge.list_categories(Some(kind)).await?;
    if same_kind.iter().any(|c| c.name == name) {
        return Err(ValidationError::DuplicateCategory(name.to_string()).into());
    }
    Ok(())
}

async fn find(session: &Session, id: i64) -> Result<Category> {
    let all = session.bridge.list_categories(None).await?;
    match all.into_iter().find(|c| c.id == id) {
        Some(c) => Ok(c),
        None => bail!("Category #{} not found", id),
    }
}
