// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde::Serialize;

use super::{Session, window_arg};
use crate::error::ValidationError;
use crate::models::{CategoryKind, NewTransaction, Transaction};
use crate::query::TransactionFilter;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, require};

pub async fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub).await?,
        Some(("list", sub)) => list(session, sub).await?,
        Some(("edit", sub)) => edit(session, sub).await?,
        Some(("rm", sub)) => {
            let ids: Vec<i64> = sub.get_many::<i64>("id").into_iter().flatten().copied().collect();
            let n = session.bridge.delete_transactions(ids).await?;
            println!("Removed {} transaction(s)", n);
        }
        _ => {}
    }
    Ok(())
}

fn arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> &'a str {
    sub.get_one::<String>(name).map_or("", |s| s.as_str())
}

/// The category must name an existing category, as the picker in the app only
/// offers those.
async fn ensure_category(session: &Session, name: &str) -> Result<()> {
    let known = session.bridge.list_categories(None).await?;
    if !known.iter().any(|c| c.name == name) {
        return Err(ValidationError::UnknownCategory(name.to_string()).into());
    }
    Ok(())
}

async fn add(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(&require("date", arg(sub, "date"))?)?;
    let amount = parse_decimal(&require("amount", arg(sub, "amount"))?)?;
    let category = require("category", arg(sub, "category"))?;
    let description = arg(sub, "description").trim().to_string();
    ensure_category(session, &category).await?;

    let row = NewTransaction {
        date,
        description,
        amount,
        category,
    };
    let id = session.bridge.insert_transaction(row.clone()).await?;
    println!(
        "Recorded {} on {} in '{}' (#{})",
        amount, date, row.category, id
    );
    Ok(())
}

async fn edit(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    let filter = TransactionFilter::all();
    let Some(current) = session
        .bridge
        .list_transactions(filter)
        .await?
        .into_iter()
        .find(|t| t.id == id)
    else {
        bail!("Transaction #{} not found", id);
    };

    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => current.date,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_decimal(a)?,
        None => current.amount,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|d| d.trim().to_string())
        .unwrap_or(current.description);
    let category = match sub.get_one::<String>("category") {
        Some(c) => {
            let c = require("category", c)?;
            ensure_category(session, &c).await?;
            c
        }
        None => current.category,
    };

    let row = NewTransaction {
        date,
        description,
        amount,
        category,
    };
    session.bridge.update_transaction(id, row).await?;
    println!("Updated transaction #{}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.to_string(),
            description: t.description.clone(),
            amount: fmt_money(&t.amount),
            category: t.category.clone(),
        }
    }
}

pub async fn query_rows(session: &Session, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut filter = TransactionFilter::all();
    if let Some(k) = sub.get_one::<String>("type") {
        filter = filter.of_kind(k.parse::<CategoryKind>()?);
    }
    if let Some(w) = window_arg(sub, session.today)? {
        filter = filter.within(w);
    }
    let data = session.bridge.list_transactions(filter).await?;
    Ok(data.iter().map(TransactionRow::from).collect())
}

async fn list(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(session, sub).await?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Description", "Amount", "Category"], rows)
        );
    }
    Ok(())
}
