// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{Session, window_or_all};
use crate::aggregate::{
    CategoryTotal, Summary, TargetProgress, dashboard_totals, summarize, target_progress,
};
use crate::models::{Category, Transaction};
use crate::query::TransactionFilter;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::window::TimeWindow;

pub async fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(session, sub).await?,
        Some(("by-category", sub)) => by_category(session, sub).await?,
        Some(("targets", sub)) => targets(session, sub).await?,
        _ => {}
    }
    Ok(())
}

/// Categories and in-window transactions, fetched concurrently.
pub async fn load(
    session: &Session,
    window: TimeWindow,
) -> Result<(Vec<Category>, Vec<Transaction>)> {
    let (categories, transactions) = tokio::try_join!(
        session.bridge.list_categories(None),
        session.bridge.list_transactions(TransactionFilter::all()),
    )?;
    Ok((categories, window.filter(&transactions)))
}

pub async fn summary_for(session: &Session, window: TimeWindow) -> Result<Summary> {
    let transactions = session
        .bridge
        .list_transactions(TransactionFilter::all().within(window))
        .await?;
    Ok(summarize(&transactions))
}

async fn summary(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let window = window_or_all(sub, session.today)?;
    let s = summary_for(session, window).await?;
    if !maybe_print_json(sub.get_flag("json"), &s)? {
        let rows = vec![
            vec!["Income".to_string(), fmt_money(&s.income)],
            vec!["Expenses".to_string(), fmt_money(&s.expenses)],
            vec!["Savings".to_string(), fmt_money(&s.savings)],
        ];
        println!("{} .. {}", window.start, window.end);
        println!("{}", pretty_table(&["", "Amount"], rows));
    }
    Ok(())
}

pub async fn by_category_for(
    session: &Session,
    window: TimeWindow,
) -> Result<(Vec<CategoryTotal>, Vec<CategoryTotal>)> {
    let (categories, transactions) = load(session, window).await?;
    Ok(dashboard_totals(&categories, &transactions))
}

async fn by_category(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let window = window_or_all(sub, session.today)?;
    let (income, expense) = by_category_for(session, window).await?;
    let all: Vec<CategoryTotal> = income.into_iter().chain(expense).collect();
    if !maybe_print_json(sub.get_flag("json"), &all)? {
        let rows: Vec<Vec<String>> = all
            .iter()
            .map(|t| {
                vec![
                    t.name.clone(),
                    t.kind.to_string(),
                    t.count.to_string(),
                    fmt_money(&t.total),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Type", "Count", "Total"], rows)
        );
    }
    Ok(())
}

pub async fn targets_for(session: &Session, window: TimeWindow) -> Result<Vec<TargetProgress>> {
    let (categories, transactions) = load(session, window).await?;
    Ok(target_progress(&categories, &transactions))
}

async fn targets(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let window = window_or_all(sub, session.today)?;
    let data = targets_for(session, window).await?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.kind.to_string(),
                    fmt_money(&p.target),
                    fmt_money(&p.actual),
                    fmt_money(&p.remaining),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Type", "Target", "Actual", "Remaining"], rows)
        );
    }
    Ok(())
}
