// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side views over the flat transaction list.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::models::{Category, CategoryKind, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub target: Decimal,
    pub actual: Decimal,
    pub remaining: Decimal,
}

fn sums_by_category(transactions: &[Transaction]) -> HashMap<&str, (Decimal, usize)> {
    let mut sums: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for t in transactions {
        let entry = sums
            .entry(t.category.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += t.amount;
        entry.1 += 1;
    }
    sums
}

/// Per-category sum of matching transaction amounts, in category order.
///
/// Categories without any matching transaction are left out, and a name that
/// appears twice in `categories` is reported once. Transactions naming no
/// known category contribute nothing.
pub fn category_totals(categories: &[Category], transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let sums = sums_by_category(transactions);
    let mut seen = HashSet::new();
    categories
        .iter()
        .filter(|c| seen.insert(c.name.as_str()))
        .filter_map(|c| {
            sums.get(c.name.as_str()).map(|&(total, count)| CategoryTotal {
                name: c.name.clone(),
                kind: c.kind,
                total,
                count,
            })
        })
        .collect()
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut s = Summary::default();
    for t in transactions {
        match t.kind() {
            Some(CategoryKind::Income) => s.income += t.amount,
            Some(CategoryKind::Expense) => s.expenses += t.amount.abs(),
            None => {}
        }
    }
    s.savings = s.income - s.expenses;
    s
}

/// Splits into (income, expense) lists by amount sign. Zero amounts go nowhere.
pub fn split_by_kind(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    let of_kind = |kind: CategoryKind| -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| t.kind() == Some(kind))
            .cloned()
            .collect()
    };
    (of_kind(CategoryKind::Income), of_kind(CategoryKind::Expense))
}

/// Dashboard pie data: income categories over positive amounts, expense
/// categories over negative ones.
pub fn dashboard_totals(
    categories: &[Category],
    transactions: &[Transaction],
) -> (Vec<CategoryTotal>, Vec<CategoryTotal>) {
    let (income_tx, expense_tx) = split_by_kind(transactions);
    let of_kind = |kind: CategoryKind| -> Vec<Category> {
        categories.iter().filter(|c| c.kind == kind).cloned().collect()
    };
    (
        category_totals(&of_kind(CategoryKind::Income), &income_tx),
        category_totals(&of_kind(CategoryKind::Expense), &expense_tx),
    )
}

/// Actual vs target for every category, including ones with no activity.
pub fn target_progress(categories: &[Category], transactions: &[Transaction]) -> Vec<TargetProgress> {
    let sums = sums_by_category(transactions);
    categories
        .iter()
        .map(|c| {
            let actual = sums
                .get(c.name.as_str())
                .map(|&(total, _)| total)
                .unwrap_or(Decimal::ZERO);
            TargetProgress {
                name: c.name.clone(),
                kind: c.kind,
                target: c.target,
                actual,
                remaining: c.target - actual,
            }
        })
        .collect()
}
