// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerly::aggregate::{category_totals, dashboard_totals, summarize, target_progress};
use ledgerly::models::{Category, CategoryKind, Transaction};
use ledgerly::window::{TimeWindow, WindowPreset};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn cat(id: i64, name: &str, kind: CategoryKind, target: &str) -> Category {
    Category {
        id,
        name: name.into(),
        kind,
        target: dec(target),
        colour: None,
    }
}

fn tx(id: i64, date: &str, amount: &str, category: &str) -> Transaction {
    Transaction {
        id,
        date: d(date),
        description: String::new(),
        amount: dec(amount),
        category: category.into(),
    }
}

#[test]
fn food_and_salary_scenario() {
    let categories = vec![cat(1, "Food", CategoryKind::Expense, "0")];
    let transactions = vec![
        tx(1, "2024-02-01", "-50", "Food"),
        tx(2, "2024-02-02", "-20", "Food"),
        tx(3, "2024-02-03", "30", "Salary"),
    ];

    let totals = category_totals(&categories, &transactions);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].name, "Food");
    assert_eq!(totals[0].total, dec("-70"));
    assert_eq!(totals[0].count, 2);

    let s = summarize(&transactions);
    assert_eq!(s.income, dec("30"));
    assert_eq!(s.expenses, dec("70"));
    assert_eq!(s.savings, dec("-40"));
}

#[test]
fn savings_is_income_minus_expenses() {
    let samples = [
        vec![],
        vec!["0"],
        vec!["12.50", "-3.25", "0", "-100", "7"],
        vec!["-0.01", "-0.02"],
        vec!["1000000", "-999999.99"],
    ];
    for amounts in samples {
        let list: Vec<Transaction> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| tx(i as i64, "2024-01-01", a, "X"))
            .collect();
        let s = summarize(&list);
        assert_eq!(s.income - s.expenses, s.savings);
        assert!(s.income >= Decimal::ZERO);
        assert!(s.expenses >= Decimal::ZERO);
    }
}

#[test]
fn categories_without_transactions_are_left_out() {
    let categories = vec![
        cat(1, "Rent", CategoryKind::Expense, "-1200"),
        cat(2, "Food", CategoryKind::Expense, "-300"),
        cat(3, "Travel", CategoryKind::Expense, "0"),
    ];
    let transactions = vec![
        tx(1, "2024-01-01", "-1200", "Rent"),
        tx(2, "2024-01-03", "-10", "Food"),
        tx(3, "2024-01-04", "-15.5", "Food"),
        tx(4, "2024-01-05", "-8", "Gone"),
    ];
    let totals = category_totals(&categories, &transactions);
    let names: Vec<&str> = totals.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Rent", "Food"]);
    assert_eq!(totals[1].total, dec("-25.5"));
}

#[test]
fn duplicate_category_names_are_reported_once() {
    let categories = vec![
        cat(1, "Food", CategoryKind::Expense, "0"),
        cat(2, "Food", CategoryKind::Expense, "0"),
    ];
    let transactions = vec![tx(1, "2024-01-01", "-5", "Food")];
    let totals = category_totals(&categories, &transactions);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total, dec("-5"));
}

#[test]
fn orphaned_category_still_counts_in_summary() {
    let categories = vec![cat(1, "Food", CategoryKind::Expense, "0")];
    let transactions = vec![tx(1, "2024-01-01", "-40", "Deleted category")];
    assert!(category_totals(&categories, &transactions).is_empty());
    assert_eq!(summarize(&transactions).expenses, dec("40"));
}

#[test]
fn window_keeps_both_bounds() {
    let transactions = vec![
        tx(1, "2024-01-01", "1", "A"),
        tx(2, "2024-06-15", "1", "A"),
        tx(3, "2025-01-01", "1", "A"),
    ];
    let w = TimeWindow::custom(d("2024-01-01"), d("2024-12-31")).unwrap();
    let kept: Vec<i64> = w.filter(&transactions).iter().map(|t| t.id).collect();
    assert_eq!(kept, [1, 2]);
    assert!(w.contains(d("2024-12-31")));
    assert!(!w.contains(d("2023-12-31")));
}

#[test]
fn inverted_custom_window_is_rejected() {
    assert!(TimeWindow::custom(d("2024-02-01"), d("2024-01-01")).is_err());
    assert!(TimeWindow::custom(d("2024-01-01"), d("2024-01-01")).is_ok());
}

#[test]
fn presets_count_back_from_today() {
    let today = d("2024-03-31");
    let w = "30d".parse::<WindowPreset>().unwrap().resolve(today);
    assert_eq!(w.start, d("2024-03-01"));
    assert_eq!(w.end, today);

    let w = WindowPreset::Last7Days.resolve(today);
    assert_eq!(w.start, d("2024-03-24"));

    let all = WindowPreset::AllTime.resolve(today);
    assert_eq!(all.start, d("1970-01-01"));
    assert_eq!(all.end, today);

    assert!("2w".parse::<WindowPreset>().is_err());
}

#[test]
fn dashboard_splits_by_amount_sign() {
    let categories = vec![
        cat(1, "Job", CategoryKind::Income, "5000"),
        cat(2, "Food", CategoryKind::Expense, "-300"),
    ];
    let transactions = vec![
        tx(1, "2024-01-01", "5000", "Job"),
        tx(2, "2024-01-02", "-60", "Food"),
        // A refund booked on an expense category is not an expense slice.
        tx(3, "2024-01-03", "10", "Food"),
    ];
    let (income, expense) = dashboard_totals(&categories, &transactions);
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].name, "Job");
    assert_eq!(expense.len(), 1);
    assert_eq!(expense[0].total, dec("-60"));
}

#[test]
fn target_progress_lists_every_category() {
    let categories = vec![
        cat(1, "Food", CategoryKind::Expense, "-300"),
        cat(2, "Job", CategoryKind::Income, "4000"),
    ];
    let transactions = vec![
        tx(1, "2024-01-02", "-120", "Food"),
        tx(2, "2024-01-09", "-30", "Food"),
    ];
    let progress = target_progress(&categories, &transactions);
    assert_eq!(progress.len(), 2);
    assert_eq!(progress[0].actual, dec("-150"));
    assert_eq!(progress[0].remaining, dec("-150"));
    assert_eq!(progress[1].actual, Decimal::ZERO);
    assert_eq!(progress[1].remaining, dec("4000"));
}
