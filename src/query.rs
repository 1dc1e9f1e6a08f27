// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed requests carried over the bridge and the rows they produce.
//!
//! Every request maps to one parameterized statement in [`crate::db::Store`];
//! user values never end up inside SQL text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Category, CategoryKind, NewCategory, NewTransaction, Transaction};
use crate::window::TimeWindow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Keep only positive (income) or negative (expense) amounts.
    pub kind: Option<CategoryKind>,
    pub window: Option<TimeWindow>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_kind(mut self, kind: CategoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    ListCategories {
        kind: Option<CategoryKind>,
    },
    ListTransactions(TransactionFilter),
    InsertCategory(NewCategory),
    InsertTransaction(NewTransaction),
    UpdateCategory {
        id: i64,
        name: String,
        target: Decimal,
        colour: Option<String>,
    },
    UpdateTransaction {
        id: i64,
        row: NewTransaction,
    },
    DeleteCategories(Vec<i64>),
    DeleteTransactions(Vec<i64>),
}

impl Query {
    pub fn label(&self) -> &'static str {
        match self {
            Query::ListCategories { .. } => "list-categories",
            Query::ListTransactions(_) => "list-transactions",
            Query::InsertCategory(_) => "insert-category",
            Query::InsertTransaction(_) => "insert-transaction",
            Query::UpdateCategory { .. } => "update-category",
            Query::UpdateTransaction { .. } => "update-transaction",
            Query::DeleteCategories(_) => "delete-categories",
            Query::DeleteTransactions(_) => "delete-transactions",
        }
    }
}

/// Reply payload. Mutations only acknowledge; callers may ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rows {
    Categories(Vec<Category>),
    Transactions(Vec<Transaction>),
    Inserted { id: i64 },
    Affected(usize),
}

impl Rows {
    pub fn label(&self) -> &'static str {
        match self {
            Rows::Categories(_) => "categories",
            Rows::Transactions(_) => "transactions",
            Rows::Inserted { .. } => "inserted id",
            Rows::Affected(_) => "affected count",
        }
    }
}
