// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

use crate::bridge::ReplyToken;
use crate::models::CategoryKind;

/// Failure while executing a query against the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("row {id} in {table} has an unreadable {column} '{value}'")]
    CorruptRow {
        table: &'static str,
        id: i64,
        column: &'static str,
        value: String,
    },
}

/// Failure seen by a caller of the query bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("storage service is not running")]
    Disconnected,
    #[error("no reply for request {token} within {after:?}")]
    Timeout { token: ReplyToken, after: Duration },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("expected {expected} in reply, got {got}")]
    UnexpectedRows {
        expected: &'static str,
        got: &'static str,
    },
}

/// Rejected user input. Raised before a query is ever sent.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Unknown category type '{0}', expected income|expense")]
    UnknownKind(String),
    #[error("Unknown target policy '{0}', expected signed-by-type|strict|unrestricted")]
    UnknownPolicy(String),
    #[error("Unknown period '{0}', expected 7d|30d|90d|180d|365d|all")]
    UnknownPreset(String),
    #[error("{kind} target {target} has the wrong sign for this target policy")]
    TargetSign { kind: CategoryKind, target: Decimal },
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Category '{0}' not found")]
    UnknownCategory(String),
    #[error("window start {start} is after end {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}
