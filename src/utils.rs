// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::models::TargetPolicy;

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal, ValidationError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(s.to_string()))
}

/// Trimmed value, or an error naming `field` when nothing is left.
pub fn require(field: &'static str, s: &str) -> Result<String, ValidationError> {
    let v = s.trim();
    if v.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(v.to_string())
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn get_target_policy(conn: &Connection) -> Result<TargetPolicy> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='target_policy'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => s
            .parse::<TargetPolicy>()
            .with_context(|| format!("Stored target policy '{}' is invalid", s)),
        None => Ok(TargetPolicy::default()),
    }
}

pub fn set_target_policy(conn: &Connection, policy: TargetPolicy) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('target_policy', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![policy.as_str()],
    )?;
    Ok(())
}
