// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use log::{debug, info};
use once_cell::sync::Lazy;
use rusqlite::{Connection, params, params_from_iter};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::models::{Category, CategoryKind, NewCategory, NewTransaction, Transaction};
use crate::query::{Query, Rows, TransactionFilter};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Ledgerly", "ledgerly"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("ledgerly.sqlite"))
}

/// Owns the single connection to the store. Closed explicitly with
/// [`Store::close`] or implicitly when dropped.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        info!("opened store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))?;
        info!("store closed");
        Ok(())
    }

    pub fn execute(&self, query: &Query) -> Result<Rows, StoreError> {
        debug!("executing {}", query.label());
        match query {
            Query::ListCategories { kind } => self.list_categories(*kind).map(Rows::Categories),
            Query::ListTransactions(filter) => {
                self.list_transactions(filter).map(Rows::Transactions)
            }
            Query::InsertCategory(c) => self.insert_category(c),
            Query::InsertTransaction(t) => self.insert_transaction(t),
            Query::UpdateCategory {
                id,
                name,
                target,
                colour,
            } => {
                let n = self.conn.execute(
                    "UPDATE Categories SET name=?1, target=?2, colour=?3 WHERE id=?4",
                    params![name, target.to_string(), colour, id],
                )?;
                Ok(Rows::Affected(n))
            }
            Query::UpdateTransaction { id, row } => {
                let n = self.conn.execute(
                    "UPDATE Transactions SET date=?1, description=?2, amount=?3, category=?4 WHERE id=?5",
                    params![
                        row.date.to_string(),
                        row.description,
                        row.amount.to_string(),
                        row.category,
                        id
                    ],
                )?;
                Ok(Rows::Affected(n))
            }
            Query::DeleteCategories(ids) => self.delete_ids("Categories", ids),
            Query::DeleteTransactions(ids) => self.delete_ids("Transactions", ids),
        }
    }

    fn list_categories(&self, kind: Option<CategoryKind>) -> Result<Vec<Category>, StoreError> {
        let mut sql = String::from("SELECT id, name, type, target, colour FROM Categories");
        if kind.is_some() {
            sql.push_str(" WHERE type=?1");
        }
        sql.push_str(" ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match kind {
            Some(k) => stmt.query(params![k.as_str()])?,
            None => stmt.query([])?,
        };

        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let name: String = r.get(1)?;
            let kind_s: String = r.get(2)?;
            let target_s: String = r.get(3)?;
            let colour: Option<String> = r.get(4)?;
            let kind = kind_s
                .parse::<CategoryKind>()
                .map_err(|_| corrupt("Categories", id, "type", kind_s))?;
            let target = parse_amount("Categories", id, "target", target_s)?;
            data.push(Category {
                id,
                name,
                kind,
                target,
                colour,
            });
        }
        Ok(data)
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, StoreError> {
        let mut sql = String::from(
            "SELECT id, date, description, amount, category FROM Transactions WHERE 1=1",
        );
        let mut params_vec: Vec<String> = Vec::new();

        match filter.kind {
            Some(CategoryKind::Income) => sql.push_str(" AND CAST(amount AS REAL) > 0"),
            Some(CategoryKind::Expense) => sql.push_str(" AND CAST(amount AS REAL) < 0"),
            None => {}
        }
        if let Some(w) = filter.window {
            sql.push_str(" AND date BETWEEN ? AND ?");
            params_vec.push(w.start.to_string());
            params_vec.push(w.end.to_string());
        }
        sql.push_str(" ORDER BY date, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params_vec.iter()))?;

        let mut data = Vec::new();
        while let Some(r) = rows.next()? {
            let id: i64 = r.get(0)?;
            let date_s: String = r.get(1)?;
            let description: Option<String> = r.get(2)?;
            let amount_s: String = r.get(3)?;
            let category: Option<String> = r.get(4)?;
            let date = NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
                .map_err(|_| corrupt("Transactions", id, "date", date_s))?;
            let amount = parse_amount("Transactions", id, "amount", amount_s)?;
            data.push(Transaction {
                id,
                date,
                description: description.unwrap_or_default(),
                amount,
                category: category.unwrap_or_default(),
            });
        }
        Ok(data)
    }

    fn insert_category(&self, c: &NewCategory) -> Result<Rows, StoreError> {
        self.conn.execute(
            "INSERT INTO Categories(name, type, target, colour) VALUES (?1, ?2, ?3, ?4)",
            params![c.name, c.kind.as_str(), c.target.to_string(), c.colour],
        )?;
        Ok(Rows::Inserted {
            id: self.conn.last_insert_rowid(),
        })
    }

    fn insert_transaction(&self, t: &NewTransaction) -> Result<Rows, StoreError> {
        self.conn.execute(
            "INSERT INTO Transactions(date, description, amount, category) VALUES (?1, ?2, ?3, ?4)",
            params![
                t.date.to_string(),
                t.description,
                t.amount.to_string(),
                t.category
            ],
        )?;
        Ok(Rows::Inserted {
            id: self.conn.last_insert_rowid(),
        })
    }

    fn delete_ids(&self, table: &'static str, ids: &[i64]) -> Result<Rows, StoreError> {
        if ids.is_empty() {
            return Ok(Rows::Affected(0));
        }
        let marks = vec!["?"; ids.len()].join(",");
        // `table` is one of two fixed names, never user input.
        let sql = format!("DELETE FROM {} WHERE id IN ({})", table, marks);
        let n = self.conn.execute(&sql, params_from_iter(ids.iter()))?;
        Ok(Rows::Affected(n))
    }
}

fn parse_amount(
    table: &'static str,
    id: i64,
    column: &'static str,
    value: String,
) -> Result<Decimal, StoreError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| corrupt(table, id, column, value))
}

fn corrupt(table: &'static str, id: i64, column: &'static str, value: String) -> StoreError {
    StoreError::CorruptRow {
        table,
        id,
        column,
        value,
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        target TEXT NOT NULL DEFAULT '0',
        colour TEXT
    );

    -- category holds a Categories.name, not a foreign key
    CREATE TABLE IF NOT EXISTS Transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON Transactions(date);
    "#,
    )?;
    Ok(())
}
