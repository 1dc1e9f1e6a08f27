// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::Transaction;

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Epoch through `today`, the dashboard default.
    pub fn all_time(today: NaiveDate) -> Self {
        Self {
            start: DateTime::UNIX_EPOCH.date_naive(),
            end: today,
        }
    }

    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(days),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn filter(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.contains(t.date))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowPreset {
    Last7Days,
    Last30Days,
    Last90Days,
    Last180Days,
    Last365Days,
    AllTime,
}

impl WindowPreset {
    pub fn days(&self) -> Option<i64> {
        match self {
            WindowPreset::Last7Days => Some(7),
            WindowPreset::Last30Days => Some(30),
            WindowPreset::Last90Days => Some(90),
            WindowPreset::Last180Days => Some(180),
            WindowPreset::Last365Days => Some(365),
            WindowPreset::AllTime => None,
        }
    }

    pub fn resolve(&self, today: NaiveDate) -> TimeWindow {
        match self.days() {
            Some(n) => TimeWindow::last_days(n, today),
            None => TimeWindow::all_time(today),
        }
    }
}

impl FromStr for WindowPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(WindowPreset::Last7Days),
            "30d" => Ok(WindowPreset::Last30Days),
            "90d" => Ok(WindowPreset::Last90Days),
            "180d" => Ok(WindowPreset::Last180Days),
            "365d" => Ok(WindowPreset::Last365Days),
            "all" => Ok(WindowPreset::AllTime),
            other => Err(ValidationError::UnknownPreset(other.to_string())),
        }
    }
}
