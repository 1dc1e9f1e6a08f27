// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Income or expense. Stored on categories; derived from the amount sign on transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    /// Kind implied by a signed amount. Zero belongs to neither side.
    pub fn of_amount(amount: Decimal) -> Option<CategoryKind> {
        if amount > Decimal::ZERO {
            Some(CategoryKind::Income)
        } else if amount < Decimal::ZERO {
            Some(CategoryKind::Expense)
        } else {
            None
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub target: Decimal,
    pub colour: Option<String>,
}

/// Category fields as submitted by the user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub target: Decimal,
    pub colour: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

impl Transaction {
    pub fn kind(&self) -> Option<CategoryKind> {
        CategoryKind::of_amount(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
}

impl NewTransaction {
    pub fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            category: self.category,
        }
    }
}

/// How category targets are checked before they reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPolicy {
    /// Income targets must not be negative, expense targets must not be positive.
    #[default]
    SignedByType,
    /// Income targets must be positive, expense targets negative. Zero is rejected.
    Strict,
    Unrestricted,
}

impl TargetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPolicy::SignedByType => "signed-by-type",
            TargetPolicy::Strict => "strict",
            TargetPolicy::Unrestricted => "unrestricted",
        }
    }

    pub fn check(&self, kind: CategoryKind, target: Decimal) -> Result<(), ValidationError> {
        let ok = match (self, kind) {
            (TargetPolicy::Unrestricted, _) => true,
            (TargetPolicy::SignedByType, CategoryKind::Income) => target >= Decimal::ZERO,
            (TargetPolicy::SignedByType, CategoryKind::Expense) => target <= Decimal::ZERO,
            (TargetPolicy::Strict, CategoryKind::Income) => target > Decimal::ZERO,
            (TargetPolicy::Strict, CategoryKind::Expense) => target < Decimal::ZERO,
        };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::TargetSign { kind, target })
        }
    }
}

impl fmt::Display for TargetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "signed-by-type" => Ok(TargetPolicy::SignedByType),
            "strict" => Ok(TargetPolicy::Strict),
            "unrestricted" => Ok(TargetPolicy::Unrestricted),
            other => Err(ValidationError::UnknownPolicy(other.to_string())),
        }
    }
}
