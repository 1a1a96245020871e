// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::utils::parse_date_like;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BUSINESS_NAME: &str = "Toko Saya";
pub const DEFAULT_BUSINESS_TYPE: &str = "Toko Retail";
pub const DEFAULT_CURRENCY: &str = "IDR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "IN")]
    Income,
    #[serde(rename = "OUT")]
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "IN",
            TxType::Expense => "OUT",
        }
    }

    /// Label used in exported documents.
    pub fn label(&self) -> &'static str {
        match self {
            TxType::Income => "Pemasukan",
            TxType::Expense => "Pengeluaran",
        }
    }

    /// Exact stored form: `IN` or `OUT`, nothing else.
    pub fn from_wire(s: &str) -> Result<Self, LedgerError> {
        match s {
            "IN" => Ok(TxType::Income),
            "OUT" => Ok(TxType::Expense),
            _ => Err(LedgerError::InvalidTransactionType(s.to_string())),
        }
    }

    pub fn sign(&self) -> &'static str {
        match self {
            TxType::Income => "+",
            TxType::Expense => "-",
        }
    }
}

/// Lenient parse for command-line input.
impl FromStr for TxType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" | "INCOME" => Ok(TxType::Income),
            "OUT" | "EXPENSE" => Ok(TxType::Expense),
            _ => Err(LedgerError::InvalidTransactionType(s.to_string())),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type filter applied by lists, reports and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TxType),
}

impl TypeFilter {
    pub fn matches(&self, t: TxType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(want) => *want == t,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        Ok(TypeFilter::Only(s.parse()?))
    }
}

/// A transaction date exactly as it was stored, plus the local instant it resolves to.
/// `at` is `None` when the stored value does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TxDate {
    raw: String,
    at: Option<NaiveDateTime>,
}

impl TxDate {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn at(&self) -> Option<NaiveDateTime> {
        self.at
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.at.map(|dt| dt.date())
    }
}

impl From<String> for TxDate {
    fn from(raw: String) -> Self {
        let at = parse_date_like(&raw);
        Self { raw, at }
    }
}

impl From<&str> for TxDate {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<NaiveDate> for TxDate {
    fn from(d: NaiveDate) -> Self {
        Self {
            raw: d.format("%Y-%m-%d").to_string(),
            at: d.and_hms_opt(0, 0, 0),
        }
    }
}

impl From<TxDate> for String {
    fn from(d: TxDate) -> Self {
        d.raw
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: TxDate,
    pub r#type: TxType,
    pub category: String,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn account_or_dash(&self) -> &str {
        non_empty(self.account.as_deref()).unwrap_or("-")
    }

    pub fn note_or_dash(&self) -> &str {
        non_empty(self.note.as_deref()).unwrap_or("-")
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Untyped shape of a transaction as found in a blob or backup file.
/// `type` is kept as text so an unknown value surfaces as its own error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    #[serde(default)]
    pub category: String,
    pub amount: i64,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = LedgerError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: raw.id,
            date: TxDate::from(raw.date),
            r#type: TxType::from_wire(&raw.r#type)?,
            category: raw.category,
            amount: raw.amount,
            account: raw.account,
            note: raw.note,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_business_name")]
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_business_name() -> String {
    DEFAULT_BUSINESS_NAME.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            business_name: default_business_name(),
            business_type: None,
            currency: default_currency(),
        }
    }
}

impl Preferences {
    pub fn business_type_or_default(&self) -> &str {
        self.business_type.as_deref().unwrap_or(DEFAULT_BUSINESS_TYPE)
    }
}

/// Last-viewed reporting window, kept as the strings the user entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePeriod {
    pub from: String,
    pub to: String,
}

/// The persisted blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    pub transactions: Vec<Transaction>,
    pub preferences: Preferences,
    pub active_period: Option<ActivePeriod>,
}
