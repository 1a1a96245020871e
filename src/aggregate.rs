// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period filtering and totals over a slice of transactions.
//!
//! Everything here is a pure function of its inputs. Amounts are summed
//! as stored; nothing re-validates sign or magnitude, so zero and negative
//! amounts flow through the sums unchanged.

use crate::models::{Transaction, TxType, TypeFilter};
use crate::period::Period;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const TOP_CATEGORIES: usize = 5;

/// Bar height in px for a day with no activity.
const MIN_BAR_HEIGHT: u32 = 6;
const BAR_HEIGHT_OFFSET: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: i64,
}

/// Per-category sums in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    entries: Vec<CategoryAmount>,
    index: HashMap<String, usize>,
}

impl CategoryTotals {
    fn add(&mut self, category: &str, amount: i64) {
        match self.index.get(category) {
            Some(&i) => {
                let e = &mut self.entries[i];
                e.amount = e.amount.saturating_add(amount);
            }
            None => {
                self.index.insert(category.to_string(), self.entries.len());
                self.entries.push(CategoryAmount {
                    category: category.to_string(),
                    amount,
                });
            }
        }
    }

    pub fn get(&self, category: &str) -> i64 {
        self.index
            .get(category)
            .map(|&i| self.entries[i].amount)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryAmount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> i64 {
        self.entries
            .iter()
            .fold(0_i64, |acc, e| acc.saturating_add(e.amount))
    }

    /// Categories by amount descending, ties kept in first-encountered order.
    pub fn ranked(&self, limit: usize) -> Vec<CategoryAmount> {
        let mut v = self.entries.clone();
        v.sort_by(|a, b| b.amount.cmp(&a.amount));
        v.truncate(limit);
        v
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: i64,
    pub expense: i64,
    pub profit: i64,
    pub income_categories: CategoryTotals,
    pub expense_categories: CategoryTotals,
    pub top_income_categories: Vec<CategoryAmount>,
    pub top_expense_categories: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    #[serde(rename = "in")]
    pub inflow: i64,
    #[serde(rename = "out")]
    pub outflow: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBar {
    pub date: NaiveDate,
    pub label: String,
    #[serde(rename = "in")]
    pub inflow: i64,
    #[serde(rename = "out")]
    pub outflow: i64,
    pub percent: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub income: i64,
    pub expense: i64,
    pub total: i64,
}

/// Transactions dated inside `period`. With no period every transaction is kept.
/// An invalid period, or a transaction whose date does not parse, yields nothing.
pub fn filter_period<'a>(
    transactions: &'a [Transaction],
    period: Option<&Period>,
) -> Vec<&'a Transaction> {
    let Some(period) = period else {
        return transactions.iter().collect();
    };
    let Ok(bounds) = period.bounds() else {
        return Vec::new();
    };
    transactions
        .iter()
        .filter(|t| t.date.at().is_some_and(|at| bounds.contains(at)))
        .collect()
}

/// Period filter followed by a type filter.
pub fn select<'a>(
    transactions: &'a [Transaction],
    period: Option<&Period>,
    filter: TypeFilter,
) -> Vec<&'a Transaction> {
    filter_period(transactions, period)
        .into_iter()
        .filter(|t| filter.matches(t.r#type))
        .collect()
}

pub fn totals_of<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for t in transactions {
        match t.r#type {
            TxType::Income => {
                totals.income = totals.income.saturating_add(t.amount);
                totals.income_categories.add(&t.category, t.amount);
            }
            TxType::Expense => {
                totals.expense = totals.expense.saturating_add(t.amount);
                totals.expense_categories.add(&t.category, t.amount);
            }
        }
    }
    totals.profit = totals.income.saturating_sub(totals.expense);
    totals.top_income_categories = totals.income_categories.ranked(TOP_CATEGORIES);
    totals.top_expense_categories = totals.expense_categories.ranked(TOP_CATEGORIES);
    totals
}

pub fn aggregate(transactions: &[Transaction], period: Option<&Period>) -> Totals {
    totals_of(filter_period(transactions, period))
}

/// One entry per calendar day of `period`, zero-filled. Empty for an invalid period.
pub fn day_buckets(transactions: &[Transaction], period: &Period) -> Vec<DayTotal> {
    let mut days: Vec<DayTotal> = period
        .days()
        .into_iter()
        .map(|date| DayTotal {
            date,
            inflow: 0,
            outflow: 0,
        })
        .collect();
    let slot: HashMap<NaiveDate, usize> = days
        .iter()
        .enumerate()
        .map(|(i, d)| (d.date, i))
        .collect();
    for t in transactions {
        let Some(i) = t.date.day().and_then(|d| slot.get(&d).copied()) else {
            continue;
        };
        let day = &mut days[i];
        match t.r#type {
            TxType::Income => day.inflow = day.inflow.saturating_add(t.amount),
            TxType::Expense => day.outflow = day.outflow.saturating_add(t.amount),
        }
    }
    days
}

/// Scale each day against the busiest day of the range (at least 1).
pub fn day_bars(days: &[DayTotal]) -> Vec<DayBar> {
    let max = days
        .iter()
        .map(|d| d.inflow.max(d.outflow))
        .fold(1_i64, i64::max);
    days.iter()
        .map(|d| {
            let val = d.inflow.max(d.outflow).max(0);
            let percent = ((val as f64 / max as f64) * 100.0).round() as u32;
            let height = if percent == 0 {
                MIN_BAR_HEIGHT
            } else {
                percent + BAR_HEIGHT_OFFSET
            };
            DayBar {
                date: d.date,
                label: format!("{:02}", d.date.day()),
                inflow: d.inflow,
                outflow: d.outflow,
                percent,
                height,
            }
        })
        .collect()
}

/// Union of income and expense categories, sorted by combined total descending.
pub fn combined_categories(totals: &Totals) -> Vec<CategoryRow> {
    let mut rows: Vec<CategoryRow> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let names = totals
        .income_categories
        .iter()
        .chain(totals.expense_categories.iter())
        .map(|c| c.category.as_str());
    for name in names {
        if !seen.insert(name) {
            continue;
        }
        let income = totals.income_categories.get(name);
        let expense = totals.expense_categories.get(name);
        rows.push(CategoryRow {
            category: name.to_string(),
            income,
            expense,
            total: income.saturating_add(expense),
        });
    }
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Newest first; undated records sink to the end.
pub fn sort_newest_first(transactions: &mut [&Transaction]) {
    transactions.sort_by(|a, b| b.date.at().cmp(&a.date.at()));
}

/// Aggregated view of one period: totals over every transaction in range,
/// the combined category table, day buckets, and the rows matching `filter`.
#[derive(Debug, Clone, Serialize)]
pub struct Recap {
    pub period: Period,
    pub label: String,
    pub valid: bool,
    pub totals: Totals,
    pub categories: Vec<CategoryRow>,
    pub days: Vec<DayTotal>,
    pub transactions: Vec<Transaction>,
}

pub fn recap(transactions: &[Transaction], period: &Period, filter: TypeFilter) -> Recap {
    let totals = aggregate(transactions, Some(period));
    let categories = combined_categories(&totals);
    let mut rows = select(transactions, Some(period), filter);
    sort_newest_first(&mut rows);
    Recap {
        period: *period,
        label: period.label(),
        valid: period.is_valid(),
        totals,
        categories,
        days: day_buckets(transactions, period),
        transactions: rows.into_iter().cloned().collect(),
    }
}
