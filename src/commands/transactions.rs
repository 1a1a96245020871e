// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{select, sort_newest_first};
use crate::commands::{period_from_args, type_filter_from_args, warn_if_unsaved};
use crate::db::BlobStore;
use crate::models::{Transaction, TxType, TypeFilter};
use crate::store::{Ledger, NewTransaction};
use crate::utils::{fmt_date_short, fmt_idr, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use serde::Serialize;

const RECENT_LIMIT: usize = 5;

pub fn handle<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("recent", sub)) => recent(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: BlobStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let r#type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = *sub.get_one::<i64>("amount").unwrap();
    let category = sub.get_one::<String>("category").unwrap().to_string();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => ledger.today(),
    };
    let account = sub.get_one::<String>("account").map(|s| s.to_string());
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let saved = ledger.add_transaction(NewTransaction {
        date,
        r#type,
        category,
        amount,
        account,
        note,
    })?;
    warn_if_unsaved(&saved);
    let tx = &saved.value;
    println!(
        "Recorded #{} {} {} on {} ({})",
        tx.id,
        tx.r#type.label(),
        fmt_idr(tx.amount),
        tx.date.raw(),
        tx.category
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: TxType,
    pub category: String,
    pub account: String,
    pub amount: i64,
    pub display_amount: String,
    pub note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id,
            date: t
                .date
                .day()
                .map(fmt_date_short)
                .unwrap_or_else(|| t.date.raw().to_string()),
            r#type: t.r#type,
            category: t.category.clone(),
            account: t.account_or_dash().to_string(),
            amount: t.amount,
            display_amount: format!("{} {}", t.r#type.sign(), fmt_idr(t.amount)),
            note: t.note_or_dash().to_string(),
        }
    }
}

impl TransactionRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.category.clone(),
            self.account.clone(),
            self.display_amount.clone(),
            self.note.clone(),
        ]
    }
}

pub const ROW_HEADERS: [&str; 5] = ["Date", "Category", "Account", "Amount", "Note"];

/// Transactions in the requested period and type, newest first.
pub fn query_rows<S: BlobStore>(
    ledger: &Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let period = period_from_args(ledger, sub)?;
    let filter = type_filter_from_args(sub)?;
    let mut picked = select(ledger.transactions(), Some(&period), filter);
    sort_newest_first(&mut picked);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        picked.truncate(*limit);
    }
    Ok(picked.into_iter().map(TransactionRow::from).collect())
}

/// The newest few transactions of the active period.
pub fn recent_rows<S: BlobStore>(ledger: &Ledger<S>) -> Vec<TransactionRow> {
    let period = ledger.active_period();
    let mut picked = select(ledger.transactions(), Some(&period), TypeFilter::All);
    sort_newest_first(&mut picked);
    picked
        .into_iter()
        .take(RECENT_LIMIT)
        .map(TransactionRow::from)
        .collect()
}

fn print_rows(rows: &[TransactionRow], json: bool, jsonl: bool, empty: &str) -> Result<()> {
    if maybe_print_json(json, jsonl, &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("{}", empty);
        return Ok(());
    }
    let cells = rows.iter().map(TransactionRow::cells).collect();
    println!("{}", pretty_table(&ROW_HEADERS, cells));
    Ok(())
}

fn list<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let rows = query_rows(ledger, sub)?;
    print_rows(
        &rows,
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        "No transactions in this period",
    )
}

fn recent<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let rows = recent_rows(ledger);
    print_rows(
        &rows,
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        "No transactions yet. Add your first one with `labaku tx add`.",
    )
}
