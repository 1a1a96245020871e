// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    aggregate, combined_categories, day_bars, day_buckets, recap, select, totals_of,
    CategoryAmount, CategoryRow,
};
use crate::commands::transactions::{TransactionRow, ROW_HEADERS};
use crate::commands::{period_from_args, type_filter_from_args, warn_if_unsaved};
use crate::db::BlobStore;
use crate::store::Ledger;
use crate::utils::{fmt_idr, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

const BAR_GLYPH: char = '\u{2588}';
/// Text bar width for the tallest day.
const BAR_COLUMNS: u32 = 40;

pub fn handle<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, sub)?,
        Some(("daily", sub)) => daily(ledger, sub)?,
        Some(("categories", sub)) => categories(ledger, sub)?,
        Some(("top", sub)) => top(ledger, sub)?,
        Some(("recap", sub)) => recap_cmd(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_flags(sub: &clap::ArgMatches) -> (bool, bool) {
    (sub.get_flag("json"), sub.get_flag("jsonl"))
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub from: String,
    pub to: String,
    pub income: i64,
    pub expense: i64,
    pub profit: i64,
}

fn summary_rows(s: &Summary) -> Vec<Vec<String>> {
    vec![
        vec!["Income".into(), fmt_idr(s.income)],
        vec!["Expense".into(), fmt_idr(s.expense)],
        vec!["Profit".into(), fmt_idr(s.profit)],
    ]
}

fn summary<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let period = period_from_args(ledger, sub)?;
    let totals = aggregate(ledger.transactions(), Some(&period));
    let data = Summary {
        from: period.from.to_string(),
        to: period.to.to_string(),
        income: totals.income,
        expense: totals.expense,
        profit: totals.profit,
    };
    if !maybe_print_json(json, jsonl, &data)? {
        println!("Period {}", period.label());
        println!("{}", pretty_table(&["", "Amount"], summary_rows(&data)));
    }
    Ok(())
}

fn daily<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let period = period_from_args(ledger, sub)?;
    if !period.is_valid() {
        println!("Invalid period");
        return Ok(());
    }
    let bars = day_bars(&day_buckets(ledger.transactions(), &period));
    if !maybe_print_json(json, jsonl, &bars)? {
        let rows = bars
            .iter()
            .map(|b| {
                let width = (b.percent * BAR_COLUMNS).div_ceil(100).max(1);
                vec![
                    b.label.clone(),
                    b.date.to_string(),
                    fmt_idr(b.inflow),
                    fmt_idr(b.outflow),
                    std::iter::repeat_n(BAR_GLYPH, width as usize).collect(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Day", "Date", "In", "Out", ""], rows)
        );
        let total_in = bars.iter().fold(0_i64, |acc, b| acc.saturating_add(b.inflow));
        let total_out = bars.iter().fold(0_i64, |acc, b| acc.saturating_add(b.outflow));
        println!("Income {}  Expense {}", fmt_idr(total_in), fmt_idr(total_out));
    }
    Ok(())
}

fn category_cells(rows: &[CategoryRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| vec![r.category.clone(), fmt_idr(r.income), fmt_idr(r.expense)])
        .collect()
}

fn categories<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let period = period_from_args(ledger, sub)?;
    let rows = combined_categories(&aggregate(ledger.transactions(), Some(&period)));
    if !maybe_print_json(json, jsonl, &rows)? {
        if rows.is_empty() {
            println!("No categories yet");
        } else {
            println!(
                "{}",
                pretty_table(&["Category", "Income", "Expense"], category_cells(&rows))
            );
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TopCategories {
    pub income: Vec<CategoryAmount>,
    pub expense: Vec<CategoryAmount>,
}

fn print_top(title: &str, items: &[CategoryAmount], empty: &str) {
    println!("{}", title);
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    let rows = items
        .iter()
        .map(|c| vec![c.category.clone(), fmt_idr(c.amount)])
        .collect();
    println!("{}", pretty_table(&["Category", "Amount"], rows));
}

fn top<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let period = period_from_args(ledger, sub)?;
    let filter = type_filter_from_args(sub)?;
    let totals = totals_of(select(ledger.transactions(), Some(&period), filter));
    let data = TopCategories {
        income: totals.top_income_categories,
        expense: totals.top_expense_categories,
    };
    if !maybe_print_json(json, jsonl, &data)? {
        print_top("Income (top)", &data.income, "No income");
        print_top("Expense (top)", &data.expense, "No expenses");
    }
    Ok(())
}

/// Recap of a period. Viewing a recap makes its period the active one.
fn recap_cmd<S: BlobStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (json, jsonl) = json_flags(sub);
    let period = period_from_args(ledger, sub)?;
    let filter = type_filter_from_args(sub)?;
    let saved = ledger.set_active_period(period);
    warn_if_unsaved(&saved);

    let view = recap(ledger.transactions(), &period, filter);
    if maybe_print_json(json, jsonl, &view)? {
        return Ok(());
    }
    println!("Recap {}", view.label);
    let s = Summary {
        from: period.from.to_string(),
        to: period.to.to_string(),
        income: view.totals.income,
        expense: view.totals.expense,
        profit: view.totals.profit,
    };
    println!("{}", pretty_table(&["", "Amount"], summary_rows(&s)));
    if view.categories.is_empty() {
        println!("No categories yet");
    } else {
        println!(
            "{}",
            pretty_table(&["Category", "Income", "Expense"], category_cells(&view.categories))
        );
    }
    if view.transactions.is_empty() {
        println!("No transactions in this period");
    } else {
        let rows = view
            .transactions
            .iter()
            .map(|t| {
                let r = TransactionRow::from(t);
                vec![r.date, r.category, r.account, r.display_amount, r.note]
            })
            .collect();
        println!("{}", pretty_table(&ROW_HEADERS, rows));
    }
    Ok(())
}
