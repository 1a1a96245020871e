// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{select, totals_of, CategoryAmount};
use crate::commands::{period_from_args, type_filter_from_args};
use crate::db::BlobStore;
use crate::models::{Transaction, TypeFilter};
use crate::period::Period;
use crate::store::Ledger;
use crate::utils::{
    fmt_amount, fmt_date_short, fmt_export_timestamp, fmt_idr, html_escape, today,
};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use csv::{QuoteStyle, Terminator, WriterBuilder};

const BOM: &str = "\u{feff}";

const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Tanggal",
    "Tipe Transaksi",
    "Kategori",
    "Akun",
    "Nominal (Rp)",
    "Catatan",
    "Waktu Export",
];

pub fn handle<S: BlobStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("csv", sub)) => export_csv(ledger, sub),
        Some(("print", sub)) => export_print(ledger, sub),
        _ => Ok(()),
    }
}

pub fn csv_file_name(on: NaiveDate) -> String {
    format!("labaku-export-{}.csv", on.format("%Y-%m-%d"))
}

pub fn print_file_name(period: Option<&Period>) -> String {
    match period {
        Some(p) => format!("labaku-recap-{}-{}.html", p.from, p.to),
        None => "labaku-recap.html".to_string(),
    }
}

fn export_csv<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let period = if sub.get_flag("all") {
        None
    } else {
        Some(period_from_args(ledger, sub)?)
    };
    let filter = type_filter_from_args(sub)?;
    let out = sub
        .get_one::<String>("out")
        .cloned()
        .unwrap_or_else(|| csv_file_name(today()));

    let doc = render_csv(
        ledger.transactions(),
        period.as_ref(),
        filter,
        Local::now().naive_local(),
    )
    .context("Failed to export CSV")?;
    std::fs::write(&out, doc).with_context(|| format!("Failed to write {}", out))?;
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_print<S: BlobStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_from_args(ledger, sub)?;
    let filter = type_filter_from_args(sub)?;
    let out = sub
        .get_one::<String>("out")
        .cloned()
        .unwrap_or_else(|| print_file_name(Some(&period)));

    let doc = render_print(ledger.transactions(), Some(&period), filter);
    std::fs::write(&out, doc).with_context(|| format!("Failed to write {}", out))?;
    println!("Recap written to {}", out);
    Ok(())
}

fn write_rows(buf: Vec<u8>, rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(buf);
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV: {}", e.error()))
}

fn csv_row(t: &Transaction, exported_at: &str) -> Vec<String> {
    vec![
        t.id.to_string(),
        t.date
            .day()
            .map(fmt_date_short)
            .unwrap_or_else(|| t.date.raw().to_string()),
        t.r#type.label().to_string(),
        t.category.clone(),
        t.account_or_dash().to_string(),
        fmt_amount(t.amount),
        t.note_or_dash().to_string(),
        exported_at.to_string(),
    ]
}

fn summary_row(label: &str, amount: i64) -> Vec<String> {
    let mut row = vec![label.to_string()];
    row.extend(std::iter::repeat_n(String::new(), 4));
    row.push(fmt_amount(amount));
    row
}

/// CSV document with a byte-order mark, every cell quoted, one row per
/// transaction, a blank line, then the income/expense/profit summary.
/// Summary sums saturate at the `i64` bounds, as [`totals_of`] does.
pub fn render_csv(
    transactions: &[Transaction],
    period: Option<&Period>,
    filter: TypeFilter,
    exported_at: NaiveDateTime,
) -> Result<String> {
    let picked = select(transactions, period, filter);
    let stamp = fmt_export_timestamp(exported_at);

    let mut body: Vec<Vec<String>> = vec![CSV_HEADERS.iter().map(|h| h.to_string()).collect()];
    body.extend(picked.iter().map(|t| csv_row(t, &stamp)));

    let totals = totals_of(picked.iter().copied());
    let summary = vec![
        vec!["Ringkasan".to_string()],
        summary_row("Total Pemasukan", totals.income),
        summary_row("Total Pengeluaran", totals.expense),
        summary_row("Laba Bersih", totals.profit),
    ];

    let mut buf = BOM.as_bytes().to_vec();
    buf = write_rows(buf, &body)?;
    buf.push(b'\n');
    buf = write_rows(buf, &summary)?;
    // No terminator after the last row.
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(String::from_utf8(buf)?)
}

fn top_table(html: &mut String, title: &str, items: &[CategoryAmount], empty: &str) {
    html.push_str(&format!("<h3>{}</h3>", title));
    html.push_str(
        "<table><thead><tr><th>Kategori</th><th style=\"width:160px\">Nominal</th></tr></thead><tbody>",
    );
    if items.is_empty() {
        html.push_str(&format!("<tr><td colspan=\"2\">{}</td></tr>", empty));
    }
    for c in items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            html_escape(&c.category),
            fmt_idr(c.amount)
        ));
    }
    html.push_str("</tbody></table>");
}

/// Printable HTML recap: totals plus top income and expense categories.
pub fn render_print(
    transactions: &[Transaction],
    period: Option<&Period>,
    filter: TypeFilter,
) -> String {
    let totals = totals_of(select(transactions, period, filter));
    let (from, to) = period
        .map(|p| (p.from.to_string(), p.to.to_string()))
        .unwrap_or_default();

    let mut html = String::new();
    html.push_str(&format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Rekap {} - {}</title>",
        from, to
    ));
    html.push_str("<style>body{font-family:Arial,Helvetica,sans-serif;padding:20px}h2{margin-top:0}table{width:100%;border-collapse:collapse;margin-bottom:16px}th,td{border:1px solid #ddd;padding:8px;text-align:left}th{background:#f6f6f6}</style>");
    html.push_str("</head><body>");
    html.push_str(&format!("<h2>Rekap {} \u{2013} {}</h2>", from, to));
    html.push_str(&format!(
        "<p><strong>Total Pemasukan:</strong> {}</p>",
        fmt_idr(totals.income)
    ));
    html.push_str(&format!(
        "<p><strong>Total Pengeluaran:</strong> {}</p>",
        fmt_idr(totals.expense)
    ));
    html.push_str(&format!(
        "<p><strong>Laba Bersih:</strong> {}</p>",
        fmt_idr(totals.profit)
    ));
    top_table(
        &mut html,
        "Pemasukan (Top)",
        &totals.top_income_categories,
        "Tidak ada pemasukan",
    );
    top_table(
        &mut html,
        "Pengeluaran (Top)",
        &totals.top_expense_categories,
        "Tidak ada pengeluaran",
    );
    html.push_str("</body></html>");
    html
}
