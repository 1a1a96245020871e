// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod periods;
pub mod reports;
pub mod exporter;
pub mod backup;
pub mod profile;

use crate::db::BlobStore;
use crate::models::TypeFilter;
use crate::period::Period;
use crate::store::{Ledger, Persisted};
use crate::utils::parse_date;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// `--from`/`--to`, each falling back to the matching end of the active period.
pub fn period_from_args<S: BlobStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<Period> {
    let active = ledger.active_period();
    let from = match m.get_one::<String>("from") {
        Some(s) => parse_date(s)?,
        None => active.from,
    };
    let to = match m.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => active.to,
    };
    Ok(Period::new(from, to))
}

pub fn type_filter_from_args(m: &clap::ArgMatches) -> Result<TypeFilter> {
    let raw = m.get_one::<String>("type").map(|s| s.as_str()).unwrap_or("all");
    Ok(raw.parse()?)
}

pub fn warn_if_unsaved<T>(p: &Persisted<T>) {
    if let Some(e) = &p.storage_error {
        eprintln!("warning: {} (changes kept for this session only)", e);
    }
}

/// Stored records that failed to parse stay in the store but are left out
/// of every listing, report and backup.
pub fn warn_if_unreadable<S: BlobStore>(ledger: &Ledger<S>) {
    let n = ledger.unreadable_records().len();
    if n > 0 {
        eprintln!(
            "warning: {} stored transaction(s) could not be read; kept in the store but left out of reports and backups",
            n
        );
    }
}

/// y/N prompt on stdin; `--yes` answers for the user.
pub fn confirm(m: &clap::ArgMatches, question: &str) -> Result<bool> {
    if m.get_flag("yes") {
        return Ok(true);
    }
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
