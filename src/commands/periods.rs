// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::warn_if_unsaved;
use crate::db::BlobStore;
use crate::period::Period;
use crate::store::Ledger;
use anyhow::Result;

pub fn handle<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let period = Period::parse(
                sub.get_one::<String>("from").unwrap(),
                sub.get_one::<String>("to").unwrap(),
            )?;
            let saved = ledger.set_active_period(period);
            warn_if_unsaved(&saved);
            if !period.is_valid() {
                eprintln!("warning: period end is before its start; reports will be empty");
            }
            show(ledger);
        }
        Some(("reset", _)) => {
            let saved = ledger.reset_active_period();
            warn_if_unsaved(&saved);
            show(ledger);
        }
        _ => show(ledger),
    }
    Ok(())
}

fn show<S: BlobStore>(ledger: &Ledger<S>) {
    let p = ledger.active_period();
    println!("Active period: {} .. {} ({})", p.from, p.to, p.label());
}
