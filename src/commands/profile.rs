// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{confirm, warn_if_unsaved};
use crate::db::BlobStore;
use crate::store::Ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub business_name: String,
    pub business_type: String,
    pub currency: String,
    pub transactions: usize,
}

pub fn handle<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let name = sub.get_one::<String>("name").cloned();
            let kind = sub.get_one::<String>("type").cloned();
            if name.is_none() && kind.is_none() {
                println!("Nothing to change; pass --name and/or --type");
                return Ok(());
            }
            let saved = ledger.save_profile(name, kind);
            warn_if_unsaved(&saved);
            println!("Profile saved: {}", saved.value.business_name);
        }
        Some(("clear-transactions", sub)) => {
            if !confirm(
                sub,
                "Delete every transaction? This cannot be undone.",
            )? {
                println!("Cancelled");
                return Ok(());
            }
            let saved = ledger.clear_transactions();
            warn_if_unsaved(&saved);
            println!("Deleted {} transactions", saved.value);
        }
        Some(("show", sub)) => show(ledger, sub.get_flag("json"), sub.get_flag("jsonl"))?,
        _ => show(ledger, false, false)?,
    }
    Ok(())
}

pub fn profile_view<S: BlobStore>(ledger: &Ledger<S>) -> ProfileView {
    let prefs = ledger.preferences();
    ProfileView {
        business_name: prefs.business_name.clone(),
        business_type: prefs.business_type_or_default().to_string(),
        currency: prefs.currency.clone(),
        transactions: ledger.transactions().len(),
    }
}

fn show<S: BlobStore>(ledger: &Ledger<S>, json: bool, jsonl: bool) -> Result<()> {
    let view = profile_view(ledger);
    if !maybe_print_json(json, jsonl, &view)? {
        let rows = vec![
            vec!["Business".into(), view.business_name.clone()],
            vec!["Type".into(), view.business_type.clone()],
            vec!["Currency".into(), view.currency.clone()],
            vec!["Transactions".into(), view.transactions.to_string()],
        ];
        println!("{}", pretty_table(&["Profile", ""], rows));
    }
    Ok(())
}

/// Wipe everything: transactions, preferences and the active period.
pub fn handle_reset<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    if !confirm(
        m,
        "Delete all data? Every transaction and setting will be removed. This cannot be undone.",
    )? {
        println!("Cancelled");
        return Ok(());
    }
    ledger.reset()?;
    println!("All data deleted");
    Ok(())
}
