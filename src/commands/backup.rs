// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{confirm, warn_if_unsaved};
use crate::db::BlobStore;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Preferences, StoreData, Transaction};
use crate::store::{ingest, Ledger, Persisted};
use crate::utils::today;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub transactions: Vec<Transaction>,
    pub preferences: Preferences,
    pub version: String,
    pub timestamp: String,
}

/// What a restore would install.
#[derive(Debug, Clone, PartialEq)]
pub struct RestorePlan {
    pub transactions: Vec<Transaction>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug)]
pub enum RestoreOutcome {
    Restored(Persisted<usize>),
    Cancelled,
}

pub fn handle_backup<S: BlobStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let out = m
        .get_one::<String>("out")
        .cloned()
        .unwrap_or_else(|| backup_file_name(today()));
    let doc = backup_document(ledger.data(), Utc::now());
    let text = serde_json::to_string_pretty(&doc).context("Failed to create backup")?;
    std::fs::write(&out, text).with_context(|| format!("Failed to write {}", out))?;
    println!(
        "Backed up {} transactions to {}",
        doc.transactions.len(),
        out
    );
    Ok(())
}

pub fn handle_restore<S: BlobStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let outcome = restore(ledger, &text, |_| {
        confirm(m, "This replaces all existing data. Continue?").unwrap_or(false)
    })?;
    match outcome {
        RestoreOutcome::Restored(saved) => {
            warn_if_unsaved(&saved);
            println!("Restored {} transactions from {}", saved.value, path);
        }
        RestoreOutcome::Cancelled => println!("Restore cancelled; nothing changed"),
    }
    Ok(())
}

pub fn backup_file_name(on: NaiveDate) -> String {
    format!("labaku-backup-{}.json", on.format("%Y-%m-%d"))
}

pub fn backup_document(data: &StoreData, now: DateTime<Utc>) -> BackupDocument {
    BackupDocument {
        transactions: data.transactions.clone(),
        preferences: data.preferences.clone(),
        version: BACKUP_VERSION.to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Validate an uploaded backup. Nothing is applied here.
pub fn parse_backup(text: &str) -> LedgerResult<RestorePlan> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| LedgerError::InvalidBackupFormat(e.to_string()))?;
    let Some(Value::Array(items)) = doc.get("transactions") else {
        return Err(LedgerError::InvalidBackupFormat(
            "missing transactions list".into(),
        ));
    };

    let mut transactions = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let t = ingest(item.clone()).map_err(|e| match e {
            LedgerError::InvalidTransactionType(_) => e,
            other => LedgerError::InvalidBackupFormat(format!("transaction #{}: {}", i, other)),
        })?;
        transactions.push(t);
    }

    let preferences = match doc.get("preferences") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            serde_json::from_value(v.clone())
                .map_err(|e| LedgerError::InvalidBackupFormat(format!("preferences: {}", e)))?,
        ),
    };

    Ok(RestorePlan {
        transactions,
        preferences,
    })
}

/// Replace the ledger's transactions (and preferences, when the backup has
/// them) once `confirm` agrees. An invalid document leaves the ledger untouched.
pub fn restore<S, F>(ledger: &mut Ledger<S>, text: &str, confirm: F) -> LedgerResult<RestoreOutcome>
where
    S: BlobStore,
    F: FnOnce(&RestorePlan) -> bool,
{
    let plan = parse_backup(text)?;
    if !confirm(&plan) {
        return Ok(RestoreOutcome::Cancelled);
    }
    let RestorePlan {
        transactions,
        preferences,
    } = plan;
    Ok(RestoreOutcome::Restored(
        ledger.replace(transactions, preferences),
    ))
}
