// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use labaku::commands::backup::{
    backup_document, backup_file_name, parse_backup, restore, RestoreOutcome, BACKUP_VERSION,
};
use labaku::db::SqliteStore;
use labaku::error::LedgerError;
use labaku::models::TxType;
use labaku::store::{Ledger, NewTransaction};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn seeded() -> Ledger<SqliteStore> {
    let mut ledger = Ledger::load(SqliteStore::in_memory().unwrap(), today());
    for (date, t, cat, amount, note) in [
        ("2024-03-05", TxType::Income, "Sales", 100_000, Some("cash")),
        ("2024-03-05", TxType::Expense, "Rent", 40_000, None),
    ] {
        let _ = ledger
            .add_transaction(NewTransaction {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                r#type: t,
                category: cat.into(),
                amount,
                account: None,
                note: note.map(String::from),
            })
            .unwrap();
    }
    let _ = ledger.save_profile(Some("Warung Sari".into()), Some("Kuliner".into()));
    ledger
}

#[test]
fn backup_document_shape() {
    let ledger = seeded();
    let now = Utc.with_ymd_and_hms(2024, 3, 20, 8, 30, 0).unwrap();
    let doc = backup_document(ledger.data(), now);
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["version"], BACKUP_VERSION);
    assert_eq!(v["timestamp"], "2024-03-20T08:30:00.000Z");
    assert_eq!(v["preferences"]["businessName"], "Warung Sari");
    assert_eq!(v["transactions"][0]["type"], "IN");
    assert_eq!(v["transactions"][0]["date"], "2024-03-05");
    assert_eq!(v["transactions"][1]["amount"], 40_000);
    assert!(v.get("activePeriod").is_none());
}

#[test]
fn restore_of_backup_round_trips() {
    let source = seeded();
    let text = serde_json::to_string_pretty(&backup_document(source.data(), Utc::now())).unwrap();

    let mut target = Ledger::load(SqliteStore::in_memory().unwrap(), today());
    let outcome = restore(&mut target, &text, |plan| plan.transactions.len() == 2).unwrap();
    match outcome {
        RestoreOutcome::Restored(saved) => {
            assert!(saved.is_saved());
            assert_eq!(saved.value, 2);
        }
        RestoreOutcome::Cancelled => panic!("restore was cancelled"),
    }
    assert_eq!(target.transactions(), source.transactions());
    assert_eq!(target.preferences(), source.preferences());

    let reloaded = Ledger::load(target.into_store(), today());
    assert_eq!(reloaded.transactions(), source.transactions());
}

#[test]
fn restore_without_transactions_is_rejected() {
    let mut ledger = seeded();
    let before = ledger.data().clone();
    let err = restore(&mut ledger, "{}", |_| true).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBackupFormat(_)));
    assert_eq!(ledger.data(), &before);

    let err = restore(&mut ledger, r#"{"transactions":{"id":1}}"#, |_| true).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBackupFormat(_)));
    let err = restore(&mut ledger, "not json", |_| true).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBackupFormat(_)));
    assert_eq!(ledger.data(), &before);
}

#[test]
fn restore_rejects_unknown_types_all_or_nothing() {
    let mut ledger = seeded();
    let before = ledger.data().clone();
    let text = r#"{"transactions":[
        {"id":1,"date":"2024-03-01","type":"IN","category":"Sales","amount":5},
        {"id":2,"date":"2024-03-01","type":"LOAN","category":"Bank","amount":9}
    ]}"#;
    let err = restore(&mut ledger, text, |_| true).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransactionType(ref t) if t == "LOAN"));
    assert_eq!(ledger.data(), &before);
}

#[test]
fn restore_accepts_only_stored_type_spellings() {
    let mut ledger = seeded();
    let before = ledger.data().clone();
    let text = r#"{"transactions":[
        {"id":1,"date":"2024-03-01","type":"income","category":"Sales","amount":5}
    ]}"#;
    let err = restore(&mut ledger, text, |_| true).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransactionType(ref t) if t == "income"));
    assert_eq!(ledger.data(), &before);
    assert_eq!("income".parse::<TxType>().unwrap(), TxType::Income);
}

#[test]
fn declined_restore_changes_nothing() {
    let mut ledger = seeded();
    let before = ledger.data().clone();
    let text = r#"{"transactions":[]}"#;
    let outcome = restore(&mut ledger, text, |_| false).unwrap();
    assert!(matches!(outcome, RestoreOutcome::Cancelled));
    assert_eq!(ledger.data(), &before);
}

#[test]
fn restore_without_preferences_keeps_current_ones() {
    let mut ledger = seeded();
    let text = r#"{"transactions":[
        {"id":9,"date":"2024-02-01T10:00:00.000Z","type":"OUT","category":"Gas","amount":15000,"account":"Kas"}
    ]}"#;
    let plan = parse_backup(text).unwrap();
    assert!(plan.preferences.is_none());
    let _ = restore(&mut ledger, text, |_| true).unwrap();
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.transactions()[0].date.raw(), "2024-02-01T10:00:00.000Z");
    assert_eq!(ledger.preferences().business_name, "Warung Sari");
}

#[test]
fn default_backup_name_is_dated() {
    assert_eq!(
        backup_file_name(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
        "labaku-backup-2024-03-05.json"
    );
}
