// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use labaku::commands::{periods, transactions};
use labaku::db::{BlobStore, SqliteStore, STORE_KEY};
use labaku::period::Period;
use labaku::store::Ledger;
use labaku::{cli, commands::reports};

fn setup() -> Ledger<SqliteStore> {
    let mut store = SqliteStore::in_memory().unwrap();
    store
        .set(
            STORE_KEY,
            r#"{"transactions":[
                {"id":1,"date":"2024-03-01","type":"IN","category":"Sales","amount":100},
                {"id":2,"date":"2024-03-02","type":"OUT","category":"Rent","amount":40,"account":"Bank"},
                {"id":3,"date":"2024-03-03","type":"IN","category":"Sales","amount":60,"note":"grosir"},
                {"id":4,"date":"2024-02-28","type":"OUT","category":"Stock","amount":10}
            ],
            "activePeriod":{"from":"2024-03-01","to":"2024-03-31"}}"#,
        )
        .unwrap();
    Ledger::load(store, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
}

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["labaku"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, group) = matches.subcommand().expect("no command");
    let (_, leaf) = group.subcommand().expect("no subcommand");
    leaf.clone()
}

#[test]
fn list_limit_respected() {
    let ledger = setup();
    let m = sub_matches(&["tx", "list", "--limit", "2"]);
    let rows = transactions::query_rows(&ledger, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 3);
    assert_eq!(rows[0].date, "3 Mar 2024");
    assert_eq!(rows[0].note, "grosir");
    assert_eq!(rows[1].account, "Bank");
}

#[test]
fn list_filters_by_type_and_period() {
    let ledger = setup();
    let m = sub_matches(&[
        "tx", "list", "--type", "out", "--from", "2024-02-01", "--to", "2024-03-31",
    ]);
    let rows = transactions::query_rows(&ledger, &m).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 4]);
    assert_eq!(rows[0].display_amount, "- Rp\u{a0}40");
}

#[test]
fn recent_follows_active_period() {
    let ledger = setup();
    let rows = transactions::recent_rows(&ledger);
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn add_command_records_transaction() {
    let mut ledger = setup();
    let matches = cli::build_cli().get_matches_from([
        "labaku", "tx", "add", "--type", "out", "--amount", "25000", "--category", "Listrik",
        "--date", "2024-03-10", "--note", "token",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&mut ledger, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
    let added = ledger.transactions().last().unwrap();
    assert_eq!(added.id, 5);
    assert_eq!(added.category, "Listrik");
    assert_eq!(added.note.as_deref(), Some("token"));
}

#[test]
fn add_command_rejects_future_dates() {
    let mut ledger = setup();
    let matches = cli::build_cli().get_matches_from([
        "labaku", "tx", "add", "--type", "in", "--amount", "5", "--category", "Sales", "--date",
        "2024-03-21",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    assert!(transactions::handle(&mut ledger, tx_m).is_err());
    assert_eq!(ledger.transactions().len(), 4);
}

#[test]
fn period_set_is_persisted() {
    let mut ledger = setup();
    let matches = cli::build_cli().get_matches_from([
        "labaku", "period", "set", "--from", "2024-02-01", "--to", "2024-02-29",
    ]);
    let (_, period_m) = matches.subcommand().unwrap();
    periods::handle(&mut ledger, period_m).unwrap();
    let reloaded = Ledger::load(ledger.into_store(), NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    assert_eq!(
        reloaded.active_period(),
        Period::parse("2024-02-01", "2024-02-29").unwrap()
    );
}

#[test]
fn recap_remembers_requested_period() {
    let mut ledger = setup();
    let matches = cli::build_cli().get_matches_from([
        "labaku", "report", "recap", "--from", "2024-02-01", "--to", "2024-02-29", "--json",
    ]);
    let (_, report_m) = matches.subcommand().unwrap();
    reports::handle(&mut ledger, report_m).unwrap();
    assert_eq!(ledger.active_period().from.to_string(), "2024-02-01");
}
