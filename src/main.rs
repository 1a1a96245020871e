// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use labaku::{cli, commands, db, store::Ledger, utils};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let db_arg = matches.get_one::<String>("db").map(|s| s.as_str());

    let store = db::open_or_init(db_arg)?;
    let mut ledger = Ledger::load(store, utils::today());
    commands::warn_if_unreadable(&ledger);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Ledger store at {}", db::db_path(db_arg)?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("period", sub)) => commands::periods::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("backup", sub)) => commands::backup::handle_backup(&ledger, sub)?,
        Some(("restore", sub)) => commands::backup::handle_restore(&mut ledger, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&mut ledger, sub)?,
        Some(("reset", sub)) => commands::profile::handle_reset(&mut ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
