// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, value_parser, Arg, ArgAction, Command};

fn from_to(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("Period start (defaults to the active period)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Period end, inclusive (defaults to the active period)"),
    )
}

fn type_filter(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .value_parser(["all", "in", "out"])
            .default_value("all")
            .help("Restrict to income (in) or expense (out)"),
    )
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn yes_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Skip the confirmation prompt"),
    )
}

fn out_arg(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("out")
            .long("out")
            .short('o')
            .value_name("PATH")
            .help("Output file (defaults to a dated file name in the current directory)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("labaku")
        .version(crate_version!())
        .about("Small-business income/expense ledger with period recaps")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Ledger store file (overrides LABAKU_DB)"),
        )
        .subcommand(Command::new("init").about("Create the ledger store and show its location"))
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an income or expense")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["in", "out"]),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today"),
                        )
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(type_filter(from_to(
                    Command::new("list")
                        .about("Transactions in a period, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))))
                .subcommand(json_flags(
                    Command::new("recent").about("The five newest transactions in the active period"),
                )),
        )
        .subcommand(
            Command::new("period")
                .about("Show or change the active reporting period")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("from").long("from").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").required(true).value_name("YYYY-MM-DD")),
                )
                .subcommand(Command::new("reset").about("Back to the current month")),
        )
        .subcommand(
            Command::new("report")
                .about("Period reports")
                .subcommand(json_flags(from_to(
                    Command::new("summary").about("Income, expense and profit"),
                )))
                .subcommand(json_flags(from_to(
                    Command::new("daily").about("Per-day totals with a bar chart"),
                )))
                .subcommand(json_flags(from_to(
                    Command::new("categories").about("Income and expense per category"),
                )))
                .subcommand(json_flags(type_filter(from_to(
                    Command::new("top").about("Top five income and expense categories"),
                ))))
                .subcommand(json_flags(type_filter(from_to(
                    Command::new("recap").about("Totals, categories and transactions; remembers the period"),
                )))),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions")
                .subcommand(out_arg(type_filter(from_to(
                    Command::new("csv").about("Spreadsheet-friendly CSV").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .conflicts_with_all(["from", "to"])
                            .help("Ignore the period and export every transaction"),
                    ),
                ))))
                .subcommand(out_arg(type_filter(from_to(
                    Command::new("print").about("Printable HTML recap"),
                )))),
        )
        .subcommand(out_arg(Command::new("backup").about("Write a JSON backup of all data")))
        .subcommand(yes_flag(
            Command::new("restore")
                .about("Replace all data with a JSON backup")
                .arg(Arg::new("path").required(true)),
        ))
        .subcommand(
            Command::new("profile")
                .about("Business profile")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type")),
                )
                .subcommand(yes_flag(
                    Command::new("clear-transactions").about("Delete every transaction"),
                )),
        )
        .subcommand(yes_flag(Command::new("reset").about("Delete all data and settings")))
}
