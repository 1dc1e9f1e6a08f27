// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .required(required)
        .value_parser(["income", "expense"])
        .help("income | expense")
}

fn ids_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(i64))
        .help("One or more row ids")
}

fn window_args() -> [Arg; 3] {
    [
        Arg::new("period")
            .long("period")
            .conflicts_with_all(["from", "to"])
            .help("7d | 30d | 90d | 180d | 365d | all"),
        Arg::new("from")
            .long("from")
            .help("Start date YYYY-MM-DD (inclusive)"),
        Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("ledgerly")
        .about("Track income and expenses against categories and budget targets")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .global(true)
                .value_parser(value_parser!(u64))
                .default_value("30")
                .help("Seconds to wait for the storage service; 0 waits forever"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("category")
                .about("Manage income/expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(kind_arg(true))
                        .arg(
                            Arg::new("target")
                                .long("target")
                                .default_value("0")
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("colour").long("colour")),
                )
                .subcommand(Command::new("list").arg(kind_arg(false)).arg(json_flag()))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("target")
                                .long("target")
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("colour").long("colour")),
                )
                .subcommand(Command::new("rm").arg(ids_arg())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and edit transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true)
                                .help("Positive for income, negative for expense"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(kind_arg(false))
                        .args(window_args())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(Command::new("rm").arg(ids_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views over a time window")
                .subcommand(
                    Command::new("summary")
                        .about("Income, expenses and savings")
                        .args(window_args())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("by-category")
                        .about("Totals per category")
                        .args(window_args())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("targets")
                        .about("Actual vs budget target per category")
                        .args(window_args())
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .args(window_args()),
            ),
        )
        .subcommand(
            Command::new("settings").subcommand(
                Command::new("target-policy")
                    .about("Show or set how category target signs are checked")
                    .arg(
                        Arg::new("value")
                            .value_parser(["signed-by-type", "strict", "unrestricted"])
                            .required(false),
                    ),
            ),
        )
}
