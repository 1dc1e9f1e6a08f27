// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod transactions;
pub mod reports;
pub mod exporter;
pub mod settings;

use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::bridge::Bridge;
use crate::models::TargetPolicy;
use crate::utils::parse_date;
use crate::window::{TimeWindow, WindowPreset};

/// What every command handler needs: the bridge to the store, the configured
/// target policy, and the date presets are resolved against.
#[derive(Debug, Clone)]
pub struct Session {
    pub bridge: Bridge,
    pub policy: TargetPolicy,
    pub today: NaiveDate,
}

impl Session {
    pub fn new(bridge: Bridge, policy: TargetPolicy) -> Self {
        Self {
            bridge,
            policy,
            today: Local::now().date_naive(),
        }
    }
}

pub async fn dispatch(session: &Session, matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("category", sub)) => categories::handle(session, sub).await,
        Some(("tx", sub)) => transactions::handle(session, sub).await,
        Some(("report", sub)) => reports::handle(session, sub).await,
        Some(("export", sub)) => exporter::handle(session, sub).await,
        _ => {
            crate::cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Window selected by `--period` or `--from/--to`; `None` when neither is given.
pub fn window_arg(sub: &clap::ArgMatches, today: NaiveDate) -> Result<Option<TimeWindow>> {
    if let Some(p) = sub.get_one::<String>("period") {
        return Ok(Some(p.parse::<WindowPreset>()?.resolve(today)));
    }
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    let all = TimeWindow::all_time(today);
    let start = from.unwrap_or(all.start);
    // An open end runs to today, or to `--from` when that lies in the future.
    let end = to.unwrap_or(start.max(today));
    let window = TimeWindow::custom(start, end)?;
    Ok(Some(window))
}

/// Like [`window_arg`], falling back to all time up to today.
pub fn window_or_all(sub: &clap::ArgMatches, today: NaiveDate) -> Result<TimeWindow> {
    Ok(window_arg(sub, today)?.unwrap_or_else(|| TimeWindow::all_time(today)))
}
