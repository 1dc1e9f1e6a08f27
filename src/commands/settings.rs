// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::TargetPolicy;
use crate::utils::{get_target_policy, set_target_policy};

/// Settings live next to the data but are read before the storage service
/// starts, so they go straight to the connection.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("target-policy", sub)) = m.subcommand() {
        match sub.get_one::<String>("value") {
            Some(v) => {
                let policy = v.parse::<TargetPolicy>()?;
                set_target_policy(conn, policy)?;
                println!("Target policy set to {}", policy);
            }
            None => println!("{}", get_target_policy(conn)?),
        }
    }
    Ok(())
}
