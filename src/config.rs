// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

use crate::bridge::BridgeConfig;
use crate::db;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub bridge: BridgeConfig,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) => PathBuf::from(p),
            None => db::db_path()?,
        };
        let reply_timeout = match m.get_one::<u64>("timeout-secs").copied().unwrap_or(30) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let log_level = match m.get_count("verbose") {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        Ok(Self {
            db_path,
            bridge: BridgeConfig { reply_timeout },
            log_level,
        })
    }
}

/// `RUST_LOG` wins over the `-v` level when set.
pub fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    // A second init (tests) is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}
