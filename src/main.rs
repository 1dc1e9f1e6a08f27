// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgerly::commands::{self, Session};
use ledgerly::config::{self, Config};
use ledgerly::{cli, db::Store, service, utils};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_matches(&matches)?;
    config::init_logging(config.log_level);

    let store = Store::open(&config.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
            return Ok(store.close()?);
        }
        Some(("settings", sub)) => {
            commands::settings::handle(store.conn(), sub)?;
            return Ok(store.close()?);
        }
        _ => {}
    }

    let policy = utils::get_target_policy(store.conn())?;
    let rt = tokio::runtime::Runtime::new()?;
    let (bridge, storage) = {
        let _guard = rt.enter();
        service::start(store, config.bridge)?
    };

    let session = Session::new(bridge, policy);
    let outcome = rt.block_on(commands::dispatch(&session, &matches));
    // The service loop ends once the last bridge handle is gone.
    drop(session);
    storage.finish(outcome)
}
