// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use std::thread::{self, JoinHandle};

use crate::bridge::{self, Bridge, BridgeConfig, Endpoint, Request};
use crate::db::Store;

/// Executes bridge requests against a [`Store`], one at a time, on its own thread.
pub struct StorageService {
    thread: JoinHandle<Store>,
}

impl StorageService {
    pub fn spawn(store: Store, mut endpoint: Endpoint) -> Result<Self> {
        let thread = thread::Builder::new()
            .name("ledgerly-store".into())
            .spawn(move || {
                info!("storage service started");
                while let Some(Request { token, query }) = endpoint.blocking_recv() {
                    let outcome = store.execute(&query);
                    if let Err(e) = &outcome {
                        warn!("{} failed for {}: {}", query.label(), token, e);
                    }
                    if endpoint.reply(token, outcome).is_err() {
                        warn!("reply router is gone, stopping");
                        break;
                    }
                }
                info!("storage service stopped");
                store
            })
            .context("Failed to start storage thread")?;
        Ok(Self { thread })
    }

    /// Waits for the loop to end (every [`Bridge`] dropped) and hands the store back.
    pub fn join(self) -> Result<Store> {
        self.thread
            .join()
            .map_err(|_| anyhow!("storage service panicked"))
    }

    /// Joins the loop and closes the store.
    pub fn shutdown(self) -> Result<()> {
        self.join()?.close()?;
        Ok(())
    }

    /// Shuts down after a command ran. The command's own error wins over a
    /// failed shutdown, which is then only logged.
    pub fn finish(self, outcome: Result<()>) -> Result<()> {
        let closed = self.shutdown();
        match (outcome, closed) {
            (Err(e), Err(close_err)) => {
                error!("closing the store failed: {:#}", close_err);
                Err(e)
            }
            (outcome, closed) => outcome.and(closed),
        }
    }
}

/// Wires a store to a fresh bridge. Must be called inside a tokio runtime.
pub fn start(store: Store, config: BridgeConfig) -> Result<(Bridge, StorageService)> {
    let (bridge, endpoint) = bridge::channel(config);
    let service = StorageService::spawn(store, endpoint)?;
    Ok((bridge, service))
}
