// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Request/response correlation between callers and the storage executor.
//!
//! A [`Bridge`] tags every [`Query`] with a fresh [`ReplyToken`] and waits for
//! the one [`Response`] carrying the same token. Any number of requests may be
//! in flight; replies are routed by token and may arrive in any order.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::{BridgeError, StoreError};
use crate::models::{Category, CategoryKind, NewCategory, NewTransaction, Transaction};
use crate::query::{Query, Rows, TransactionFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyToken(Uuid);

impl ReplyToken {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReplyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug)]
pub struct Request {
    pub token: ReplyToken,
    pub query: Query,
}

#[derive(Debug)]
pub struct Response {
    pub token: ReplyToken,
    pub outcome: Result<Rows, StoreError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// `None` waits forever.
    pub reply_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            reply_timeout: Some(Duration::from_secs(30)),
        }
    }
}

type Waiter = oneshot::Sender<Result<Rows, StoreError>>;
type Pending = Arc<Mutex<HashMap<ReplyToken, Waiter>>>;

/// Caller side of the channel. Cheap to clone; all clones share one
/// pending-reply table.
#[derive(Debug, Clone)]
pub struct Bridge {
    requests: mpsc::UnboundedSender<Request>,
    pending: Pending,
    config: BridgeConfig,
}

/// Executor side of the channel.
#[derive(Debug)]
pub struct Endpoint {
    requests: mpsc::UnboundedReceiver<Request>,
    responses: mpsc::UnboundedSender<Response>,
}

/// Builds a connected bridge/endpoint pair and starts the reply router.
///
/// Must be called from within a tokio runtime.
pub fn channel(config: BridgeConfig) -> (Bridge, Endpoint) {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();
    let pending: Pending = Arc::default();

    tokio::spawn(route_replies(resp_rx, Arc::clone(&pending)));

    (
        Bridge {
            requests: req_tx,
            pending,
            config,
        },
        Endpoint {
            requests: req_rx,
            responses: resp_tx,
        },
    )
}

async fn route_replies(mut responses: mpsc::UnboundedReceiver<Response>, pending: Pending) {
    while let Some(Response { token, outcome }) = responses.recv().await {
        let waiter = lock(&pending).remove(&token);
        match waiter {
            Some(tx) => {
                debug!("<- {} ({})", token, describe(&outcome));
                // The caller may have stopped waiting; nothing to do then.
                let _ = tx.send(outcome);
            }
            None => match outcome {
                Err(e) => warn!("dropping failed reply for unknown request {}: {}", token, e),
                Ok(_) => debug!("dropping reply for unknown request {}", token),
            },
        }
    }
    // Executor is gone: release every waiter so callers see Disconnected.
    let stranded = lock(&pending).drain().count();
    if stranded > 0 {
        warn!("storage service stopped with {} request(s) unanswered", stranded);
    }
}

fn describe(outcome: &Result<Rows, StoreError>) -> &'static str {
    match outcome {
        Ok(rows) => rows.label(),
        Err(_) => "error",
    }
}

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<ReplyToken, Waiter>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Bridge {
    /// Number of requests still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Sends `query` and waits for the reply tagged with its token.
    pub async fn send(&self, query: Query) -> Result<Rows, BridgeError> {
        let token = ReplyToken::fresh();
        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(token, tx);

        debug!("-> {} {}", token, query.label());
        if self.requests.send(Request { token, query }).is_err() {
            lock(&self.pending).remove(&token);
            return Err(BridgeError::Disconnected);
        }

        let reply = match self.config.reply_timeout {
            Some(after) => match tokio::time::timeout(after, rx).await {
                Ok(reply) => reply,
                Err(_) => {
                    lock(&self.pending).remove(&token);
                    warn!("request {} timed out after {:?}", token, after);
                    return Err(BridgeError::Timeout { token, after });
                }
            },
            None => rx.await,
        };
        let outcome = reply.map_err(|_| BridgeError::Disconnected)?;
        Ok(outcome?)
    }

    /// Sends `query` without waiting. The reply, when it comes, is discarded.
    pub fn post(&self, query: Query) -> Result<ReplyToken, BridgeError> {
        let token = ReplyToken::fresh();
        debug!("-> {} {} (no reply wanted)", token, query.label());
        self.requests
            .send(Request { token, query })
            .map_err(|_| BridgeError::Disconnected)?;
        Ok(token)
    }

    pub async fn list_categories(
        &self,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<Category>, BridgeError> {
        match self.send(Query::ListCategories { kind }).await? {
            Rows::Categories(c) => Ok(c),
            other => Err(unexpected("categories", &other)),
        }
    }

    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, BridgeError> {
        match self.send(Query::ListTransactions(filter)).await? {
            Rows::Transactions(t) => Ok(t),
            other => Err(unexpected("transactions", &other)),
        }
    }

    pub async fn insert_category(&self, category: NewCategory) -> Result<i64, BridgeError> {
        inserted(self.send(Query::InsertCategory(category)).await?)
    }

    pub async fn insert_transaction(&self, row: NewTransaction) -> Result<i64, BridgeError> {
        inserted(self.send(Query::InsertTransaction(row)).await?)
    }

    pub async fn update_category(
        &self,
        id: i64,
        name: String,
        target: rust_decimal::Decimal,
        colour: Option<String>,
    ) -> Result<usize, BridgeError> {
        affected(
            self.send(Query::UpdateCategory {
                id,
                name,
                target,
                colour,
            })
            .await?,
        )
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        row: NewTransaction,
    ) -> Result<usize, BridgeError> {
        affected(self.send(Query::UpdateTransaction { id, row }).await?)
    }

    pub async fn delete_categories(&self, ids: Vec<i64>) -> Result<usize, BridgeError> {
        affected(self.send(Query::DeleteCategories(ids)).await?)
    }

    pub async fn delete_transactions(&self, ids: Vec<i64>) -> Result<usize, BridgeError> {
        affected(self.send(Query::DeleteTransactions(ids)).await?)
    }
}

fn inserted(rows: Rows) -> Result<i64, BridgeError> {
    match rows {
        Rows::Inserted { id } => Ok(id),
        other => Err(unexpected("inserted id", &other)),
    }
}

fn affected(rows: Rows) -> Result<usize, BridgeError> {
    match rows {
        Rows::Affected(n) => Ok(n),
        other => Err(unexpected("affected count", &other)),
    }
}

fn unexpected(expected: &'static str, got: &Rows) -> BridgeError {
    BridgeError::UnexpectedRows {
        expected,
        got: got.label(),
    }
}

impl Endpoint {
    pub async fn recv(&mut self) -> Option<Request> {
        self.requests.recv().await
    }

    /// Blocking receive for executors running on a plain OS thread.
    pub fn blocking_recv(&mut self) -> Option<Request> {
        self.requests.blocking_recv()
    }

    pub fn reply(
        &self,
        token: ReplyToken,
        outcome: Result<Rows, StoreError>,
    ) -> Result<(), BridgeError> {
        self.responses
            .send(Response { token, outcome })
            .map_err(|_| BridgeError::Disconnected)
    }
}
