// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerly::bridge::{self, BridgeConfig};
use ledgerly::db::Store;
use ledgerly::error::BridgeError;
use ledgerly::models::{CategoryKind, NewTransaction};
use ledgerly::query::{Query, Rows, TransactionFilter};
use ledgerly::service;
use rust_decimal::Decimal;
use std::time::Duration;

fn list_of(kind: CategoryKind) -> Query {
    Query::ListCategories { kind: Some(kind) }
}

#[tokio::test]
async fn replies_follow_their_token_when_answered_in_reverse() {
    let (bridge, mut endpoint) = bridge::channel(BridgeConfig::default());

    let b1 = bridge.clone();
    let first = tokio::spawn(async move { b1.send(list_of(CategoryKind::Income)).await });
    let req1 = endpoint.recv().await.unwrap();

    let b2 = bridge.clone();
    let second = tokio::spawn(async move { b2.send(list_of(CategoryKind::Expense)).await });
    let req2 = endpoint.recv().await.unwrap();

    assert_ne!(req1.token, req2.token);
    assert_eq!(req1.query, list_of(CategoryKind::Income));
    assert_eq!(bridge.in_flight(), 2);

    // Answer the second request first.
    endpoint.reply(req2.token, Ok(Rows::Affected(2))).unwrap();
    endpoint.reply(req1.token, Ok(Rows::Affected(1))).unwrap();

    assert_eq!(first.await.unwrap().unwrap(), Rows::Affected(1));
    assert_eq!(second.await.unwrap().unwrap(), Rows::Affected(2));
    assert_eq!(bridge.in_flight(), 0);
}

#[tokio::test]
async fn second_reply_for_same_token_is_dropped() {
    let (bridge, mut endpoint) = bridge::channel(BridgeConfig::default());
    let b = bridge.clone();
    let pending = tokio::spawn(async move { b.send(list_of(CategoryKind::Income)).await });
    let req = endpoint.recv().await.unwrap();

    endpoint.reply(req.token, Ok(Rows::Affected(1))).unwrap();
    endpoint.reply(req.token, Ok(Rows::Affected(99))).unwrap();

    assert_eq!(pending.await.unwrap().unwrap(), Rows::Affected(1));

    // The bridge still works afterwards.
    let b = bridge.clone();
    let next = tokio::spawn(async move { b.send(list_of(CategoryKind::Expense)).await });
    let req = endpoint.recv().await.unwrap();
    endpoint.reply(req.token, Ok(Rows::Affected(3))).unwrap();
    assert_eq!(next.await.unwrap().unwrap(), Rows::Affected(3));
}

#[tokio::test]
async fn unanswered_request_times_out_and_is_forgotten() {
    let config = BridgeConfig {
        reply_timeout: Some(Duration::from_millis(50)),
    };
    let (bridge, mut endpoint) = bridge::channel(config);

    let b = bridge.clone();
    let pending = tokio::spawn(async move { b.send(list_of(CategoryKind::Income)).await });
    let req = endpoint.recv().await.unwrap();

    let err = pending.await.unwrap().unwrap_err();
    match err {
        BridgeError::Timeout { token, after } => {
            assert_eq!(token, req.token);
            assert_eq!(after, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(bridge.in_flight(), 0);

    // A late reply is harmless.
    endpoint.reply(req.token, Ok(Rows::Affected(1))).unwrap();
}

#[tokio::test]
async fn send_fails_fast_when_executor_is_gone() {
    let (bridge, endpoint) = bridge::channel(BridgeConfig::default());
    drop(endpoint);
    let err = bridge.send(list_of(CategoryKind::Income)).await.unwrap_err();
    assert!(matches!(err, BridgeError::Disconnected));
    assert_eq!(bridge.in_flight(), 0);
}

#[tokio::test]
async fn waiters_are_released_when_executor_stops_mid_request() {
    let (bridge, mut endpoint) = bridge::channel(BridgeConfig {
        reply_timeout: None,
    });
    let b = bridge.clone();
    let pending = tokio::spawn(async move { b.send(list_of(CategoryKind::Income)).await });
    let _req = endpoint.recv().await.unwrap();
    drop(endpoint);

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, BridgeError::Disconnected));
}

#[tokio::test]
async fn store_failure_is_reported_not_swallowed() {
    let store = Store::open_in_memory().unwrap();
    store
        .conn()
        .execute_batch("DROP TABLE Transactions")
        .unwrap();
    let (bridge, storage) = service::start(store, BridgeConfig::default()).unwrap();

    let err = bridge
        .list_transactions(TransactionFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Store(_)));

    // Other requests keep working.
    assert!(bridge.list_categories(None).await.unwrap().is_empty());

    drop(bridge);
    storage.shutdown().unwrap();
}

#[tokio::test]
async fn many_concurrent_requests_each_get_their_own_reply() {
    let (bridge, storage) =
        service::start(Store::open_in_memory().unwrap(), BridgeConfig::default()).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let mut handles = Vec::new();
    for i in 1..=20i64 {
        let b = bridge.clone();
        handles.push(tokio::spawn(async move {
            let row = NewTransaction {
                date,
                description: format!("row {i}"),
                amount: Decimal::from(i),
                category: "Misc".into(),
            };
            b.insert_transaction(row).await
        }));
    }
    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap().unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let all = bridge.list_transactions(TransactionFilter::all()).await.unwrap();
    assert_eq!(all.len(), 20);

    drop(bridge);
    storage.shutdown().unwrap();
}

#[tokio::test]
async fn posted_mutation_is_applied_without_a_waiter() {
    let (bridge, storage) =
        service::start(Store::open_in_memory().unwrap(), BridgeConfig::default()).unwrap();
    let row = NewTransaction {
        date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
        description: String::new(),
        amount: Decimal::from(-12),
        category: "Food".into(),
    };
    bridge.post(Query::InsertTransaction(row)).unwrap();
    assert_eq!(bridge.in_flight(), 0);

    // Requests are executed in arrival order, so this read sees the insert.
    let all = bridge.list_transactions(TransactionFilter::all()).await.unwrap();
    assert_eq!(all.len(), 1);

    drop(bridge);
    storage.shutdown().unwrap();
}

#[tokio::test]
async fn typed_helper_rejects_mismatched_rows() {
    let (bridge, mut endpoint) = bridge::channel(BridgeConfig::default());
    let b = bridge.clone();
    let pending = tokio::spawn(async move { b.list_categories(None).await });
    let req = endpoint.recv().await.unwrap();
    endpoint.reply(req.token, Ok(Rows::Affected(0))).unwrap();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        BridgeError::UnexpectedRows {
            expected: "categories",
            ..
        }
    ));
}
