// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerly::bridge::BridgeConfig;
use ledgerly::commands::{Session, exporter};
use ledgerly::db::Store;
use ledgerly::models::{NewTransaction, TargetPolicy};
use ledgerly::{cli, service};
use rust_decimal::Decimal;
use tempfile::tempdir;

async fn seeded() -> (Session, service::StorageService) {
    let (bridge, storage) =
        service::start(Store::open_in_memory().unwrap(), BridgeConfig::default()).unwrap();
    for (date, description, amount) in [
        ("2024-01-02", "Corner, Shop", -1234),
        ("2024-02-10", "Pay", 250000),
        ("2023-12-31", "Old", -1),
    ] {
        bridge
            .insert_transaction(NewTransaction {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                description: description.into(),
                amount: Decimal::new(amount, 2),
                category: "Groceries".into(),
            })
            .await
            .unwrap();
    }
    (Session::new(bridge, TargetPolicy::default()), storage)
}

async fn export(s: &Session, args: &[&str]) {
    let mut argv = vec!["ledgerly", "export", "transactions"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("export command not parsed");
    };
    exporter::handle(s, export_m).await.unwrap();
}

#[tokio::test]
async fn export_csv_within_window() {
    let (s, storage) = seeded().await;
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();

    export(&s, &["--out", &out_str, "--from", "2024-01-01", "--to", "2024-12-31"]).await;

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["id", "date", "description", "amount", "category"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "2024-01-02");
    assert_eq!(&records[0][2], "Corner, Shop");
    assert_eq!(&records[0][3], "-12.34");
    assert_eq!(&records[1][3], "2500.00");

    drop(s);
    storage.shutdown().unwrap();
}

#[tokio::test]
async fn export_json_all_rows() {
    let (s, storage) = seeded().await;
    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    let out_str = out.to_string_lossy().to_string();

    export(&s, &["--format", "json", "--out", &out_str]).await;

    let text = std::fs::read_to_string(&out).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 3);
    // Rows come back in date order.
    assert_eq!(items[0]["description"], "Old");
    assert_eq!(items[2]["amount"], "2500.00");

    drop(s);
    storage.shutdown().unwrap();
}
