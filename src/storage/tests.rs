//! Tests for the aggregate wallet store
//!
//! These exercise several stores through one `WalletStore`, checking that they
//! share the connection and that the tables are created on open.

use serde_json::json;

use super::*;
use crate::errors::WalletStoreError;

#[test]
fn test_open_in_memory_creates_every_table() {
    let store = WalletStore::open_in_memory().unwrap();
    assert!(store.accounts().exists_table().unwrap());
    assert!(store.labels().exists_table().unwrap());
    assert!(store.assets().exists_table().unwrap());
    assert!(store.history().exists_table().unwrap());
    assert!(store.remotes().exists_table().unwrap());
    assert!(store.payments().exists_table().unwrap());
}

#[test]
fn test_create_table_on_existing_table_fails() {
    let store = WalletStore::open_in_memory().unwrap();
    let err = store.accounts().create_table().unwrap_err();
    assert!(matches!(err, WalletStoreError::Database(_)));
    assert!(!store.accounts().ensure_table().unwrap());
}

#[test]
fn test_stores_share_one_connection() {
    let store = WalletStore::open_in_memory().unwrap();
    store.accounts().add("alice", Some("1.2.17"), DEFAULT_KEY_COUNT).unwrap();
    store
        .history()
        .add(&NewHistoryEntry::new("alice", "1.11.5").with_description("Opened"))
        .unwrap();
    store
        .remotes()
        .add(RemoteType::NODE, "Local", "ws://127.0.0.1:8090", "websocket")
        .unwrap();

    // a second view over the same connection sees the writes
    assert!(store.accounts().get_by_name("alice").unwrap().is_some());
    assert_eq!(
        store.history().get_last_operation("alice").unwrap().as_deref(),
        Some("1.11.5")
    );
    assert_eq!(store.remotes().get_remotes(RemoteType::NODE).unwrap().len(), 1);
}

#[test]
fn test_asset_cache_refresh_through_store() {
    let mut store = WalletStore::open_in_memory().unwrap();
    store
        .assets()
        .add("1.3.0", "bts", &json!({"symbol": "BTS", "issuer": "1.2.3"}))
        .unwrap();
    assert!(store.asset_cache().is_empty());

    assert_eq!(store.refresh_asset_cache().unwrap(), 1);
    assert_eq!(store.asset_cache().id_for_symbol("BTS"), Some("1.3.0"));

    store
        .assets()
        .add("1.3.1", "cny", &json!({"symbol": "CNY", "issuer": "1.2.0"}))
        .unwrap();
    assert!(store.asset_cache().id_for_symbol("CNY").is_none());
    store.refresh_asset_cache().unwrap();
    assert_eq!(store.asset_cache().id_for_symbol("CNY"), Some("1.3.1"));
}

#[test]
fn test_wipe_by_table_name() {
    let store = WalletStore::open_in_memory().unwrap();
    store.accounts().add("alice", None, DEFAULT_KEY_COUNT).unwrap();
    store.labels().add("main", None).unwrap();

    let table: StoreTable = "accounts".parse().unwrap();
    store.wipe(table).unwrap();
    assert_eq!(store.accounts().count_entries().unwrap(), 0);
    assert_eq!(store.labels().count_entries().unwrap(), 1);

    let err = "keys".parse::<StoreTable>().unwrap_err();
    assert!(matches!(err, WalletStoreError::InvalidKey { .. }));
}

#[test]
fn test_account_update_keeps_views_independent() {
    let store = WalletStore::open_in_memory().unwrap();
    let accounts = store.accounts();
    accounts.add("alice", Some("1.2.17"), DEFAULT_KEY_COUNT).unwrap();

    // balances written on their own do not alter the snapshot
    accounts
        .update(
            "alice",
            AccountField::GrapheneJson,
            json!({"name": "alice", "options": {"memo_key": "BTS1"}}),
        )
        .unwrap();
    accounts
        .update("alice", AccountField::BalancesJson, json!({"1.3.0": 10}))
        .unwrap();

    let stored = accounts
        .get_stored(AccountKey::Account, "alice")
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.graphene_json,
        Some(json!({"name": "alice", "options": {"memo_key": "BTS1"}}))
    );
    assert_eq!(stored.balances_json, Some(json!({"1.3.0": 10})));
}
