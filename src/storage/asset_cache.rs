//! In-process asset lookup cache
//!
//! The cache is a point-in-time copy of the `assets` table. It is filled only
//! by [`AssetCache::refresh`] and is never touched by writes to the table, so
//! it is eventually consistent: after `Assets::add` or `Assets::update` the new
//! data shows up here on the next refresh.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::errors::WalletStoreResult;
use crate::storage::assets::Assets;

#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    symbols_to_ids: HashMap<String, String>,
    ids_to_symbols: HashMap<String, String>,
    snapshots: HashMap<String, Value>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached contents with a full scan of the table.
    ///
    /// Returns the number of cached assets.
    pub fn refresh(&mut self, assets: &Assets<'_>) -> WalletStoreResult<usize> {
        let rows = assets.get_assets()?;
        self.symbols_to_ids.clear();
        self.ids_to_symbols.clear();
        self.snapshots.clear();
        for asset in rows {
            self.symbols_to_ids.insert(asset.symbol.clone(), asset.asset_id.clone());
            self.ids_to_symbols.insert(asset.asset_id.clone(), asset.symbol);
            self.snapshots.insert(asset.asset_id, asset.snapshot);
        }
        debug!(assets = self.snapshots.len(), "asset cache refreshed");
        Ok(self.snapshots.len())
    }

    /// Cached snapshot by symbol (case-insensitive)
    pub fn get_by_symbol(&self, symbol: &str) -> Option<&Value> {
        self.symbols_to_ids
            .get(&symbol.to_uppercase())
            .and_then(|id| self.snapshots.get(id))
    }

    /// Cached snapshot by chain asset id
    pub fn get_by_id(&self, asset_id: &str) -> Option<&Value> {
        self.snapshots.get(asset_id)
    }

    pub fn id_for_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbols_to_ids.get(&symbol.to_uppercase()).map(String::as_str)
    }

    pub fn symbol_for_id(&self, asset_id: &str) -> Option<&str> {
        self.ids_to_symbols.get(asset_id).map(String::as_str)
    }

    pub fn symbols_to_ids(&self) -> &HashMap<String, String> {
        &self.symbols_to_ids
    }

    pub fn ids_to_symbols(&self) -> &HashMap<String, String> {
        &self.ids_to_symbols
    }

    /// Snapshots keyed by asset id
    pub fn snapshots(&self) -> &HashMap<String, Value> {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
