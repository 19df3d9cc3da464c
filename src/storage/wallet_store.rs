//! Aggregate wallet store
//!
//! `WalletStore` opens the single database connection, makes sure every
//! entity table exists (when opened in create mode) and hands out store views
//! borrowing that connection.

use tracing::{info, info_span, Span};

use crate::config::StoreConfig;
use crate::errors::WalletStoreResult;
use crate::storage::accounts::Accounts;
use crate::storage::asset_cache::AssetCache;
use crate::storage::assets::Assets;
use crate::storage::database::Database;
use crate::storage::history::History;
use crate::storage::labels::Labels;
use crate::storage::payments::Payments;
use crate::storage::remotes::Remotes;
use crate::storage::schema::column_enum;
use crate::storage::store::EntityStore;

column_enum! {
    /// Tables owned by the wallet store
    pub enum StoreTable: invalid_key {
        Accounts => "accounts",
        Labels => "labels",
        Assets => "assets",
        History => "history",
        Remotes => "remotes",
        Payments => "payments",
    }
}

pub struct WalletStore {
    db: Database,
    asset_cache: AssetCache,
}

impl WalletStore {
    /// Open the store described by `config`, logging under a `wallet_store` span
    pub fn open(config: &StoreConfig) -> WalletStoreResult<Self> {
        let span = info_span!("wallet_store", path = %config.path.display());
        Self::open_with_span(config, span)
    }

    /// Open the store, executing every statement inside the caller's span
    pub fn open_with_span(config: &StoreConfig, span: Span) -> WalletStoreResult<Self> {
        let db = Database::open(&config.path, config.create, span)?;
        Self::from_database(db, config.create)
    }

    /// Fresh in-memory store with all tables created (useful for testing)
    pub fn open_in_memory() -> WalletStoreResult<Self> {
        let db = Database::open_in_memory(info_span!("wallet_store", path = ":memory:"))?;
        Self::from_database(db, true)
    }

    fn from_database(db: Database, create: bool) -> WalletStoreResult<Self> {
        {
            let _guard = db.span().enter();
            info!(create, "initializing wallet storage");
        }
        if create {
            ensure_table(&db, Accounts::new(&db))?;
            ensure_table(&db, Labels::new(&db))?;
            ensure_table(&db, Assets::new(&db))?;
            ensure_table(&db, History::new(&db))?;
            ensure_table(&db, Remotes::new(&db))?;
            ensure_table(&db, Payments::new(&db))?;
        }
        Ok(Self {
            db,
            asset_cache: AssetCache::new(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.db)
    }

    pub fn labels(&self) -> Labels<'_> {
        Labels::new(&self.db)
    }

    pub fn assets(&self) -> Assets<'_> {
        Assets::new(&self.db)
    }

    pub fn history(&self) -> History<'_> {
        History::new(&self.db)
    }

    pub fn remotes(&self) -> Remotes<'_> {
        Remotes::new(&self.db)
    }

    /// External gateway payment records
    pub fn payments(&self) -> Payments<'_> {
        Payments::new(&self.db)
    }

    /// Asset cache as of the last [`WalletStore::refresh_asset_cache`]
    pub fn asset_cache(&self) -> &AssetCache {
        &self.asset_cache
    }

    pub fn refresh_asset_cache(&mut self) -> WalletStoreResult<usize> {
        let assets = Assets::new(&self.db);
        self.asset_cache.refresh(&assets)
    }

    /// Delete all rows of one table
    pub fn wipe(&self, table: StoreTable) -> WalletStoreResult<()> {
        match table {
            StoreTable::Accounts => self.accounts().wipe(),
            StoreTable::Labels => self.labels().wipe(),
            StoreTable::Assets => self.assets().wipe(),
            StoreTable::History => self.history().wipe(),
            StoreTable::Remotes => self.remotes().wipe(),
            StoreTable::Payments => self.payments().wipe(),
        }
    }
}

fn ensure_table<S: EntityStore>(db: &Database, store: S) -> WalletStoreResult<()> {
    if store.ensure_table()? {
        let _guard = db.span().enter();
        info!(table = S::SCHEMA.name, "created table");
    }
    Ok(())
}
