//! SQLite storage for wallet state
//!
//! One table per entity, each owned by a small store type that borrows the
//! shared [`Database`] connection. [`WalletStore`] ties them together against a
//! single database file.

pub mod accounts;
pub mod asset_cache;
pub mod assets;
pub mod database;
pub mod history;
pub mod labels;
pub mod payments;
pub mod remotes;
pub mod schema;
pub mod store;
pub mod wallet_store;

#[cfg(test)]
mod tests;

pub use accounts::*;
pub use asset_cache::*;
pub use assets::*;
pub use database::{Database, FromRow};
pub use history::*;
pub use labels::*;
pub use payments::*;
pub use remotes::*;
pub use schema::{Column, TableSchema, ValueKind};
pub use store::*;
pub use wallet_store::*;
