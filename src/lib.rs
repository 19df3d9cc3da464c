//! SQLite persistence for graphene wallet clients
//!
//! This crate stores accounts, labels, assets, operation history, external
//! gateway payments and remote endpoints for an interactive wallet in a single
//! local SQLite database.

pub mod config;
pub mod data_dir;
pub mod errors;
pub mod storage;

pub use config::*;
pub use data_dir::*;
pub use errors::*;
pub use storage::*;
