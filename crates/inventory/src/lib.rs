//! Inventory domain module.
//!
//! This crate holds the in-memory stock levels and the operations on them.
//! Persistence lives in `stockroom-infra`; nothing here touches the
//! filesystem.

pub mod activity;
pub mod store;

pub use activity::{ActivityEntry, ActivityLog};
pub use store::{DEFAULT_LOW_STOCK_THRESHOLD, InventoryStore, StockChange, StockLevels};
