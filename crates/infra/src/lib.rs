//! Infrastructure layer: persistence of stock levels.

pub mod persistence;

pub use persistence::{
    DEFAULT_INVENTORY_FILE, InMemoryRepository, InventoryRepository, JsonFileRepository,
    PersistenceError, load_into, save_from,
};
