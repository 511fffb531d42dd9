//! Inventory persistence boundary.
//!
//! The repository trait stores whole snapshots; [`load_into`] and
//! [`save_from`] move them in and out of an [`InventoryStore`] and produce the
//! operational log lines.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryRepository;
pub use json_file::{DEFAULT_INVENTORY_FILE, JsonFileRepository};
pub use r#trait::{InventoryRepository, PersistenceError};

use stockroom_inventory::InventoryStore;

/// Replace the store's contents with the persisted snapshot.
///
/// When nothing is persisted yet the store is emptied and a warning is logged.
/// On error the store is left untouched.
pub fn load_into<R>(repo: &R, store: &mut InventoryStore) -> Result<(), PersistenceError>
where
    R: InventoryRepository + ?Sized,
{
    let location = repo.location();
    match repo.load()? {
        Some(levels) => {
            let items = levels.len();
            store.replace_all(levels);
            tracing::info!(%location, items, "Data loaded successfully from {location}.");
        }
        None => {
            store.clear();
            tracing::warn!(%location, "File '{location}' not found, starting with empty data.");
        }
    }
    Ok(())
}

/// Persist the store's full contents, replacing whatever was stored before.
pub fn save_from<R>(repo: &R, store: &InventoryStore) -> Result<(), PersistenceError>
where
    R: InventoryRepository + ?Sized,
{
    repo.save(store.levels())?;
    let location = repo.location();
    tracing::info!(%location, items = store.len(), "Data saved successfully to {location}.");
    Ok(())
}
