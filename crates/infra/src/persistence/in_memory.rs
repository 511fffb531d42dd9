use std::sync::{PoisonError, RwLock};

use stockroom_inventory::StockLevels;

use super::r#trait::{InventoryRepository, PersistenceError};

/// In-memory repository for tests/dev.
///
/// Holds the last saved snapshot; `load` returns `None` until the first save.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    inner: RwLock<Option<StockLevels>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-persisted snapshot.
    pub fn with_levels(levels: StockLevels) -> Self {
        Self {
            inner: RwLock::new(Some(levels)),
        }
    }

    pub fn saved(&self) -> Option<StockLevels> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl InventoryRepository for InMemoryRepository {
    fn load(&self) -> Result<Option<StockLevels>, PersistenceError> {
        Ok(self.saved())
    }

    fn save(&self, levels: &StockLevels) -> Result<(), PersistenceError> {
        // A panic elsewhere while holding the lock cannot leave a half-written
        // snapshot, so a poisoned lock is still safe to overwrite.
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(levels.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use stockroom_core::{ItemName, Quantity};

    fn snapshot(name: &str, qty: i64) -> StockLevels {
        [(ItemName::parse(name).unwrap(), Quantity::Whole(qty))]
            .into_iter()
            .collect()
    }

    #[test]
    fn load_is_none_until_first_save() {
        let repo = InMemoryRepository::new();
        assert!(repo.load().unwrap().is_none());

        repo.save(&snapshot("pen", 10)).unwrap();
        assert_eq!(repo.load().unwrap(), Some(snapshot("pen", 10)));
    }

    #[test]
    fn save_after_poisoned_lock_still_stores_snapshot() {
        let repo = Arc::new(InMemoryRepository::with_levels(snapshot("old", 1)));

        let holder = Arc::clone(&repo);
        let joined = std::thread::spawn(move || {
            let _guard = holder.inner.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(repo.inner.is_poisoned());

        repo.save(&snapshot("new", 2)).unwrap();
        assert_eq!(repo.saved(), Some(snapshot("new", 2)));
        assert_eq!(repo.load().unwrap(), Some(snapshot("new", 2)));
    }
}
