use std::path::PathBuf;

use thiserror::Error;

use stockroom_inventory::StockLevels;

/// Persistence operation error.
///
/// These are **infrastructure errors** (filesystem, encoding) as opposed to
/// domain errors (validation, missing items). A missing file is not an error:
/// [`InventoryRepository::load`] reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a JSON object of item name → number.
    #[error("malformed inventory file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode inventory: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage boundary for a whole inventory snapshot.
///
/// Implementations store and return the complete mapping; there is no partial
/// update path.
pub trait InventoryRepository {
    /// Load the persisted mapping.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<StockLevels>, PersistenceError>;

    /// Replace the persisted mapping with `levels`.
    fn save(&self, levels: &StockLevels) -> Result<(), PersistenceError>;

    /// Human-readable location for diagnostics.
    fn location(&self) -> String;
}
