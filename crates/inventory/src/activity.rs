//! Caller-owned record of stock additions.

use chrono::{DateTime, Utc};
use stockroom_core::{ItemName, Quantity};

/// One successful add.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub recorded_at: DateTime<Utc>,
    pub item: ItemName,
    pub quantity: Quantity,
}

impl core::fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: Added {} of {}",
            self.recorded_at.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.quantity,
            self.item
        )
    }
}

/// Ordered log of add operations.
///
/// The store never owns one: callers pass `Some(&mut log)` into
/// [`InventoryStore::add`](crate::InventoryStore::add) when they want a trail.
/// It is not persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: ItemName, quantity: Quantity, recorded_at: DateTime<Utc>) {
        self.entries.push(ActivityEntry {
            recorded_at,
            item,
            quantity,
        });
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered `"<timestamp>: Added <qty> of <item>"` lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(ToString::to_string)
    }
}
