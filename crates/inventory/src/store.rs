use std::io::{self, Write};

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use stockroom_core::{DomainError, DomainResult, ItemName, Quantity};

use crate::activity::ActivityLog;

/// Item name → quantity, in insertion order.
pub type StockLevels = IndexMap<ItemName, Quantity>;

/// Threshold used by [`InventoryStore::low_items`] callers that have no
/// configured value.
pub const DEFAULT_LOW_STOCK_THRESHOLD: Quantity = Quantity::Whole(5);

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StockChange {
    /// Stock was added; `level` is the new quantity (may be zero or negative).
    Stocked { item: ItemName, level: Quantity },
    /// Stock was removed and some remains.
    Reduced { item: ItemName, remaining: Quantity },
    /// Stock was removed and the entry was deleted (quantity fell to `<= 0`).
    Depleted { item: ItemName },
}

/// In-memory inventory.
///
/// An owned value: callers construct one and pass it by `&mut` to each
/// operation, so independent inventories never share state.
///
/// Mutations report failures as `Err(DomainError)` and log them; they never
/// panic on bad input, so callers that only care about side effects may drop
/// the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStore {
    levels: StockLevels,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> &StockLevels {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Replace every entry (used by load: full replace, never merge).
    pub fn replace_all(&mut self, levels: StockLevels) {
        self.levels = levels;
    }

    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Add `quantity` of `item`, creating the entry at zero if absent.
    ///
    /// Negative deltas are accepted and the result is kept even when it is
    /// zero or negative. On success an entry is appended to `log`, if given.
    pub fn add(
        &mut self,
        item: &str,
        quantity: Quantity,
        log: Option<&mut ActivityLog>,
    ) -> DomainResult<StockChange> {
        match ItemName::parse(item).and_then(|name| Ok((name, quantity.ensure_numeric()?))) {
            Ok((name, quantity)) => Ok(self.stock(name, quantity, log)),
            Err(err) => rejected("add", err),
        }
    }

    /// [`add`](Self::add) for dynamically typed input.
    ///
    /// `item` must be a JSON string and `quantity` a JSON number.
    pub fn add_untyped(
        &mut self,
        item: &JsonValue,
        quantity: &JsonValue,
        log: Option<&mut ActivityLog>,
    ) -> DomainResult<StockChange> {
        match parse_untyped(item, quantity) {
            Ok((name, quantity)) => Ok(self.stock(name, quantity, log)),
            Err(err) => rejected("add", err),
        }
    }

    /// Remove `quantity` of `item`; delete the entry once it reaches `<= 0`.
    pub fn remove(&mut self, item: &str, quantity: Quantity) -> DomainResult<StockChange> {
        match ItemName::parse(item).and_then(|name| Ok((name, quantity.ensure_numeric()?))) {
            Ok((name, quantity)) => self.take(name, quantity),
            Err(err) => rejected("remove", err),
        }
    }

    /// [`remove`](Self::remove) for dynamically typed input.
    pub fn remove_untyped(
        &mut self,
        item: &JsonValue,
        quantity: &JsonValue,
    ) -> DomainResult<StockChange> {
        match parse_untyped(item, quantity) {
            Ok((name, quantity)) => self.take(name, quantity),
            Err(err) => rejected("remove", err),
        }
    }

    /// Current quantity of `item`, zero when absent.
    pub fn quantity(&self, item: &str) -> Quantity {
        self.levels.get(item).copied().unwrap_or(Quantity::ZERO)
    }

    /// Items whose quantity is strictly below `threshold`, in map order.
    pub fn low_items(&self, threshold: Quantity) -> Vec<&ItemName> {
        self.levels
            .iter()
            .filter(|(_, quantity)| **quantity < threshold)
            .map(|(item, _)| item)
            .collect()
    }

    /// Write one `"<item> -> <quantity>"` line per entry.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        tracing::info!(items = self.levels.len(), "Items Report:");
        for (item, quantity) in &self.levels {
            writeln!(out, "{item} -> {quantity}")?;
        }
        Ok(())
    }

    /// [`write_report`](Self::write_report) to standard output.
    pub fn print_report(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_report(&mut out)?;
        out.flush()
    }

    fn stock(
        &mut self,
        item: ItemName,
        quantity: Quantity,
        log: Option<&mut ActivityLog>,
    ) -> StockChange {
        let entry = self.levels.entry(item.clone()).or_insert(Quantity::ZERO);
        *entry = *entry + quantity;
        let level = *entry;

        if let Some(log) = log {
            log.record(item.clone(), quantity, Utc::now());
        }

        tracing::info!(%item, %quantity, %level, "Added {quantity} of {item} successfully.");
        StockChange::Stocked { item, level }
    }

    fn take(&mut self, item: ItemName, quantity: Quantity) -> DomainResult<StockChange> {
        let Some(entry) = self.levels.get_mut(item.as_str()) else {
            tracing::warn!(%item, "Item not found: {item}");
            return Err(DomainError::not_found(item.into_inner()));
        };
        *entry = *entry - quantity;
        let remaining = *entry;

        if remaining.is_positive() {
            tracing::info!(%item, %quantity, %remaining, "removed stock");
            return Ok(StockChange::Reduced { item, remaining });
        }

        self.levels.shift_remove(item.as_str());
        tracing::info!(%item, "Item '{item}' removed from inventory.");
        Ok(StockChange::Depleted { item })
    }
}

fn parse_untyped(item: &JsonValue, quantity: &JsonValue) -> DomainResult<(ItemName, Quantity)> {
    let name = ItemName::try_from(item)?;
    let quantity = Quantity::try_from(quantity)?.ensure_numeric()?;
    Ok((name, quantity))
}

fn rejected<T>(operation: &'static str, err: DomainError) -> DomainResult<T> {
    tracing::warn!(operation, error = %err, "input rejected");
    Err(err)
}
