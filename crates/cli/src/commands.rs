//! Command-line surface and dispatch.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use stockroom_core::{DomainResult, Quantity};
use stockroom_infra::{JsonFileRepository, PersistenceError, load_into, save_from};
use stockroom_inventory::{ActivityLog, InventoryStore, StockChange};

use crate::config::AppConfig;
use crate::demo;

#[derive(Debug, Parser)]
#[command(name = "stockroom")]
#[command(about = "Track item quantities in a JSON file", version)]
pub struct Cli {
    /// Inventory file (overrides STOCKROOM_FILE).
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Low-stock threshold (overrides STOCKROOM_LOW_STOCK_THRESHOLD).
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub threshold: Option<Quantity>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the demonstration sequence (default).
    Demo,
    /// Add stock to an item.
    Add {
        item: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Remove stock from an item.
    Remove {
        item: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Print the quantity of one item.
    Qty { item: String },
    /// Print items below the low-stock threshold.
    Low,
    /// Print every item and its quantity.
    Report,
    /// Apply a JSON array of add/remove operations.
    Apply { ops: PathBuf },
}

/// One entry of an `apply` batch.
///
/// `item` and `qty` are kept untyped so that bad entries are rejected by the
/// store's validation instead of failing the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOperation {
    pub op: BatchOp,
    #[serde(default)]
    pub item: JsonValue,
    #[serde(default, alias = "quantity")]
    pub qty: JsonValue,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOp {
    Add,
    Remove,
}

/// Execute `command` against the configured inventory file.
pub fn run<W: Write>(command: Command, config: &AppConfig, out: &mut W) -> anyhow::Result<()> {
    let repo = JsonFileRepository::new(&config.data_file);

    match command {
        Command::Demo => {
            demo::run(&repo, config.low_stock_threshold, out)?;
        }
        Command::Add { item, quantity } => {
            let mut store = open(&repo)?;
            let mut log = ActivityLog::new();
            let outcome = store.add_untyped(
                &JsonValue::String(item),
                &quantity_arg(&quantity),
                Some(&mut log),
            );
            persist_if_changed(&repo, &store, &outcome)?;
            for line in log.lines() {
                writeln!(out, "{line}")?;
            }
        }
        Command::Remove { item, quantity } => {
            let mut store = open(&repo)?;
            let outcome = store.remove_untyped(&JsonValue::String(item), &quantity_arg(&quantity));
            persist_if_changed(&repo, &store, &outcome)?;
            if let Ok(change) = outcome {
                writeln!(out, "{}", describe(&change))?;
            }
        }
        Command::Qty { item } => {
            let store = open(&repo)?;
            writeln!(out, "{item}: {}", store.quantity(&item))?;
        }
        Command::Low => {
            let store = open(&repo)?;
            let low = store.low_items(config.low_stock_threshold);
            writeln!(out, "Low items: {}", demo::format_names(low))?;
        }
        Command::Report => {
            let store = open(&repo)?;
            store.write_report(out)?;
        }
        Command::Apply { ops } => {
            let batch = read_batch(&ops)?;
            let mut store = open(&repo)?;
            let mut log = ActivityLog::new();
            let applied = apply_batch(&mut store, &batch, &mut log);
            if applied > 0 {
                save_from(&repo, &store)?;
            }
            for line in log.lines() {
                writeln!(out, "{line}")?;
            }
        }
    }

    Ok(())
}

/// Apply every operation in order; returns how many changed the store.
pub fn apply_batch(
    store: &mut InventoryStore,
    batch: &[BatchOperation],
    log: &mut ActivityLog,
) -> usize {
    let mut applied = 0;
    for operation in batch {
        let outcome = match operation.op {
            BatchOp::Add => store.add_untyped(&operation.item, &operation.qty, Some(&mut *log)),
            BatchOp::Remove => store.remove_untyped(&operation.item, &operation.qty),
        };
        if outcome.is_ok() {
            applied += 1;
        }
    }
    tracing::info!(applied, rejected = batch.len() - applied, "batch applied");
    applied
}

fn read_batch(path: &Path) -> anyhow::Result<Vec<BatchOperation>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read operations file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("operations file {} is not a JSON array of operations", path.display()))
}

fn open(repo: &JsonFileRepository) -> Result<InventoryStore, PersistenceError> {
    let mut store = InventoryStore::new();
    load_into(repo, &mut store)?;
    Ok(store)
}

fn persist_if_changed(
    repo: &JsonFileRepository,
    store: &InventoryStore,
    outcome: &DomainResult<StockChange>,
) -> Result<(), PersistenceError> {
    match outcome {
        Ok(_) => save_from(repo, store),
        Err(_) => Ok(()),
    }
}

/// Command-line quantities are untyped: numbers become JSON numbers, anything
/// else stays text and is rejected by validation.
fn quantity_arg(raw: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(raw.trim()) {
        Ok(value @ JsonValue::Number(_)) => value,
        _ => JsonValue::String(raw.to_string()),
    }
}

fn describe(change: &StockChange) -> String {
    match change {
        StockChange::Stocked { item, level } => format!("{item} -> {level}"),
        StockChange::Reduced { item, remaining } => format!("{item} -> {remaining}"),
        StockChange::Depleted { item } => format!("{item} removed"),
    }
}
