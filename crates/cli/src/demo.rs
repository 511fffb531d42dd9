//! Demonstration sequence run when no subcommand is given.

use std::io::Write;

use stockroom_core::{ItemName, Quantity};
use stockroom_infra::{InventoryRepository, load_into, save_from};
use stockroom_inventory::InventoryStore;

/// Walk a fresh store through add/remove/query, persist it, reload it and
/// print the report.
///
/// Rejected operations (the absent "orange") are logged by the store and do
/// not stop the sequence; only persistence and output failures are returned.
pub fn run<R, W>(repo: &R, threshold: Quantity, out: &mut W) -> anyhow::Result<InventoryStore>
where
    R: InventoryRepository + ?Sized,
    W: Write,
{
    let mut store = InventoryStore::new();

    let _ = store.add("apple", Quantity::Whole(10), None);
    let _ = store.add("banana", Quantity::Whole(-2), None);
    let _ = store.add("pen", Quantity::Whole(10), None);
    let _ = store.remove("apple", Quantity::Whole(3));
    let _ = store.remove("orange", Quantity::Whole(1));

    writeln!(out, "Apple stock: {}", store.quantity("apple"))?;
    writeln!(out, "Low items: {}", format_names(store.low_items(threshold)))?;

    save_from(repo, &store)?;
    load_into(repo, &mut store)?;
    store.write_report(out)?;

    Ok(store)
}

/// Debug-style list with double-quoted names, e.g. `["banana", "pen"]`.
///
/// Names are escaped the way `{:?}` escapes a `&str`, so a name containing a
/// quote renders as `["say \"hi\""]`. An empty list is `[]`.
pub(crate) fn format_names(names: Vec<&ItemName>) -> String {
    let names: Vec<&str> = names.into_iter().map(ItemName::as_str).collect();
    format!("{names:?}")
}
