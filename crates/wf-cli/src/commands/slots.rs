use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::debug;

pub fn run(store: &Path, namespace: &str, delete: Option<&str>) -> Result<(), String> {
    let mut slots = super::open_slots(store, namespace)?;

    if let Some(name) = delete {
        if !slots.contains(name) {
            return Err(format!("no save slot named '{name}'"));
        }
        slots.delete(name).map_err(|e| e.to_string())?;
        println!("  {} save slot '{name}'", "Deleted".bold());
        return Ok(());
    }

    let names = slots.list();
    debug!(count = names.len(), store = %store.display(), "listing save slots");
    if names.is_empty() {
        println!("  No save slots.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Slot", "Size"]);
    for name in &names {
        let size = slots.read(name).map_or(0, |p| p.len());
        table.add_row(vec![name.clone(), format!("{size} bytes")]);
    }

    println!("{table}");
    println!();
    println!("  {} slots", names.len());

    Ok(())
}

pub fn last_command(store: &Path, namespace: &str) -> Result<(), String> {
    let slots = super::open_slots(store, namespace)?;
    match slots.last_command() {
        Some(command) => println!("{command}"),
        None => println!("  No command recorded."),
    }
    Ok(())
}
