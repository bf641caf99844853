//! Built-in and External Catalog Tables
//!
//! Lookup tables are loaded from:
//! 1. External JSON files in a user catalog directory (optional overrides)
//! 2. Embedded JSON files compiled into the binary (fallback)
//!
//! An override directory only needs the files it wants to replace; any table
//! it does not provide keeps the embedded version.

use crate::catalog::schema::*;
use crate::catalog::Catalog;
use serde::de::DeserializeOwned;
use std::path::Path;

const EMBEDDED_CATEGORIES: &str = include_str!("../../catalog/categories.json");
const EMBEDDED_SOCKETS: &str = include_str!("../../catalog/sockets.json");
const EMBEDDED_POWER: &str = include_str!("../../catalog/power_table.json");
const EMBEDDED_FORM_FACTORS: &str = include_str!("../../catalog/form_factors.json");

pub const CATEGORIES_FILE: &str = "categories.json";
pub const SOCKETS_FILE: &str = "sockets.json";
pub const POWER_FILE: &str = "power_table.json";
pub const FORM_FACTORS_FILE: &str = "form_factors.json";

fn parse_embedded<T: DeserializeOwned + Default>(label: &str, json_str: &str) -> T {
    match serde_json::from_str::<T>(json_str) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!("Failed to parse embedded {} table: {}", label, e);
            T::default()
        }
    }
}

/// Build the catalog from the embedded JSON tables
pub fn builtin_catalog() -> Catalog {
    Catalog {
        categories: parse_embedded::<CategoryTable>("category", EMBEDDED_CATEGORIES),
        sockets: parse_embedded::<SocketTable>("socket", EMBEDDED_SOCKETS),
        power: parse_embedded::<PowerTable>("power", EMBEDDED_POWER),
        form_factors: parse_embedded::<FormFactorTable>("form factor", EMBEDDED_FORM_FACTORS),
    }
}

/// Load a catalog, replacing embedded tables with any found in `dir`.
/// Returns the catalog and any errors encountered; a table that fails to load
/// keeps its embedded version.
pub fn load_catalog_from_directory(dir: &Path) -> (Catalog, Vec<String>) {
    let mut catalog = builtin_catalog();
    let mut errors = Vec::new();

    if !dir.exists() || !dir.is_dir() {
        errors.push(format!("Catalog directory {:?} does not exist", dir));
        return (catalog, errors);
    }

    if let Some(table) = load_override::<CategoryTable>(dir, CATEGORIES_FILE, &mut errors) {
        catalog.categories = table;
    }
    if let Some(table) = load_override::<SocketTable>(dir, SOCKETS_FILE, &mut errors) {
        catalog.sockets = table;
    }
    if let Some(table) = load_override::<PowerTable>(dir, POWER_FILE, &mut errors) {
        catalog.power = table;
    }
    if let Some(table) = load_override::<FormFactorTable>(dir, FORM_FACTORS_FILE, &mut errors) {
        catalog.form_factors = table;
    }

    (catalog, errors)
}

fn load_override<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return None;
    }

    match load_table_from_file::<T>(&path) {
        Ok(table) => {
            tracing::info!("Loaded catalog table override from {:?}", path.file_name());
            Some(table)
        }
        Err(e) => {
            let error_msg = format!("Failed to load {:?}: {}", path.file_name(), e);
            tracing::warn!("{}", error_msg);
            errors.push(error_msg);
            None
        }
    }
}

/// Load a single table from a JSON file
pub fn load_table_from_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse JSON: {}", e))
}
