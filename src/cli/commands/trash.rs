//! Trash command implementation.

use super::open_storage;
use crate::models::config::Config;
use crate::services::storage::Storage;
use crate::Result;
use chrono::DateTime;
use colored::Colorize;
use std::path::Path;

/// List trash entries below a root directory.
pub fn list_trash(root: &Path, config: &Config) -> Result<()> {
    let storage = open_storage(root, config)?;
    let entries = storage.trash()?;

    if entries.is_empty() {
        println!("{}", "Trash is empty.".dimmed());
        return Ok(());
    }

    println!("{}", format!("[Trash] {} entries", entries.len()).bold().cyan());
    for entry in entries {
        let deleted_at = DateTime::from_timestamp(entry.deleted_at, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| entry.deleted_at.to_string());
        println!(
            "  {} {:<7} {} ({})",
            deleted_at,
            entry.kind.to_string(),
            entry.original_path,
            entry.id.dimmed()
        );
    }
    Ok(())
}
