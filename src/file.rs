// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
    collections::HashMap,
};

use crate::config::options::{ExportOptions, ExportType};
use crate::core::sanitize::sanitize_filename;
use crate::csv::to_export_string;
use crate::error::{Error, Result};

/// Column of the entity name in exported price rows.
pub const ENTITY_COL: usize = 3;

/// Export according to `ExportOptions`. Returns every path written.
pub fn export_dataset(
    export: &ExportOptions,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<PathBuf>> {
    match export.export_type {
        ExportType::SingleFile => Ok(vec![write_export_single(export, headers, rows)?]),
        ExportType::PerEntity => write_export_per_entity(export, headers, rows, ENTITY_COL),
    }
}

/// Write a single export file based on ExportOptions (path, headers policy, delimiter).
pub fn write_export_single(
    export: &ExportOptions,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<PathBuf> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let headers = export.include_headers.then_some(headers);
    fs::write(&path, to_export_string(headers, rows, export.delim()))?;
    Ok(path)
}

/// One file per entity inside the export directory, in first-seen order.
pub fn write_export_per_entity(
    export: &ExportOptions,
    headers: &[String],
    rows: &[Vec<String>],
    entity_col: usize,
) -> Result<Vec<PathBuf>> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    // Group rows by entity, keeping the order entities first appear in
    let mut order: Vec<&str> = Vec::new();
    let mut by_entity: HashMap<&str, Vec<Vec<String>>> = HashMap::new();
    for r in rows {
        if let Some(entity) = r.get(entity_col) {
            by_entity
                .entry(entity.as_str())
                .or_insert_with(|| { order.push(entity.as_str()); Vec::new() })
                .push(r.clone());
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(order.len());
    let ext = export.format.ext();
    let headers = export.include_headers.then_some(headers);

    for (idx, entity) in order.into_iter().enumerate() {
        let stem = sanitize_filename(entity, idx);
        let path = resolve_filename(&outdir, &stem, &mut seen, ext);
        let entity_rows = by_entity.remove(entity).unwrap_or_default();

        fs::write(&path, to_export_string(headers, &entity_rows, export.delim()))?;
        written.push(path);
    }

    Ok(written)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Io(std::io::Error::other(format!(
            "path exists but is not a directory: {}",
            dir.display()
        ))));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,                         // "csv" | "tsv"
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}
