// src/store.rs
//
// Two kinds of "keeping the last scrape":
// - `ScrapeMemo`: in-process, the most recent report, dropped on every re-trigger.
// - `.store/prices.csv`: on-disk copy of the combined, unwindowed table for
//   `--cached` runs, with `.store/entities.csv` holding the directory order.

use std::{fs, io::{self, Write}, path::{Path, PathBuf}};

use crate::config::consts::{ENTITIES_CACHE_FILE, PRICES_CACHE_FILE, STORE_DIR};
use crate::csv::{parse_rows, write_row};
use crate::prices::PriceTable;
use crate::scrape::ScrapeReport;

/// Best-effort memo of the most recent scrape.
#[derive(Default)]
pub struct ScrapeMemo {
    last: Option<ScrapeReport>,
}

impl ScrapeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the scrape. The previous result is invalidated first, so a
    /// failed run leaves the memo empty rather than stale.
    pub fn trigger<F>(&mut self, run: F) -> crate::Result<&ScrapeReport>
    where
        F: FnOnce() -> crate::Result<ScrapeReport>,
    {
        self.last = None;
        let report = run()?;
        Ok(self.last.insert(report))
    }

    pub fn last(&self) -> Option<&ScrapeReport> {
        self.last.as_ref()
    }
}

pub fn cache_path() -> PathBuf {
    PathBuf::from(STORE_DIR).join(PRICES_CACHE_FILE)
}

/// Entity order lives next to the price rows.
fn entities_path(prices: &Path) -> PathBuf {
    prices.with_file_name(ENTITIES_CACHE_FILE)
}

/// Save `table` as is; callers pass the unwindowed table so any later window
/// can be applied on load.
pub fn save_prices(path: &Path, table: &PriceTable) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = io::BufWriter::new(fs::File::create(path)?);
    let (headers, rows) = table.to_rows();
    write_row(&mut writer, &headers, ',')?;
    for r in &rows {
        write_row(&mut writer, r, ',')?;
    }
    writer.flush()?;

    let mut writer = io::BufWriter::new(fs::File::create(entities_path(path))?);
    for name in &table.entities {
        write_row(&mut writer, std::slice::from_ref(name), ',')?;
    }
    writer.flush()
}

/// `None` when there is no cache yet.
pub fn load_prices(path: &Path) -> io::Result<Option<PriceTable>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let mut rows = parse_rows(&text, ',');
    if rows.first().is_some_and(|h| h.first().map(String::as_str) == Some(crate::prices::HEADERS[0])) {
        rows.remove(0);
    }
    let mut table = PriceTable::from_rows(&rows);

    // Directory order, including entities with no rows. Older caches without
    // the file keep the first-seen order from the rows.
    let order = entities_path(path);
    if order.exists() {
        let mut entities: Vec<String> = parse_rows(&fs::read_to_string(&order)?, ',')
            .into_iter()
            .filter_map(|r| r.into_iter().next())
            .collect();
        for name in &table.entities {
            if !entities.contains(name) {
                entities.push(name.clone());
            }
        }
        table.entities = entities;
    }
    Ok(Some(table))
}
