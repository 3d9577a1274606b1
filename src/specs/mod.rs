//! # Scraping "specs" module
//!
//! Page-specific extraction for the exchange site. Each spec owns one page shape
//! and encodes *where the data lives in the HTML* and *how to pull it out*.
//!
//! ## What lives here
//! - **Pure HTML parsing** (`parse_doc`) over a fetched document, testable offline.
//! - **The structural contract**: table class names, minimum cell count and cell
//!   positions, gathered in [`DirectoryContract`] and [`HistoryContract`] so that
//!   upstream markup drift is a change to one record (or to `statscrape.toml`).
//! - A thin `fetch` per spec: one GET through a [`PageSource`](crate::core::PageSource),
//!   then `parse_doc`.
//!
//! ## What does **not** live here
//! - Worker pools, ordering, failure aggregation: `scrape`.
//! - Coercion, date windows, per-entity views: `prices`.
//! - Caching and export: `store`, `file`.
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::collect_prices → specs::directory::fetch  (once)
//!                             ↘ specs::history::fetch    (per entity, pooled)
//!                   prices::PriceTable::aggregate (outside of specs)
//! ```
//!
//! ## Conventions & invariants
//! - Tables are located by **exact** class attribute string (whitespace-normalized).
//! - Rows are read from the table's `<tbody>`; a missing table or body is
//!   `Error::StructureNotFound`, never an empty result.
//! - Cell text is tag-stripped, entity-decoded and trimmed.

pub mod directory;
pub mod history;

use crate::config::consts::*;

/// Where the entity links live on the listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryContract {
    pub table_class: String,
}

impl Default for DirectoryContract {
    fn default() -> Self {
        Self { table_class: s!(DIRECTORY_TABLE_CLASS) }
    }
}

/// Shape of the trade history table on a detail page.
/// Column positions are 0-based cell indices within a row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryContract {
    pub table_class: String,
    pub min_cells: usize,
    pub price_col: usize,
    pub volume_col: usize,
    pub date_col: usize,
}

impl Default for HistoryContract {
    fn default() -> Self {
        Self {
            table_class: s!(HISTORY_TABLE_CLASS),
            min_cells: HISTORY_MIN_CELLS,
            price_col: HISTORY_PRICE_COL,
            volume_col: HISTORY_VOLUME_COL,
            date_col: HISTORY_DATE_COL,
        }
    }
}

impl HistoryContract {
    /// Every extracted column must exist in a row that passes `min_cells`.
    pub fn validate(&self) -> Result<(), String> {
        let widest = self.price_col.max(self.volume_col).max(self.date_col);
        if widest >= self.min_cells {
            return Err(format!(
                "history column {} is outside min_cells {}",
                widest, self.min_cells
            ));
        }
        Ok(())
    }
}
