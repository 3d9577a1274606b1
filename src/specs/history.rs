//! Scraping *spec* for one entity's trade history page.
//!
//! Rows with fewer than `min_cells` cells (spacers, subtotals) are skipped
//! silently. Values stay raw strings here; `prices` coerces them.

use crate::core::html::{elements_ci, find_by_class, text_of};
use crate::core::net::PageSource;
use crate::error::{Error, Result};
use crate::prices::PriceRecord;

use super::HistoryContract;

pub fn fetch(
    source: &dyn PageSource,
    url: &str,
    entity: &str,
    contract: &HistoryContract,
) -> Result<Vec<PriceRecord>> {
    let doc = source.get(url)?;
    let t = std::time::Instant::now();
    let rows = parse_doc(&doc, url, entity, contract)?;
    logd!("History: {} rows for {} in {:?}", rows.len(), entity, t.elapsed());
    Ok(rows)
}

/// Split out for unit tests and benches. `url` is only used in error messages.
pub fn parse_doc(
    doc: &str,
    url: &str,
    entity: &str,
    contract: &HistoryContract,
) -> Result<Vec<PriceRecord>> {
    contract.validate().map_err(Error::Config)?;
    let table = find_by_class(doc, "table", &contract.table_class)
        .ok_or_else(|| Error::missing("history table", url))?;
    let tbody = elements_ci(table, "tbody")
        .into_iter()
        .next()
        .ok_or_else(|| Error::missing("history table body", url))?;

    let mut out = Vec::new();
    for tr in elements_ci(tbody, "tr") {
        let cells = elements_ci(tr, "td");
        if cells.len() < contract.min_cells {
            continue;
        }
        out.push(PriceRecord {
            highest_price: text_of(cells[contract.price_col]),
            volume: text_of(cells[contract.volume_col]),
            date: text_of(cells[contract.date_col]),
            entity: s!(entity),
        });
    }
    Ok(out)
}
