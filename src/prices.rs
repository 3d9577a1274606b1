// src/prices.rs
//
// Combined price table: concatenation of per-entity history, value coercion,
// date window filtering and the per-entity views the CLI prints.

use std::collections::HashSet;

use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// One raw history row as scraped; nothing parsed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRecord {
    pub highest_price: String,
    pub volume: String,
    pub date: String,
    pub entity: String,
}

/// A history row after coercion. `highest_price` is NaN when the source cell
/// was not a number.
#[derive(Clone, Debug, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub highest_price: f64,
    pub volume: String,
    pub entity: String,
}

pub const HEADERS: [&str; 4] = ["Highest Price", "Volume", "Date", "Company"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y.%m.%d %H:%M:%S"];

/// Calendar date from a history cell. Time-of-day, when present, is dropped.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Price cell to a number; thousands separators and spaces are ignored.
/// Anything else that fails to parse becomes NaN.
pub fn coerce_price(s: &str) -> f64 {
    let cleaned: String = s.chars().filter(|c| !matches!(c, ',' | ' ' | '\u{a0}')).collect();
    if cleaned.is_empty() {
        return f64::NAN;
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

/// Which dates survive aggregation. Both ends are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateWindow {
    All,
    /// `[today - n months, today]`
    LastMonths(u32),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateWindow {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Config(format!("date range start {start} is after end {end}")));
        }
        Ok(DateWindow::Range { start, end })
    }

    /// Concrete `[start, end]`, or `None` for `All`.
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            DateWindow::All => None,
            DateWindow::LastMonths(n) => {
                let start = today.checked_sub_months(Months::new(n)).unwrap_or(NaiveDate::MIN);
                Some((start, today))
            }
            DateWindow::Range { start, end } => Some((start, end)),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.bounds(today) {
            None => true,
            Some((start, end)) => start <= date && date <= end,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceTable {
    /// Sorted by date; ties keep directory order, then page order.
    pub rows: Vec<PricePoint>,
    /// Entity names in directory order, including ones with no rows in the window.
    pub entities: Vec<String>,
    /// Rows dropped because the date cell did not parse.
    pub bad_dates: usize,
    /// Rows whose price became NaN.
    pub bad_prices: usize,
}

impl PriceTable {
    /// Concatenate per-entity tables (in directory order), coerce, then keep
    /// only rows inside `window`. A group whose entity was already seen is
    /// dropped so no entity's rows appear twice.
    pub fn aggregate<I>(groups: I, window: DateWindow, today: NaiveDate) -> PriceTable
    where
        I: IntoIterator<Item = (String, Vec<PriceRecord>)>,
    {
        let mut table = PriceTable::default();
        let mut seen: HashSet<String> = HashSet::new();

        for (entity, records) in groups {
            if !seen.insert(entity.clone()) {
                logf!("Skipping repeated entity {}", entity);
                continue;
            }
            table.entities.push(entity);

            for rec in records {
                let Some(date) = parse_date(&rec.date) else {
                    logd!("Unparseable date {:?} for {}", rec.date, rec.entity);
                    table.bad_dates += 1;
                    continue;
                };
                if !window.contains(date, today) {
                    continue;
                }
                let highest_price = coerce_price(&rec.highest_price);
                if highest_price.is_nan() {
                    table.bad_prices += 1;
                }
                table.rows.push(PricePoint {
                    date,
                    highest_price,
                    volume: rec.volume,
                    entity: rec.entity,
                });
            }
        }

        table.rows.sort_by_key(|p| p.date);
        table
    }

    /// Copy keeping only rows inside `window`. Entity order and the dropped
    /// date count carry over; the NaN count is for the kept rows.
    pub fn windowed(&self, window: DateWindow, today: NaiveDate) -> PriceTable {
        let rows: Vec<PricePoint> = self.rows.iter().filter(|p| window.contains(p.date, today)).cloned().collect();
        PriceTable {
            bad_prices: rows.iter().filter(|p| p.highest_price.is_nan()).count(),
            rows,
            entities: self.entities.clone(),
            bad_dates: self.bad_dates,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn for_entity<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a PricePoint> + 'a {
        self.rows.iter().filter(move |p| p.entity == entity)
    }

    /// First and last date held for `entity`.
    pub fn date_bounds(&self, entity: &str) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.for_entity(entity).map(|p| p.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Flatten to string rows, `HEADERS` order.
    pub fn to_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let headers = HEADERS.iter().map(|h| s!(*h)).collect();
        let rows = self
            .rows
            .iter()
            .map(|p| row![
                p.highest_price,
                p.volume,
                p.date.format("%Y-%m-%d"),
                p.entity,
            ])
            .collect();
        (headers, rows)
    }

    /// Rebuild from `to_rows` output (the `.store` cache). Malformed rows are skipped.
    pub fn from_rows(rows: &[Vec<String>]) -> PriceTable {
        let mut table = PriceTable::default();
        for r in rows {
            let [price, volume, date, entity] = r.as_slice() else { continue };
            let Some(date) = parse_date(date) else {
                table.bad_dates += 1;
                continue;
            };
            if !table.entities.contains(entity) {
                table.entities.push(entity.clone());
            }
            let highest_price = coerce_price(price);
            if highest_price.is_nan() {
                table.bad_prices += 1;
            }
            table.rows.push(PricePoint { date, highest_price, volume: volume.clone(), entity: entity.clone() });
        }
        table.rows.sort_by_key(|p| p.date);
        table
    }
}
