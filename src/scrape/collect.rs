// src/scrape/collect.rs
use std::{
    thread, time::Duration,
    sync::{ mpsc, atomic::{ AtomicUsize, Ordering }},
};

use chrono::NaiveDate;

use crate::{
    config::consts::JITTER_MS,
    config::options::ScrapeOptions,
    core::PageSource,
    error::{ Error, Result },
    prices::{ DateWindow, PriceRecord, PriceTable },
    progress::Progress,
    specs::{ self, directory::EntityLink },
};

/// An entity whose detail page could not be read. The rest of the scrape went on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityFailure {
    pub idx: usize,
    pub entity: String,
    pub url: String,
    pub reason: String,
}

/// Everything one scrape produced: the directory, the combined table, and
/// the entities that had to be skipped.
#[derive(Clone, Debug)]
pub struct ScrapeReport {
    pub links: Vec<EntityLink>,
    /// Combined table restricted to the requested window.
    pub table: PriceTable,
    /// Same rows before windowing; this is what gets cached.
    pub full: PriceTable,
    pub failures: Vec<EntityFailure>,
    pub today: NaiveDate,
}

impl ScrapeReport {
    /// One human-readable line per skipped entity.
    pub fn notices(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("Skipped {}: {}", f.entity, f.reason))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolve the directory, then fetch every detail page on a small worker pool.
///
/// Directory failures are fatal. Detail failures are recorded per entity and
/// skipped; the combined table is built in directory order regardless of the
/// order the workers finish in.
pub fn collect_prices(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    today: NaiveDate,
    mut progress: Option<&mut dyn Progress>,
) -> Result<ScrapeReport> {
    opts.history.validate().map_err(Error::Config)?;
    let listing = opts.listing_url();
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Reading directory {listing}"));
    }
    let links = specs::directory::fetch(source, &listing, &opts.origin, &opts.directory)?;
    logf!("Directory lists {} entities", links.len());

    if let Some(p) = progress.as_deref_mut() {
        p.begin(links.len());
    }

    // Concurrency
    type Fetched = (usize, std::result::Result<Vec<PriceRecord>, Error>);

    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<Fetched>();
    let workers = opts.workers.min(links.len()).max(1);

    let mut per_entity: Vec<Option<Vec<PriceRecord>>> = vec![None; links.len()];
    let mut failures: Vec<EntityFailure> = Vec::new();

    thread::scope(|scope| {
        for _ in 0..workers {
            let links = &links;
            let idx = &counter;
            let tx = res_tx.clone();

            scope.spawn(move || {
                loop {
                    let i = idx.fetch_add(1, Ordering::Relaxed);
                    if i >= links.len() {
                        break;
                    }
                    let link = &links[i];
                    let result = specs::history::fetch(source, &link.url, &link.name, &opts.history);
                    if tx.send((i, result)).is_err() {
                        break;
                    }
                    if opts.pause_ms > 0 {
                        let jitter = (i as u64) % JITTER_MS;
                        thread::sleep(Duration::from_millis(opts.pause_ms + jitter)); // be polite
                    }
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        // Aggregate results as they arrive
        for (i, result) in res_rx.iter() {
            let link = &links[i];
            match result {
                Ok(rows) => {
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(i, &link.name);
                    }
                    per_entity[i] = Some(rows);
                }
                Err(e) => {
                    let reason = e.to_string();
                    logw!(entity = %link.name, url = %link.url, "skipped: {reason}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(i, &link.name, &reason);
                    }
                    failures.push(EntityFailure {
                        idx: i,
                        entity: link.name.clone(),
                        url: link.url.clone(),
                        reason,
                    });
                }
            }
        }
    });

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    // Resequence to directory order
    failures.sort_by_key(|f| f.idx);
    let groups = links
        .iter()
        .zip(per_entity)
        .filter_map(|(link, rows)| rows.map(|r| (link.name.clone(), r)));
    let full = PriceTable::aggregate(groups, DateWindow::All, today);
    let table = full.windowed(opts.window, today);

    logf!(
        "Collected {} rows from {} entities ({} skipped)",
        table.len(),
        links.len() - failures.len(),
        failures.len()
    );
    Ok(ScrapeReport { links, table, full, failures, today })
}
