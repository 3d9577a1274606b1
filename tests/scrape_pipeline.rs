// tests/scrape_pipeline.rs
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use statscrape::config::consts::{DIRECTORY_TABLE_CLASS, HISTORY_TABLE_CLASS};
use statscrape::config::options::ScrapeOptions;
use statscrape::core::PageSource;
use statscrape::prices::DateWindow;
use statscrape::progress::Progress;
use statscrape::scrape::collect_prices;
use statscrape::{Error, Result};

const ORIGIN: &str = "https://mse.test";

/// Serves canned pages by URL; anything unknown is a fetch failure.
struct FakeSource {
    pages: HashMap<String, String>,
    down: Vec<String>,
    hits: Mutex<Vec<String>>,
}

impl FakeSource {
    fn new() -> Self {
        Self { pages: HashMap::new(), down: Vec::new(), hits: Mutex::new(Vec::new()) }
    }

    fn page(mut self, path: &str, html: String) -> Self {
        self.pages.insert(format!("{ORIGIN}{path}"), html);
        self
    }

    fn down(mut self, path: &str) -> Self {
        self.down.push(format!("{ORIGIN}{path}"));
        self
    }
}

impl PageSource for FakeSource {
    fn get(&self, url: &str) -> Result<String> {
        self.hits.lock().unwrap().push(url.to_string());
        if self.down.iter().any(|u| u == url) {
            return Err(Error::fetch(url, "HTTP 503 Service Unavailable"));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(url, "HTTP 404 Not Found"))
    }
}

#[derive(Default)]
struct Recorder {
    total: usize,
    done: Vec<String>,
    failed: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, _msg: &str) {}
    fn item_done(&mut self, _idx: usize, name: &str) { self.done.push(name.to_string()); }
    fn item_failed(&mut self, _idx: usize, name: &str, _reason: &str) { self.failed.push(name.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}

fn listing(companies: &[(&str, &str)]) -> String {
    let rows: String = companies
        .iter()
        .enumerate()
        .map(|(i, (href, name))| format!(r#"<tr><td>{}</td><td><a href="{href}">{name}</a></td></tr>"#, i + 1))
        .collect();
    format!(
        r#"<html><body><table class="{DIRECTORY_TABLE_CLASS}">
             <thead><tr><th>#</th><th>Company</th></tr></thead>
             <tbody>{rows}</tbody>
           </table></body></html>"#
    )
}

/// `(high, volume, date)` rows laid out in the 8-cell trading table.
fn history(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (high, vol, date))| {
            format!(
                "<tr><td>{}</td><td>{high}</td><td>0</td><td>0</td><td>0</td><td>{vol}</td><td>0</td><td>{date}</td></tr>",
                i + 1
            )
        })
        .collect();
    format!(r#"<table class="{HISTORY_TABLE_CLASS}"><tbody>{body}</tbody></table>"#)
}

fn opts() -> ScrapeOptions {
    ScrapeOptions {
        origin: ORIGIN.to_string(),
        listing_path: "/en/top20".to_string(),
        workers: 3,
        pause_ms: 0,
        ..ScrapeOptions::default()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn three_companies() -> FakeSource {
    FakeSource::new()
        .page("/en/top20", listing(&[("/c/1", "APU"), ("/c/2", "Gobi"), ("/c/3", "Tavan Tolgoi")]))
        .page("/c/1", history(&[("1,200.00", "10", "2024-05-02"), ("1,100.00", "20", "2024-03-01")]))
        .down("/c/2")
        .page("/c/3", history(&[("55.5", "7", "2024-04-15"), ("60", "9", "2023-01-01")]))
}

#[test]
fn failed_entity_is_skipped_and_reported() {
    let src = three_companies();
    let mut progress = Recorder::default();
    let report = collect_prices(&src, &opts(), today(), Some(&mut progress)).unwrap();

    assert_eq!(report.links.len(), 3);
    assert!(!report.is_complete());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, "Gobi");
    assert_eq!(report.failures[0].url, "https://mse.test/c/2");
    assert!(report.notices()[0].starts_with("Skipped Gobi:"));

    let entities: Vec<&str> = report.table.rows.iter().map(|p| p.entity.as_str()).collect();
    assert!(entities.contains(&"APU"));
    assert!(entities.contains(&"Tavan Tolgoi"));
    assert!(!entities.contains(&"Gobi"));

    assert_eq!(progress.total, 3);
    assert_eq!(progress.done.len(), 2);
    assert_eq!(progress.failed, vec!["Gobi"]);
    assert!(progress.finished);
}

#[test]
fn rows_are_windowed_and_sorted_by_date() {
    let report = collect_prices(&three_companies(), &opts(), today(), None).unwrap();
    let table = &report.table;

    // 2023-01-01 falls outside the six-month window
    assert_eq!(table.len(), 3);
    let dates: Vec<String> = table.rows.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-04-15", "2024-05-02"]);
    assert_eq!(table.rows[2].highest_price, 1200.0);
    assert_eq!(table.rows[1].entity, "Tavan Tolgoi");
}

#[test]
fn explicit_range_replaces_lookback() {
    let mut o = opts();
    o.window = DateWindow::range(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap();
    let report = collect_prices(&three_companies(), &o, today(), None).unwrap();
    let dates: Vec<String> = report.table.rows.iter().map(|p| p.date.to_string()).collect();
    assert_eq!(dates, vec!["2023-01-01", "2024-03-01"]);
}

#[test]
fn directory_failure_is_fatal() {
    let src = FakeSource::new().down("/en/top20").page("/c/1", history(&[]));
    let err = collect_prices(&src, &opts(), today(), None).unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert_eq!(src.hits.lock().unwrap().len(), 1);
}

#[test]
fn directory_without_table_is_fatal() {
    let src = FakeSource::new().page("/en/top20", "<html><body>maintenance</body></html>".to_string());
    let err = collect_prices(&src, &opts(), today(), None).unwrap_err();
    assert!(matches!(err, Error::StructureNotFound { .. }));
}

#[test]
fn detail_page_without_table_is_per_entity() {
    let src = FakeSource::new()
        .page("/en/top20", listing(&[("/c/1", "APU"), ("/c/2", "Gobi")]))
        .page("/c/1", "<p>moved</p>".to_string())
        .page("/c/2", history(&[("10", "1", "2024-06-01")]));
    let report = collect_prices(&src, &opts(), today(), None).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, "APU");
    assert_eq!(report.table.len(), 1);
}

#[test]
fn single_worker_fetches_every_page_once() {
    let mut o = opts();
    o.workers = 1;
    let src = three_companies();
    collect_prices(&src, &o, today(), None).unwrap();
    let hits = src.hits.lock().unwrap();
    assert_eq!(hits.len(), 4);
    assert_eq!(hits[0], "https://mse.test/en/top20");
    assert_eq!(&hits[1..], ["https://mse.test/c/1", "https://mse.test/c/2", "https://mse.test/c/3"]);
}

#[test]
fn memo_drops_last_result_when_rerun_fails() {
    use statscrape::store::ScrapeMemo;

    let mut memo = ScrapeMemo::new();
    let good = three_companies();
    let n = memo.trigger(|| collect_prices(&good, &opts(), today(), None)).unwrap().table.len();
    assert_eq!(n, 3);
    assert!(memo.last().is_some());

    let broken = FakeSource::new().down("/en/top20");
    assert!(memo.trigger(|| collect_prices(&broken, &opts(), today(), None)).is_err());
    assert!(memo.last().is_none());
}
