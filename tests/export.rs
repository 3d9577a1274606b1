// tests/export.rs
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use statscrape::config::options::{AppOptions, ExportFormat, ExportType};
use statscrape::file::export_dataset;
use statscrape::prices::{DateWindow, PriceRecord, PriceTable};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("statscrape_export_{name}"));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn rec(entity: &str, price: &str, date: &str) -> PriceRecord {
    PriceRecord {
        highest_price: price.to_string(),
        volume: "100".to_string(),
        date: date.to_string(),
        entity: entity.to_string(),
    }
}

fn table() -> PriceTable {
    PriceTable::aggregate(
        vec![
            ("APU".to_string(), vec![rec("APU", "1,020.00", "2024-03-15")]),
            ("Gobi/Cashmere".to_string(), vec![rec("Gobi/Cashmere", "400", "2024-03-14")]),
        ],
        DateWindow::All,
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    )
}

#[test]
fn single_file_keeps_typed_extension() {
    let dir = tmp_dir("single");
    let mut opts = AppOptions::default();
    opts.export.set_path(dir.join("prices.txt").to_str().unwrap());
    opts.export.format = ExportFormat::Tsv;

    let (headers, rows) = table().to_rows();
    let written = export_dataset(&opts.export, &headers, &rows).unwrap();

    assert_eq!(written.len(), 1);
    assert!(written[0].to_string_lossy().ends_with("prices.txt"));
    let text = fs::read_to_string(&written[0]).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Highest Price\tVolume\tDate\tCompany"));
    assert_eq!(lines.next(), Some("400\t100\t2024-03-14\tGobi/Cashmere"));
    assert_eq!(lines.next(), Some("1020\t100\t2024-03-15\tAPU"));
}

#[test]
fn headers_can_be_left_out() {
    let dir = tmp_dir("noheaders");
    let mut opts = AppOptions::default();
    opts.export.include_headers = false;
    opts.export.set_path(dir.join("out").to_str().unwrap());

    let (headers, rows) = table().to_rows();
    let written = export_dataset(&opts.export, &headers, &rows).unwrap();
    assert!(written[0].to_string_lossy().ends_with("out.csv"));
    let text = fs::read_to_string(&written[0]).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("Highest Price"));
}

#[test]
fn per_entity_writes_one_file_each() {
    let dir = tmp_dir("per_entity");
    let mut opts = AppOptions::default();
    opts.export.export_type = ExportType::PerEntity;
    opts.export.set_path(dir.to_str().unwrap());

    let (headers, rows) = table().to_rows();
    let written = export_dataset(&opts.export, &headers, &rows).unwrap();

    assert_eq!(written.len(), 2);
    // first-seen order follows the date-sorted table
    assert_eq!(written[0].file_name().unwrap(), "GobiCashmere.csv");
    assert_eq!(written[1].file_name().unwrap(), "APU.csv");
    let apu = fs::read_to_string(&written[1]).unwrap();
    assert_eq!(apu.lines().count(), 2);
    assert!(apu.lines().nth(1).unwrap().ends_with(",APU"));
}
