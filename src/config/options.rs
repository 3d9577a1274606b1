// src/config/options.rs
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::consts::*;
use crate::error::{Error, Result};
use crate::prices::{parse_date, DateWindow};
use crate::specs::{DirectoryContract, HistoryContract};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub predict: PredictOptions,
    pub export: ExportOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOptions {
    /// Scheme + host every relative href is resolved against.
    pub origin: String,
    pub listing_path: String,
    pub directory: DirectoryContract,
    pub history: HistoryContract,
    pub workers: usize,
    pub pause_ms: u64,
    pub window: DateWindow,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            origin: s!(ORIGIN),
            listing_path: s!(LISTING_PATH),
            directory: DirectoryContract::default(),
            history: HistoryContract::default(),
            workers: WORKERS,
            pause_ms: REQUEST_PAUSE_MS,
            window: DateWindow::LastMonths(DEFAULT_LOOKBACK_MONTHS),
        }
    }
}

impl ScrapeOptions {
    pub fn listing_url(&self) -> String {
        join!(self.origin.trim_end_matches('/'), &self.listing_path)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictOptions {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub top_colleges: usize,
    /// Reject categories the model has no indicator column for, instead of zero-filling.
    pub strict_categories: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(MODEL_FILE),
            dataset_path: PathBuf::from(PLAYERS_DATASET),
            top_colleges: TOP_COLLEGES,
            strict_categories: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerEntity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(Error::Usage(format!("unknown format: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// Single file: `<dir>/<stem>.<ext>`, where an extension the user typed wins.
    /// Per entity: the directory only.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        match self.export_type {
            ExportType::SingleFile => {
                let stem = self.out_path.file_stem.to_string_lossy();
                let ext = self.out_path.ext.as_deref().unwrap_or(self.format.ext());
                path.push(join!(&*stem, ".", ext));
            }
            ExportType::PerEntity => {}
        }
        path
    }

    /// Parse a user path into dir + stem (+ explicit extension, if any).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                if let Some(parent) = p.parent() {
                    self.out_path.dir = parent.to_path_buf();
                }
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
                self.out_path.ext = p.extension().map(|e| e.to_string_lossy().into_owned());
            }
            ExportType::PerEntity => {
                self.out_path.dir = PathBuf::from(s);
            }
        }
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString,
    ext: Option<String>,
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
            ext: None,
        }
    }
}

/* ---------------- TOML overlay ---------------- */

/// On-disk shape of `statscrape.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub scrape: FileScrape,
    pub predict: FilePredict,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileScrape {
    pub origin: Option<String>,
    pub listing_path: Option<String>,
    pub directory_class: Option<String>,
    pub history_class: Option<String>,
    pub min_cells: Option<usize>,
    pub price_col: Option<usize>,
    pub volume_col: Option<usize>,
    pub date_col: Option<usize>,
    pub workers: Option<usize>,
    pub pause_ms: Option<u64>,
    pub months: Option<u32>,
    /// `YYYY-MM-DD`; set together with `end`.
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilePredict {
    pub model_path: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
    pub top_colleges: Option<usize>,
    pub strict_categories: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}

fn config_date(text: &str) -> Result<NaiveDate> {
    parse_date(text).ok_or_else(|| Error::Config(format!("bad date: {text}")))
}

impl AppOptions {
    /// Defaults, overlaid with `path` when it exists.
    pub fn load(path: &Path) -> Result<Self> {
        let mut opts = AppOptions::default();
        if path.exists() {
            let text = fs::read_to_string(path)?;
            opts.apply(FileConfig::parse(&text)?)?;
            logd!("Loaded config from {}", path.display());
        }
        Ok(opts)
    }

    pub fn apply(&mut self, file: FileConfig) -> Result<()> {
        let s = &mut self.scrape;
        let f = file.scrape;
        if let Some(v) = f.origin { s.origin = v; }
        if let Some(v) = f.listing_path { s.listing_path = v; }
        if let Some(v) = f.directory_class { s.directory.table_class = v; }
        if let Some(v) = f.history_class { s.history.table_class = v; }
        if let Some(v) = f.min_cells { s.history.min_cells = v; }
        if let Some(v) = f.price_col { s.history.price_col = v; }
        if let Some(v) = f.volume_col { s.history.volume_col = v; }
        if let Some(v) = f.date_col { s.history.date_col = v; }
        if let Some(v) = f.workers { s.workers = v.max(1); }
        if let Some(v) = f.pause_ms { s.pause_ms = v; }
        if let Some(v) = f.months { s.window = DateWindow::LastMonths(v); }
        match (f.start, f.end) {
            (Some(start), Some(end)) => {
                s.window = DateWindow::range(config_date(&start)?, config_date(&end)?)?;
            }
            (None, None) => {}
            _ => return Err(Error::Config(s!("scrape.start and scrape.end must be set together"))),
        }
        s.history.validate().map_err(Error::Config)?;

        let p = &mut self.predict;
        let f = file.predict;
        if let Some(v) = f.model_path { p.model_path = v; }
        if let Some(v) = f.dataset_path { p.dataset_path = v; }
        if let Some(v) = f.top_colleges { p.top_colleges = v; }
        if let Some(v) = f.strict_categories { p.strict_categories = v; }
        Ok(())
    }
}
