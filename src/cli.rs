// src/cli.rs
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::config::consts::{CONFIG_FILE, LOG_FILE};
use crate::config::options::{AppOptions, ExportFormat, ExportOptions, ExportType, ScrapeOptions};
use crate::core::{HttpSource, PageSource};
use crate::error::{Error, Result};
use crate::predict::{Catalog, FeatureRow, Indicator, Predictor};
use crate::prices::{parse_date, DateWindow, PriceTable};
use crate::progress::Progress;
use crate::{file, log, scrape, store};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Scrape(ScrapeArgs),
    Predict(PredictArgs),
    Teams,
    Colleges,
    Help,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrapeArgs {
    pub window: Option<DateWindow>,
    pub workers: Option<usize>,
    pub cached: bool,
    pub company: Option<String>,
    pub out: Option<String>,
    pub format: Option<ExportFormat>,
    pub per_entity: bool,
    pub no_headers: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictArgs {
    pub team: Option<String>,
    pub college: Option<String>,
    pub age: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub draft: Option<i64>,
    pub years: Option<i64>,
    pub strict: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub config: PathBuf,
    pub log_file: bool,
    pub model: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = parse_cli(std::env::args().skip(1))?;
    if cli.log_file {
        log::init_file(Path::new(LOG_FILE))?;
    } else {
        log::init();
    }
    execute(cli, Local::now().date_naive())
}

pub fn parse_cli<I: IntoIterator<Item = String>>(args: I) -> Result<Cli> {
    let mut args = args.into_iter();
    let usage = |m: &str| Error::Usage(s!(m));

    let mut command = match args.next().as_deref() {
        Some("scrape") => Command::Scrape(ScrapeArgs::default()),
        Some("predict") => Command::Predict(PredictArgs::default()),
        Some("teams") => Command::Teams,
        Some("colleges") => Command::Colleges,
        Some("-h" | "--help" | "help") | None => Command::Help,
        Some(other) => return Err(Error::Usage(format!("unknown command: {other}"))),
    };
    let mut cli = Cli {
        command: Command::Help,
        config: PathBuf::from(CONFIG_FILE),
        log_file: false,
        model: None,
        dataset: None,
    };

    while let Some(a) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| Error::Usage(format!("missing value for {name}")));

        // shared flags
        match a.as_str() {
            "--config" => { cli.config = PathBuf::from(value("--config")?); continue; }
            "--log-file" => { cli.log_file = true; continue; }
            "--model" => { cli.model = Some(PathBuf::from(value("--model")?)); continue; }
            "--dataset" => { cli.dataset = Some(PathBuf::from(value("--dataset")?)); continue; }
            "-h" | "--help" => { command = Command::Help; continue; }
            _ => {}
        }

        match &mut command {
            Command::Scrape(s) => match a.as_str() {
                "--months" => s.window = Some(DateWindow::LastMonths(parse_num(&value("--months")?)?)),
                "--all-dates" => s.window = Some(DateWindow::All),
                "--range" => {
                    let v = value("--range")?;
                    let (from, to) = v.split_once("..").ok_or_else(|| usage("--range wants FROM..TO"))?;
                    s.window = Some(DateWindow::range(arg_date(from)?, arg_date(to)?)?);
                }
                "--workers" => s.workers = Some(parse_num::<usize>(&value("--workers")?)?.max(1)),
                "--cached" => s.cached = true,
                "--company" => s.company = Some(value("--company")?),
                "-o" | "--out" => s.out = Some(value("--out")?),
                "--format" => s.format = Some(ExportFormat::parse(&value("--format")?)?),
                "--per-entity" => s.per_entity = true,
                "--no-headers" => s.no_headers = true,
                _ => return Err(Error::Usage(format!("unknown arg: {a}"))),
            },
            Command::Predict(p) => match a.as_str() {
                "--team" => p.team = Some(value("--team")?),
                "--college" => p.college = Some(value("--college")?),
                "--age" => p.age = Some(parse_num(&value("--age")?)?),
                "--height" => p.height = Some(parse_num(&value("--height")?)?),
                "--weight" => p.weight = Some(parse_num(&value("--weight")?)?),
                "--draft" => p.draft = Some(parse_num(&value("--draft")?)?),
                "--years" => p.years = Some(parse_num(&value("--years")?)?),
                "--strict" => p.strict = true,
                _ => return Err(Error::Usage(format!("unknown arg: {a}"))),
            },
            Command::Teams | Command::Colleges | Command::Help => {
                return Err(Error::Usage(format!("unknown arg: {a}")));
            }
        }
    }

    cli.command = command;
    Ok(cli)
}

fn parse_num<T: std::str::FromStr>(v: &str) -> Result<T> {
    v.trim().parse().map_err(|_| Error::Usage(format!("not a number: {v}")))
}

fn arg_date(v: &str) -> Result<NaiveDate> {
    parse_date(v).ok_or_else(|| Error::Usage(format!("not a date: {v}")))
}

pub fn execute(cli: Cli, today: NaiveDate) -> Result<()> {
    let mut opts = AppOptions::load(&cli.config)?;
    if let Some(p) = cli.model { opts.predict.model_path = p; }
    if let Some(p) = cli.dataset { opts.predict.dataset_path = p; }

    match cli.command {
        Command::Help => {
            eprintln!(include_str!("cli_help.txt"));
            Ok(())
        }
        Command::Teams => list_catalog(&opts, |c| &c.teams),
        Command::Colleges => list_catalog(&opts, |c| &c.colleges),
        Command::Predict(args) => run_predict(opts, args),
        Command::Scrape(args) => run_scrape(opts, args, today),
    }
}

fn list_catalog(opts: &AppOptions, pick: impl Fn(&Catalog) -> &Vec<String>) -> Result<()> {
    let catalog = Catalog::load(&opts.predict.dataset_path, opts.predict.top_colleges)?;
    for v in pick(&catalog) {
        println!("{v}");
    }
    Ok(())
}

fn run_predict(mut opts: AppOptions, args: PredictArgs) -> Result<()> {
    opts.predict.strict_categories |= args.strict;
    let need = |v: Option<i64>, name: &str| v.ok_or_else(|| Error::Usage(format!("predict needs {name}")));

    let row = FeatureRow {
        age: need(args.age, "--age")?,
        height: need(args.height, "--height")? as f64,
        weight: need(args.weight, "--weight")? as f64,
        draft_number: need(args.draft, "--draft")?,
        years_in_league: need(args.years, "--years")?,
        team_code: args.team.ok_or_else(|| Error::Usage(s!("predict needs --team")))?,
        college_name: args.college.ok_or_else(|| Error::Usage(s!("predict needs --college")))?,
    };

    let predictor = Predictor::load(&opts.predict)?;
    let prediction = predictor.predict(&row)?;

    for miss in &prediction.unknown {
        if let Indicator::Unknown { field, value } = miss {
            eprintln!("warning: model has no column for {} {:?}; prediction ignores it", field.label(), value);
        }
    }
    println!("Predictions");
    for (label, v) in prediction.result.labelled() {
        println!("  {label}: {v:.1}");
    }
    Ok(())
}

/// Prints per-entity status lines to stderr.
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, _idx: usize, name: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {}", self.seen, self.total, name);
    }
    fn item_failed(&mut self, _idx: usize, name: &str, reason: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {} FAILED: {}", self.seen, self.total, name, reason);
    }
}

fn run_scrape(mut opts: AppOptions, args: ScrapeArgs, today: NaiveDate) -> Result<()> {
    if let Some(w) = args.window { opts.scrape.window = w; }
    if let Some(n) = args.workers { opts.scrape.workers = n; }

    let source = HttpSource::new()?;
    let table = load_or_scrape(&source, &opts.scrape, args.cached, &store::cache_path(), today)?;
    print_summary(&table, args.company.as_deref());

    if let Some(out) = args.out {
        let export = &mut opts.export;
        if let Some(f) = args.format { export.format = f; }
        if args.per_entity { export.export_type = ExportType::PerEntity; }
        export.include_headers = !args.no_headers;
        export.set_path(&out);

        for path in export_table(export, &table, args.company.as_deref())? {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// The windowed table, either scraped fresh (and cached unwindowed at `cache`)
/// or reloaded from `cache` and windowed with the current options.
pub fn load_or_scrape(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    cached: bool,
    cache: &Path,
    today: NaiveDate,
) -> Result<PriceTable> {
    if cached {
        let full = store::load_prices(cache)?
            .ok_or_else(|| Error::Usage(s!("no cached scrape yet; run without --cached")))?;
        logd!("Loaded {} cached rows from {}", full.len(), cache.display());
        return Ok(full.windowed(opts.window, today));
    }

    let mut progress = ConsoleProgress { total: 0, seen: 0 };
    let mut memo = store::ScrapeMemo::new();
    let report = memo.trigger(|| scrape::collect_prices(source, opts, today, Some(&mut progress)))?;
    for notice in report.notices() {
        eprintln!("warning: {notice}");
    }
    if let Err(e) = store::save_prices(cache, &report.full) {
        loge!("Could not write cache: {e}");
    }
    Ok(report.table.clone())
}

/// Export `table`, or only `company`'s rows when one is named.
pub fn export_table(export: &ExportOptions, table: &PriceTable, company: Option<&str>) -> Result<Vec<PathBuf>> {
    let (headers, mut rows) = table.to_rows();
    if let Some(c) = company {
        rows.retain(|r| r.get(file::ENTITY_COL).map(String::as_str) == Some(c));
    }
    file::export_dataset(export, &headers, &rows)
}

fn print_summary(table: &PriceTable, company: Option<&str>) {
    if table.bad_prices > 0 {
        eprintln!("note: {} price cells were not numbers (shown as NaN)", table.bad_prices);
    }
    if table.bad_dates > 0 {
        eprintln!("note: {} rows had unreadable dates and were dropped", table.bad_dates);
    }

    match company {
        Some(name) => {
            let Some((lo, hi)) = table.date_bounds(name) else {
                println!("{name}: no rows in range");
                return;
            };
            println!("{name}: {lo} .. {hi}");
            for p in table.for_entity(name) {
                println!("  {}  {:>12.2}  {:>12}", p.date, p.highest_price, p.volume);
            }
        }
        None => {
            for name in &table.entities {
                let n = table.for_entity(name).count();
                match table.date_bounds(name) {
                    Some((lo, hi)) => println!("{name}: {n} rows, {lo} .. {hi}"),
                    None => println!("{name}: no rows in range"),
                }
            }
        }
    }
}
