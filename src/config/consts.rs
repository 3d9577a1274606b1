// src/config/consts.rs

// Net config
pub const ORIGIN: &str = "https://www.mse.mn";
pub const LISTING_PATH: &str = "/en/mse_top_20/266";
pub const USER_AGENT: &str = concat!("statscrape/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Page markup contract
pub const DIRECTORY_TABLE_CLASS: &str =
    "table dividend trade_table table-bordered table-striped table-hover table-condensed";
pub const HISTORY_TABLE_CLASS: &str =
    "table table-bordered trade_history_result table-striped table-hover table-condensed";
pub const HISTORY_MIN_CELLS: usize = 8;
// 0-based cell positions in a history row
pub const HISTORY_PRICE_COL: usize = 1;
pub const HISTORY_VOLUME_COL: usize = 5;
pub const HISTORY_DATE_COL: usize = 7;

// Local cache
pub const STORE_DIR: &str = ".store";
pub const PRICES_CACHE_FILE: &str = "prices.csv";
pub const ENTITIES_CACHE_FILE: &str = "entities.csv";
pub const LOG_FILE: &str = ".store/debug.log";
pub const DEFAULT_LOG_FILTER: &str = "statscrape=info";
pub const CONFIG_FILE: &str = "statscrape.toml";

// Price window
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

// Predictor
pub const MODEL_FILE: &str = "nba_model.json";
pub const PLAYERS_DATASET: &str = "data/all_seasons.csv";
pub const TEAM_PREFIX: &str = "team_abbreviation_";
pub const COLLEGE_PREFIX: &str = "college_";
pub const TOP_COLLEGES: usize = 20;
pub const OTHER_COLLEGE: &str = "Other";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "prices";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
