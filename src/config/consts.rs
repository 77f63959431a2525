// src/config/consts.rs

// Source docs
pub const DEFAULT_DOC_URL: &str =
    "https://learn.microsoft.com/en-us/azure/azure-monitor/reference/tables-category";

// Net config
pub const USER_AGENT: &str = concat!("diag_tables/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;
pub const FETCH_ATTEMPTS: u32 = 3;
pub const FETCH_BACKOFF_SECS: u64 = 2;
pub const MIN_CONTENT_LEN: usize = 1000; // anything shorter is treated as truncated

// Local cache
pub const STORE_DIR: &str = ".store";
pub const CACHE_FILE: &str = "table_map.json";
pub const STRUCTURE_FILE: &str = "docs_structure.json";
pub const LOG_FILE: &str = "debug.log";
pub const CACHE_TTL_HOURS: u64 = 24;

// Resolution
pub const METRICS_TABLE: &str = "AzureMetrics";
pub const UNCATEGORIZED: &str = "Uncategorized";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_REPORT_STEM: &str = "diagnostic_settings";

// Pacing
pub const REQUEST_PAUSE_MS: u64 = 500; // be polite
