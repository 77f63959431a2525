// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub source: SourceOptions,
    pub cache: CacheOptions,
    pub export: ExportOptions,
    pub pacing: PacingOptions,
    /// JSON inventory export to classify; `None` stops after the mapping phase.
    pub inventory: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            source: SourceOptions::default(),
            cache: CacheOptions::default(),
            export: ExportOptions::default(),
            pacing: PacingOptions::default(),
            inventory: None,
        }
    }
}

impl AppOptions {
    /// Rebase every default store path under `dir` (tests, alternate workspaces).
    pub fn with_store_dir(mut self, dir: &Path) -> Self {
        self.cache.path = dir.join(CACHE_FILE);
        self.source.structure_path = Some(dir.join(STRUCTURE_FILE));
        self
    }
}

/// How the documentation page is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceShape {
    /// h2 category → h3..h6 provider → `tables/` links
    Tree,
    /// flat heading + `<ul>/<li>` sections
    Sections,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    pub doc_url: String,
    pub shape: SourceShape,
    /// Exact, case-sensitive category name (after suffix normalization).
    pub category_filter: Option<String>,
    /// Where the ordered structure artifact goes; `None` skips writing it.
    pub structure_path: Option<PathBuf>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            doc_url: s!(DEFAULT_DOC_URL),
            shape: SourceShape::Tree,
            category_filter: None,
            structure_path: Some(PathBuf::from(STORE_DIR).join(STRUCTURE_FILE)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    pub path: PathBuf,
    pub ttl_hours: u64,
    pub force_refresh: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(STORE_DIR).join(CACHE_FILE),
            ttl_hours: CACHE_TTL_HOURS,
            force_refresh: false,
        }
    }
}

impl CacheOptions {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }
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
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Explicit report path; `None` → `out/diagnostic_settings.<ext>`.
    pub out: Option<PathBuf>,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out: None,
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// Report path. A user path ending in a separator (or naming an existing
    /// directory) gets the default file name appended.
    pub fn out_path(&self) -> PathBuf {
        let file_name = format!("{}.{}", DEFAULT_REPORT_STEM, self.format.ext());
        match &self.out {
            None => PathBuf::from(DEFAULT_OUT_DIR).join(file_name),
            Some(p) if crate::file::looks_like_dir_hint(p) || p.is_dir() => p.join(file_name),
            Some(p) => p.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacingOptions {
    /// Inter-call delay applied after fetches, per resource and per category.
    pub delay_ms: u64,
}

impl Default for PacingOptions {
    fn default() -> Self {
        Self { delay_ms: REQUEST_PAUSE_MS }
    }
}

impl PacingOptions {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
