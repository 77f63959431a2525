// src/runner.rs
use std::path::PathBuf;

use crate::{
    config::options::{AppOptions, SourceShape},
    core::{
        net::{self, RetryPolicy, Transport},
        DiagnosticKind, Diagnostics,
    },
    error::{Error, Result},
    inventory::{Inventory, Resource, Subscription},
    mapping::{self, MappingIndex},
    progress::{NullProgress, Progress},
    report::{self, ReportRow},
    resolve::Resolver,
    specs,
    store::{self, CacheStore},
};

/// Where this run's mapping index came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingSource {
    Cache,
    Fresh,
}

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub mapping_source: MappingSource,
    /// Categories extracted from the page; 0 when served from cache.
    pub categories: usize,
    pub mapped_types: usize,
    pub rows: Vec<ReportRow>,
    pub files_written: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

/// Top-level runner: obtain the mapping index, then classify the inventory
/// (if any) and write the report.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    opts: &AppOptions,
    transport: &mut dyn Transport,
    inventory: Option<&dyn Inventory>,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    let result = pipeline(opts, transport, inventory, progress);
    if let Err(e) = &result {
        loge!("Run failed: {e}");
        progress.log(&format!("Run failed: {e}"));
    }
    progress.finish();
    result
}

fn pipeline(
    opts: &AppOptions,
    transport: &mut dyn Transport,
    inventory: Option<&dyn Inventory>,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let mut diags = Diagnostics::new();
    let mut written = Vec::new();

    let cache = CacheStore::new(&opts.cache.path, opts.cache.ttl());
    let (index, mapping_source, categories) = match cache.load(opts.cache.force_refresh, &mut diags) {
        Some(index) => {
            progress.log(&format!("Using cached table map ({} resource types)", index.len()));
            (index, MappingSource::Cache, 0)
        }
        None => {
            let (index, categories) = refresh(opts, transport, &cache, &mut diags, &mut written, progress)?;
            (index, MappingSource::Fresh, categories)
        }
    };
    let mapped_types = index.len();

    let rows = match inventory {
        Some(inv) => {
            let mut resolver = Resolver::new(index);
            let rows = classify(opts, inv, &mut resolver, &mut diags, progress)?;
            diags.append(&mut resolver.take_diagnostics());

            let out = opts.export.out_path();
            written.push(report::write_report(&out, &rows, &opts.export)?);
            let unknown = rows.iter().filter(|r| !r.is_resolved()).count();
            progress.log(&format!("{} rows ({} unknown) → {}", rows.len(), unknown, out.display()));
            rows
        }
        None => Vec::new(),
    };

    if !diags.is_empty() {
        progress.log(&format!("{} diagnostics:", diags.len()));
        for d in diags.iter() {
            progress.log(&format!("  {d}"));
        }
    }
    logf!(
        "Run finished: {:?} mapping, {} types, {} rows, {} diagnostics",
        mapping_source,
        mapped_types,
        rows.len(),
        diags.len()
    );

    Ok(RunSummary { mapping_source, categories, mapped_types, rows, files_written: written, diagnostics: diags })
}

/* ---------------- Mapping refresh ---------------- */

fn refresh(
    opts: &AppOptions,
    transport: &mut dyn Transport,
    cache: &CacheStore,
    diags: &mut Diagnostics,
    written: &mut Vec<PathBuf>,
    progress: &mut dyn Progress,
) -> Result<(MappingIndex, usize)> {
    let url = opts.source.doc_url.as_str();
    progress.log(&format!("Fetching {url}"));
    let policy = RetryPolicy { pace: opts.pacing.delay(), ..RetryPolicy::default() };
    let markup = net::fetch(transport, url, &policy, diags)?;

    let filter = opts.source.category_filter.as_deref();
    let tree = specs::extract_with_source(&markup, filter, url);
    if tree.is_empty() {
        loge!("No categories extracted from {url} (filter: {filter:?})");
        return Err(Error::NoCategories { url: url.to_string() });
    }
    progress.log(&format!("Extracted {} categories, {} tables", tree.len(), tree.table_count()));

    if let Some(path) = &opts.source.structure_path {
        store::save_structure(path, &tree)?;
        written.push(path.clone());
    }

    let index = match opts.source.shape {
        SourceShape::Tree => mapping::build(&tree, diags),
        SourceShape::Sections => mapping::build_from_sections(&markup, diags),
    };

    if filter.is_some() {
        logf!("Category filter active; cache left untouched");
    } else {
        cache.save(&index)?;
        written.push(cache.path().to_path_buf());
    }
    Ok((index, tree.len()))
}

/* ---------------- Inventory classification ---------------- */

fn classify(
    opts: &AppOptions,
    inv: &dyn Inventory,
    resolver: &mut Resolver,
    diags: &mut Diagnostics,
    progress: &mut dyn Progress,
) -> Result<Vec<ReportRow>> {
    let delay = opts.pacing.delay();
    let mut rows = Vec::new();

    for sub in inv.subscriptions()? {
        let resources = match inv.resources(&sub) {
            Ok(r) => r,
            Err(e) => {
                diags.push(DiagnosticKind::Inventory, format!("{}: {e}", sub.name));
                progress.item_failed(&sub.name, &e.to_string());
                continue;
            }
        };
        progress.log(&format!("Subscription {} ({} resources)", sub.name, resources.len()));
        progress.begin(resources.len());

        for res in &resources {
            match classify_resource(&sub, res, inv, resolver, delay, &mut rows) {
                Ok(()) => progress.item_done(&res.name),
                Err(e) => {
                    diags.push(DiagnosticKind::Inventory, format!("{}: {e}", res.resource_id));
                    progress.item_failed(&res.name, &e.to_string());
                }
            }
            net::pause(delay);
        }
    }
    Ok(rows)
}

fn classify_resource(
    sub: &Subscription,
    res: &Resource,
    inv: &dyn Inventory,
    resolver: &mut Resolver,
    delay: std::time::Duration,
    rows: &mut Vec<ReportRow>,
) -> Result<()> {
    let categories = inv.diagnostic_categories(res)?;
    let enabled = inv.enabled_categories(res)?;
    for cat in &categories {
        let resolution = resolver.resolve(&res.resource_type, &cat.name, cat.category_type);
        let is_enabled = enabled.iter().any(|e| e.eq_ignore_ascii_case(&cat.name));
        rows.push(ReportRow::new(sub, res, cat, &resolution, is_enabled));
        net::pause(delay);
    }
    Ok(())
}
