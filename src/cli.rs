// src/cli.rs
use std::path::PathBuf;

use crate::config::consts::{LOG_FILE, STORE_DIR};
use crate::config::options::{AppOptions, ExportFormat, SourceShape};
use crate::core::net::HttpTransport;
use crate::error::{Error, Result};
use crate::inventory::{Inventory, JsonInventory};
use crate::progress::ConsoleProgress;
use crate::runner::{self, MappingSource};

pub enum Command {
    Run { opts: AppOptions, store_dir: PathBuf },
    Help,
}

pub fn run() -> Result<()> {
    match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            eprintln!("{}", include_str!("cli_help.txt"));
            Ok(())
        }
        Command::Run { opts, store_dir } => run_with(&opts, &store_dir),
    }
}

fn run_with(opts: &AppOptions, store_dir: &std::path::Path) -> Result<()> {
    crate::log::init(&store_dir.join(LOG_FILE));
    logf!("Starting run: {:?}", opts);

    let inventory = match &opts.inventory {
        Some(path) => Some(JsonInventory::from_path(path)?),
        None => None,
    };
    let mut transport = HttpTransport::new()?;
    let mut progress = ConsoleProgress::default();

    let summary = runner::run(
        opts,
        &mut transport,
        inventory.as_ref().map(|i| i as &dyn Inventory),
        Some(&mut progress),
    )?;

    let source = match summary.mapping_source {
        MappingSource::Cache => s!("cache"),
        MappingSource::Fresh => format!("documentation ({} categories)", summary.categories),
    };
    println!("Mapped {} resource types from {}", summary.mapped_types, source);
    for path in &summary.files_written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Hand-rolled flag parser. `--store-dir` rebases the cache, structure and
/// log paths together.
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = AppOptions::default();
    let mut store_dir = PathBuf::from(STORE_DIR);
    let mut write_structure = true;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--url" => opts.source.doc_url = value(&mut args, &a)?,
            "--shape" => {
                let v = value(&mut args, &a)?;
                opts.source.shape = match v.to_ascii_lowercase().as_str() {
                    "tree" => SourceShape::Tree,
                    "sections" => SourceShape::Sections,
                    other => return Err(Error::Usage(format!("Unknown shape: {other}"))),
                };
            }
            "--category" => opts.source.category_filter = Some(value(&mut args, &a)?),
            "--no-structure" => write_structure = false,
            "--force-refresh" => opts.cache.force_refresh = true,
            "--cache-ttl-hours" => opts.cache.ttl_hours = number(&mut args, &a)?,
            "--delay-ms" => opts.pacing.delay_ms = number(&mut args, &a)?,
            "--inventory" => opts.inventory = Some(PathBuf::from(value(&mut args, &a)?)),
            "-o" | "--out" => opts.export.out = Some(PathBuf::from(value(&mut args, &a)?)),
            "--format" => {
                let v = value(&mut args, &a)?;
                opts.export.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => ExportFormat::Csv,
                    "tsv" => ExportFormat::Tsv,
                    other => return Err(Error::Usage(format!("Unknown format: {other}"))),
                };
            }
            "--no-headers" => opts.export.include_headers = false,
            "--store-dir" => store_dir = PathBuf::from(value(&mut args, &a)?),
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(Error::Usage(format!("Unknown arg: {a} (try --help)"))),
        }
    }

    let mut opts = opts.with_store_dir(&store_dir);
    if !write_structure {
        opts.source.structure_path = None;
    }
    Ok(Command::Run { opts, store_dir })
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| Error::Usage(format!("Missing value for {flag}")))
}

fn number(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<u64> {
    let v = value(args, flag)?;
    v.parse().map_err(|_| Error::Usage(format!("{flag} expects a whole number, got '{v}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    fn opts(args: &[&str]) -> (AppOptions, PathBuf) {
        match parse(args).unwrap() {
            Command::Run { opts, store_dir } => (opts, store_dir),
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn defaults_without_args() {
        let (o, dir) = opts(&[]);
        assert_eq!(dir, PathBuf::from(".store"));
        assert_eq!(o.cache.path, PathBuf::from(".store").join("table_map.json"));
        assert_eq!(o.source.shape, SourceShape::Tree);
        assert!(o.inventory.is_none());
    }

    #[test]
    fn flags_fill_options() {
        let (o, dir) = opts(&[
            "--shape", "sections", "--category", "Storage", "--force-refresh",
            "--delay-ms", "0", "--cache-ttl-hours", "6", "--format", "TSV",
            "--no-headers", "--inventory", "inv.json", "-o", "out/", "--store-dir", "tmp/st",
        ]);
        assert_eq!(o.source.shape, SourceShape::Sections);
        assert_eq!(o.source.category_filter.as_deref(), Some("Storage"));
        assert!(o.cache.force_refresh);
        assert_eq!(o.pacing.delay_ms, 0);
        assert_eq!(o.cache.ttl_hours, 6);
        assert_eq!(o.export.format, ExportFormat::Tsv);
        assert!(!o.export.include_headers);
        assert_eq!(o.inventory, Some(PathBuf::from("inv.json")));
        assert_eq!(dir, PathBuf::from("tmp/st"));
        assert_eq!(o.cache.path, PathBuf::from("tmp/st").join("table_map.json"));
    }

    #[test]
    fn no_structure_clears_path() {
        let (o, _) = opts(&["--no-structure"]);
        assert!(o.source.structure_path.is_none());
    }

    #[test]
    fn usage_errors() {
        assert!(matches!(parse(&["--bogus"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["--url"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["--delay-ms", "soon"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["--shape", "grid"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["-h"]), Ok(Command::Help)));
    }
}
