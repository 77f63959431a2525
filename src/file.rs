// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::write_row;
use crate::error::{Error, Result};

/// Create/truncate `path` and write `headers` (optional) plus `rows`.
pub fn write_rows<S: AsRef<str>>(
    path: &Path,
    headers: Option<&[S]>,
    rows: &[Vec<String>],
    sep: char,
) -> Result<PathBuf> {
    ensure_parent(path)?;
    let io_err = |e| Error::io(path, e);
    let file = File::create(path).map_err(io_err)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    if let Some(h) = headers {
        write_row(&mut out, h, sep).map_err(io_err)?;
    }
    for row in rows {
        write_row(&mut out, row, sep).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    Ok(path.to_path_buf())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?; }
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
