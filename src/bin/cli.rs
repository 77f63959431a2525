// src/bin/cli.rs
use color_eyre::eyre::Result;
use diag_tables::cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    cli::run()?;
    Ok(())
}
