// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific readers for the documentation site. Each spec encodes
//! *where the ground truth lives in the markup* and returns plain data.
//!
//! - `structure` – the tables-by-category page → ordered `DocTree`
//!   (category → provider → resource type + tables).
//! - `sections` – flat heading + `<ul>/<li>` pages → `ListSection`s.
//!
//! Specs only read. Validation, overrides and caching happen in `mapping`
//! and `store`; networking in `core::net`.
//!
//! Conventions:
//! - Case-insensitive tag detection over the raw text; no DOM.
//! - Document order is preserved everywhere (`IndexMap`, `Vec`).
//! - Testable offline against inline fixtures.
pub mod sections;
pub mod structure;

pub use sections::{extract_sections, ListSection};
pub use structure::{extract, extract_with_source};
