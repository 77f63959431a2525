// src/core/mod.rs

pub mod html;
pub mod net;
pub mod sanitize;
pub mod validate;

pub use validate::{is_valid_table_name, Diagnostic, DiagnosticKind, Diagnostics};
