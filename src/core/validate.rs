// src/core/validate.rs
//
// Table-name plausibility check and the run-wide diagnostics list.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex"));
static CORRUPT: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^[A-Za-z]$").expect("static regex"),
        Regex::new(r"^[A-Za-z]{2}$").expect("static regex"),
        Regex::new(r"^[0-9]+$").expect("static regex"),
    ]
});

/// Is `name` a syntactically plausible log table identifier?
pub fn is_valid_table_name(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }
    if name.chars().count() < 3 {
        return false;
    }
    if !IDENT.is_match(name) {
        return false;
    }
    !CORRUPT.iter().any(|re| re.is_match(name))
}

/// `is_valid_table_name`, recording a diagnostic when the name is rejected.
pub fn validate_or_record(name: &str, context: &str, diags: &mut Diagnostics) -> bool {
    let ok = is_valid_table_name(name);
    if !ok {
        diags.push(DiagnosticKind::Validation, format!("{context}: dropped invalid table name {name:?}"));
    }
    ok
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Validation,
    Cache,
    Fetch,
    Resolution,
    Inventory,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Validation => "validation",
            DiagnosticKind::Cache => "cache",
            DiagnosticKind::Fetch => "fetch",
            DiagnosticKind::Resolution => "resolution",
            DiagnosticKind::Inventory => "inventory",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Non-fatal issues collected over one run, surfaced once at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        logw!("{kind}: {message}");
        self.items.push(Diagnostic { kind, message });
    }

    pub fn append(&mut self, other: &mut Diagnostics) {
        self.items.append(&mut other.items);
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.items.iter() }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }
}
