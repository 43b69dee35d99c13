// src/pipeline/fuse.rs

//! Cross-vendor fusion of one record kind.

use serde_json::Value;

use crate::error::Result;
use crate::models::{RecordKind, Table};
use crate::pipeline::invoke::{Outcome, PROVENANCE_COLUMN, safe_invoke};
use crate::pipeline::snapshot::MenuSnapshot;

/// A deferred extraction for one vendor.
pub struct Source<'a> {
    vendor: &'a str,
    extract: Box<dyn FnOnce() -> Result<Table> + 'a>,
}

impl<'a> Source<'a> {
    pub fn new(vendor: &'a str, extract: impl FnOnce() -> Result<Table> + 'a) -> Self {
        Self {
            vendor,
            extract: Box::new(extract),
        }
    }
}

/// The fused table for one kind, with per-vendor outcomes.
#[derive(Debug, Clone)]
pub struct Fusion {
    pub kind: RecordKind,
    /// Fused rows; still carries the provenance column
    pub table: Table,
    pub outcomes: Vec<(String, Outcome)>,
}

impl Fusion {
    /// Vendors whose extraction failed, with the rendered error.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(vendor, outcome)| match outcome {
            Outcome::Failed(message) => Some((vendor.as_str(), message.as_str())),
            _ => None,
        })
    }

    /// Drop the provenance column and return the table.
    pub fn strip_provenance(self) -> Table {
        let mut table = self.table;
        table.drop_column(PROVENANCE_COLUMN);
        table
    }
}

/// Identifier columns are `id` or end in `_id`.
pub fn is_id_column(name: &str) -> bool {
    name == "id" || name.ends_with("_id")
}

/// Render an identifier cell as a string, keeping nulls null.
fn id_to_string(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(s),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => Value::String(other.to_string()),
    }
}

/// Cast every identifier column of `table` to strings.
pub fn canonicalize_ids(table: &mut Table) {
    let id_columns: Vec<String> = table
        .columns()
        .iter()
        .filter(|name| is_id_column(name))
        .cloned()
        .collect();
    for name in id_columns {
        table.map_column(&name, id_to_string);
    }
}

/// Run every source through the safe invoker and concatenate the results.
///
/// Row order follows source order. The column set is the union of what the
/// vendors produced; a failing vendor contributes no rows and no columns.
pub fn fuse<'a>(kind: RecordKind, sources: impl IntoIterator<Item = Source<'a>>) -> Fusion {
    let mut tables = Vec::new();
    let mut outcomes = Vec::new();

    for source in sources {
        let invocation = safe_invoke(source.vendor, kind.operation(), source.extract);
        outcomes.push((invocation.vendor, invocation.outcome));
        tables.push(invocation.table);
    }

    let mut table = Table::concat(tables);
    canonicalize_ids(&mut table);

    Fusion {
        kind,
        table,
        outcomes,
    }
}

/// Fuse `kind` across every vendor in the snapshot that exposes it.
pub fn fuse_kind(snapshot: &MenuSnapshot, kind: RecordKind) -> Fusion {
    let sources = snapshot
        .feeds()
        .iter()
        .filter(|feed| feed.vendor.exposes(kind))
        .map(|feed| Source::new(&feed.vendor.label, move || feed.extract(kind)));
    fuse(kind, sources)
}

pub fn fuse_periods(snapshot: &MenuSnapshot) -> Fusion {
    fuse_kind(snapshot, RecordKind::Periods)
}

pub fn fuse_categories(snapshot: &MenuSnapshot) -> Fusion {
    fuse_kind(snapshot, RecordKind::Categories)
}

pub fn fuse_foods(snapshot: &MenuSnapshot) -> Fusion {
    fuse_kind(snapshot, RecordKind::Foods)
}

pub fn fuse_nutrients(snapshot: &MenuSnapshot) -> Fusion {
    fuse_kind(snapshot, RecordKind::Nutrients)
}
