// src/pipeline/remap.rs

//! Renames source identifier columns to their destination names.
//!
//! The destination store keys its own rows and keeps the vendor's
//! identifiers in `old_*` columns.

use crate::models::Table;

/// Source column to destination column.
pub const ID_RENAMES: [(&str, &str); 4] = [
    ("restaurant_id", "old_restaurant_id"),
    ("period_id", "old_period_id"),
    ("category_id", "old_category_id"),
    ("food_id", "old_food_id"),
];

/// Destination name for a source identifier column, if it has one.
pub fn destination_name(column: &str) -> Option<&'static str> {
    ID_RENAMES
        .iter()
        .find(|(from, _)| *from == column)
        .map(|(_, to)| *to)
}

/// Apply [`ID_RENAMES`] in place. Returns the number of columns renamed.
///
/// Absent columns are skipped, so applying this twice changes nothing
/// the second time.
pub fn remap_ids(table: &mut Table) -> usize {
    ID_RENAMES
        .iter()
        .filter(|(from, to)| table.rename_column(from, to))
        .count()
}
