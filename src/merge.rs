// Fallback Merger
// Fills primary output cells that came out empty from alternative source columns.

use crate::error::{Result, RowLocation};
use crate::sanitize::Sanitize;
use crate::schema::{ColumnRoles, OutputRow};

/// Return `row` with empty primary cells filled from `roles.fallbacks`.
///
/// Pairs are applied strictly in list order. A cell that is already
/// non-empty is never touched, and an empty fallback value leaves the cell
/// empty.
pub fn merge_fallback<T: Sanitize>(
    mut row: OutputRow,
    original: &[T],
    roles: &ColumnRoles,
    location: RowLocation<'_>,
) -> Result<OutputRow> {
    for &(dest, src) in roles.fallbacks {
        if !row.is_empty(dest) {
            continue;
        }
        let cell = original
            .get(src)
            .ok_or_else(|| location.malformed(src, original.len()))?;
        let data = cell.sanitize(roles.is_amount(src));
        if data.is_empty() {
            continue;
        }
        row.set(dest, data);
    }
    Ok(row)
}
