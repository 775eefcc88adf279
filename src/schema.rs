// Output Schema + Column Role Tables
// The fixed five-column layout consumed by the KMyMoney csv importer and the
// per-format tables that map source columns onto it.

use serde::{Deserialize, Serialize};

/// Delimiter of every emitted file. Sanitized cells never contain it.
pub const OUTPUT_DELIMITER: char = ';';

/// Separator between label and value on one memo line.
pub const MEMO_SEPARATOR: &str = " - ";

// ============================================================================
// OUTPUT COLUMNS
// ============================================================================

/// OutputColumn - one field of the normalized output row, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputColumn {
    ReferenceNumber,
    Date,
    Payee,
    Amount,
    Memo,
}

impl OutputColumn {
    /// All columns in output order
    pub const ALL: [OutputColumn; 5] = [
        OutputColumn::ReferenceNumber,
        OutputColumn::Date,
        OutputColumn::Payee,
        OutputColumn::Amount,
        OutputColumn::Memo,
    ];

    /// Columns that can be filled straight from a source column (Memo is synthesized)
    pub const PRIMARY: [OutputColumn; 4] = [
        OutputColumn::ReferenceNumber,
        OutputColumn::Date,
        OutputColumn::Payee,
        OutputColumn::Amount,
    ];

    /// Position in the output row
    pub fn index(&self) -> usize {
        match self {
            OutputColumn::ReferenceNumber => 0,
            OutputColumn::Date => 1,
            OutputColumn::Payee => 2,
            OutputColumn::Amount => 3,
            OutputColumn::Memo => 4,
        }
    }

    /// Header label written in the first output row
    pub fn description(&self) -> &'static str {
        match self {
            OutputColumn::ReferenceNumber => "Reference number",
            OutputColumn::Date => "Date",
            OutputColumn::Payee => "Payee",
            OutputColumn::Amount => "Amount",
            OutputColumn::Memo => "Memo",
        }
    }
}

/// Canonical header row of every output file
pub fn output_header() -> OutputRow {
    OutputRow {
        cells: OutputColumn::ALL.map(|c| c.description().to_string()),
    }
}

// ============================================================================
// OUTPUT ROW
// ============================================================================

/// OutputRow - exactly five cells, ordered as [`OutputColumn::ALL`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    cells: [String; 5],
}

impl OutputRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: OutputColumn) -> &str {
        &self.cells[column.index()]
    }

    pub fn set(&mut self, column: OutputColumn, value: String) {
        self.cells[column.index()] = value;
    }

    pub fn is_empty(&self, column: OutputColumn) -> bool {
        self.cells[column.index()].is_empty()
    }

    pub fn cells(&self) -> &[String; 5] {
        &self.cells
    }
}

// ============================================================================
// COLUMN ROLE TABLE
// ============================================================================

/// ColumnRoles - static description of how one source format maps onto the output
///
/// Indices are positions in the source row of that format and mean nothing
/// outside of it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRoles {
    /// Source index for ReferenceNumber, Date, Payee and Amount (in that order).
    /// `None` leaves the output cell empty unless a fallback fills it.
    pub primary: [Option<usize>; 4],
    /// Columns holding monetary values (decimal comma normalization)
    pub amounts: &'static [usize],
    /// Columns that open the memo, in this order
    pub memo_priority: &'static [usize],
    /// Non-primary columns that never show up in the memo
    pub memo_excluded: &'static [usize],
    /// Applied in order when the destination is still empty after mapping
    pub fallbacks: &'static [(OutputColumn, usize)],
}

impl ColumnRoles {
    pub fn is_amount(&self, index: usize) -> bool {
        self.amounts.contains(&index)
    }

    pub fn is_primary(&self, index: usize) -> bool {
        self.primary.contains(&Some(index))
    }

    /// Primary and memo-excluded columns are both skipped by the memo
    pub fn is_memo_skipped(&self, index: usize) -> bool {
        self.is_primary(index) || self.memo_excluded.contains(&index)
    }

    /// Source index mapped onto the given output column, if any
    pub fn source_of(&self, column: OutputColumn) -> Option<usize> {
        match column {
            OutputColumn::Memo => None,
            other => self.primary[other.index()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: ColumnRoles = ColumnRoles {
        primary: [None, Some(1), None, Some(2)],
        amounts: &[0, 2],
        memo_priority: &[5, 6],
        memo_excluded: &[0],
        fallbacks: &[(OutputColumn::Amount, 0)],
    };

    #[test]
    fn test_output_header_order() {
        let header = output_header();
        assert_eq!(
            header.cells(),
            &["Reference number", "Date", "Payee", "Amount", "Memo"].map(String::from)
        );
    }

    #[test]
    fn test_output_column_indices_follow_all() {
        for (i, col) in OutputColumn::ALL.iter().enumerate() {
            assert_eq!(col.index(), i);
        }
    }

    #[test]
    fn test_output_row_set_get() {
        let mut row = OutputRow::new();
        assert!(row.is_empty(OutputColumn::Payee));
        row.set(OutputColumn::Payee, "ACME".to_string());
        assert_eq!(row.get(OutputColumn::Payee), "ACME");
        assert_eq!(row.cells().len(), 5);
    }

    #[test]
    fn test_roles_lookup() {
        assert_eq!(ROLES.source_of(OutputColumn::Date), Some(1));
        assert_eq!(ROLES.source_of(OutputColumn::ReferenceNumber), None);
        assert_eq!(ROLES.source_of(OutputColumn::Memo), None);
        assert!(ROLES.is_amount(0));
        assert!(!ROLES.is_amount(1));
        assert!(ROLES.is_memo_skipped(0));
        assert!(ROLES.is_memo_skipped(2));
        assert!(!ROLES.is_memo_skipped(5));
    }
}
