// Memo Aggregator
// Folds every non-primary column of a row into the single free-text memo.

use std::collections::HashSet;

use crate::sanitize::{scrub, Sanitize};
use crate::schema::{ColumnRoles, MEMO_SEPARATOR};

/// Build the memo cell for one source row.
///
/// Columns are visited in a fixed order: first `roles.memo_priority` as
/// listed, then every index in ascending order. Primary, excluded, already
/// visited and out-of-range columns are skipped, as are columns whose
/// sanitized value is empty. Each remaining column yields one
/// `"<label> - <value>"` line; lines are joined with `\n`.
pub fn build_memo<T, L>(row: &[T], labels: &[L], roles: &ColumnRoles) -> String
where
    T: Sanitize,
    L: AsRef<str>,
{
    let width = labels.len().max(row.len());
    let mut visited = HashSet::new();
    let mut lines = Vec::new();

    for index in roles.memo_priority.iter().copied().chain(0..width) {
        if roles.is_memo_skipped(index) || index >= row.len() || !visited.insert(index) {
            continue;
        }

        let value = row[index].sanitize(roles.is_amount(index));
        if value.is_empty() {
            continue;
        }

        let label = labels.get(index).map(|l| scrub(l.as_ref())).unwrap_or_default();
        lines.push(format!("{}{}{}", label, MEMO_SEPARATOR, scrub(&value)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::CellValue;
    use crate::schema::OutputColumn;

    const NO_FALLBACKS: &[(OutputColumn, usize)] = &[];

    fn roles(primary: [Option<usize>; 4], priority: &'static [usize]) -> ColumnRoles {
        ColumnRoles {
            primary,
            amounts: &[3],
            memo_priority: priority,
            memo_excluded: &[],
            fallbacks: NO_FALLBACKS,
        }
    }

    #[test]
    fn test_priority_empty_skipped() {
        // Alpha is empty, Beta has a value
        let roles = roles([None; 4], &[0, 1]);
        let memo = build_memo(&["", "hello"], &["Alpha", "Beta"], &roles);
        assert_eq!(memo, "Beta - hello");
    }

    #[test]
    fn test_priority_then_ascending() {
        let roles = roles([Some(0), None, None, None], &[4, 2]);
        let row = ["ref", "one", "two", "3,5", "four"];
        let labels = ["Ref", "One", "Two", "Three", "Four"];
        let memo = build_memo(&row, &labels, &roles);
        assert_eq!(memo, "Four - four\nTwo - two\nOne - one\nThree - 3.5");
    }

    #[test]
    fn test_primary_never_in_memo() {
        let roles = roles([Some(0), Some(1), Some(2), Some(3)], &[]);
        let memo = build_memo(&["a", "b", "c", "d", "e"], &["A", "B", "C", "D", "E"], &roles);
        assert_eq!(memo, "E - e");
    }

    #[test]
    fn test_short_row_is_tolerated() {
        let roles = roles([None; 4], &[5]);
        let memo = build_memo(&["x"], &["A", "B", "C", "D", "E", "F"], &roles);
        assert_eq!(memo, "A - x");
    }

    #[test]
    fn test_empty_memo() {
        let roles = roles([None; 4], &[]);
        assert_eq!(build_memo(&["", " "], &["A", "B"], &roles), "");
    }

    #[test]
    fn test_label_delimiter_scrubbed() {
        let roles = roles([None; 4], &[]);
        let memo = build_memo(&["v;1"], &["Note; mine"], &roles);
        assert_eq!(memo, "Note_ mine - v_1");
    }

    #[test]
    fn test_date_cells() {
        let date = chrono::NaiveDate::from_ymd_opt(2023, 3, 9).unwrap();
        let row = vec![CellValue::Text(String::new()), CellValue::Date(date)];
        let roles = roles([None; 4], &[]);
        assert_eq!(build_memo(&row, &["", "When"], &roles), "When - 09 03 2023");
    }

    #[test]
    fn test_deterministic() {
        let roles = roles([Some(0), None, None, None], &[3, 1]);
        let row = ["r", "b", "c", "1,0", "e", "f"];
        let labels = ["R", "B", "C", "D", "E", "F"];
        assert_eq!(
            build_memo(&row, &labels, &roles),
            build_memo(&row, &labels, &roles)
        );
    }
}
