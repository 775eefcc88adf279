// Conversion Pipeline
// Shared by every single-file format: preamble -> header -> data rows.

use std::iter::Peekable;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, RowLocation};
use crate::io;
use crate::memo::build_memo;
use crate::merge::merge_fallback;
use crate::parser::BankParser;
use crate::sanitize::Sanitize;
use crate::schema::{output_header, OutputColumn, OutputRow};

/// Convert one input file into `<stem>.kmy.<ext>` next to it.
///
/// Nothing is written unless every row converts.
pub fn convert_file<P: BankParser + ?Sized>(parser: &P, input: &Path) -> Result<PathBuf> {
    let output = io::output_path(input)?;
    let rows = parser.parse(input)?;
    io::write_rows(&output, &rows)?;

    info!(
        source = parser.source_type().name(),
        input = %input.display(),
        output = %output.display(),
        rows = rows.len() - 1,
        "converted"
    );
    Ok(output)
}

/// Turn the rows of one file into output rows, canonical header first.
///
/// The first row after the optional preamble names the source columns and
/// is never converted as data.
pub fn transform<P: BankParser + ?Sized>(
    parser: &P,
    rows: Vec<Vec<String>>,
    file: &str,
) -> Result<Vec<OutputRow>> {
    let mut rows = rows.into_iter().enumerate().peekable();
    if parser.has_preamble() {
        skip_preamble(&mut rows);
    }

    let mut output = vec![output_header()];
    let Some((_, labels)) = rows.next() else {
        debug!(file, "no header row, empty input");
        return Ok(output);
    };

    for (index, row) in rows {
        let location = RowLocation::new(file, index);
        output.push(convert_row(parser, &row, &labels, location)?);
    }
    Ok(output)
}

/// Map, memo and merge a single data row
pub fn convert_row<P: BankParser + ?Sized>(
    parser: &P,
    row: &[String],
    labels: &[String],
    location: RowLocation<'_>,
) -> Result<OutputRow> {
    let roles = parser.roles();
    let mut output = OutputRow::new();

    for column in OutputColumn::PRIMARY {
        let Some(src) = roles.source_of(column) else {
            continue;
        };
        let cell = row
            .get(src)
            .ok_or_else(|| location.malformed(src, row.len()))?;
        let mut data = cell.sanitize(roles.is_amount(src));
        if column == OutputColumn::Date {
            data = parser
                .normalize_date(&data)
                .ok_or_else(|| location.invalid_date(&data, parser.date_pattern()))?;
        }
        output.set(column, data);
    }

    output.set(OutputColumn::Memo, build_memo(row, labels, roles));
    merge_fallback(output, row, roles, location)
}

/// Consume the key/value summary preceding the real header.
///
/// Rows of at most two cells belong to the preamble; two-cell rows are
/// echoed to the log. The first wider row is left in place.
fn skip_preamble<I>(rows: &mut Peekable<I>)
where
    I: Iterator<Item = (usize, Vec<String>)>,
{
    while let Some((_, row)) = rows.next_if(|(_, row)| row.len() <= 2) {
        if let [key, value] = row.as_slice() {
            let key = format!("{}:", capitalize(key.trim().trim_matches('"')));
            info!("{:<15}\t{}", key, value.trim());
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
