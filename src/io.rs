// Row Source + Row Emitter
// Decoding and csv plumbing around the conversion core.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chardetng::EncodingDetector;
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::schema::{OutputRow, OUTPUT_DELIMITER};

/// Marker inserted before the extension of converted files
pub const OUTPUT_MARKER: &str = "kmy";

/// Leading bytes fed to the encoding detector
const DETECTION_SAMPLE: usize = 4096;

/// InputEncoding - how the bytes of an input file are turned into text
#[derive(Debug, Clone, Copy)]
pub enum InputEncoding {
    /// A fixed encoding (UTF-8 for most banks)
    Fixed(&'static Encoding),
    /// Guess from the byte order mark or a leading sample of the file
    Detect,
}

// ============================================================================
// ROW SOURCE
// ============================================================================

/// Read a whole file and split it into rows of cells
pub fn read_rows(path: &Path, delimiter: u8, encoding: InputEncoding) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path)?;
    let text = decode(&bytes, encoding, path)?;
    parse_rows(&text, delimiter)
}

/// Decode raw file contents into text
pub fn decode(bytes: &[u8], encoding: InputEncoding, path: &Path) -> Result<String> {
    let encoding = match encoding {
        InputEncoding::Fixed(encoding) => encoding,
        InputEncoding::Detect => detect_encoding(bytes)
            .ok_or_else(|| ConvertError::EncodingDetection(path.to_path_buf()))?,
    };
    debug!(file = %path.display(), encoding = encoding.name(), "decoding input");

    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not valid {}", path.display(), encoding.name()),
        )
        .into());
    }
    Ok(text.into_owned())
}

/// Guess the encoding of the given bytes, `None` for an empty input
pub fn detect_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    Some(detector.guess(None, true))
}

/// Parse delimited text into rows. Rows may differ in length.
pub fn parse_rows(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(b'"')
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

// ============================================================================
// ROW EMITTER
// ============================================================================

/// `statement.csv` -> `statement.kmy.csv`, next to the input
pub fn output_path(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| ConvertError::UnsupportedOutput(input.to_path_buf()))?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OUTPUT_MARKER);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(input.with_file_name(name))
}

/// Write rows to a new file, replacing any previous one.
///
/// The whole file is encoded in memory first; the file is only created
/// once there is something complete to put in it.
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut buffer = Vec::new();
    write_rows_to(&mut buffer, rows)?;
    fs::write(path, buffer)?;
    Ok(())
}

/// Write rows semicolon-delimited with every cell quoted
pub fn write_rows_to<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER as u8)
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{output_header, OutputColumn};

    #[test]
    fn test_output_path_inserts_marker() {
        let out = output_path(Path::new("dir/statement.csv")).unwrap();
        assert_eq!(out, PathBuf::from("dir/statement.kmy.csv"));

        let out = output_path(Path::new("export")).unwrap();
        assert_eq!(out, PathBuf::from("export.kmy"));
    }

    #[test]
    fn test_output_path_unsupported() {
        let result = output_path(Path::new(".."));
        assert!(matches!(result, Err(ConvertError::UnsupportedOutput(_))));
    }

    #[test]
    fn test_parse_rows_flexible() {
        let text = "\"a\";\"b;c\"\n1;2;3\n";
        let rows = parse_rows(text, b';').unwrap();
        assert_eq!(rows, vec![vec!["a", "b;c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_decode_latin2() {
        let bytes = b"P\xf8\xedjem";
        let encoding = InputEncoding::Fixed(encoding_rs::ISO_8859_2);
        let text = decode(bytes, encoding, Path::new("x.csv")).unwrap();
        assert_eq!(text, "Příjem");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let result = decode(
            b"ab\xffcd",
            InputEncoding::Fixed(encoding_rs::UTF_8),
            Path::new("x.csv"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_detect_encoding() {
        assert!(detect_encoding(b"").is_none());
        assert_eq!(detect_encoding(b"\xef\xbb\xbfdata"), Some(encoding_rs::UTF_8));
        let utf8 = "Datum;Částka;Měna\n".as_bytes();
        assert_eq!(detect_encoding(utf8), Some(encoding_rs::UTF_8));
    }

    #[test]
    fn test_detect_empty_is_fatal() {
        let result = decode(b"", InputEncoding::Detect, Path::new("empty.csv"));
        assert!(matches!(result, Err(ConvertError::EncodingDetection(_))));
    }

    #[test]
    fn test_write_rows_matches_encoded_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.kmy.csv");
        let rows = [output_header(), OutputRow::new()];
        write_rows(&path, &rows).unwrap();

        let mut expected = Vec::new();
        write_rows_to(&mut expected, &rows).unwrap();
        assert_eq!(fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_write_rows_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.kmy.csv");
        assert!(write_rows(&path, &[output_header()]).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_rows_quotes_everything() {
        let mut row = OutputRow::new();
        row.set(OutputColumn::Date, "05 01 2023".to_string());
        row.set(OutputColumn::Memo, "A - b\nC - d".to_string());

        let mut out = Vec::new();
        write_rows_to(&mut out, &[output_header(), row]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\"Reference number\";\"Date\";\"Payee\";\"Amount\";\"Memo\"\n\
             \"\";\"05 01 2023\";\"\";\"\";\"A - b\nC - d\"\n"
        );
    }
}
