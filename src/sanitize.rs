// Field Sanitizer
// Every cell passes through here before it reaches the output. KMyMoney's csv
// importer gets confused by delimiters even inside quoted cells, and treats
// colons specially in date/time fields.

use chrono::NaiveDate;
use scraper::Html;

use crate::schema::OUTPUT_DELIMITER;

/// Output format of every date cell
pub const OUTPUT_DATE_FORMAT: &str = "%d %m %Y";

/// CellValue - a source value before sanitization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Date(NaiveDate),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// Sanitize - anything that can be turned into an output-safe cell
pub trait Sanitize {
    fn sanitize(&self, is_amount: bool) -> String;
}

impl<T: Sanitize + ?Sized> Sanitize for &T {
    fn sanitize(&self, is_amount: bool) -> String {
        (**self).sanitize(is_amount)
    }
}

impl Sanitize for str {
    fn sanitize(&self, is_amount: bool) -> String {
        sanitize(self, is_amount)
    }
}

impl Sanitize for String {
    fn sanitize(&self, is_amount: bool) -> String {
        sanitize(self, is_amount)
    }
}

impl Sanitize for CellValue {
    fn sanitize(&self, is_amount: bool) -> String {
        match self {
            CellValue::Text(text) => sanitize(text, is_amount),
            CellValue::Date(date) => format_date(*date),
        }
    }
}

/// Return the given cell contents safe for the output file.
///
/// Amounts get their decimal comma turned into a dot first, so `"1,5"`
/// becomes `"1.5"` and not `"1_5"`. Then markup is stripped, whitespace
/// trimmed and the output delimiter, commas and colons replaced by `_`.
///
/// Stripping decodes entities, which can expose new markup (`&lt;b&gt;`),
/// so it repeats until the value no longer changes. Sanitizing a sanitized
/// value is therefore a no-op.
pub fn sanitize(value: &str, is_amount: bool) -> String {
    let mut value = if is_amount {
        value.replace(',', ".")
    } else {
        value.to_string()
    };
    loop {
        let next = scrub(&strip_tags(&value));
        if next == value {
            return value;
        }
        value = next;
    }
}

/// Trim and replace the characters the importer trips over.
///
/// Also used for memo labels, which never carry markup.
pub fn scrub(value: &str) -> String {
    value
        .trim()
        .replace(|c: char| c == OUTPUT_DELIMITER || c == ',' || c == ':', "_")
}

/// Text content of a value that may contain HTML, with entities decoded
pub fn strip_tags(value: &str) -> String {
    if !value.contains(['<', '&']) {
        return value.to_string();
    }
    let fragment = Html::parse_fragment(value);
    fragment.root_element().text().collect()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_decimal_comma() {
        assert_eq!(sanitize("-50,25", true), "-50.25");
        assert_eq!(sanitize(" 1,5 ", true), "1.5");
    }

    #[test]
    fn test_non_amount_comma_scrubbed() {
        assert_eq!(sanitize("1,5", false), "1_5");
    }

    #[test]
    fn test_delimiter_and_colon_replaced() {
        assert_eq!(sanitize("a;b:c,d", false), "a_b_c_d");
        assert!(!sanitize("x;;y;", false).contains(OUTPUT_DELIMITER));
    }

    #[test]
    fn test_trim_and_empty() {
        assert_eq!(sanitize("   ", false), "");
        assert_eq!(sanitize("", true), "");
        assert_eq!(sanitize("  ACME Corp \t", false), "ACME Corp");
    }

    #[test]
    fn test_markup_stripped() {
        assert_eq!(sanitize("<b>Rent</b> for <i>May</i>", false), "Rent for May");
        assert_eq!(sanitize("Tom &amp; Jerry", false), "Tom & Jerry");
        assert_eq!(sanitize(" <p> padded </p> ", false), "padded");
    }

    #[test]
    fn test_amount_idempotent() {
        for input in [
            "-50,25",
            "1.000,00",
            " 7 ",
            "<b>3,14</b>",
            "1;2:3",
            "&lt;b&gt;5",
            "&amp;lt;x",
        ] {
            let once = sanitize(input, true);
            assert_eq!(sanitize(&once, true), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_escaped_markup_fully_stripped() {
        assert_eq!(sanitize("&lt;b&gt;5", true), "5");
        assert_eq!(sanitize("&amp;lt;b&amp;gt;Rent", false), "Rent");
        assert_eq!(sanitize("a &lt; b", false), "a < b");
    }

    #[test]
    fn test_text_idempotent() {
        for input in ["Tom &amp; Jerry", "&amp;amp;", "<i>x</i>: y", "a &lt; b"] {
            let once = sanitize(input, false);
            assert_eq!(sanitize(&once, false), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_date_value_formatted() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(CellValue::Date(date).sanitize(false), "05 01 2023");
        assert_eq!(CellValue::from("a:b").sanitize(false), "a_b");
    }

    #[test]
    fn test_scrub_label() {
        assert_eq!(scrub(" Note; private "), "Note_ private");
    }
}
