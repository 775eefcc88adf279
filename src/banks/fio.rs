// Fio banka
// Semicolon separated, UTF-8, account summary lines before the real header.

use crate::parser::{separated_date, BankParser, DateNormalizer, SourceType};
use crate::schema::{ColumnRoles, OutputColumn};

/// Source column positions of the Fio export
pub mod columns {
    pub const REFNUM: usize = 0;
    pub const DATE: usize = 1;
    pub const AMOUNT: usize = 2;
    pub const PAYEE: usize = 4;
    pub const PAYEE_ACCOUNT_NAME: usize = 5;
    pub const NOTE: usize = 11;
    pub const RECEIVER_NOTE: usize = 12;
    pub const MY_NOTE: usize = 16;
}

use columns::*;

static ROLES: ColumnRoles = ColumnRoles {
    primary: [Some(REFNUM), Some(DATE), Some(PAYEE), Some(AMOUNT)],
    amounts: &[AMOUNT],
    memo_priority: &[MY_NOTE, NOTE, RECEIVER_NOTE],
    memo_excluded: &[],
    fallbacks: &[(OutputColumn::Payee, PAYEE_ACCOUNT_NAME)],
};

pub struct FioParser;

impl FioParser {
    pub fn new() -> Self {
        FioParser
    }
}

impl Default for FioParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for FioParser {
    fn source_type(&self) -> SourceType {
        SourceType::Fio
    }

    fn roles(&self) -> &'static ColumnRoles {
        &ROLES
    }

    fn has_preamble(&self) -> bool {
        true
    }
}

impl DateNormalizer for FioParser {
    fn normalize_date(&self, date: &str) -> Option<String> {
        separated_date(date, '/')
    }

    fn date_pattern(&self) -> &str {
        "DD/MM/YYYY"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::transform;

    fn rows(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn header() -> Vec<&'static str> {
        vec![
            "ID pohybu", "Datum", "Objem", "Měna", "Protiúčet", "Název protiúčtu",
            "Kód banky", "Název banky", "KS", "VS", "SS", "Poznámka",
            "Zpráva pro příjemce", "Typ", "Provedl", "Upřesnění", "Komentář",
        ]
    }

    #[test]
    fn test_preamble_then_data() {
        let header = header();
        let data = [
            "123", "15/01/2023", "-50,25", "CZK", "", "Jane Doe Ltd", "", "", "",
            "777", "", "lunch", "", "Platba kartou", "", "", "team",
        ];
        let input = rows(&[
            &["accountId", "2100000000"][..],
            &["bankId", "2010"][..],
            &header[..],
            &data[..],
        ]);

        let out = transform(&FioParser::new(), input, "fio.csv").unwrap();
        assert_eq!(out.len(), 2);

        let row = &out[1];
        assert_eq!(row.get(OutputColumn::ReferenceNumber), "123");
        assert_eq!(row.get(OutputColumn::Date), "15 01 2023");
        // Empty counter account falls back to its name
        assert_eq!(row.get(OutputColumn::Payee), "Jane Doe Ltd");
        assert_eq!(row.get(OutputColumn::Amount), "-50.25");
        assert_eq!(
            row.get(OutputColumn::Memo),
            "Komentář - team\nPoznámka - lunch\nMěna - CZK\nNázev protiúčtu - Jane Doe Ltd\n\
             VS - 777\nTyp - Platba kartou"
        );
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let header = header();
        let mut data = vec![""; 17];
        data[DATE] = "2023-01-15";
        let input = rows(&[&header[..], &data[..]]);
        assert!(transform(&FioParser::new(), input, "fio.csv").is_err());
    }
}
