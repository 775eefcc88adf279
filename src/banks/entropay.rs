// Entropay
// Comma separated, UTF-8, dates like `5-Jan-2023`, no reference numbers.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::parser::{BankParser, DateNormalizer, SourceType};
use crate::sanitize::format_date;
use crate::schema::ColumnRoles;

/// Source column positions of the Entropay export
pub mod columns {
    pub const DATE: usize = 0;
    pub const PAYEE: usize = 1;
    pub const AMOUNT: usize = 4;
    pub const ORIGINAL_CURRENCY: usize = 5;
    pub const ORIGINAL_AMOUNT: usize = 6;
    pub const FOREX_RATE: usize = 7;
    pub const FEE_CURRENCY: usize = 8;
    pub const FEE_AMOUNT: usize = 9;
    pub const NET_AMOUNT: usize = 11;
}

use columns::*;

const DATE_FORMAT: &str = "%d-%b-%Y";

static ROLES: ColumnRoles = ColumnRoles {
    primary: [None, Some(DATE), Some(PAYEE), Some(NET_AMOUNT)],
    amounts: &[AMOUNT, ORIGINAL_AMOUNT, FOREX_RATE, FEE_AMOUNT, NET_AMOUNT],
    memo_priority: &[ORIGINAL_CURRENCY, ORIGINAL_AMOUNT, FEE_CURRENCY, FEE_AMOUNT],
    memo_excluded: &[],
    fallbacks: &[],
};

fn single_digit_day() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d-").expect("valid regex"))
}

pub struct EntropayParser;

impl EntropayParser {
    pub fn new() -> Self {
        EntropayParser
    }
}

impl Default for EntropayParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for EntropayParser {
    fn source_type(&self) -> SourceType {
        SourceType::Entropay
    }

    fn roles(&self) -> &'static ColumnRoles {
        &ROLES
    }

    fn delimiter(&self) -> u8 {
        b','
    }
}

impl DateNormalizer for EntropayParser {
    fn normalize_date(&self, date: &str) -> Option<String> {
        let padded = single_digit_day().replace(date.trim(), "0${0}");
        NaiveDate::parse_from_str(&padded, DATE_FORMAT)
            .ok()
            .map(format_date)
    }

    fn date_pattern(&self) -> &str {
        DATE_FORMAT
    }
}
