// Air Bank
// Semicolon separated, UTF-8, 33 columns with the reference number last.

use crate::parser::{separated_date, BankParser, DateNormalizer, SourceType};
use crate::schema::{ColumnRoles, OutputColumn};

/// Source column positions of the Air Bank export
pub mod columns {
    pub const DATE: usize = 0;
    pub const AMOUNT: usize = 5;
    pub const FEE: usize = 6;
    pub const ORIGINAL_AMOUNT: usize = 8;
    pub const PAYEE: usize = 9;
    pub const PAYEE_ACCOUNT_NAME: usize = 11;
    pub const MY_NOTE: usize = 17;
    pub const RECEIVER_NOTE: usize = 18;
    pub const NOTE: usize = 19;
    pub const EXCHANGE_RATE: usize = 25;
    pub const POST_DATE: usize = 31;
    pub const REFNUM: usize = 32;
}

use columns::*;

static ROLES: ColumnRoles = ColumnRoles {
    primary: [Some(REFNUM), Some(DATE), Some(PAYEE), Some(AMOUNT)],
    amounts: &[AMOUNT, FEE, ORIGINAL_AMOUNT, EXCHANGE_RATE],
    memo_priority: &[POST_DATE, MY_NOTE, NOTE, RECEIVER_NOTE],
    memo_excluded: &[],
    // Fee-only rows have an empty amount
    fallbacks: &[
        (OutputColumn::Amount, FEE),
        (OutputColumn::Payee, PAYEE_ACCOUNT_NAME),
    ],
};

pub struct AirBankParser;

impl AirBankParser {
    pub fn new() -> Self {
        AirBankParser
    }
}

impl Default for AirBankParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for AirBankParser {
    fn source_type(&self) -> SourceType {
        SourceType::AirBank
    }

    fn roles(&self) -> &'static ColumnRoles {
        &ROLES
    }
}

impl DateNormalizer for AirBankParser {
    fn normalize_date(&self, date: &str) -> Option<String> {
        separated_date(date, '/')
    }

    fn date_pattern(&self) -> &str {
        "DD/MM/YYYY"
    }
}
