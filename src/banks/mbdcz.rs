// MailboxDE.cz
// Parcel forwarding account statement: ISO-8859-2, dates `DD.MM.YYYY`,
// charges in one column and credits in another.

use crate::io::InputEncoding;
use crate::parser::{separated_date, BankParser, DateNormalizer, SourceType};
use crate::schema::{ColumnRoles, OutputColumn};

/// Source column positions of the MailboxDE.cz export
pub mod columns {
    pub const CREDIT: usize = 0;
    pub const DATE: usize = 1;
    pub const AMOUNT: usize = 2;
    pub const VARIABLE_SYMBOL: usize = 3;
    pub const PACKAGE_NUMBER: usize = 4;
    pub const FROM: usize = 5;
    pub const DESTINATION: usize = 6;
    pub const TRACKING_NUMBER: usize = 7;
}

use columns::*;

static ROLES: ColumnRoles = ColumnRoles {
    primary: [None, Some(DATE), None, Some(AMOUNT)],
    amounts: &[AMOUNT, CREDIT],
    memo_priority: &[FROM, DESTINATION],
    memo_excluded: &[CREDIT],
    fallbacks: &[(OutputColumn::Amount, CREDIT)],
};

pub struct MailboxDeParser;

impl MailboxDeParser {
    pub fn new() -> Self {
        MailboxDeParser
    }
}

impl Default for MailboxDeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BankParser for MailboxDeParser {
    fn source_type(&self) -> SourceType {
        SourceType::MailboxDe
    }

    fn roles(&self) -> &'static ColumnRoles {
        &ROLES
    }

    fn encoding(&self) -> InputEncoding {
        InputEncoding::Fixed(encoding_rs::ISO_8859_2)
    }
}

impl DateNormalizer for MailboxDeParser {
    fn normalize_date(&self, date: &str) -> Option<String> {
        separated_date(date, '.')
    }

    fn date_pattern(&self) -> &str {
        "DD.MM.YYYY"
    }
}
