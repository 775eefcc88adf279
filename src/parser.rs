// Parser Framework
// One driver per bank export; the conversion pipeline itself is shared.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::banks::{AirBankParser, EntropayParser, FioParser, MailboxDeParser};
use crate::convert;
use crate::error::Result;
use crate::io::{self, InputEncoding};
use crate::schema::{ColumnRoles, OutputRow};

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceType - which institution produced the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Fio,
    AirBank,
    Entropay,
    MailboxDe,
    RoklenFx,
}

impl SourceType {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceType::Fio => "Fio banka",
            SourceType::AirBank => "Air Bank",
            SourceType::Entropay => "Entropay",
            SourceType::MailboxDe => "MailboxDE.cz",
            SourceType::RoklenFx => "RoklenFX",
        }
    }

    /// Short code, also the CLI subcommand
    pub fn code(&self) -> &'static str {
        match self {
            SourceType::Fio => "fio",
            SourceType::AirBank => "air",
            SourceType::Entropay => "entropay",
            SourceType::MailboxDe => "mbdcz",
            SourceType::RoklenFx => "roklen",
        }
    }
}

// ============================================================================
// TRAITS
// ============================================================================

/// DateNormalizer - turns the bank's date cell into `DD MM YYYY`
pub trait DateNormalizer {
    /// `None` when the value does not match [`DateNormalizer::date_pattern`]
    fn normalize_date(&self, date: &str) -> Option<String>;

    /// Expected input pattern, for error messages
    fn date_pattern(&self) -> &str;
}

/// BankParser - a single-file export format
///
/// A format is fully described by its column roles plus a few reading
/// options; conversion of the rows is shared by all formats.
pub trait BankParser: DateNormalizer + Send + Sync {
    fn source_type(&self) -> SourceType;

    /// Static column table of this format
    fn roles(&self) -> &'static ColumnRoles;

    fn delimiter(&self) -> u8 {
        b';'
    }

    fn encoding(&self) -> InputEncoding {
        InputEncoding::Fixed(encoding_rs::UTF_8)
    }

    /// Whether short key/value rows precede the real header
    fn has_preamble(&self) -> bool {
        false
    }

    /// Read and convert a whole file, header row included
    fn parse(&self, file_path: &Path) -> Result<Vec<OutputRow>> {
        let rows = io::read_rows(file_path, self.delimiter(), self.encoding())?;
        convert::transform(self, rows, &file_path.display().to_string())
    }
}

/// Get the parser of a single-file format.
///
/// RoklenFX needs a transactions and a payments file together and is handled
/// by [`crate::banks::roklen`] instead.
pub fn get_parser(source_type: SourceType) -> Option<Box<dyn BankParser>> {
    match source_type {
        SourceType::Fio => Some(Box::new(FioParser::new())),
        SourceType::AirBank => Some(Box::new(AirBankParser::new())),
        SourceType::Entropay => Some(Box::new(EntropayParser::new())),
        SourceType::MailboxDe => Some(Box::new(MailboxDeParser::new())),
        SourceType::RoklenFx => None,
    }
}

// ============================================================================
// SHARED DATE HELPERS
// ============================================================================

/// `15/01/2023` with `separator = '/'` -> `15 01 2023`.
///
/// Day and month may be a single digit and get zero padded.
pub fn separated_date(value: &str, separator: char) -> Option<String> {
    let parts: Vec<&str> = value.trim().split(separator).collect();
    let [day, month, year] = parts[..] else {
        return None;
    };

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 1, 2) || !digits(month, 1, 2) || !digits(year, 4, 4) {
        return None;
    }

    Some(format!("{:0>2} {:0>2} {}", day, month, year))
}
