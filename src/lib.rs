// KMyMoney Import - Core Library
// Converts bank exports into the csv layout of the KMyMoney importer.
// Exposes all modules for use in the CLI and tests.

pub mod banks;
pub mod convert;
pub mod error;
pub mod io;
pub mod memo;
pub mod merge;
pub mod parser;
pub mod sanitize;
pub mod schema;

// Re-export commonly used types
pub use convert::{convert_file, convert_row, transform};
pub use error::{ConvertError, Result, RowLocation};
pub use memo::build_memo;
pub use merge::merge_fallback;
pub use parser::{get_parser, BankParser, DateNormalizer, SourceType};
pub use sanitize::{sanitize, CellValue, Sanitize};
pub use schema::{output_header, ColumnRoles, OutputColumn, OutputRow};
