// RoklenFX
// Currency exchange account. A trade moves money between two currency
// accounts, so every transaction row becomes two records (one per currency)
// and each currency gets its own output file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Result, RowLocation};
use crate::io::{self, InputEncoding};
use crate::memo::build_memo;
use crate::sanitize::{CellValue, Sanitize};
use crate::schema::{output_header, ColumnRoles, OutputColumn, OutputRow};

const DELIMITER: u8 = b';';
const TRANSACTION_DATE_FORMAT: &str = "%Y/%m/%d";
const PAYMENT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Columns of the transactions export
pub mod trans {
    pub const STATUS: usize = 0;
    pub const DATE: usize = 1;
    pub const REFNUM: usize = 2;
    pub const SOLD_AMOUNT: usize = 3;
    pub const SOLD_CURRENCY: usize = 4;
    pub const RATE: usize = 5;
    pub const BOUGHT_AMOUNT: usize = 6;
    pub const BOUGHT_CURRENCY: usize = 7;
    pub const PAYEE: usize = 8;
    pub const AMOUNT: usize = 9;
    pub const VARIABLE_SYMBOL: usize = 10;
    pub const TYPE: usize = 11;
}

/// Columns of the payments export
pub mod pay {
    pub const DATE: usize = 0;
    pub const AMOUNT: usize = 1;
    pub const CURRENCY: usize = 2;
    pub const PAYEE: usize = 3;
    pub const REFNUM: usize = 4;
    pub const TRANSACTION_REFNUM: usize = 5;
}

/// Columns of the internal record both exports are turned into
pub mod data {
    pub const REFNUM: usize = 0;
    pub const DATE: usize = 1;
    pub const PAYEE: usize = 2;
    pub const AMOUNT: usize = 3;
    pub const RATE: usize = 5;
    pub const BOUGHT_AMOUNT: usize = 6;
    pub const BOUGHT_CURRENCY: usize = 7;
    pub const SOLD_CURRENCY: usize = 8;
    pub const VARIABLE_SYMBOL: usize = 9;
    pub const TYPE: usize = 10;
    pub const STATUS: usize = 11;
    pub const TRANSACTION_REFNUM: usize = 12;

    pub const WIDTH: usize = 13;
}

/// Memo labels of the internal record; primary columns need none
pub const LABELS: [&str; data::WIDTH] = [
    "",
    "",
    "",
    "",
    "",
    "Rate",
    "Amount bought",
    "Bought currency",
    "Sold currency",
    "Variable symbol",
    "Type",
    "Status",
    "Reference number of transaction",
];

pub static ROLES: ColumnRoles = ColumnRoles {
    primary: [
        Some(data::REFNUM),
        Some(data::DATE),
        Some(data::PAYEE),
        Some(data::AMOUNT),
    ],
    amounts: &[data::AMOUNT, data::BOUGHT_AMOUNT],
    memo_priority: &[
        data::BOUGHT_AMOUNT,
        data::BOUGHT_CURRENCY,
        data::SOLD_CURRENCY,
        data::RATE,
        data::TRANSACTION_REFNUM,
    ],
    memo_excluded: &[],
    fallbacks: &[],
};

// ============================================================================
// RECORDS
// ============================================================================

/// One movement on one currency account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    date: NaiveDate,
    cells: [CellValue; data::WIDTH],
}

impl Record {
    fn new(refnum: &str, date: NaiveDate, amount: impl Into<String>) -> Self {
        let mut record = Record {
            date,
            cells: Default::default(),
        };
        record.set(data::REFNUM, refnum);
        record.cells[data::DATE] = CellValue::Date(date);
        record.set(data::AMOUNT, amount);
        record
    }

    fn set(&mut self, column: usize, value: impl Into<String>) {
        self.cells[column] = CellValue::Text(value.into());
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn cell(&self, column: usize) -> &CellValue {
        &self.cells[column]
    }

    /// Output row: primary cells sanitized, everything else in the memo
    pub fn to_output_row(&self) -> OutputRow {
        let mut row = OutputRow::new();
        for column in OutputColumn::PRIMARY {
            if let Some(src) = ROLES.source_of(column) {
                row.set(column, self.cells[src].sanitize(ROLES.is_amount(src)));
            }
        }
        row.set(OutputColumn::Memo, build_memo(&self.cells, &LABELS, &ROLES));
        row
    }
}

/// Records grouped by lower-case currency code, in insertion order per group
pub type Ledger = BTreeMap<String, Vec<Record>>;

fn cell<'r>(row: &'r [String], column: usize, location: RowLocation<'_>) -> Result<&'r str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| location.malformed(column, row.len()))
}

fn parse_date(value: &str, format: &str, location: RowLocation<'_>) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format)
        .map_err(|_| location.invalid_date(value, format))
}

/// `"100"` -> `"-100"`, and a value that is already negative flips back
fn negate(amount: &str) -> String {
    let amount = amount.trim();
    if amount.is_empty() {
        return String::new();
    }
    match amount.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{}", amount),
    }
}

/// Add both legs of every trade. The first row is the header.
pub fn read_transactions(ledger: &mut Ledger, rows: &[Vec<String>], file: &str) -> Result<()> {
    for (index, row) in rows.iter().enumerate().skip(1) {
        let location = RowLocation::new(file, index);
        let get = move |column| cell(row, column, location);

        let date = parse_date(get(trans::DATE)?, TRANSACTION_DATE_FORMAT, location)?;
        let refnum = get(trans::REFNUM)?;
        let sold_currency = get(trans::SOLD_CURRENCY)?;
        let bought_currency = get(trans::BOUGHT_CURRENCY)?;
        let bought_amount = get(trans::BOUGHT_AMOUNT)?;
        let rate = get(trans::RATE)?;
        let status = get(trans::STATUS)?;

        let mut sold = Record::new(refnum, date, negate(get(trans::SOLD_AMOUNT)?));
        sold.set(data::RATE, rate);
        sold.set(data::BOUGHT_AMOUNT, bought_amount);
        sold.set(data::BOUGHT_CURRENCY, bought_currency);
        sold.set(data::STATUS, status);

        let mut bought = Record::new(refnum, date, bought_amount.trim());
        bought.set(data::SOLD_CURRENCY, sold_currency);
        bought.set(data::RATE, rate);
        bought.set(data::STATUS, status);

        for (src, dest) in [
            (trans::PAYEE, data::PAYEE),
            (trans::VARIABLE_SYMBOL, data::VARIABLE_SYMBOL),
            (trans::TYPE, data::TYPE),
        ] {
            let value = get(src)?;
            if !value.is_empty() {
                sold.set(dest, value);
                bought.set(dest, value);
            }
        }

        ledger.entry(sold_currency.trim().to_lowercase()).or_default().push(sold);
        ledger.entry(bought_currency.trim().to_lowercase()).or_default().push(bought);
    }
    Ok(())
}

/// Add one outgoing record per payment. The first row is the header.
pub fn read_payments(ledger: &mut Ledger, rows: &[Vec<String>], file: &str) -> Result<()> {
    for (index, row) in rows.iter().enumerate().skip(1) {
        let location = RowLocation::new(file, index);
        let get = move |column| cell(row, column, location);

        let date = parse_date(get(pay::DATE)?, PAYMENT_DATE_FORMAT, location)?;
        let currency = get(pay::CURRENCY)?;

        let mut payment = Record::new(get(pay::REFNUM)?, date, negate(get(pay::AMOUNT)?));
        payment.set(data::PAYEE, get(pay::PAYEE)?);
        payment.set(data::TRANSACTION_REFNUM, get(pay::TRANSACTION_REFNUM)?);

        ledger.entry(currency.trim().to_lowercase()).or_default().push(payment);
    }
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

/// One converted currency account, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFile {
    pub currency: String,
    pub file_name: String,
    pub rows: Vec<OutputRow>,
}

/// Sort each currency's records by date and render its output file.
///
/// The sort is stable, so same-day records keep their input order
/// (transactions before payments).
pub fn render(ledger: Ledger) -> Vec<CurrencyFile> {
    ledger
        .into_iter()
        .filter_map(|(currency, mut records)| {
            records.sort_by_key(Record::date);
            let first = records.first()?.date();
            let file_name = format!(
                "RoklenFX-{}-{}.{}.csv",
                first.format("%Y-%m-%d"),
                currency,
                io::OUTPUT_MARKER
            );
            debug!(currency = %currency, records = records.len(), "currency group");

            let mut rows = vec![output_header()];
            rows.extend(records.iter().map(Record::to_output_row));
            Some(CurrencyFile {
                currency,
                file_name,
                rows,
            })
        })
        .collect()
}

/// Convert a transactions and a payments export into one file per currency
/// inside `output_dir`. Returns the written paths.
pub fn process_files(transactions: &Path, payments: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let trans_rows = io::read_rows(transactions, DELIMITER, InputEncoding::Detect)?;
    let pay_rows = io::read_rows(payments, DELIMITER, InputEncoding::Detect)?;

    let mut ledger = Ledger::new();
    read_transactions(&mut ledger, &trans_rows, &transactions.display().to_string())?;
    read_payments(&mut ledger, &pay_rows, &payments.display().to_string())?;

    let files = render(ledger);
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(&file.file_name);
        io::write_rows(&path, &file.rows)?;
        info!(
            currency = %file.currency,
            output = %path.display(),
            rows = file.rows.len() - 1,
            "converted"
        );
        written.push(path);
    }
    Ok(written)
}
