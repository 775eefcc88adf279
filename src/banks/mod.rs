// Bank Drivers
// Each single-file driver is a static ColumnRoles table plus a date rule and
// reading options. RoklenFX merges two exports and splits the result per
// currency.

pub mod air;
pub mod entropay;
pub mod fio;
pub mod mbdcz;
pub mod roklen;

pub use air::AirBankParser;
pub use entropay::EntropayParser;
pub use fio::FioParser;
pub use mbdcz::MailboxDeParser;
