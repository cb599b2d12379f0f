//! Configuration errors
//!
//! The bus itself is write-only and open loop, so nothing can fail once a
//! [`Lcd`](crate::lcd::Lcd) is built. Only a bad wiring description or an
//! impossible display mode is reported, and only at construction.

use core::fmt;

/// Errors returned while constructing a sender or an [`Lcd`](crate::lcd::Lcd)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Data line `DB{line}` is required by the wiring but was not supplied
    MissingDataLine {
        /// index of the first missing data line, 0 to 7
        line: u8,
    },
    /// 5x10 dots font can only be used with a one line display
    FontNeedsOneLine,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingDataLine { line } => write!(f, "data line DB{} is not connected", line),
            Error::FontNeedsOneLine => f.write_str("5x10 font requires a one line display"),
        }
    }
}

impl core::error::Error for Error {}
