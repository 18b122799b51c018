//! Delimited Text Codecs
//!
//! Compact, line-oriented text encodings for individual ticks and bars.
//!
//! # Format Contract (v1)
//!
//! Fields are comma-delimited; field order and delimiter are a stable,
//! versioned contract. A change to either is a breaking format change
//! communicated out-of-band (file header or channel metadata), never
//! per-line. Numeric fields render in canonical fixed-point decimal
//! text: no scientific notation, scale preserved, so the same value
//! always renders identically.
//!
//! | Record | Line                              | Fields |
//! |--------|-----------------------------------|--------|
//! | Trade  | `price,size,aggressor,ts`         | 4      |
//! | Quote  | `bid,ask,bid_size,ask_size,ts`    | 5      |
//! | Bar    | `open,high,low,close,volume,ts`   | 6      |
//!
//! The aggressor token is `BUYER`, `SELLER`, or `NONE`; timestamps are
//! raw Unix epoch nanoseconds. Tick lines are distinguished by field
//! count (4 = trade, 5 = quote).
//!
//! # External Context
//!
//! The symbol (for ticks) and the bar type (for bars) are *not*
//! embedded in the payload: they are assumed known from stream context
//! (a per-symbol file or channel) and must be tracked by the caller,
//! who supplies them as required decode parameters.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::AggressorSide;

mod bar;
mod tick;

pub use bar::BarCodec;
pub use tick::TickCodec;

// =============================================================================
// Errors
// =============================================================================

/// Text codec errors.
#[derive(Debug, Error)]
pub enum TextCodecError {
    /// A field failed to parse.
    #[error("malformed record: field `{field}` has unparsable value `{value}`")]
    MalformedRecord {
        /// Name of the offending field.
        field: &'static str,
        /// Raw text that failed to parse.
        value: String,
    },

    /// The line had the wrong number of delimited fields.
    #[error("malformed record: expected {expected} fields, got {actual}")]
    WrongFieldCount {
        /// Field counts the codec accepts.
        expected: &'static str,
        /// Field count found on the line.
        actual: usize,
    },

    /// A batch decode aborted at the given zero-based line index.
    ///
    /// Batch decoding is all-or-nothing: no partial output is returned.
    #[error("batch line {index}: {source}")]
    BatchLine {
        /// Zero-based index of the line that failed.
        index: usize,
        /// The underlying per-line failure.
        #[source]
        source: Box<TextCodecError>,
    },
}

// =============================================================================
// Field parsing helpers
// =============================================================================

/// Strip a trailing line terminator, if present.
pub(crate) fn strip_newline(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

pub(crate) fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, TextCodecError> {
    raw.parse().map_err(|_| TextCodecError::MalformedRecord {
        field,
        value: raw.to_string(),
    })
}

pub(crate) fn parse_ts(field: &'static str, raw: &str) -> Result<i64, TextCodecError> {
    raw.parse().map_err(|_| TextCodecError::MalformedRecord {
        field,
        value: raw.to_string(),
    })
}

pub(crate) fn parse_aggressor(
    field: &'static str,
    raw: &str,
) -> Result<AggressorSide, TextCodecError> {
    AggressorSide::parse(raw).ok_or_else(|| TextCodecError::MalformedRecord {
        field,
        value: raw.to_string(),
    })
}
