//! Batch Mapper
//!
//! Groups ordered sequences of ticks, bars, or instruments into batch
//! structures for bulk serialization: a metadata block holding the
//! fields shared by every row (symbol or bar type, row count) and a
//! data block with one entry per input object carrying only the fields
//! that vary per row.
//!
//! # Wire Shape
//!
//! Batches serialize (JSON or named-map MessagePack) as:
//!
//! ```json
//! {
//!   "type": "Bar",
//!   "metadata": { "bar_type": "BTC/USD-1-MINUTE-LAST", "count": 3 },
//!   "data": [ { "open": "...", ... }, ... ]
//! }
//! ```
//!
//! Storage collaborators persist this opaquely; this layer does not
//! interpret what happens to a batch after it is handed off.
//!
//! # Lifetime
//!
//! A batch is transient: produced by one mapping call, handed to a
//! codec or storage writer, then discarded. Inputs are never mutated
//! and never retained.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{
    AggressorSide, Bar, BarType, Instrument, QuoteTick, Symbol, Tick, TradeTick,
};

// =============================================================================
// Errors
// =============================================================================

/// Batch mapping errors.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input violated the shared-context uniformity requirement.
    #[error("inconsistent batch: {0}")]
    InconsistentBatch(String),

    /// No shared context is derivable from an empty input.
    #[error("empty batch: no shared context derivable")]
    EmptyBatch,

    /// MessagePack encoding failed.
    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed.
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

// =============================================================================
// Rows
// =============================================================================

/// Per-tick fields of one batch row (the shared symbol lives in the
/// batch metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TickRow {
    /// Quote fields.
    Quote {
        /// Best bid price.
        #[serde(with = "rust_decimal::serde::str")]
        bid: Decimal,
        /// Best ask price.
        #[serde(with = "rust_decimal::serde::str")]
        ask: Decimal,
        /// Size at the best bid.
        #[serde(with = "rust_decimal::serde::str")]
        bid_size: Decimal,
        /// Size at the best ask.
        #[serde(with = "rust_decimal::serde::str")]
        ask_size: Decimal,
        /// Event time, Unix epoch nanoseconds.
        ts_event: i64,
    },
    /// Trade fields.
    Trade {
        /// Traded price.
        #[serde(with = "rust_decimal::serde::str")]
        price: Decimal,
        /// Traded size.
        #[serde(with = "rust_decimal::serde::str")]
        size: Decimal,
        /// Aggressing side.
        aggressor: AggressorSide,
        /// Event time, Unix epoch nanoseconds.
        ts_event: i64,
    },
}

impl TickRow {
    fn from_tick(tick: &Tick) -> Self {
        match tick {
            Tick::Quote(quote) => Self::Quote {
                bid: quote.bid,
                ask: quote.ask,
                bid_size: quote.bid_size,
                ask_size: quote.ask_size,
                ts_event: quote.ts_event,
            },
            Tick::Trade(trade) => Self::Trade {
                price: trade.price,
                size: trade.size,
                aggressor: trade.aggressor,
                ts_event: trade.ts_event,
            },
        }
    }

    fn into_tick(self, symbol: &Symbol) -> Tick {
        match self {
            Self::Quote {
                bid,
                ask,
                bid_size,
                ask_size,
                ts_event,
            } => Tick::Quote(QuoteTick {
                symbol: symbol.clone(),
                bid,
                ask,
                bid_size,
                ask_size,
                ts_event,
            }),
            Self::Trade {
                price,
                size,
                aggressor,
                ts_event,
            } => Tick::Trade(TradeTick {
                symbol: symbol.clone(),
                price,
                size,
                aggressor,
                ts_event,
            }),
        }
    }
}

/// Per-bar fields of one batch row (the shared bar type lives in the
/// batch metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarRow {
    /// Open price.
    #[serde(with = "rust_decimal::serde::str")]
    pub open: Decimal,
    /// High price.
    #[serde(with = "rust_decimal::serde::str")]
    pub high: Decimal,
    /// Low price.
    #[serde(with = "rust_decimal::serde::str")]
    pub low: Decimal,
    /// Close price.
    #[serde(with = "rust_decimal::serde::str")]
    pub close: Decimal,
    /// Traded volume.
    #[serde(with = "rust_decimal::serde::str")]
    pub volume: Decimal,
    /// Window close time, Unix epoch nanoseconds.
    pub ts_event: i64,
}

impl BarRow {
    fn from_bar(bar: &Bar) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ts_event: bar.ts_event,
        }
    }

    fn into_bar(self, bar_type: &BarType) -> Bar {
        Bar {
            bar_type: bar_type.clone(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            ts_event: self.ts_event,
        }
    }
}

// =============================================================================
// Batch structures
// =============================================================================

/// Shared metadata of a tick batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickBatchMetadata {
    /// Symbol shared by every row.
    pub symbol: Symbol,
    /// Number of rows.
    pub count: usize,
}

/// A batch of ticks sharing one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickBatch {
    /// Shared fields.
    pub metadata: TickBatchMetadata,
    /// One row per input tick, in input order.
    pub data: Vec<TickRow>,
}

impl TickBatch {
    /// Re-group the batch back into ticks, reattaching the shared
    /// symbol to every row.
    #[must_use]
    pub fn into_ticks(self) -> Vec<Tick> {
        let symbol = self.metadata.symbol;
        self.data
            .into_iter()
            .map(|row| row.into_tick(&symbol))
            .collect()
    }
}

/// Shared metadata of a bar batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarBatchMetadata {
    /// Bar type shared by every row (canonical string on the wire).
    pub bar_type: BarType,
    /// Number of rows.
    pub count: usize,
}

/// A batch of bars sharing one bar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarBatch {
    /// Shared fields.
    pub metadata: BarBatchMetadata,
    /// One row per input bar, in input order.
    pub data: Vec<BarRow>,
}

impl BarBatch {
    /// Re-group the batch back into bars, reattaching the shared bar
    /// type to every row.
    #[must_use]
    pub fn into_bars(self) -> Vec<Bar> {
        let bar_type = self.metadata.bar_type;
        self.data
            .into_iter()
            .map(|row| row.into_bar(&bar_type))
            .collect()
    }
}

/// Shared metadata of an instrument batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentBatchMetadata {
    /// Number of rows.
    pub count: usize,
    /// Marker that rows vary by instrument kind.
    pub heterogeneous: bool,
}

/// A batch of instruments, heterogeneous by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentBatch {
    /// Shared fields.
    pub metadata: InstrumentBatchMetadata,
    /// One row per input instrument, each carrying its own kind tag.
    pub data: Vec<Instrument>,
}

/// A batch structure of any supported object type.
///
/// Serializes with the object-type tag at the top level, giving the
/// external wire shape `{ "type": <tag>, "metadata": {...},
/// "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Batch {
    /// Tick batch.
    #[serde(rename = "Tick")]
    Tick(TickBatch),
    /// Bar batch.
    #[serde(rename = "Bar")]
    Bar(BarBatch),
    /// Instrument batch.
    #[serde(rename = "Instrument")]
    Instrument(InstrumentBatch),
}

impl Batch {
    /// Serialize the batch as a named-map MessagePack document.
    ///
    /// # Errors
    ///
    /// Returns an error if MessagePack serialization fails.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, BatchError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Deserialize a batch from named-map MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if MessagePack deserialization fails.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, BatchError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

impl From<TickBatch> for Batch {
    fn from(batch: TickBatch) -> Self {
        Self::Tick(batch)
    }
}

impl From<BarBatch> for Batch {
    fn from(batch: BarBatch) -> Self {
        Self::Bar(batch)
    }
}

impl From<InstrumentBatch> for Batch {
    fn from(batch: InstrumentBatch) -> Self {
        Self::Instrument(batch)
    }
}

// =============================================================================
// Mapping
// =============================================================================

/// Map an ordered sequence of ticks into a batch.
///
/// All ticks must share one symbol, which is hoisted into the metadata
/// block; rows carry only per-tick fields. Input order is preserved.
///
/// # Errors
///
/// [`BatchError::EmptyBatch`] for empty input (no shared symbol is
/// derivable) and [`BatchError::InconsistentBatch`] when two ticks
/// carry different symbols.
pub fn map_ticks(ticks: &[Tick]) -> Result<TickBatch, BatchError> {
    let first = ticks.first().ok_or(BatchError::EmptyBatch)?;
    let symbol = first.symbol();

    for tick in ticks {
        if tick.symbol() != symbol {
            return Err(BatchError::InconsistentBatch(format!(
                "expected symbol `{symbol}`, found `{}`",
                tick.symbol()
            )));
        }
    }

    Ok(TickBatch {
        metadata: TickBatchMetadata {
            symbol: symbol.clone(),
            count: ticks.len(),
        },
        data: ticks.iter().map(TickRow::from_tick).collect(),
    })
}

/// Map an ordered sequence of bars into a batch under one bar type.
///
/// Every bar's carried type must equal `bar_type`, which is hoisted
/// into the metadata block; rows carry OHLCV and timestamp only.
/// Input order is preserved. Empty input is allowed: the shared
/// context is supplied by the caller, not derived.
///
/// # Errors
///
/// [`BatchError::InconsistentBatch`] naming the first offending index
/// when a bar carries a different type.
pub fn map_bars(bars: &[Bar], bar_type: &BarType) -> Result<BarBatch, BatchError> {
    for (index, bar) in bars.iter().enumerate() {
        if bar.bar_type != *bar_type {
            return Err(BatchError::InconsistentBatch(format!(
                "bar {index} has type `{}`, expected `{bar_type}`",
                bar.bar_type
            )));
        }
    }

    Ok(BarBatch {
        metadata: BarBatchMetadata {
            bar_type: bar_type.clone(),
            count: bars.len(),
        },
        data: bars.iter().map(BarRow::from_bar).collect(),
    })
}

/// Map an ordered sequence of instruments into a batch.
///
/// Instruments have no shared-context requirement beyond each being
/// independently well-formed, so mapping is infallible; the metadata
/// marks the rows as heterogeneous by kind.
#[must_use]
pub fn map_instruments(instruments: &[Instrument]) -> InstrumentBatch {
    InstrumentBatch {
        metadata: InstrumentBatchMetadata {
            count: instruments.len(),
            heterogeneous: true,
        },
        data: instruments.to_vec(),
    }
}
