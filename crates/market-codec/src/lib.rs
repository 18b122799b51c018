#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Market Codec - Market Data Serialization
//!
//! Codec layer for a market-data pipeline. Converts in-memory value
//! objects (quote/trade ticks, OHLCV bars, instrument metadata) to and
//! from two encodings, and batches ordered collections for bulk
//! serialization.
//!
//! # Modules
//!
//! - **`data`**: Immutable value objects (`Symbol`, `Tick`, `Bar`,
//!   `BarType`, `Instrument`). Produced and owned by upstream
//!   components; this layer never mutates them.
//!
//! - **`text`**: Compact delimited text codecs for individual ticks and
//!   bars. The symbol / bar type is *not* embedded in the payload and
//!   must be supplied by the caller from stream context.
//!
//! - **`document`**: Self-describing MessagePack documents carrying a
//!   type discriminator, enabling polymorphic reconstruction and
//!   forward-compatible decoding of unknown optional fields.
//!
//! - **`batch`**: Maps ordered sequences of ticks, bars, or instruments
//!   into batch structures (shared metadata + per-row data).
//!
//! # Data Flow
//!
//! ```text
//! value objects ──► batch mapper ──► batch structure ──► MessagePack
//!       │                                                    │
//!       └──────────► text / document codec ──► bytes ──► storage, wire
//! ```
//!
//! # Concurrency
//!
//! All operations are pure, synchronous transformations: no shared
//! mutable state, no caches, no I/O. The only static state is the
//! document decode registries, populated lazily once and read-only
//! thereafter, so everything here can be called concurrently without
//! coordination.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Immutable market-data value objects.
pub mod data;

/// Delimited text codecs for ticks and bars.
pub mod text;

/// Self-describing MessagePack document codecs.
pub mod document;

/// Batch mapping of ordered collections into serializable structures.
pub mod batch;

// =============================================================================
// Re-exports
// =============================================================================

// Value objects
pub use data::{
    AggressorSide, Bar, BarAggregation, BarSpecification, BarType, BarTypeParseError, Instrument,
    OptionKind, PriceType, QuoteTick, Symbol, Tick, TradeTick,
};

// Instrument kinds
pub use data::instrument::{FutureInstrument, OptionInstrument, SpotInstrument};

// Text codecs
pub use text::{BarCodec, TextCodecError, TickCodec};

// Document codecs
pub use document::{Data, DataCodec, DocumentError, instrument::InstrumentCodec};

// Batch mapper
pub use batch::{
    BarBatch, Batch, BatchError, InstrumentBatch, TickBatch, map_bars, map_instruments, map_ticks,
};
