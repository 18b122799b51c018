//! Self-Describing MessagePack Documents
//!
//! Generic document codec for tagged market-data values. Every
//! document is a MessagePack map with string keys that embeds:
//!
//! - `type`: the discriminator selecting the concrete schema,
//! - `schema`: a format version marker (currently 1),
//! - the type's fields, keyed by name rather than position.
//!
//! Keying by name makes decoding forward compatible: unknown optional
//! keys added by newer writers are ignored by older readers.
//!
//! # Canonical Key Order
//!
//! Encoding writes keys in a fixed order per type (`type`, `schema`,
//! then fields in declared order), so re-encoding a decoded document
//! reproduces the original bytes exactly.
//!
//! # Dispatch
//!
//! Decoding reads the discriminator first and dispatches through a
//! static registry from tag to reconstruction routine. The registry is
//! populated once on first use and read-only thereafter; supporting a
//! new variant means registering a new tag and routine, not modifying
//! existing ones.
//!
//! # Value Representation
//!
//! Prices, sizes, and volumes travel as decimal strings (exact scale
//! preserved); timestamps as i64 Unix nanoseconds; bar types in their
//! canonical string form.

use std::collections::HashMap;
use std::sync::LazyLock;

use rmpv::Value;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::{Bar, QuoteTick, Symbol, Tick, TradeTick};

pub mod instrument;

/// Document format version written into every document.
pub const SCHEMA_VERSION: u32 = 1;

// =============================================================================
// Errors
// =============================================================================

/// Document codec errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The discriminator did not match any registered variant.
    #[error("unknown type tag: `{0}`")]
    UnknownTypeTag(String),

    /// A required field was absent or of the wrong encoded kind.
    #[error("schema mismatch: field `{field}` missing or not a {expected}")]
    SchemaMismatch {
        /// Name of the required field.
        field: &'static str,
        /// Kind the schema requires.
        expected: &'static str,
    },

    /// The payload was not a MessagePack map at all.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// MessagePack encoding failed.
    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmpv::encode::Error),

    /// MessagePack decoding failed.
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmpv::decode::Error),
}

// =============================================================================
// Data union
// =============================================================================

/// A tagged market-data value carried by the generic document codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    /// A quote or trade tick.
    Tick(Tick),
    /// An OHLCV bar.
    Bar(Bar),
}

impl Data {
    /// The discriminator written into this value's document.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Tick(Tick::Quote(_)) => TAG_QUOTE_TICK,
            Self::Tick(Tick::Trade(_)) => TAG_TRADE_TICK,
            Self::Bar(_) => TAG_BAR,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

pub(crate) type Map = [(Value, Value)];

const TAG_QUOTE_TICK: &str = "QuoteTick";
const TAG_TRADE_TICK: &str = "TradeTick";
const TAG_BAR: &str = "Bar";

type DecodeFn = fn(&Map) -> Result<Data, DocumentError>;

/// Discriminator -> reconstruction routine. Populated once on first
/// use, read-only afterwards, so no locking is needed in steady state.
static DECODERS: LazyLock<HashMap<&'static str, DecodeFn>> = LazyLock::new(|| {
    let mut registry: HashMap<&'static str, DecodeFn> = HashMap::new();
    registry.insert(TAG_QUOTE_TICK, decode_quote_tick);
    registry.insert(TAG_TRADE_TICK, decode_trade_tick);
    registry.insert(TAG_BAR, decode_bar);
    registry
});

// =============================================================================
// Codec
// =============================================================================

/// Generic MessagePack document codec for [`Data`] values.
#[derive(Debug, Default, Clone)]
pub struct DataCodec;

impl DataCodec {
    /// Create a new document codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode a tagged value into a self-describing document.
    ///
    /// # Errors
    ///
    /// Returns an error only if the MessagePack writer fails.
    pub fn encode(&self, data: &Data) -> Result<Vec<u8>, DocumentError> {
        let document = match data {
            Data::Tick(Tick::Quote(quote)) => quote_tick_document(quote),
            Data::Tick(Tick::Trade(trade)) => trade_tick_document(trade),
            Data::Bar(bar) => bar_document(bar),
        };
        write_document(&document)
    }

    /// Decode a self-describing document back into a tagged value.
    ///
    /// Reads the discriminator first and dispatches to the registered
    /// reconstruction routine; unknown keys in the document are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UnknownTypeTag`] if the discriminator is not
    /// registered, [`DocumentError::SchemaMismatch`] if a required
    /// field is absent or of the wrong kind, and
    /// [`DocumentError::Malformed`] / [`DocumentError::Decode`] for
    /// payloads that are not MessagePack maps.
    pub fn decode(&self, bytes: &[u8]) -> Result<Data, DocumentError> {
        let map = read_document(bytes)?;
        let tag = require_str(&map, "type")?;

        let decode_fn = DECODERS
            .get(tag)
            .ok_or_else(|| DocumentError::UnknownTypeTag(tag.to_string()))?;
        tracing::debug!(tag, "dispatching document decode");
        decode_fn(&map)
    }
}

// =============================================================================
// Document construction
// =============================================================================

pub(crate) fn key(name: &'static str) -> Value {
    Value::from(name)
}

pub(crate) fn write_document(document: &Value) -> Result<Vec<u8>, DocumentError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, document)?;
    Ok(buf)
}

pub(crate) fn read_document(bytes: &[u8]) -> Result<Vec<(Value, Value)>, DocumentError> {
    let value = rmpv::decode::read_value(&mut &bytes[..])?;
    match value {
        Value::Map(map) => {
            validate_schema(&map)?;
            Ok(map)
        }
        other => Err(DocumentError::Malformed(format!(
            "expected a map, got {other}"
        ))),
    }
}

/// The `schema` marker is advisory: absent markers are tolerated for
/// compatibility, but a present marker must be an unsigned integer.
fn validate_schema(map: &Map) -> Result<(), DocumentError> {
    match get(map, "schema") {
        None => Ok(()),
        Some(value) if value.is_u64() => Ok(()),
        Some(_) => Err(DocumentError::SchemaMismatch {
            field: "schema",
            expected: "unsigned integer",
        }),
    }
}

fn quote_tick_document(quote: &QuoteTick) -> Value {
    Value::Map(vec![
        (key("type"), Value::from(TAG_QUOTE_TICK)),
        (key("schema"), Value::from(SCHEMA_VERSION)),
        (key("symbol"), Value::from(quote.symbol.as_str())),
        (key("bid"), Value::from(quote.bid.to_string())),
        (key("ask"), Value::from(quote.ask.to_string())),
        (key("bid_size"), Value::from(quote.bid_size.to_string())),
        (key("ask_size"), Value::from(quote.ask_size.to_string())),
        (key("ts_event"), Value::from(quote.ts_event)),
    ])
}

fn trade_tick_document(trade: &TradeTick) -> Value {
    Value::Map(vec![
        (key("type"), Value::from(TAG_TRADE_TICK)),
        (key("schema"), Value::from(SCHEMA_VERSION)),
        (key("symbol"), Value::from(trade.symbol.as_str())),
        (key("price"), Value::from(trade.price.to_string())),
        (key("size"), Value::from(trade.size.to_string())),
        (key("aggressor"), Value::from(trade.aggressor.as_str())),
        (key("ts_event"), Value::from(trade.ts_event)),
    ])
}

fn bar_document(bar: &Bar) -> Value {
    Value::Map(vec![
        (key("type"), Value::from(TAG_BAR)),
        (key("schema"), Value::from(SCHEMA_VERSION)),
        (key("bar_type"), Value::from(bar.bar_type.to_string())),
        (key("open"), Value::from(bar.open.to_string())),
        (key("high"), Value::from(bar.high.to_string())),
        (key("low"), Value::from(bar.low.to_string())),
        (key("close"), Value::from(bar.close.to_string())),
        (key("volume"), Value::from(bar.volume.to_string())),
        (key("ts_event"), Value::from(bar.ts_event)),
    ])
}

// =============================================================================
// Reconstruction routines
// =============================================================================

fn decode_quote_tick(map: &Map) -> Result<Data, DocumentError> {
    Ok(Data::Tick(Tick::Quote(QuoteTick {
        symbol: Symbol::new(require_str(map, "symbol")?),
        bid: require_decimal(map, "bid")?,
        ask: require_decimal(map, "ask")?,
        bid_size: require_decimal(map, "bid_size")?,
        ask_size: require_decimal(map, "ask_size")?,
        ts_event: require_i64(map, "ts_event")?,
    })))
}

fn decode_trade_tick(map: &Map) -> Result<Data, DocumentError> {
    let aggressor_token = require_str(map, "aggressor")?;
    let aggressor = crate::data::AggressorSide::parse(aggressor_token).ok_or(
        DocumentError::SchemaMismatch {
            field: "aggressor",
            expected: "aggressor token",
        },
    )?;

    Ok(Data::Tick(Tick::Trade(TradeTick {
        symbol: Symbol::new(require_str(map, "symbol")?),
        price: require_decimal(map, "price")?,
        size: require_decimal(map, "size")?,
        aggressor,
        ts_event: require_i64(map, "ts_event")?,
    })))
}

fn decode_bar(map: &Map) -> Result<Data, DocumentError> {
    let bar_type = require_str(map, "bar_type")?
        .parse()
        .map_err(|_| DocumentError::SchemaMismatch {
            field: "bar_type",
            expected: "canonical bar type string",
        })?;

    Ok(Data::Bar(Bar {
        bar_type,
        open: require_decimal(map, "open")?,
        high: require_decimal(map, "high")?,
        low: require_decimal(map, "low")?,
        close: require_decimal(map, "close")?,
        volume: require_decimal(map, "volume")?,
        ts_event: require_i64(map, "ts_event")?,
    }))
}

// =============================================================================
// Field extraction
// =============================================================================

pub(crate) fn get<'a>(map: &'a Map, name: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_str() == Some(name))
        .map(|(_, v)| v)
}

pub(crate) fn require_str<'a>(map: &'a Map, field: &'static str) -> Result<&'a str, DocumentError> {
    get(map, field)
        .and_then(Value::as_str)
        .ok_or(DocumentError::SchemaMismatch {
            field,
            expected: "string",
        })
}

pub(crate) fn require_i64(map: &Map, field: &'static str) -> Result<i64, DocumentError> {
    get(map, field)
        .and_then(Value::as_i64)
        .ok_or(DocumentError::SchemaMismatch {
            field,
            expected: "integer",
        })
}

pub(crate) fn require_u32(map: &Map, field: &'static str) -> Result<u32, DocumentError> {
    get(map, field)
        .and_then(Value::as_u64)
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or(DocumentError::SchemaMismatch {
            field,
            expected: "unsigned integer",
        })
}

pub(crate) fn require_decimal(map: &Map, field: &'static str) -> Result<Decimal, DocumentError> {
    require_str(map, field)?
        .parse()
        .map_err(|_| DocumentError::SchemaMismatch {
            field,
            expected: "decimal string",
        })
}
