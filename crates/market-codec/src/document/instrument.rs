//! Instrument document codec.
//!
//! Specializes the generic document format for instrument metadata:
//! the discriminator selects among instrument kinds, each with its own
//! required-field set (a future carries an expiry and multiplier, a
//! spot pair does not). Missing kind-specific fields surface as
//! [`DocumentError::SchemaMismatch`] naming the field.

use std::collections::HashMap;
use std::sync::LazyLock;

use rmpv::Value;

use crate::data::instrument::{FutureInstrument, OptionInstrument, SpotInstrument};
use crate::data::{Instrument, OptionKind, Symbol};

use super::{
    DocumentError, Map, SCHEMA_VERSION, key, read_document, require_decimal, require_i64,
    require_str, require_u32, write_document,
};

// =============================================================================
// Registry
// =============================================================================

type DecodeFn = fn(&Map) -> Result<Instrument, DocumentError>;

/// Instrument kind discriminator -> reconstruction routine.
static DECODERS: LazyLock<HashMap<&'static str, DecodeFn>> = LazyLock::new(|| {
    let mut registry: HashMap<&'static str, DecodeFn> = HashMap::new();
    registry.insert("SpotInstrument", decode_spot);
    registry.insert("FutureInstrument", decode_future);
    registry.insert("OptionInstrument", decode_option);
    registry
});

// =============================================================================
// Codec
// =============================================================================

/// MessagePack document codec for [`Instrument`] metadata.
#[derive(Debug, Default, Clone)]
pub struct InstrumentCodec;

impl InstrumentCodec {
    /// Create a new instrument codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode an instrument into a self-describing document.
    ///
    /// # Errors
    ///
    /// Returns an error only if the MessagePack writer fails.
    pub fn encode(&self, instrument: &Instrument) -> Result<Vec<u8>, DocumentError> {
        let document = match instrument {
            Instrument::Spot(spot) => spot_document(spot),
            Instrument::Future(future) => future_document(future),
            Instrument::Option(option) => option_document(option),
        };
        write_document(&document)
    }

    /// Decode a document back into an instrument.
    ///
    /// # Errors
    ///
    /// Same failure modes as the generic codec, with
    /// [`DocumentError::SchemaMismatch`] additionally raised when a
    /// kind-specific required field is missing for the decoded
    /// discriminator.
    pub fn decode(&self, bytes: &[u8]) -> Result<Instrument, DocumentError> {
        let map = read_document(bytes)?;
        let tag = require_str(&map, "type")?;

        let decode_fn = DECODERS
            .get(tag)
            .ok_or_else(|| DocumentError::UnknownTypeTag(tag.to_string()))?;
        tracing::debug!(tag, "dispatching instrument decode");
        decode_fn(&map)
    }
}

// =============================================================================
// Document construction
// =============================================================================

fn common_fields(document: &mut Vec<(Value, Value)>, symbol: &Symbol, price: u32, size: u32) {
    document.push((key("symbol"), Value::from(symbol.as_str())));
    document.push((key("price_precision"), Value::from(price)));
    document.push((key("size_precision"), Value::from(size)));
}

fn spot_document(spot: &SpotInstrument) -> Value {
    let mut document = vec![
        (key("type"), Value::from("SpotInstrument")),
        (key("schema"), Value::from(SCHEMA_VERSION)),
    ];
    common_fields(
        &mut document,
        &spot.symbol,
        spot.price_precision,
        spot.size_precision,
    );
    document.push((key("base_currency"), Value::from(spot.base_currency.as_str())));
    document.push((
        key("quote_currency"),
        Value::from(spot.quote_currency.as_str()),
    ));
    Value::Map(document)
}

fn future_document(future: &FutureInstrument) -> Value {
    let mut document = vec![
        (key("type"), Value::from("FutureInstrument")),
        (key("schema"), Value::from(SCHEMA_VERSION)),
    ];
    common_fields(
        &mut document,
        &future.symbol,
        future.price_precision,
        future.size_precision,
    );
    document.push((key("underlying"), Value::from(future.underlying.as_str())));
    document.push((key("expiry_ns"), Value::from(future.expiry_ns)));
    document.push((key("multiplier"), Value::from(future.multiplier.to_string())));
    Value::Map(document)
}

fn option_document(option: &OptionInstrument) -> Value {
    let mut document = vec![
        (key("type"), Value::from("OptionInstrument")),
        (key("schema"), Value::from(SCHEMA_VERSION)),
    ];
    common_fields(
        &mut document,
        &option.symbol,
        option.price_precision,
        option.size_precision,
    );
    document.push((key("underlying"), Value::from(option.underlying.as_str())));
    document.push((key("expiry_ns"), Value::from(option.expiry_ns)));
    document.push((key("strike"), Value::from(option.strike.to_string())));
    document.push((key("option_kind"), Value::from(option.option_kind.as_str())));
    document.push((key("multiplier"), Value::from(option.multiplier.to_string())));
    Value::Map(document)
}

// =============================================================================
// Reconstruction routines
// =============================================================================

fn decode_spot(map: &Map) -> Result<Instrument, DocumentError> {
    Ok(Instrument::Spot(SpotInstrument {
        symbol: Symbol::new(require_str(map, "symbol")?),
        base_currency: require_str(map, "base_currency")?.to_string(),
        quote_currency: require_str(map, "quote_currency")?.to_string(),
        price_precision: require_u32(map, "price_precision")?,
        size_precision: require_u32(map, "size_precision")?,
    }))
}

fn decode_future(map: &Map) -> Result<Instrument, DocumentError> {
    Ok(Instrument::Future(FutureInstrument {
        symbol: Symbol::new(require_str(map, "symbol")?),
        underlying: require_str(map, "underlying")?.to_string(),
        expiry_ns: require_i64(map, "expiry_ns")?,
        multiplier: require_decimal(map, "multiplier")?,
        price_precision: require_u32(map, "price_precision")?,
        size_precision: require_u32(map, "size_precision")?,
    }))
}

fn decode_option(map: &Map) -> Result<Instrument, DocumentError> {
    let kind_token = require_str(map, "option_kind")?;
    let option_kind = OptionKind::parse(kind_token).ok_or(DocumentError::SchemaMismatch {
        field: "option_kind",
        expected: "CALL or PUT",
    })?;

    Ok(Instrument::Option(OptionInstrument {
        symbol: Symbol::new(require_str(map, "symbol")?),
        underlying: require_str(map, "underlying")?.to_string(),
        expiry_ns: require_i64(map, "expiry_ns")?,
        strike: require_decimal(map, "strike")?,
        option_kind,
        multiplier: require_decimal(map, "multiplier")?,
        price_precision: require_u32(map, "price_precision")?,
        size_precision: require_u32(map, "size_precision")?,
    }))
}
