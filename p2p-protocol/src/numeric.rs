//! Decimal-string ⇄ big-integer conversion for monetary wire fields.
//!
//! Token amounts routinely exceed `u64::MAX`, so the wire carries them as
//! base-10 strings and the domain model holds them as [`BigUint`]. The
//! conversion is exact in both directions.

use {
    crate::error::{P2pError, Result},
    num_bigint::BigUint,
};

/// Render `value` as a canonical base-10 string (no sign, no leading zeros).
pub fn to_wire_string(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Parse a wire decimal string into a [`BigUint`].
///
/// Only a non-empty run of ASCII digits is accepted. Leading zeros are
/// tolerated; signs, whitespace, digit separators, radix prefixes,
/// fractions and exponents are not.
pub fn from_wire_string(s: &str) -> Result<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(P2pError::MalformedNumeric(s.to_owned()));
    }
    BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| P2pError::MalformedNumeric(s.to_owned()))
}

/// Convert a presence-tracked wire field, failing closed when it is absent.
pub fn required_from_wire(value: Option<&str>, field: &'static str) -> Result<BigUint> {
    let s = value.ok_or(P2pError::MissingRequiredField(field))?;
    from_wire_string(s)
}
