//! LAND token id encoding.
//!
//! A parcel's token id is a 256-bit unsigned integer: the high 128 bits hold
//! `x` and the low 128 bits hold `y`, both in two's complement. Ids travel as
//! decimal strings.

use num_bigint::BigUint;

use crate::error::TokenIdError;

/// Coordinates must lie strictly inside ±COORD_LIMIT.
pub const COORD_LIMIT: i64 = 1_000_000;

fn check(axis: char, value: i64) -> Result<(), TokenIdError> {
    if value <= -COORD_LIMIT || value >= COORD_LIMIT {
        return Err(TokenIdError::OutOfRange {
            axis,
            value,
            limit: COORD_LIMIT,
        });
    }
    Ok(())
}

/// Encode parcel coordinates as a decimal token id.
pub fn encode(x: i64, y: i64) -> Result<String, TokenIdError> {
    check('x', x)?;
    check('y', y)?;

    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(&(x as i128 as u128).to_be_bytes());
    bytes[16..].copy_from_slice(&(y as i128 as u128).to_be_bytes());
    Ok(BigUint::from_bytes_be(&bytes).to_str_radix(10))
}

/// Decode a decimal token id back into parcel coordinates.
pub fn decode(token_id: &str) -> Result<(i32, i32), TokenIdError> {
    let malformed = || TokenIdError::Malformed(token_id.to_string());

    let digits = token_id.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let value = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(malformed)?;
    let raw = value.to_bytes_be();
    if raw.len() > 32 {
        return Err(malformed());
    }
    let mut bytes = [0u8; 32];
    bytes[32 - raw.len()..].copy_from_slice(&raw);

    let mut hi = [0u8; 16];
    let mut lo = [0u8; 16];
    hi.copy_from_slice(&bytes[..16]);
    lo.copy_from_slice(&bytes[16..]);
    let x = u128::from_be_bytes(hi) as i128;
    let y = u128::from_be_bytes(lo) as i128;

    let limit = COORD_LIMIT as i128;
    if x <= -limit || x >= limit || y <= -limit || y >= limit {
        return Err(malformed());
    }
    Ok((x as i32, y as i32))
}
