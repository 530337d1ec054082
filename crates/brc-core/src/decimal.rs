//! Fixed-point decimal parsing for record values
//!
//! Values are signed decimals with one to three integer digits and exactly
//! one fractional digit: `D.D`, `DD.D` or `DDD.D`, optionally preceded by `-`.
//! They are parsed straight from the record's byte window into tenths
//! (`-3.5` becomes `-35`) without touching floating point or allocating.
//!
//! The shape is validated in full. Anything that is not one of the three
//! supported shapes is rejected with a [`DecimalError`] so callers can drop
//! the record instead of accumulating garbage.

use crate::types::ScaledValue;
use thiserror::Error;

/// Why a value window could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecimalError {
    #[error("empty value")]
    Empty,

    #[error("unsupported value length: {0} bytes after sign")]
    InvalidLength(usize),

    #[error("missing decimal point before the fractional digit")]
    MissingDecimalPoint,

    #[error("invalid digit byte 0x{0:02x}")]
    InvalidDigit(u8),
}

/// Parse a value window such as `-12.3` into tenths.
pub fn parse_scaled(bytes: &[u8]) -> Result<ScaledValue, DecimalError> {
    let (negative, digits) = match bytes.split_first() {
        None => return Err(DecimalError::Empty),
        Some((b'-', rest)) => (true, rest),
        Some(_) => (false, bytes),
    };

    let magnitude = match *digits {
        [i0, b'.', f] => digit(i0)? * 10 + digit(f)?,
        [i0, i1, b'.', f] => digit(i0)? * 100 + digit(i1)? * 10 + digit(f)?,
        [i0, i1, i2, b'.', f] => {
            digit(i0)? * 1000 + digit(i1)? * 100 + digit(i2)? * 10 + digit(f)?
        }
        [] => return Err(DecimalError::Empty),
        _ if (3..=5).contains(&digits.len()) => return Err(DecimalError::MissingDecimalPoint),
        _ => return Err(DecimalError::InvalidLength(digits.len())),
    };

    Ok(if negative { -magnitude } else { magnitude })
}

#[inline]
fn digit(byte: u8) -> Result<ScaledValue, DecimalError> {
    if byte.is_ascii_digit() {
        Ok(ScaledValue::from(byte - b'0'))
    } else {
        Err(DecimalError::InvalidDigit(byte))
    }
}
