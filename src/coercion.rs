//! Field coercions: pure `raw string -> typed value` conversions.
//!
//! Coercions never see the table or field they are applied to; the decoder attaches that context
//! when it turns a [`CoercionError`] into [`crate::IngestionError::FieldParse`].
//!
//! Optional coercions return `Ok(None)` for empty or whitespace-only input. That is the only way a
//! value is absent; a legitimate `0` or `""` is always kept distinct from it.

use crate::enums::{CodeEnum, Color};
use crate::error::{CoercionError, CoercionResult};

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Identity. An empty string is a value, not an absence.
pub fn string(raw: &str) -> CoercionResult<String> {
    Ok(raw.to_owned())
}

pub fn optional_string(raw: &str) -> CoercionResult<Option<String>> {
    if is_blank(raw) {
        return Ok(None);
    }
    Ok(Some(raw.to_owned()))
}

/// `"0"` is false, `"1"` is true. Nothing else is accepted.
pub fn boolean(raw: &str) -> CoercionResult<Option<bool>> {
    match raw.trim() {
        "" => Ok(None),
        "0" => Ok(Some(false)),
        "1" => Ok(Some(true)),
        _ => Err(CoercionError::InvalidBool),
    }
}

/// Non-negative integer literal. Signs of either kind are rejected.
pub fn unsigned_int(raw: &str) -> CoercionResult<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with('+') {
        return Err(CoercionError::SignedInteger);
    }
    Ok(Some(trimmed.parse::<u32>()?))
}

/// Locale-invariant decimal, standard or scientific notation.
///
/// The decimal separator is always `.`; infinities and NaN are rejected.
pub fn double(raw: &str) -> CoercionResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let v = trimmed.parse::<f64>()?;
    if !v.is_finite() {
        return Err(CoercionError::NonFiniteDouble);
    }
    Ok(Some(v))
}

/// `#RRGGBB` with hexadecimal channels, packed as opaque ARGB.
///
/// Only a blank value is trimmed; anything else must be exactly the 7 characters.
pub fn color(raw: &str) -> CoercionResult<Option<Color>> {
    if is_blank(raw) {
        return Ok(None);
    }
    if raw.len() != 7 || !raw.is_ascii() || !raw.starts_with('#') {
        return Err(CoercionError::InvalidColor {
            reason: "expected 7 characters shaped '#RRGGBB'".to_string(),
        });
    }

    let mut channels = [0u8; 3];
    for (i, slot) in channels.iter_mut().enumerate() {
        let start = 1 + i * 2;
        let digits = &raw[start..start + 2];
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoercionError::InvalidColor {
                reason: format!("channel '{digits}' is not hexadecimal"),
            });
        }
        let value = u16::from_str_radix(digits, 16).map_err(|e| CoercionError::InvalidColor {
            reason: format!("channel '{digits}': {e}"),
        })?;
        *slot = u8::try_from(value).map_err(|_| CoercionError::InvalidColor {
            reason: format!("channel '{digits}' out of range 0..=255"),
        })?;
    }

    let [r, g, b] = channels;
    Ok(Some(Color::from_rgb(r, g, b)))
}

/// Nullable enumeration: blank is absent, unknown codes fail.
pub fn enumeration<E: CodeEnum>(raw: &str) -> CoercionResult<Option<E>> {
    let code = raw.trim();
    if code.is_empty() {
        return Ok(None);
    }
    E::from_code(code)
        .map(Some)
        .ok_or_else(|| CoercionError::UnknownCode {
            kind: E::KIND,
            code: code.to_owned(),
        })
}

/// Mandatory-valued enumeration: blank fails like an unknown code.
pub fn required_enumeration<E: CodeEnum>(raw: &str) -> CoercionResult<E> {
    enumeration(raw)?.ok_or(CoercionError::Empty)
}
