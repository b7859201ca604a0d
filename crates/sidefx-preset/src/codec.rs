use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::shape::ControlPoint;
use crate::slots::{
    slot_for_token, CURVE_BASE, MAX_CURVES, MAX_POINTS, NAME_TOKEN_INDEX, PLACEHOLDER,
    POINT_BASE, POINT_COUNT_SLOT, SLOT_COUNT, TOKEN_COUNT,
};

/// Width of one base64 line inside a preset record.
pub const LINE_WIDTH: usize = 80;
/// Joins wrapped base64 lines at the record's body indentation.
pub const LINE_SEPARATOR: &str = "\n    ";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("expected {expected} tokens, found {found}")]
    TokenCount { expected: usize, found: usize },
    #[error("preset name token is not quoted")]
    UnquotedName,
    #[error("slot {slot} holds {value:?}, expected a number")]
    InvalidNumber { slot: usize, value: String },
}

/// Joins the tokens with single spaces. Nothing is escaped.
pub fn serialize_tokens(tokens: &[String]) -> Vec<u8> {
    tokens.join(" ").into_bytes()
}

/// Base64 encodes `bytes` and wraps the result at [`LINE_WIDTH`].
pub fn encode_payload(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let breaks = encoded.len().saturating_sub(1) / LINE_WIDTH;
    let mut wrapped = String::with_capacity(encoded.len() + breaks * LINE_SEPARATOR.len());
    for (index, ch) in encoded.chars().enumerate() {
        if index > 0 && index % LINE_WIDTH == 0 {
            wrapped.push_str(LINE_SEPARATOR);
        }
        wrapped.push(ch);
    }
    wrapped
}

/// Reverses [`encode_payload`]; whitespace between lines is ignored.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = payload.chars().filter(|ch| !ch.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Splits a decoded parameter line back into its tokens. The quoted name is
/// kept as a single token even when it contains spaces.
pub fn split_tokens(line: &str) -> Result<Vec<String>, DecodeError> {
    let mut tokens = Vec::with_capacity(TOKEN_COUNT);
    let mut rest = line;
    while tokens.len() < NAME_TOKEN_INDEX {
        let Some((token, tail)) = rest.split_once(' ') else {
            return Err(DecodeError::TokenCount {
                expected: TOKEN_COUNT,
                found: tokens.len() + 1,
            });
        };
        tokens.push(token.to_string());
        rest = tail;
    }

    let name_end = rest
        .strip_prefix('"')
        .and_then(|quoted| quoted.find('"'))
        .ok_or(DecodeError::UnquotedName)?;
    // opening quote + name + closing quote
    let (name, tail) = rest.split_at(name_end + 2);
    tokens.push(name.to_string());

    if let Some(tail) = tail.strip_prefix(' ') {
        tokens.extend(tail.split(' ').map(str::to_string));
    } else if !tail.is_empty() {
        return Err(DecodeError::UnquotedName);
    }

    if tokens.len() != TOKEN_COUNT {
        return Err(DecodeError::TokenCount {
            expected: TOKEN_COUNT,
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

/// Decodes a wrapped payload straight into its token sequence.
pub fn decode_tokens(payload: &str) -> Result<Vec<String>, DecodeError> {
    let line = String::from_utf8(decode_payload(payload)?)?;
    split_tokens(&line)
}

/// Shape data recovered from a preset payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPreset {
    pub name: String,
    pub point_count: usize,
    pub points: Vec<ControlPoint>,
    /// One entry per curve slot; `None` where the slot holds the placeholder.
    pub curves: Vec<Option<f64>>,
}

impl DecodedPreset {
    pub fn from_tokens(tokens: &[String]) -> Result<Self, DecodeError> {
        if tokens.len() != TOKEN_COUNT {
            return Err(DecodeError::TokenCount {
                expected: TOKEN_COUNT,
                found: tokens.len(),
            });
        }
        let name = tokens[NAME_TOKEN_INDEX]
            .strip_prefix('"')
            .and_then(|name| name.strip_suffix('"'))
            .ok_or(DecodeError::UnquotedName)?
            .to_string();

        let slots: Vec<&str> = (0..tokens.len())
            .filter(|index| slot_for_token(*index).is_some())
            .map(|index| tokens[index].as_str())
            .collect();
        debug_assert_eq!(slots.len(), SLOT_COUNT);

        let point_count: usize = parse_slot(&slots, POINT_COUNT_SLOT)?;
        let points = (0..point_count.min(MAX_POINTS))
            .map(|index| {
                let x = parse_slot(&slots, POINT_BASE + index * 2)?;
                let y = parse_slot(&slots, POINT_BASE + index * 2 + 1)?;
                Ok(ControlPoint::new(x, y))
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        let curves = (CURVE_BASE..CURVE_BASE + MAX_CURVES)
            .map(|slot| match slots[slot] {
                PLACEHOLDER => Ok(None),
                _ => parse_slot(&slots, slot).map(Some),
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        Ok(Self {
            name,
            point_count,
            points,
            curves,
        })
    }

    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        Self::from_tokens(&decode_tokens(payload)?)
    }
}

fn parse_slot<T: std::str::FromStr>(slots: &[&str], slot: usize) -> Result<T, DecodeError> {
    slots[slot]
        .parse()
        .map_err(|_| DecodeError::InvalidNumber {
            slot,
            value: slots[slot].to_string(),
        })
}
