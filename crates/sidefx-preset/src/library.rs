use std::collections::HashSet;
use std::fmt;

use rayon::prelude::*;
use thiserror::Error;

use crate::codec::{decode_tokens, encode_payload, serialize_tokens, DecodeError, DecodedPreset};
use crate::shape::{ShapeDefinition, ShapeError};
use crate::slots::{ParameterSlots, UnsetCurvePolicy};

/// Container name REAPER uses to match the library to the JSFX.
pub const LIBRARY_NAME: &str = "JS: SideFX Modulator";

const LIBRARY_HEADER: &str = "<REAPER_PRESET_LIBRARY";
const RECORD_HEADER: &str = "<PRESET";
const BLOCK_END: &str = ">";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("shape definition at index {index} is invalid")]
    InvalidShape {
        index: usize,
        #[source]
        source: ShapeError,
    },
    #[error("failed to read shape file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse shape file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing `<REAPER_PRESET_LIBRARY` header line")]
    MissingHeader,
    #[error("line {line}: unexpected content {content:?}")]
    UnexpectedLine { line: usize, content: String },
    #[error("preset {name:?} is not closed")]
    UnterminatedRecord { name: String },
    #[error("library is not closed with `>`")]
    MissingTerminator,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    pub unset_curves: UnsetCurvePolicy,
    /// Encode shapes on the rayon pool. Record order is unaffected.
    pub parallel: bool,
}

/// One `<PRESET ...>` block: a name and its wrapped base64 body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetRecord {
    pub name: String,
    pub payload: String,
}

impl PresetRecord {
    /// Validates and encodes a single shape.
    pub fn from_shape(
        shape: &ShapeDefinition,
        policy: UnsetCurvePolicy,
    ) -> Result<Self, ShapeError> {
        shape.validate()?;
        Ok(Self::encode_validated(shape, policy))
    }

    fn encode_validated(shape: &ShapeDefinition, policy: UnsetCurvePolicy) -> Self {
        let tokens = ParameterSlots::build(shape, policy).with_name(&shape.name);
        let payload = encode_payload(&serialize_tokens(&tokens));
        tracing::debug!(
            name = %shape.name,
            points = shape.point_count,
            bytes = payload.len(),
            "encoded preset"
        );
        Self {
            name: shape.name.clone(),
            payload,
        }
    }

    pub fn tokens(&self) -> Result<Vec<String>, DecodeError> {
        decode_tokens(&self.payload)
    }

    pub fn decode(&self) -> Result<DecodedPreset, DecodeError> {
        DecodedPreset::from_tokens(&self.tokens()?)
    }
}

impl fmt::Display for PresetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {RECORD_HEADER} `{}`", self.name)?;
        writeln!(f, "    {}", self.payload)?;
        writeln!(f, "  {BLOCK_END}")
    }
}

/// An ordered set of presets wrapped in the library container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetLibrary {
    name: String,
    records: Vec<PresetRecord>,
}

impl PresetLibrary {
    pub fn new(records: Vec<PresetRecord>) -> Self {
        Self {
            name: LIBRARY_NAME.to_string(),
            records,
        }
    }

    /// Validates every shape before encoding any of them, so a bad definition
    /// never yields a partial library.
    pub fn build(shapes: &[ShapeDefinition], options: &EncodeOptions) -> Result<Self, LibraryError> {
        let mut seen = HashSet::new();
        for (index, shape) in shapes.iter().enumerate() {
            shape
                .validate()
                .map_err(|source| LibraryError::InvalidShape { index, source })?;
            if shape.curves().len() > shape.segment_count() {
                tracing::warn!(
                    name = %shape.name,
                    curves = shape.curves().len(),
                    segments = shape.segment_count(),
                    "shape has more curve values than segments"
                );
            }
            if !seen.insert(shape.name.as_str()) {
                tracing::warn!(name = %shape.name, "duplicate preset name");
            }
        }

        let policy = options.unset_curves;
        let records = if options.parallel {
            shapes
                .par_iter()
                .map(|shape| PresetRecord::encode_validated(shape, policy))
                .collect()
        } else {
            shapes
                .iter()
                .map(|shape| PresetRecord::encode_validated(shape, policy))
                .collect()
        };
        Ok(Self::new(records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[PresetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&PresetRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    /// Reads `.rpl` text back into records. Payloads are not decoded here.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let name = lines
            .next()
            .and_then(|(_, line)| line.strip_prefix(LIBRARY_HEADER))
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            .map(|rest| unquote(rest.trim()).to_string())
            .ok_or(ParseError::MissingHeader)?;

        let mut records = Vec::new();
        while let Some((number, line)) = lines.next() {
            if line == BLOCK_END {
                return Ok(Self { name, records });
            }
            let Some(rest) = line
                .strip_prefix(RECORD_HEADER)
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
            else {
                return Err(ParseError::UnexpectedLine {
                    line: number,
                    content: line.to_string(),
                });
            };
            let record_name = unquote(rest.trim()).to_string();
            let mut body = Vec::new();
            loop {
                match lines.next() {
                    Some((_, BLOCK_END)) => break,
                    Some((_, line)) => body.push(line),
                    None => return Err(ParseError::UnterminatedRecord { name: record_name }),
                }
            }
            records.push(PresetRecord {
                name: record_name,
                payload: body.join(crate::codec::LINE_SEPARATOR),
            });
        }
        Err(ParseError::MissingTerminator)
    }
}

impl fmt::Display for PresetLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{LIBRARY_HEADER} \"{}\"", self.name)?;
        for record in &self.records {
            write!(f, "{record}")?;
        }
        writeln!(f, "{BLOCK_END}")
    }
}

/// Strips one layer of backticks or double quotes, as REAPER writes either.
fn unquote(value: &str) -> &str {
    ['`', '"']
        .iter()
        .find_map(|quote| {
            value
                .strip_prefix(*quote)
                .and_then(|inner| inner.strip_suffix(*quote))
        })
        .unwrap_or(value)
}
