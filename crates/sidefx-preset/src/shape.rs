use thiserror::Error;

use crate::slots::{MAX_CURVES, MAX_POINTS};

/// Characters that delimit names in the library file and inside the payload.
pub const RESERVED_NAME_CHARS: [char; 2] = ['`', '"'];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("shape {name:?} contains reserved character {character:?}")]
    ReservedCharacter { name: String, character: char },
    #[error("shape {name:?} has {count} points, expected 1..={}", MAX_POINTS)]
    PointCount { name: String, count: usize },
    #[error("shape {name:?} declares {declared} points but lists {given}")]
    PointMismatch {
        name: String,
        declared: usize,
        given: usize,
    },
    #[error("shape {name:?} has {count} curve values, at most {} are supported", MAX_CURVES)]
    CurveCount { name: String, count: usize },
    #[error("shape {name:?} point {index} ({x}, {y}) is outside 0..=1")]
    PointOutOfRange {
        name: String,
        index: usize,
        x: f64,
        y: f64,
    },
    #[error("shape {name:?} curve {index} is not a finite number ({value})")]
    NonFiniteCurve {
        name: String,
        index: usize,
        value: f64,
    },
}

/// One vertex of the modulator curve. Both axes are normalised to `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A named modulator shape as it is written into a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDefinition {
    pub name: String,
    pub point_count: usize,
    pub points: Vec<ControlPoint>,
    /// Per-segment curve bias. `None` for shapes made of straight segments.
    pub curves: Option<Vec<f64>>,
}

impl ShapeDefinition {
    pub fn new(name: impl Into<String>, points: Vec<ControlPoint>) -> Self {
        Self {
            name: name.into(),
            point_count: points.len(),
            points,
            curves: None,
        }
    }

    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self::new(name, pairs.iter().copied().map(ControlPoint::from).collect())
    }

    pub fn with_curves(mut self, curves: Vec<f64>) -> Self {
        self.curves = Some(curves);
        self
    }

    pub fn curves(&self) -> &[f64] {
        self.curves.as_deref().unwrap_or_default()
    }

    pub fn segment_count(&self) -> usize {
        self.point_count.saturating_sub(1)
    }

    /// Checks every precondition of the slot layout. Nothing is encoded for a
    /// shape that fails here.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if let Some(character) = self
            .name
            .chars()
            .find(|ch| RESERVED_NAME_CHARS.contains(ch) || ch.is_control())
        {
            return Err(ShapeError::ReservedCharacter {
                name: self.name.clone(),
                character,
            });
        }
        if !(1..=MAX_POINTS).contains(&self.point_count) {
            return Err(ShapeError::PointCount {
                name: self.name.clone(),
                count: self.point_count,
            });
        }
        if self.points.len() != self.point_count {
            return Err(ShapeError::PointMismatch {
                name: self.name.clone(),
                declared: self.point_count,
                given: self.points.len(),
            });
        }
        let curves = self.curves();
        if curves.len() > MAX_CURVES {
            return Err(ShapeError::CurveCount {
                name: self.name.clone(),
                count: curves.len(),
            });
        }
        if let Some((index, point)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, point)| !point.in_range())
        {
            return Err(ShapeError::PointOutOfRange {
                name: self.name.clone(),
                index,
                x: point.x,
                y: point.y,
            });
        }
        if let Some((index, value)) = curves
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ShapeError::NonFiniteCurve {
                name: self.name.clone(),
                index,
                value: *value,
            });
        }
        Ok(())
    }
}
