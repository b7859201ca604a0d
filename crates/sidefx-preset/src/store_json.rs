use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::library::LibraryError;
use crate::shape::{ControlPoint, ShapeDefinition};

/// On-disk form of a shape. `point_count` falls back to the number of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ShapeFileEntry {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point_count: Option<usize>,
    points: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    curves: Option<Vec<f64>>,
}

impl ShapeFileEntry {
    fn into_shape(self) -> ShapeDefinition {
        let points: Vec<ControlPoint> = self
            .points
            .into_iter()
            .map(|[x, y]| ControlPoint::new(x, y))
            .collect();
        ShapeDefinition {
            name: self.name,
            point_count: self.point_count.unwrap_or(points.len()),
            points,
            curves: self.curves,
        }
    }

    fn from_shape(shape: &ShapeDefinition) -> Self {
        Self {
            name: shape.name.clone(),
            point_count: Some(shape.point_count),
            points: shape.points.iter().map(|point| [point.x, point.y]).collect(),
            curves: shape.curves.clone(),
        }
    }
}

/// Parses a JSON shape table. Shapes are not validated here.
pub fn parse_shapes(json: &str) -> Result<Vec<ShapeDefinition>, LibraryError> {
    let entries: Vec<ShapeFileEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(ShapeFileEntry::into_shape).collect())
}

pub fn load_shapes(path: impl AsRef<Path>) -> Result<Vec<ShapeDefinition>, LibraryError> {
    let raw = fs::read_to_string(path)?;
    parse_shapes(&raw)
}

pub fn shapes_to_json(shapes: &[ShapeDefinition]) -> Result<String, serde_json::Error> {
    let entries: Vec<ShapeFileEntry> = shapes.iter().map(ShapeFileEntry::from_shape).collect();
    serde_json::to_string_pretty(&entries)
}
