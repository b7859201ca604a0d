//! Built-in shape table shipped as the default library.

use std::f64::consts::TAU;

use crate::shape::{ControlPoint, ShapeDefinition};
use crate::slots::MAX_POINTS;

pub fn factory_shapes() -> Vec<ShapeDefinition> {
    vec![
        ShapeDefinition::new("Sine", sine_points(MAX_POINTS)),
        ShapeDefinition::from_pairs("Triangle", &[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]),
        // ramp up, then drop at the midpoint
        ShapeDefinition::from_pairs(
            "Sawtooth",
            &[(0.0, 0.5), (0.499, 1.0), (0.5, 0.0), (1.0, 0.5)],
        ),
        ShapeDefinition::from_pairs(
            "Square",
            &[(0.0, 1.0), (0.499, 1.0), (0.5, 0.0), (1.0, 0.0)],
        ),
        ShapeDefinition::from_pairs("Ramp_Up", &[(0.0, 0.0), (1.0, 1.0)]),
        ShapeDefinition::from_pairs("Ramp_Down", &[(0.0, 1.0), (1.0, 0.0)]),
        ShapeDefinition::from_pairs("Shark_Fin", &[(0.0, 0.0), (0.2, 1.0), (1.0, 0.0)]),
        ShapeDefinition::from_pairs(
            "Growl",
            &[
                (0.0, 0.1),
                (0.2, 0.8),
                (0.4, 0.2),
                (0.6, 0.9),
                (0.8, 0.3),
                (1.0, 0.0),
            ],
        ),
        // the bias is left to the plugin's per-segment default
        ShapeDefinition::from_pairs("Exp_Rise", &[(0.0, 0.0), (1.0, 1.0)]),
        ShapeDefinition::from_pairs("Exp_Fall", &[(0.0, 1.0), (1.0, 0.0)]),
    ]
}

/// One sine cycle sampled at `count` evenly spaced points, rounded to three
/// decimals.
pub fn sine_points(count: usize) -> Vec<ControlPoint> {
    if count < 2 {
        return vec![ControlPoint::new(0.0, 0.5); count];
    }
    let last = (count - 1) as f64;
    (0..count)
        .map(|index| {
            let x = round3(index as f64 / last);
            let y = round3(0.5 + 0.5 * (TAU * x).sin());
            ControlPoint::new(x, y)
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
