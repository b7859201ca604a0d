use serde::{Deserialize, Serialize};

use crate::shape::ShapeDefinition;

/// Number of slider slots the modulator stores per preset.
pub const SLOT_COUNT: usize = 86;
/// Token count once the quoted name has been spliced in.
pub const TOKEN_COUNT: usize = SLOT_COUNT + 1;
pub const MAX_POINTS: usize = 16;
pub const MAX_CURVES: usize = 15;

/// Marker telling the host to keep the slider default.
pub const PLACEHOLDER: &str = "-";
/// The quoted name sits between slider 64 (point 13 x) and slider 65.
pub const NAME_TOKEN_INDEX: usize = 64;

pub const POINT_COUNT_SLOT: usize = 29;
pub const POINT_BASE: usize = 39;
pub const CURVE_BASE: usize = 71;

const RATE_BASE: usize = 0;
const RATE_DEFAULTS: [&str; 6] = ["0", "1", "5", "0", "0", "1"];
const TRIGGER_BASE: usize = 19;
const TRIGGER_DEFAULTS: [&str; 6] = ["0", "0", "0", "0.5", "100", "500"];
const GRID_BASE: usize = 25;
const GRID_DEFAULTS: [&str; 2] = ["2", "1"];
const MODE_BASE: usize = 27;
const MODE_DEFAULTS: [&str; 2] = ["0", "0"];

/// Unused point pairs must hold the midpoint, the host misreads `-` there.
const UNUSED_POINT: &str = "0.5";
const ZERO_CURVE: &str = "0";

/// What to write into curve slots a shape does not supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsetCurvePolicy {
    /// Leave the slot as [`PLACEHOLDER`].
    #[default]
    Placeholder,
    /// Force the slot to a straight segment (`0`).
    Zero,
}

/// Fixed slider array for one preset, before the name is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSlots {
    slots: Vec<String>,
}

impl ParameterSlots {
    /// Lays a validated shape out into the slider array.
    pub fn build(shape: &ShapeDefinition, policy: UnsetCurvePolicy) -> Self {
        let mut slots = vec![PLACEHOLDER.to_string(); SLOT_COUNT];

        write_constants(&mut slots, RATE_BASE, &RATE_DEFAULTS);
        write_constants(&mut slots, TRIGGER_BASE, &TRIGGER_DEFAULTS);
        write_constants(&mut slots, GRID_BASE, &GRID_DEFAULTS);
        write_constants(&mut slots, MODE_BASE, &MODE_DEFAULTS);

        slots[POINT_COUNT_SLOT] = shape.point_count.to_string();

        for index in 0..MAX_POINTS {
            let (x, y) = match shape.points.get(index) {
                Some(point) => (format_number(point.x), format_number(point.y)),
                None => (UNUSED_POINT.to_string(), UNUSED_POINT.to_string()),
            };
            slots[POINT_BASE + index * 2] = x;
            slots[POINT_BASE + index * 2 + 1] = y;
        }

        if policy == UnsetCurvePolicy::Zero {
            for slot in &mut slots[CURVE_BASE..CURVE_BASE + MAX_CURVES] {
                *slot = ZERO_CURVE.to_string();
            }
        }
        for (index, value) in shape.curves().iter().take(MAX_CURVES).enumerate() {
            slots[CURVE_BASE + index] = format_number(*value);
        }

        Self { slots }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Splices `"name"` in after slot 63, giving the full token sequence.
    pub fn with_name(self, name: &str) -> Vec<String> {
        let mut tokens = self.slots;
        tokens.insert(NAME_TOKEN_INDEX, format!("\"{name}\""));
        tokens
    }
}

fn write_constants(slots: &mut [String], base: usize, values: &[&str]) {
    for (slot, value) in slots[base..base + values.len()].iter_mut().zip(values) {
        *slot = (*value).to_string();
    }
}

/// Shortest decimal form, so `1.0` is written as `1` and `0.25` as `0.25`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0.0
        return "0".to_string();
    }
    value.to_string()
}

/// Maps a token index of the named sequence back to its slot index.
pub fn slot_for_token(token_index: usize) -> Option<usize> {
    match token_index {
        NAME_TOKEN_INDEX => None,
        index if index < NAME_TOKEN_INDEX => Some(index),
        index => Some(index - 1),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::shape::ControlPoint;

    fn ramp_up() -> ShapeDefinition {
        ShapeDefinition::from_pairs("Ramp_Up", &[(0.0, 0.0), (1.0, 1.0)])
    }

    #[test]
    fn ramp_up_layout() {
        let slots = ParameterSlots::build(&ramp_up(), UnsetCurvePolicy::default());
        assert_eq!(slots.len(), SLOT_COUNT);
        assert_eq!(slots.get(POINT_COUNT_SLOT), Some("2"));
        assert_eq!(&slots.as_slice()[39..43], &["0", "0", "1", "1"]);
        assert!(slots.as_slice()[43..=70].iter().all(|slot| slot == "0.5"));
        assert!(slots.as_slice()[CURVE_BASE..].iter().all(|slot| slot == PLACEHOLDER));

        let tokens = slots.with_name("Ramp_Up");
        assert_eq!(tokens.len(), TOKEN_COUNT);
        assert_eq!(tokens[63], "0.5");
        assert_eq!(tokens[NAME_TOKEN_INDEX], "\"Ramp_Up\"");
        assert_eq!(tokens[65], "0.5");
    }

    #[test]
    fn constant_sections() {
        let slots = ParameterSlots::build(&ramp_up(), UnsetCurvePolicy::default());
        let slots = slots.as_slice();
        assert_eq!(&slots[0..6], &["0", "1", "5", "0", "0", "1"]);
        assert_eq!(&slots[19..25], &["0", "0", "0", "0.5", "100", "500"]);
        assert_eq!(&slots[25..29], &["2", "1", "0", "0"]);
        for index in (6..19).chain(30..39) {
            assert_eq!(slots[index], PLACEHOLDER, "slot {index}");
        }
    }

    #[test]
    fn unused_pairs_are_midpoints_for_every_count() {
        for count in 1..=MAX_POINTS {
            let points = (0..count)
                .map(|i| ControlPoint::new(i as f64 / MAX_POINTS as f64, 1.0))
                .collect();
            let shape = ShapeDefinition::new("Shape", points);
            let slots = ParameterSlots::build(&shape, UnsetCurvePolicy::Placeholder);
            assert_eq!(slots.get(POINT_COUNT_SLOT), Some(count.to_string().as_str()));
            for index in count..MAX_POINTS {
                assert_eq!(slots.get(POINT_BASE + index * 2), Some("0.5"));
                assert_eq!(slots.get(POINT_BASE + index * 2 + 1), Some("0.5"));
            }
            for index in 0..count {
                assert_eq!(slots.get(POINT_BASE + index * 2 + 1), Some("1"));
            }
        }
    }

    #[test]
    fn supplied_curves_and_policies() {
        let shape = ramp_up().with_curves(vec![0.6]);

        let placeholder = ParameterSlots::build(&shape, UnsetCurvePolicy::Placeholder);
        assert_eq!(placeholder.get(CURVE_BASE), Some("0.6"));
        assert!(placeholder.as_slice()[CURVE_BASE + 1..]
            .iter()
            .all(|slot| slot == PLACEHOLDER));

        let zero = ParameterSlots::build(&shape, UnsetCurvePolicy::Zero);
        assert_eq!(zero.get(CURVE_BASE), Some("0.6"));
        assert!(zero.as_slice()[CURVE_BASE + 1..].iter().all(|slot| slot == "0"));
        assert_eq!(zero.len(), SLOT_COUNT);
    }

    #[test]
    fn numbers_use_shortest_form() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.067), "0.067");
        assert_eq!(format_number(-0.6), "-0.6");
    }

    #[test]
    fn token_to_slot_mapping() {
        assert_eq!(slot_for_token(0), Some(0));
        assert_eq!(slot_for_token(63), Some(63));
        assert_eq!(slot_for_token(NAME_TOKEN_INDEX), None);
        assert_eq!(slot_for_token(65), Some(64));
        assert_eq!(slot_for_token(TOKEN_COUNT - 1), Some(SLOT_COUNT - 1));
    }
}
