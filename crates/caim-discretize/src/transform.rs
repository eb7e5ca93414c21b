//! Row transformation
//!
//! Maps continuous values to bins of a fitted boundary set
//! `[b0, b1, ..., bn]`: a value goes to bin `k - 1` for the smallest `k` with
//! `value <= b_k`, clamped to the valid bins. Values at or below `b0` land in
//! the first bin and values at or above `bn` in the last.
//!
//! Bins are rendered either as their index (`"0"`, `"1"`, ...) or as interval
//! labels `"[low-high)"`, the last bin being closed (`"[low-high]"`).

use caim_dataset::{Attribute, Value};
use serde::{Deserialize, Serialize};

use crate::scheme::AttributeSlot;

/// Representation of discretized values.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Bin index: `"0"`, `"1"`, ...
    Index,
    /// Interval label: `"[1.0-1.5)"`, ..., `"[5.5-9.0]"`
    #[default]
    Interval,
}

/// Bin of `value` for sorted `boundaries`.
///
/// Returns 0 when the boundaries define at most one interval.
///
/// # Examples
///
/// ```
/// use caim_discretize::transform::bin_index;
///
/// let boundaries = [1.0, 1.5, 7.0, 9.0];
/// assert_eq!(bin_index(&boundaries, 0.0), 0);
/// assert_eq!(bin_index(&boundaries, 1.5), 0);
/// assert_eq!(bin_index(&boundaries, 5.0), 1);
/// assert_eq!(bin_index(&boundaries, 9.0), 2);
/// assert_eq!(bin_index(&boundaries, 100.0), 2);
/// ```
#[must_use]
pub fn bin_index(boundaries: &[f64], value: f64) -> usize {
    if boundaries.len() < 3 {
        return 0;
    }
    let k = boundaries.partition_point(|&boundary| value > boundary);
    k.saturating_sub(1).min(boundaries.len() - 2)
}

/// Interval label of one bin.
#[must_use]
pub fn interval_label(low: f64, high: f64, closed: bool) -> String {
    let close = if closed { ']' } else { ')' };
    format!("[{low:?}-{high:?}{close}")
}

/// Labels of an attribute slot, `None` for attributes that are not
/// discretized.
///
/// An empty slot is a single bin covering every value.
#[must_use]
pub fn slot_labels(slot: &AttributeSlot, format: OutputFormat) -> Option<Vec<String>> {
    match slot {
        AttributeSlot::Skipped => None,
        AttributeSlot::Empty => Some(vec![empty_slot_label(format)]),
        AttributeSlot::Fitted(scheme) => Some(scheme.labels(format)),
    }
}

/// Transforms one cell.
///
/// Missing values stay missing. Cells of attributes that are not discretized
/// are returned unchanged.
#[must_use]
pub fn transform_value(value: &Value, slot: &AttributeSlot, format: OutputFormat) -> Value {
    if !slot.is_discretized() {
        return value.clone();
    }
    if value.is_missing() {
        return Value::Missing;
    }
    let Some(number) = value.as_number() else {
        return value.clone();
    };
    match slot {
        AttributeSlot::Fitted(scheme) => {
            Value::Label(scheme.label(scheme.bin_index(number), format))
        }
        AttributeSlot::Empty => Value::Label(empty_slot_label(format)),
        AttributeSlot::Skipped => value.clone(),
    }
}

fn empty_slot_label(format: OutputFormat) -> String {
    match format {
        OutputFormat::Index => "0".to_owned(),
        OutputFormat::Interval => interval_label(f64::NEG_INFINITY, f64::INFINITY, true),
    }
}

/// Output attribute for an input attribute and its slot.
///
/// Discretized attributes become nominal attributes whose labels are the
/// bins; the others are copied.
#[must_use]
pub fn output_attribute(
    attribute: &Attribute,
    slot: &AttributeSlot,
    format: OutputFormat,
) -> Attribute {
    match slot_labels(slot, format) {
        Some(labels) => Attribute::nominal(attribute.name.clone(), labels),
        None => attribute.clone(),
    }
}
