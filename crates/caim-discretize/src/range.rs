//! Attribute range selector
//!
//! Selects attribute positions with a comma separated list of 1-based
//! positions and inclusive ranges. `first` and `last` stand for the first
//! and last attribute of the dataset the selector is applied to:
//!
//! ```text
//! first-last           every attribute
//! first-3,5,6-10,last  positions 1, 2, 3, 5, 6..=10 and the last one
//! ```
//!
//! Positions past the end of the dataset select nothing.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RangeError {
    #[display("range list is empty")]
    Empty,
    #[display("empty item at position {position} of the range list")]
    EmptyItem { position: usize },
    #[display("invalid attribute position '{token}'")]
    InvalidPosition { token: String },
    #[display("range {start}-{end} is reversed")]
    Reversed { start: usize, end: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    First,
    Last,
    Position(NonZeroUsize),
}

impl Bound {
    fn parse(token: &str) -> Result<Self, RangeError> {
        match token {
            "first" => Ok(Bound::First),
            "last" => Ok(Bound::Last),
            _ => token
                .parse::<NonZeroUsize>()
                .map(Bound::Position)
                .map_err(|_| RangeError::InvalidPosition {
                    token: token.to_owned(),
                }),
        }
    }

    fn resolve(self, num_attributes: usize) -> usize {
        match self {
            Bound::First => 1,
            Bound::Last => num_attributes,
            Bound::Position(position) => position.get(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: Bound,
    end: Bound,
}

/// A parsed attribute range selector.
///
/// # Examples
///
/// ```
/// use caim_discretize::range::AttributeRange;
///
/// let range: AttributeRange = "first-2,last".parse().unwrap();
/// // 0-based attribute indices of a 5-attribute dataset
/// assert!(range.contains(0, 5));
/// assert!(range.contains(1, 5));
/// assert!(!range.contains(2, 5));
/// assert!(range.contains(4, 5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeRange {
    source: String,
    spans: Vec<Span>,
}

impl AttributeRange {
    /// Selects every attribute (`first-last`).
    #[must_use]
    pub fn all() -> Self {
        Self {
            source: "first-last".to_owned(),
            spans: vec![Span {
                start: Bound::First,
                end: Bound::Last,
            }],
        }
    }

    /// Whether the attribute at 0-based `index` is selected in a dataset with
    /// `num_attributes` attributes.
    #[must_use]
    pub fn contains(&self, index: usize, num_attributes: usize) -> bool {
        if index >= num_attributes {
            return false;
        }
        let position = index + 1;
        self.spans.iter().any(|span| {
            let start = span.start.resolve(num_attributes);
            let end = span.end.resolve(num_attributes);
            (start..=end).contains(&position)
        })
    }

    /// All selected 0-based indices, ascending.
    #[must_use]
    pub fn indices(&self, num_attributes: usize) -> Vec<usize> {
        (0..num_attributes)
            .filter(|&index| self.contains(index, num_attributes))
            .collect()
    }
}

impl Default for AttributeRange {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for AttributeRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source = s.trim();
        if source.is_empty() {
            return Err(RangeError::Empty);
        }

        let spans = source
            .split(',')
            .enumerate()
            .map(|(position, item)| {
                let item = item.trim();
                if item.is_empty() {
                    return Err(RangeError::EmptyItem {
                        position: position + 1,
                    });
                }
                let span = match item.split_once('-') {
                    Some((start, end)) => Span {
                        start: Bound::parse(start.trim())?,
                        end: Bound::parse(end.trim())?,
                    },
                    None => {
                        let bound = Bound::parse(item)?;
                        Span {
                            start: bound,
                            end: bound,
                        }
                    }
                };
                if let (Bound::Position(start), Bound::Position(end)) = (span.start, span.end) {
                    if start > end {
                        return Err(RangeError::Reversed {
                            start: start.get(),
                            end: end.get(),
                        });
                    }
                }
                Ok(span)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_owned(),
            spans,
        })
    }
}

impl TryFrom<String> for AttributeRange {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeRange> for String {
    fn from(range: AttributeRange) -> Self {
        range.source
    }
}

impl fmt::Display for AttributeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
