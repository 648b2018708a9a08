#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A half-open range `[start, end)` of byte positions in the input text.
///
/// Every successful match carries the interval it consumed. Zero-length
/// intervals are valid and mark lookahead predicates and optional
/// expressions that matched nothing. Positions are byte offsets aligned to
/// `char` boundaries of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Create an interval from its endpoints.
    ///
    /// # Panics
    /// Panics if `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "interval start must not exceed its end");
        Self { start, end }
    }

    /// Create an interval from a start position and a length.
    #[must_use]
    pub const fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Create a zero-length interval at `position`.
    #[must_use]
    pub const fn empty(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `position` lies inside the interval. The end is exclusive.
    #[must_use]
    pub const fn contains(self, position: usize) -> bool {
        position >= self.start && position < self.end
    }

    #[must_use]
    pub const fn contains_range(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);

        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// The interval as a `Range` usable to slice the input text.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Interval> for Range<usize> {
    fn from(interval: Interval) -> Self {
        interval.range()
    }
}

#[cfg(feature = "diagnostics")]
impl From<Interval> for miette::SourceSpan {
    fn from(interval: Interval) -> Self {
        use miette::SourceOffset;
        Self::new(SourceOffset::from(interval.start()), interval.len())
    }
}
