//! Piecewise-linear layout cost functions.
//!
//! A [`LayoutFunction`] maps a starting column to the least cost any layout
//! in its family can achieve from that column. It is stored as an ordered
//! sequence of [`LayoutFunctionSegment`]s; segment `k` describes the linear
//! piece on `[segment[k].column, segment[k + 1].column)` and carries the
//! concrete layout tree achieving that cost.

#[cfg(test)]
mod tests;

use std::fmt;
use std::ops::{Index, IndexMut};

use quill_ir::TokenList;

use crate::layout::LayoutTree;

/// One linear piece of a layout function.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutFunctionSegment {
    /// Least starting column at which this segment applies (the knot).
    pub column: usize,

    /// Layout achieving this cost.
    pub layout: LayoutTree,

    /// Rendered width of the last line the layout produces; an appended
    /// neighbor starts at `column + span` plus its own leading spaces.
    pub span: usize,

    /// Cost at `column`.
    pub intercept: f32,

    /// Cost increase per column to the right of `column`. Integer so that
    /// crossover comparisons stay exact.
    pub gradient: i32,
}

impl LayoutFunctionSegment {
    /// Cost at `column`, which must lie at or right of this segment's knot.
    #[inline]
    pub fn cost_at(&self, column: usize) -> f32 {
        debug_assert!(column >= self.column);
        self.intercept + self.gradient as f32 * (column - self.column) as f32
    }

    /// Diagnostic rendering with the backing token store.
    pub fn display<'a>(&'a self, tokens: &'a TokenList) -> LayoutFunctionSegmentDisplay<'a> {
        LayoutFunctionSegmentDisplay {
            segment: self,
            tokens,
        }
    }
}

/// Borrowing `Display` adapter for [`LayoutFunctionSegment`].
pub struct LayoutFunctionSegmentDisplay<'a> {
    segment: &'a LayoutFunctionSegment,
    tokens: &'a TokenList,
}

impl fmt::Display for LayoutFunctionSegmentDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.segment;
        write!(
            f,
            "[{:3}] ({:.3} + {}*x), span: {}, layout:\n{}",
            s.column,
            s.intercept,
            s.gradient,
            s.span,
            s.layout.display(self.tokens, 6),
        )
    }
}

/// Piecewise-linear cost function over starting columns.
///
/// Invariants maintained by the combinator factory: segment knots strictly
/// increase, the first knot is column 0, and adjacent pieces meet
/// continuously. All combinator outputs except `choice` are convex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutFunction {
    segments: Vec<LayoutFunctionSegment>,
}

impl LayoutFunction {
    pub fn new() -> Self {
        LayoutFunction::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment; knots must arrive in strictly increasing order.
    pub fn push(&mut self, segment: LayoutFunctionSegment) {
        debug_assert!(
            self.segments
                .last()
                .map_or(true, |last| last.column < segment.column),
            "layout function knots must strictly increase"
        );
        self.segments.push(segment);
    }

    #[inline]
    pub fn first(&self) -> Option<&LayoutFunctionSegment> {
        self.segments.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&LayoutFunctionSegment> {
        self.segments.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutFunctionSegment> {
        self.segments.iter()
    }

    /// Index of the segment whose knot interval contains `column`.
    ///
    /// Returns `None` on an empty function. Any non-empty function starts at
    /// column 0, so every column is covered.
    pub fn index_at_or_to_the_left_of(&self, column: usize) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        let covered = self.segments.partition_point(|s| s.column <= column);
        assert!(
            covered > 0,
            "segment lookup for column {column} landed before the first knot"
        );
        Some(covered - 1)
    }

    /// Segment whose knot interval contains `column`; `None` on empty.
    pub fn at_or_to_the_left_of(&self, column: usize) -> Option<&LayoutFunctionSegment> {
        self.index_at_or_to_the_left_of(column)
            .map(|i| &self.segments[i])
    }

    /// Cost at `column`; the function must be non-empty.
    pub fn cost_at(&self, column: usize) -> f32 {
        self.at_or_to_the_left_of(column)
            .expect("cost_at on an empty layout function")
            .cost_at(column)
    }

    /// Whether layouts in this family refuse to share a line with their
    /// predecessor. Taken from the first segment's layout root.
    pub fn must_wrap(&self) -> bool {
        self.segments
            .first()
            .expect("must_wrap on an empty layout function")
            .layout
            .item()
            .must_wrap()
    }

    /// Diagnostic rendering with the backing token store.
    pub fn display<'a>(&'a self, tokens: &'a TokenList) -> LayoutFunctionDisplay<'a> {
        LayoutFunctionDisplay {
            function: self,
            tokens,
        }
    }
}

impl From<Vec<LayoutFunctionSegment>> for LayoutFunction {
    fn from(segments: Vec<LayoutFunctionSegment>) -> Self {
        debug_assert!(segments.windows(2).all(|w| w[0].column < w[1].column));
        LayoutFunction { segments }
    }
}

impl Index<usize> for LayoutFunction {
    type Output = LayoutFunctionSegment;

    fn index(&self, index: usize) -> &LayoutFunctionSegment {
        &self.segments[index]
    }
}

impl IndexMut<usize> for LayoutFunction {
    fn index_mut(&mut self, index: usize) -> &mut LayoutFunctionSegment {
        &mut self.segments[index]
    }
}

impl<'a> IntoIterator for &'a LayoutFunction {
    type Item = &'a LayoutFunctionSegment;
    type IntoIter = std::slice::Iter<'a, LayoutFunctionSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Borrowing `Display` adapter for [`LayoutFunction`].
pub struct LayoutFunctionDisplay<'a> {
    function: &'a LayoutFunction,
    tokens: &'a TokenList,
}

impl fmt::Display for LayoutFunctionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.function.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{\n")?;
        for segment in self.function.iter() {
            writeln!(
                f,
                "  [{:3}] ({:8.3} + {:4}*x), span: {:3}, layout:",
                segment.column, segment.intercept, segment.gradient, segment.span,
            )?;
            writeln!(f, "{}", segment.layout.display(self.tokens, 8))?;
        }
        f.write_str("}")
    }
}
