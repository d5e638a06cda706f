//! Layout function combinators.
//!
//! [`LayoutFunctionFactory`] builds layout functions bottom-up: `line`
//! produces the cost curve of a single unbroken token run, and the
//! combinators compose curves the way their layouts compose:
//!
//! - `indent` shifts a curve right and records the extra indentation.
//! - `juxtaposition` places one family to the right of another, re-counting
//!   the overflow penalty once at the joined endpoint.
//! - `stack` places families on consecutive lines starting at the same
//!   column, charging one break penalty per added line.
//! - `choice` takes the pointwise minimum of its inputs, detecting
//!   crossovers between knots.
//! - `wrap` folds `choice(juxtaposition, stack)` over its inputs, yielding
//!   the text-wrap family: one line, one item per line, and every
//!   horizontal/vertical mix in between.
//!
//! All knot sweeps run in one pass over the merged knot sets, so each
//! combinator's output size is bounded by the sum of its input sizes (plus
//! crossover knots for `choice`).


use quill_ir::{TokenList, UnwrappedLine};

use crate::function::{LayoutFunction, LayoutFunctionSegment};
use crate::layout::{LayoutItem, LayoutKind, LayoutTree};
use crate::style::FormatStyle;

/// Stand-in for the unbounded right edge of a knot sweep.
const INFINITE_COLUMN: usize = usize::MAX;

/// Adopts `source` into `destination`, inlining its children when both nodes
/// have the same kind and `source` carries no extra indentation.
fn adopt_layout_and_flatten_if_same_kind(source: &LayoutTree, destination: &mut LayoutTree) {
    let src_item = source.item();
    if !source.is_leaf()
        && src_item.kind() == destination.item().kind()
        && src_item.indentation() == 0
    {
        let first_subitem = source.children()[0].item();
        debug_assert_eq!(src_item.must_wrap(), first_subitem.must_wrap());
        debug_assert_eq!(src_item.spaces_before(), first_subitem.spaces_before());
        for sublayout in source.children() {
            destination.adopt_subtree(sublayout.clone());
        }
    } else {
        destination.adopt_subtree(source.clone());
    }
}

/// Builds layout functions under a fixed style.
///
/// Holds only an immutable style reference; re-entrant.
pub struct LayoutFunctionFactory<'a> {
    style: &'a FormatStyle,
}

impl<'a> LayoutFunctionFactory<'a> {
    pub fn new(style: &'a FormatStyle) -> Self {
        LayoutFunctionFactory { style }
    }

    #[inline]
    pub fn style(&self) -> &FormatStyle {
        self.style
    }

    /// Cost curve of a single unbroken token run.
    ///
    /// Fitting lines cost nothing until the column pushes their end past the
    /// limit; lines at or over the limit pay overflow from column 0 on.
    pub fn line(&self, uwline: &UnwrappedLine, tokens: &TokenList) -> LayoutFunction {
        let layout = LayoutTree::leaf(LayoutItem::line(uwline, tokens));
        let span = layout.item().length();
        let limit = self.style.column_limit;
        let penalty = self.style.over_column_limit_penalty;

        if span < limit {
            LayoutFunction::from(vec![
                LayoutFunctionSegment {
                    column: 0,
                    layout: layout.clone(),
                    span,
                    intercept: 0.0,
                    gradient: 0,
                },
                LayoutFunctionSegment {
                    column: limit - span,
                    layout,
                    span,
                    intercept: 0.0,
                    gradient: penalty,
                },
            ])
        } else {
            LayoutFunction::from(vec![LayoutFunctionSegment {
                column: 0,
                layout,
                span,
                intercept: ((span - limit) as i32 * penalty) as f32,
                gradient: penalty,
            }])
        }
    }

    /// Shifts `lf` right by `indent` columns and records the indentation in
    /// every segment's layout.
    ///
    /// The overflow component is recomputed against the effective column
    /// `x + indent` so that later combinators can re-apply it at the column
    /// they actually place the layout at.
    pub fn indent(&self, lf: &LayoutFunction, indent: usize) -> LayoutFunction {
        assert!(!lf.is_empty(), "indent applied to an empty layout function");

        let limit = self.style.column_limit;
        let penalty = self.style.over_column_limit_penalty;
        let mut result = LayoutFunction::new();

        let mut indent_column = 0;
        let mut column = indent;
        let mut index = lf
            .index_at_or_to_the_left_of(column)
            .expect("non-empty layout function");

        loop {
            let segment = &lf[index];
            let columns_over_limit = column as i64 - limit as i64;

            let new_intercept = segment.cost_at(column)
                - penalty as f32 * columns_over_limit.max(0) as f32;
            let new_gradient =
                segment.gradient - penalty * i32::from(columns_over_limit >= 0);
            debug_assert!(new_gradient >= 0, "input gradient not monotonic");

            let mut new_layout = segment.layout.clone();
            let item_indent = new_layout.item().indentation() + indent;
            new_layout.item_mut().set_indentation(item_indent);

            result.push(LayoutFunctionSegment {
                column: indent_column,
                layout: new_layout,
                span: indent + segment.span,
                intercept: new_intercept,
                gradient: new_gradient,
            });

            index += 1;
            if index == lf.len() {
                break;
            }
            column = lf[index].column;
            indent_column = column - indent;
        }

        result
    }

    /// Places `right` immediately after `left` on the same line.
    fn juxtaposition_pair(
        &self,
        left: &LayoutFunction,
        right: &LayoutFunction,
    ) -> LayoutFunction {
        assert!(!left.is_empty(), "juxtaposition of an empty layout function");
        assert!(!right.is_empty(), "juxtaposition of an empty layout function");

        let limit = self.style.column_limit;
        let penalty = self.style.over_column_limit_penalty;
        let mut result = LayoutFunction::new();

        let mut index_l = 0;
        let mut column_l = 0;
        let mut column_r = left[0].span + right[0].layout.item().spaces_before();
        let mut index_r = right
            .index_at_or_to_the_left_of(column_r)
            .expect("non-empty layout function");

        loop {
            let segment_l = &left[index_l];
            let segment_r = &right[index_r];
            let spaces_r = segment_r.layout.item().spaces_before();
            let columns_over_limit = column_r as i64 - limit as i64;

            // Both inputs charge their own overflow from their own starting
            // columns; the doubly-counted part past the joined endpoint is
            // subtracted here.
            let new_intercept = segment_l.cost_at(column_l) + segment_r.cost_at(column_r)
                - penalty as f32 * columns_over_limit.max(0) as f32;
            let new_gradient = segment_l.gradient + segment_r.gradient
                - penalty * i32::from(columns_over_limit >= 0);

            let item_l = segment_l.layout.item();
            let mut new_layout = LayoutTree::leaf(LayoutItem::new(
                LayoutKind::Juxtaposition,
                item_l.spaces_before(),
                item_l.must_wrap(),
            ));
            adopt_layout_and_flatten_if_same_kind(&segment_l.layout, &mut new_layout);
            adopt_layout_and_flatten_if_same_kind(&segment_r.layout, &mut new_layout);

            result.push(LayoutFunctionSegment {
                column: column_l,
                layout: new_layout,
                span: segment_l.span + segment_r.span + spaces_r,
                intercept: new_intercept,
                gradient: new_gradient,
            });

            let next_column_l = if index_l + 1 < left.len() {
                left[index_l + 1].column
            } else {
                INFINITE_COLUMN
            };
            let next_column_r = if index_r + 1 < right.len() {
                right[index_r + 1].column
            } else {
                INFINITE_COLUMN
            };

            if next_column_l == INFINITE_COLUMN && next_column_r == INFINITE_COLUMN {
                break;
            }

            // Advance whichever side reaches its next knot sooner, and
            // recompute the other side's column.
            if next_column_r == INFINITE_COLUMN
                || next_column_l - column_l <= next_column_r - column_r
            {
                column_l = next_column_l;
                column_r = next_column_l + left[index_l + 1].span + spaces_r;
                index_l += 1;
                index_r = right
                    .index_at_or_to_the_left_of(column_r)
                    .expect("non-empty layout function");
            } else {
                column_r = next_column_r;
                column_l = next_column_r - segment_l.span - spaces_r;
                index_r += 1;
            }
        }

        result
    }

    /// Variadic juxtaposition: left fold over the pairwise core.
    ///
    /// Empty input yields the empty function; a single input passes through
    /// unchanged.
    pub fn juxtaposition(&self, lfs: &[LayoutFunction]) -> LayoutFunction {
        let Some((first, rest)) = lfs.split_first() else {
            return LayoutFunction::new();
        };
        let mut incremental = first.clone();
        for lf in rest {
            incremental = self.juxtaposition_pair(&incremental, lf);
        }
        incremental
    }

    /// Places the inputs on consecutive lines, all starting at the same
    /// column.
    ///
    /// The result inherits the first input's spacing and must-wrap flag and
    /// the last input's span, and charges one break penalty per added line.
    pub fn stack(&self, lfs: &[LayoutFunction]) -> LayoutFunction {
        if lfs.is_empty() {
            return LayoutFunction::new();
        }
        if lfs.len() == 1 {
            return lfs[0].clone();
        }
        let refs: Vec<&LayoutFunction> = lfs.iter().collect();
        self.stack_refs(&refs)
    }

    fn stack_refs(&self, lfs: &[&LayoutFunction]) -> LayoutFunction {
        debug_assert!(lfs.len() >= 2);
        assert!(
            lfs.iter().all(|lf| !lf.is_empty()),
            "stack of an empty layout function"
        );

        let first_item = lfs[0][0].layout.item();
        let spaces_before = first_item.spaces_before();
        let must_wrap = first_item.must_wrap();
        // Only the last line stays extensible under further combination.
        let span = lfs[lfs.len() - 1][0].span;
        let line_breaks_penalty =
            ((lfs.len() - 1) as i32 * self.style.line_break_penalty) as f32;

        let mut result = LayoutFunction::new();
        let mut cursors = vec![0; lfs.len()];
        let mut current_column = 0;

        loop {
            for (cursor, lf) in cursors.iter_mut().zip(lfs) {
                *cursor = lf
                    .index_at_or_to_the_left_of(current_column)
                    .expect("non-empty layout function");
            }

            let mut new_segment = LayoutFunctionSegment {
                column: current_column,
                layout: LayoutTree::leaf(LayoutItem::new(
                    LayoutKind::Stack,
                    spaces_before,
                    must_wrap,
                )),
                span,
                intercept: line_breaks_penalty,
                gradient: 0,
            };
            for (&cursor, lf) in cursors.iter().zip(lfs) {
                let segment = &lf[cursor];
                new_segment.intercept += segment.cost_at(current_column);
                new_segment.gradient += segment.gradient;
                adopt_layout_and_flatten_if_same_kind(&segment.layout, &mut new_segment.layout);
            }
            result.push(new_segment);

            let mut next_column = INFINITE_COLUMN;
            for (&cursor, lf) in cursors.iter().zip(lfs) {
                if cursor + 1 < lf.len() {
                    let column = lf[cursor + 1].column;
                    debug_assert!(column > current_column);
                    next_column = next_column.min(column);
                }
            }
            if next_column == INFINITE_COLUMN {
                break;
            }
            current_column = next_column;
        }

        result
    }

    /// Pointwise minimum of the inputs.
    ///
    /// Ties break toward the smaller gradient, then the earliest input. The
    /// result is piecewise linear but, unlike every other combinator's
    /// output, not necessarily convex.
    pub fn choice(&self, lfs: &[LayoutFunction]) -> LayoutFunction {
        if lfs.is_empty() {
            return LayoutFunction::new();
        }
        if lfs.len() == 1 {
            return lfs[0].clone();
        }
        let refs: Vec<&LayoutFunction> = lfs.iter().collect();
        self.choice_refs(&refs)
    }

    fn choice_refs(&self, lfs: &[&LayoutFunction]) -> LayoutFunction {
        debug_assert!(lfs.len() >= 2);
        assert!(
            lfs.iter().all(|lf| !lf.is_empty()),
            "choice of an empty layout function"
        );

        let mut result = LayoutFunction::new();
        let mut cursors = vec![0; lfs.len()];
        // (input index, segment index) of the last emitted minimum.
        let mut last_min: Option<(usize, usize)> = None;
        let mut current_column = 0;

        loop {
            let mut next_knot = INFINITE_COLUMN;
            for (cursor, lf) in cursors.iter_mut().zip(lfs) {
                *cursor = lf
                    .index_at_or_to_the_left_of(current_column)
                    .expect("non-empty layout function");
                if *cursor + 1 < lf.len() {
                    next_knot = next_knot.min(lf[*cursor + 1].column);
                }
            }

            loop {
                let mut min_index = 0;
                for i in 1..lfs.len() {
                    let candidate = &lfs[i][cursors[i]];
                    let minimum = &lfs[min_index][cursors[min_index]];
                    let candidate_cost = candidate.cost_at(current_column);
                    let minimum_cost = minimum.cost_at(current_column);
                    if candidate_cost < minimum_cost
                        || (candidate_cost == minimum_cost
                            && candidate.gradient < minimum.gradient)
                    {
                        min_index = i;
                    }
                }
                let min_segment = &lfs[min_index][cursors[min_index]];

                if last_min != Some((min_index, cursors[min_index])) {
                    result.push(LayoutFunctionSegment {
                        column: current_column,
                        layout: min_segment.layout.clone(),
                        span: min_segment.span,
                        intercept: min_segment.cost_at(current_column),
                        gradient: min_segment.gradient,
                    });
                    last_min = Some((min_index, cursors[min_index]));
                }

                // Nearest crossover with a flatter function, if any before
                // the next knot.
                let mut next_column = next_knot;
                for (&cursor, lf) in cursors.iter().zip(lfs) {
                    let segment = &lf[cursor];
                    if segment.gradient >= min_segment.gradient {
                        continue;
                    }
                    let gamma = (segment.cost_at(current_column)
                        - min_segment.cost_at(current_column))
                        / (min_segment.gradient - segment.gradient) as f32;
                    let column = current_column.saturating_add(gamma.ceil() as usize);
                    if column > current_column && column < next_column {
                        next_column = column;
                    }
                }

                current_column = next_column;
                if current_column >= next_knot {
                    break;
                }
            }

            if current_column == INFINITE_COLUMN {
                break;
            }
        }

        result
    }

    /// Fit on one line, else wrap: the lower envelope over every arrangement
    /// reachable by appending or stacking each next input.
    pub fn wrap(&self, lfs: &[LayoutFunction]) -> LayoutFunction {
        let Some((first, rest)) = lfs.split_first() else {
            return LayoutFunction::new();
        };
        let mut wrapped = first.clone();
        for lf in rest {
            // An input that must start its own line cannot extend the
            // accumulated last line.
            if lf.must_wrap() {
                wrapped = self.stack_refs(&[&wrapped, lf]);
                continue;
            }
            let horizontal = self.juxtaposition_pair(&wrapped, lf);
            let vertical = self.stack_refs(&[&wrapped, lf]);
            wrapped = self.choice_refs(&[&horizontal, &vertical]);
        }
        wrapped
    }
}
