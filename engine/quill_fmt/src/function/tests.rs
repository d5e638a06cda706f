//! Tests for layout functions and segment lookup.

use quill_ir::TokenList;

use super::*;
use crate::layout::{LayoutItem, LayoutKind};

fn empty_line_layout() -> LayoutTree {
    LayoutTree::leaf(LayoutItem::new(LayoutKind::Line, 0, false))
}

fn segment(column: usize, span: usize, intercept: f32, gradient: i32) -> LayoutFunctionSegment {
    LayoutFunctionSegment {
        column,
        layout: empty_line_layout(),
        span,
        intercept,
        gradient,
    }
}

fn sample_function() -> LayoutFunction {
    LayoutFunction::from(vec![
        segment(0, 10, 101.0, 11),
        segment(1, 20, 202.0, 22),
        segment(2, 30, 303.0, 33),
        segment(3, 40, 404.0, 44),
        segment(40, 50, 505.0, 55),
        segment(50, 60, 606.0, 66),
    ])
}

#[test]
fn segment_display() {
    let tokens = TokenList::new();
    let function = sample_function();
    assert_eq!(
        function[0].display(&tokens).to_string(),
        "[  0] (101.000 + 11*x), span: 10, layout:\n\
         \x20     { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }"
    );
    assert_eq!(
        function[5].display(&tokens).to_string(),
        "[ 50] (606.000 + 66*x), span: 60, layout:\n\
         \x20     { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }"
    );
}

#[test]
fn function_display() {
    let tokens = TokenList::new();
    let function = sample_function();
    assert_eq!(
        function.display(&tokens).to_string(),
        "{\n\
         \x20 [  0] ( 101.000 +   11*x), span:  10, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         \x20 [  1] ( 202.000 +   22*x), span:  20, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         \x20 [  2] ( 303.000 +   33*x), span:  30, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         \x20 [  3] ( 404.000 +   44*x), span:  40, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         \x20 [ 40] ( 505.000 +   55*x), span:  50, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         \x20 [ 50] ( 606.000 +   66*x), span:  60, layout:\n\
         \x20       { ([  ], length: 0, indentation: 0, spacing: 0, must wrap: no) }\n\
         }"
    );
    assert_eq!(LayoutFunction::new().display(&tokens).to_string(), "{}");
}

#[test]
fn size_and_empty() {
    let function = sample_function();
    assert_eq!(function.len(), 6);
    assert!(!function.is_empty());

    let empty = LayoutFunction::new();
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
}

#[test]
fn iteration_visits_knots_in_order() {
    let function = sample_function();
    let columns: Vec<usize> = function.iter().map(|s| s.column).collect();
    assert_eq!(columns, [0, 1, 2, 3, 40, 50]);

    let empty = LayoutFunction::new();
    assert_eq!(empty.iter().count(), 0);
}

#[test]
fn at_or_to_the_left_of_picks_covering_segment() {
    let function = sample_function();

    assert_eq!(function.index_at_or_to_the_left_of(0), Some(0));
    assert_eq!(function.index_at_or_to_the_left_of(1), Some(1));
    assert_eq!(function.index_at_or_to_the_left_of(2), Some(2));
    for column in 3..40 {
        assert_eq!(function.index_at_or_to_the_left_of(column), Some(3));
    }
    for column in 40..50 {
        assert_eq!(function.index_at_or_to_the_left_of(column), Some(4));
    }
    for column in 50..70 {
        assert_eq!(function.index_at_or_to_the_left_of(column), Some(5));
    }
    assert_eq!(function.index_at_or_to_the_left_of(usize::MAX), Some(5));

    let empty = LayoutFunction::new();
    assert_eq!(empty.index_at_or_to_the_left_of(0), None);
    assert_eq!(empty.index_at_or_to_the_left_of(1), None);
    assert_eq!(empty.index_at_or_to_the_left_of(usize::MAX), None);
    assert!(empty.at_or_to_the_left_of(0).is_none());
}

#[test]
fn insertion_keeps_order() {
    let mut function = sample_function();

    function.push(segment(60, 1, 6.0, 6));
    assert_eq!(function.len(), 7);
    assert_eq!(function[6].column, 60);

    function.push(segment(70, 1, 6.0, 6));
    assert_eq!(function.len(), 8);
    assert_eq!(function[6].column, 60);
    assert_eq!(function[7].column, 70);
}

#[test]
fn subscript_access() {
    let mut function = sample_function();
    assert_eq!(function[0].column, 0);
    assert_eq!(function[3].column, 3);
    assert_eq!(function[4].column, 40);
    assert_eq!(function[5].column, 50);

    function[5].column += 5;
    assert_eq!(function[5].column, 55);
}

#[test]
fn segment_cost_is_linear_from_knot() {
    let function = sample_function();
    assert_eq!(function[0].cost_at(0), 101.0);
    assert_eq!(function[0].cost_at(1), 112.0);
    assert_eq!(function[4].cost_at(45), 505.0 + 55.0 * 5.0);
    assert_eq!(function.cost_at(45), 505.0 + 55.0 * 5.0);
}

#[test]
fn must_wrap_comes_from_first_segment() {
    let mut function = LayoutFunction::new();
    function.push(LayoutFunctionSegment {
        column: 0,
        layout: LayoutTree::leaf(LayoutItem::new(LayoutKind::Line, 0, true)),
        span: 4,
        intercept: 0.0,
        gradient: 0,
    });
    assert!(function.must_wrap());
}
