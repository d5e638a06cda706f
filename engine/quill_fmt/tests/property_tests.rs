#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property-based tests for the layout function algebra.
//!
//! These check the laws the combinators must uphold for arbitrary inputs:
//! well-formed segment sequences (ordered knots, continuity at every knot),
//! convexity of the convex combinators, the pointwise-minimum law of
//! `choice`, and the shift law of `indent`.

use proptest::prelude::*;

use quill_fmt::{FormatStyle, LayoutFunction, LayoutFunctionFactory};
use quill_ir::{PreFormatToken, TokenList, UnwrappedLine};

const TOLERANCE: f32 = 1e-3;

fn test_style() -> FormatStyle {
    FormatStyle {
        indentation_spaces: 2,
        wrap_spaces: 4,
        column_limit: 40,
        over_column_limit_penalty: 100,
        line_break_penalty: 2,
    }
}

/// One single-token line per (width, leading spaces) pair.
fn build_lines(specs: &[(usize, usize)]) -> (TokenList, Vec<UnwrappedLine>) {
    let mut tokens = TokenList::new();
    let mut uwlines = Vec::new();
    for &(width, spaces) in specs {
        let mut token = PreFormatToken::new("x".repeat(width));
        token.before.spaces_required = spaces;
        let index = tokens.push(token);
        let mut uwline = UnwrappedLine::new(0, index);
        uwline.span_up_to(index + 1);
        uwlines.push(uwline);
    }
    (tokens, uwlines)
}

fn line_functions(
    factory: &LayoutFunctionFactory<'_>,
    tokens: &TokenList,
    uwlines: &[UnwrappedLine],
) -> Vec<LayoutFunction> {
    uwlines
        .iter()
        .map(|uwline| factory.line(uwline, tokens))
        .collect()
}

/// Ordered knots starting at zero, continuous at every knot.
fn check_well_formed(lf: &LayoutFunction) {
    assert!(!lf.is_empty());
    assert_eq!(lf[0].column, 0, "first knot must sit at column 0");
    for i in 1..lf.len() {
        let previous = &lf[i - 1];
        let current = &lf[i];
        assert!(
            previous.column < current.column,
            "knots must strictly increase"
        );
        let left_limit = previous.cost_at(current.column);
        assert!(
            (left_limit - current.intercept).abs() < TOLERANCE,
            "discontinuity at column {}: {} != {}",
            current.column,
            left_limit,
            current.intercept,
        );
    }
}

/// Gradients never decrease across segments.
fn check_convex(lf: &LayoutFunction) {
    for i in 1..lf.len() {
        assert!(
            lf[i - 1].gradient <= lf[i].gradient,
            "gradient drops at column {}",
            lf[i].column,
        );
    }
}

fn line_specs() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((1usize..60, 0usize..3), 1..6)
}

proptest! {
    #[test]
    fn line_functions_are_well_formed_and_convex(specs in line_specs()) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        for lf in line_functions(&factory, &tokens, &uwlines) {
            check_well_formed(&lf);
            check_convex(&lf);
            prop_assert!(lf.cost_at(0) >= 0.0);
        }
    }

    #[test]
    fn stack_is_well_formed_and_sums_costs(specs in line_specs()) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        let lines = line_functions(&factory, &tokens, &uwlines);

        let stacked = factory.stack(&lines);
        check_well_formed(&stacked);
        check_convex(&stacked);

        let break_cost = (lines.len() - 1) as f32 * style.line_break_penalty as f32;
        for column in [0usize, 1, 5, 17, 39, 40, 41, 80] {
            let expected: f32 =
                lines.iter().map(|lf| lf.cost_at(column)).sum::<f32>() + break_cost;
            let actual = stacked.cost_at(column);
            prop_assert!(
                (actual - expected).abs() < TOLERANCE,
                "stack cost at {column}: {actual} != {expected}",
            );
        }

        // Span comes from the last input; spacing from the first.
        prop_assert_eq!(stacked[0].span, lines.last().unwrap()[0].span);
        if lines.len() > 1 {
            let first_item = lines[0][0].layout.item();
            let stacked_item = stacked[0].layout.item();
            prop_assert_eq!(stacked_item.spaces_before(), first_item.spaces_before());
            prop_assert_eq!(stacked_item.must_wrap(), first_item.must_wrap());
        }
    }

    #[test]
    fn juxtaposition_is_well_formed(specs in line_specs()) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        let lines = line_functions(&factory, &tokens, &uwlines);

        let joined = factory.juxtaposition(&lines);
        check_well_formed(&joined);
        check_convex(&joined);

        // Identity laws.
        prop_assert!(factory.juxtaposition(&[]).is_empty());
        prop_assert_eq!(
            &factory.juxtaposition(&lines[..1]),
            &lines[0]
        );
    }

    #[test]
    fn choice_is_pointwise_minimum(specs in line_specs()) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        let lines = line_functions(&factory, &tokens, &uwlines);
        // Mix shapes so the envelope has real crossovers.
        let mut choices = vec![factory.juxtaposition(&lines), factory.stack(&lines)];
        choices.extend(lines.iter().cloned());

        let envelope = factory.choice(&choices);
        check_well_formed(&envelope);

        for column in [0usize, 1, 3, 10, 20, 39, 40, 41, 55, 100] {
            let minimum = choices
                .iter()
                .map(|lf| lf.cost_at(column))
                .fold(f32::INFINITY, f32::min);
            let actual = envelope.cost_at(column);
            prop_assert!(
                (actual - minimum).abs() < TOLERANCE,
                "choice cost at {column}: {actual} != {minimum}",
            );
        }
    }

    #[test]
    fn indent_shifts_cost_and_span(specs in line_specs(), indent in 0usize..30) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        let lines = line_functions(&factory, &tokens, &uwlines);
        let stacked = factory.stack(&lines);

        let indented = factory.indent(&stacked, indent);
        check_well_formed(&indented);

        for column in [0usize, 1, 7, 20, 39, 40, 60] {
            let expected = stacked.cost_at(column + indent);
            let actual = indented.cost_at(column);
            prop_assert!(
                (actual - expected).abs() < TOLERANCE,
                "indent cost at {column}: {actual} != {expected}",
            );
        }

        for i in 0..indented.len() {
            let source = stacked
                .at_or_to_the_left_of(indented[i].column + indent)
                .unwrap();
            prop_assert_eq!(indented[i].span, source.span + indent);
            prop_assert_eq!(
                indented[i].layout.item().indentation(),
                source.layout.item().indentation() + indent
            );
        }
    }

    #[test]
    fn wrap_collapses_to_identity_on_one_input(specs in line_specs()) {
        let style = test_style();
        let factory = LayoutFunctionFactory::new(&style);
        let (tokens, uwlines) = build_lines(&specs);
        let lines = line_functions(&factory, &tokens, &uwlines);

        prop_assert!(factory.wrap(&[]).is_empty());
        prop_assert_eq!(&factory.wrap(&lines[..1]), &lines[0]);

        let wrapped = factory.wrap(&lines);
        check_well_formed(&wrapped);

        // Never worse than putting every input on its own line.
        let stacked = factory.stack(&lines);
        for column in [0usize, 5, 20, 40, 70] {
            prop_assert!(
                wrapped.cost_at(column) <= stacked.cost_at(column) + TOLERANCE,
                "wrap beats the all-vertical arrangement at {column}",
            );
        }
    }
}
