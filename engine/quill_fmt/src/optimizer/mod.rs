//! Optimization driver.
//!
//! Walks a token partition tree, builds a layout function for it by
//! dispatching on each node's partition policy, picks the cheapest segment
//! at the node's own indentation, and hands the winning layout tree to the
//! reconstructor, which rewrites the node in place.


use quill_ir::{PartitionPolicy, TokenList, TokenPartitionTree};

use crate::factory::LayoutFunctionFactory;
use crate::function::LayoutFunction;
use crate::reconstruct::TreeReconstructor;
use crate::style::FormatStyle;

/// Rewrites `node` into flat, already-formatted lines under the optimal
/// layout, finalizing break decisions in `tokens` for every re-lined token.
///
/// # Panics
///
/// Panics on contract violations from upstream: a partition policy the
/// optimizer does not handle, a function-call partition without exactly two
/// children, or an empty layout function at the root.
pub fn optimize_token_partition_tree(
    style: &FormatStyle,
    node: &mut TokenPartitionTree,
    tokens: &mut TokenList,
) {
    tracing::debug!("partition before optimization:\n{}", node.display(tokens));
    let indentation = node.value().indentation();

    let factory = LayoutFunctionFactory::new(style);
    let layout_function = traverse_tree(&factory, node, tokens);
    assert!(
        !layout_function.is_empty(),
        "no layout for partition:\n{}",
        node.display(tokens)
    );
    tracing::debug!(
        "layout function at the root:\n{}",
        layout_function.display(tokens)
    );

    let segment = layout_function
        .at_or_to_the_left_of(indentation)
        .expect("non-empty layout function");

    let mut reconstructor = TreeReconstructor::new(indentation);
    reconstructor.traverse_tree(&segment.layout, tokens);
    reconstructor.replace_token_partition_tree_node(node, tokens);
    tracing::debug!("partition after optimization:\n{}", node.display(tokens));
}

fn traverse_tree(
    factory: &LayoutFunctionFactory<'_>,
    node: &TokenPartitionTree,
    tokens: &TokenList,
) -> LayoutFunction {
    if node.is_leaf() {
        return factory.line(node.value(), tokens);
    }

    match node.value().policy() {
        PartitionPolicy::OptimalFunctionCallLayout => {
            // A call header and its argument list.
            assert!(
                node.children().len() == 2,
                "function call layout expects a header and an argument list:\n{}",
                node.display(tokens)
            );
            let header = traverse_tree(factory, &node.children()[0], tokens);
            let args = traverse_tree(factory, &node.children()[1], tokens);

            let indented_args = factory.indent(&args, factory.style().wrap_spaces);
            let stacked = factory.stack(&[header.clone(), indented_args]);
            if args.must_wrap() {
                return stacked;
            }
            let juxtaposed = factory.juxtaposition(&[header, args]);
            factory.choice(&[juxtaposed, stacked])
        }

        PartitionPolicy::AppendFittingSubPartitions | PartitionPolicy::FitOnLineElseExpand => {
            let layouts = traverse_children(factory, node, tokens);
            factory.wrap(&layouts)
        }

        // Tabular partitions stack like always-expanded ones; column
        // alignment itself happens in a separate pass.
        PartitionPolicy::AlwaysExpand | PartitionPolicy::TabularAlignment => {
            let layouts = traverse_children(factory, node, tokens);
            factory.stack(&layouts)
        }

        policy => panic!(
            "unsupported partition policy {policy:?} in:\n{}",
            node.display(tokens)
        ),
    }
}

fn traverse_children(
    factory: &LayoutFunctionFactory<'_>,
    node: &TokenPartitionTree,
    tokens: &TokenList,
) -> Vec<LayoutFunction> {
    node.children()
        .iter()
        .map(|child| traverse_tree(factory, child, tokens))
        .collect()
}
