//! Optimal code layout for token partition trees.
//!
//! Given a [`TokenPartitionTree`](quill_ir::TokenPartitionTree) whose nodes
//! carry partitioning policies, this crate picks the arrangement of tokens
//! into physical lines (line breaks, indentation, horizontal joins) that
//! minimizes a cost function penalizing column-limit overflow and line
//! breaks, following Phillip Yelland's "A New Approach to Optimal Code
//! Formatting".
//!
//! # Architecture
//!
//! The optimizer is built from five pieces, leaves first:
//!
//! 1. **[`layout`]**: concrete layout trees. A layout is a tree of
//!    [`LayoutItem`]s of three kinds: a token line, a horizontal
//!    juxtaposition, or a vertical stack.
//! 2. **[`function`]**: layout functions. The cost of a family of layouts,
//!    as a piecewise-linear function of the column the layout starts at.
//!    Each linear segment remembers the layout tree that achieves it.
//! 3. **[`factory`]**: the combinator algebra. [`LayoutFunctionFactory`]
//!    builds layout functions from unwrapped lines and composes them with
//!    `indent`, `stack`, `juxtaposition`, `choice`, and `wrap`.
//! 4. **[`optimizer`]**: the driver. Walks a partition tree, dispatches on
//!    each node's policy, and selects the optimal segment at the ambient
//!    indentation.
//! 5. **[`reconstruct`]**: the tree reconstructor. Materializes the chosen
//!    layout back into flat partition lines and finalizes per-token break
//!    decisions.
//!
//! Everything upstream of the partition tree (lexing, parsing, partitioning)
//! and downstream of the reconstructed partitions (text emission) lives
//! outside this crate.

pub mod factory;
pub mod function;
pub mod layout;
pub mod optimizer;
pub mod reconstruct;
pub mod style;

pub use factory::LayoutFunctionFactory;
pub use function::{LayoutFunction, LayoutFunctionSegment};
pub use layout::{LayoutItem, LayoutKind, LayoutTree};
pub use optimizer::optimize_token_partition_tree;
pub use reconstruct::TreeReconstructor;
pub use style::FormatStyle;
