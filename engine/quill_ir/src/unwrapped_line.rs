//! Unwrapped lines and partition policies.

use std::fmt;

use crate::token::{TokenList, TokenRange};

/// How a partition's children may be combined into physical lines.
///
/// Set by the partitioning pass; consumed by the layout optimizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PartitionPolicy {
    /// Fresh partition; upstream assigns a real policy before layout runs.
    #[default]
    Uninitialized,

    /// Children always go on separate lines.
    AlwaysExpand,

    /// Keep everything on one line if it fits, otherwise expand children.
    FitOnLineElseExpand,

    /// Append as many children to the current line as fit, wrapping the rest.
    AppendFittingSubPartitions,

    /// Children form an aligned column group; layout treats them like
    /// [`AlwaysExpand`](PartitionPolicy::AlwaysExpand) and leaves column
    /// padding to the alignment pass.
    TabularAlignment,

    /// Two children, a call header and its arguments; layout chooses between
    /// appending the arguments and stacking them under the header.
    OptimalFunctionCallLayout,

    /// Layout has already been decided; no further wrapping may touch this
    /// partition.
    AlreadyFormatted,
}

/// A contiguous token range intended as one physical line's worth of
/// content, prior to wrapping decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnwrappedLine {
    indentation: usize,
    tokens: TokenRange,
    policy: PartitionPolicy,
}

impl UnwrappedLine {
    /// A line starting at `first_token` with no tokens yet.
    pub fn new(indentation: usize, first_token: u32) -> Self {
        UnwrappedLine {
            indentation,
            tokens: TokenRange::empty_at(first_token),
            policy: PartitionPolicy::default(),
        }
    }

    pub fn with_range(indentation: usize, tokens: TokenRange) -> Self {
        UnwrappedLine {
            indentation,
            tokens,
            policy: PartitionPolicy::default(),
        }
    }

    #[inline]
    pub fn indentation(&self) -> usize {
        self.indentation
    }

    #[inline]
    pub fn set_indentation(&mut self, spaces: usize) {
        self.indentation = spaces;
    }

    #[inline]
    pub fn tokens(&self) -> TokenRange {
        self.tokens
    }

    #[inline]
    pub fn policy(&self) -> PartitionPolicy {
        self.policy
    }

    #[inline]
    pub fn set_policy(&mut self, policy: PartitionPolicy) {
        self.policy = policy;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Extend the line's token range up to (excluding) `end`.
    #[inline]
    pub fn span_up_to(&mut self, end: u32) {
        self.tokens.span_up_to(end);
    }

    /// Rendered width in columns, excluding indentation.
    #[inline]
    pub fn width(&self, tokens: &TokenList) -> usize {
        tokens.width(self.tokens)
    }

    /// Column just past the line's last character when rendered.
    #[inline]
    pub fn final_column(&self, tokens: &TokenList) -> usize {
        self.indentation + self.width(tokens)
    }

    /// Diagnostic rendering with the backing token store.
    pub fn display<'a>(&'a self, tokens: &'a TokenList) -> UnwrappedLineDisplay<'a> {
        UnwrappedLineDisplay { line: self, tokens }
    }
}

/// Borrowing `Display` adapter for [`UnwrappedLine`].
pub struct UnwrappedLineDisplay<'a> {
    line: &'a UnwrappedLine,
    tokens: &'a TokenList,
}

impl fmt::Display for UnwrappedLineDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] @{} >>{}<<",
            self.line.policy,
            self.line.indentation,
            self.tokens.joined_text(self.line.tokens),
        )
    }
}
