//! Layout tree reconstruction.
//!
//! Translates a concrete layout tree back into an ordered sequence of flat
//! unwrapped lines with final indentation, then replaces the optimized
//! partition node's children with those lines and writes every re-lined
//! token's break decision into the token store.


use quill_ir::{BreakDecision, PartitionPolicy, TokenList, TokenPartitionTree, UnwrappedLine};

use crate::layout::{LayoutKind, LayoutTree};

/// Rebuilds flat partition lines from a layout tree.
///
/// Carries the indentation context of the subtree being traversed and the
/// line currently open for appending, if any.
pub struct TreeReconstructor {
    unwrapped_lines: Vec<UnwrappedLine>,
    /// Index into `unwrapped_lines` of the line still accepting appends.
    active_line: Option<usize>,
    current_indentation: usize,
}

impl TreeReconstructor {
    pub fn new(indentation: usize) -> Self {
        TreeReconstructor {
            unwrapped_lines: Vec::new(),
            active_line: None,
            current_indentation: indentation,
        }
    }

    /// Flattens `layout` into unwrapped lines.
    pub fn traverse_tree(&mut self, layout: &LayoutTree, tokens: &TokenList) {
        let relative_indentation = layout.item().indentation();
        if relative_indentation > 0 && self.active_line.is_some() {
            // Indenting a line that is going to be appended cannot take
            // effect; points at a bug in the layout's producer.
            tracing::warn!("discarding indentation of a line that is going to be appended");
        }
        let saved_indentation = self.current_indentation;
        self.current_indentation += relative_indentation;
        self.traverse_children(layout, tokens);
        self.current_indentation = saved_indentation;
    }

    fn traverse_children(&mut self, layout: &LayoutTree, tokens: &TokenList) {
        match layout.item().kind() {
            LayoutKind::Line => {
                assert!(
                    layout.is_leaf(),
                    "line layouts carry tokens, never sublayouts"
                );
                match self.active_line {
                    None => {
                        let mut uwline = layout.item().to_unwrapped_line();
                        uwline.set_indentation(self.current_indentation);
                        // Keep downstream wrapping passes away from lines
                        // that are already final.
                        uwline.set_policy(PartitionPolicy::AlreadyFormatted);
                        self.unwrapped_lines.push(uwline);
                        self.active_line = Some(self.unwrapped_lines.len() - 1);
                    }
                    Some(index) => {
                        self.unwrapped_lines[index].span_up_to(layout.item().tokens().end);
                    }
                }
            }

            LayoutKind::Juxtaposition => {
                for child in layout.children() {
                    self.traverse_tree(child, tokens);
                }
            }

            LayoutKind::Stack => {
                if layout.children().is_empty() {
                    return;
                }
                if layout.children().len() == 1 {
                    self.traverse_tree(&layout.children()[0], tokens);
                    return;
                }

                // Lines after the first continue either under the current
                // indentation or, when extending an open line, at the column
                // where that line ends.
                let indentation = match self.active_line {
                    Some(index) => {
                        self.unwrapped_lines[index].final_column(tokens)
                            + layout.item().spaces_before()
                    }
                    None => self.current_indentation,
                };

                self.traverse_tree(&layout.children()[0], tokens);

                let saved_indentation = self.current_indentation;
                self.current_indentation = indentation;
                for child in &layout.children()[1..] {
                    self.active_line = None;
                    self.traverse_tree(child, tokens);
                }
                self.current_indentation = saved_indentation;
            }
        }
    }

    /// Replaces `node`'s value and children with the reconstructed lines and
    /// finalizes break decisions for every token they cover.
    pub fn replace_token_partition_tree_node(
        self,
        node: &mut TokenPartitionTree,
        tokens: &mut TokenList,
    ) {
        let first_line = self
            .unwrapped_lines
            .first()
            .expect("reconstruction produced at least one line");
        let last_line = self.unwrapped_lines.last().expect("non-empty");

        let mut value = *first_line;
        value.span_up_to(last_line.tokens().end);
        value.set_indentation(self.current_indentation);
        value.set_policy(PartitionPolicy::AlreadyFormatted);
        *node.value_mut() = value;

        node.clear_children();
        for uwline in &self.unwrapped_lines {
            if !uwline.is_empty() {
                let line_tokens = tokens.range_mut(uwline.tokens());
                let (first_token, rest) = line_tokens.split_first_mut().expect("non-empty line");
                // The line's indentation replaces the first token's original
                // spacing.
                first_token.before.break_decision = BreakDecision::MustWrap;
                first_token.before.spaces_required = 0;
                for token in rest {
                    if token.before.break_decision == BreakDecision::Undecided {
                        token.before.break_decision = BreakDecision::MustAppend;
                    }
                }
            }
            node.adopt_subtree(TokenPartitionTree::leaf(*uwline));
        }
    }
}
