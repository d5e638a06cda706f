//! Concrete layout trees.
//!
//! A layout is a tree describing one concrete two-dimensional arrangement of
//! tokens: leaves are unbroken token lines, internal nodes join their
//! children horizontally ([`LayoutKind::Juxtaposition`]) or vertically
//! ([`LayoutKind::Stack`]). Layout functions carry one such tree per linear
//! cost segment; the tree reconstructor turns the winning tree back into
//! flat partition lines.


use std::fmt;

use quill_ir::{TokenList, TokenRange, UnwrappedLine};

/// The three layout arrangements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// An unbroken run of tokens on a single line.
    Line,

    /// Children placed side by side on the same line.
    Juxtaposition,

    /// Children placed on consecutive lines.
    Stack,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutKind::Line => "line",
            LayoutKind::Juxtaposition => "juxtaposition",
            LayoutKind::Stack => "stack",
        };
        f.write_str(name)
    }
}

/// Payload of one layout tree node.
///
/// All kinds carry relative indentation, inter-token spacing, and a
/// must-wrap flag; [`LayoutKind::Line`] items additionally reference their
/// token range and cache its rendered width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutItem {
    kind: LayoutKind,
    indentation: usize,
    spaces_before: usize,
    must_wrap: bool,
    tokens: TokenRange,
    length: usize,
}

impl LayoutItem {
    /// Leaf item for an unbroken token line.
    ///
    /// Spacing and the must-wrap flag come from the line's first token; the
    /// rendered width is computed from the token store once, here.
    pub fn line(uwline: &UnwrappedLine, tokens: &TokenList) -> Self {
        let range = uwline.tokens();
        let (spaces_before, must_wrap) = if range.is_empty() {
            (0, false)
        } else {
            let first = tokens.get(range.start);
            (
                first.before.spaces_required,
                first.before.break_decision.is_forced_wrap(),
            )
        };
        LayoutItem {
            kind: LayoutKind::Line,
            indentation: 0,
            spaces_before,
            must_wrap,
            tokens: range,
            length: uwline.width(tokens),
        }
    }

    /// Item with no token payload; used for composite nodes.
    pub fn new(kind: LayoutKind, spaces_before: usize, must_wrap: bool) -> Self {
        LayoutItem {
            kind,
            indentation: 0,
            spaces_before,
            must_wrap,
            tokens: TokenRange::default(),
            length: 0,
        }
    }

    /// Same item with its relative indentation replaced.
    #[must_use]
    pub fn with_indentation(mut self, spaces: usize) -> Self {
        self.indentation = spaces;
        self
    }

    #[inline]
    pub fn kind(&self) -> LayoutKind {
        self.kind
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
    pub fn spaces_before(&self) -> usize {
        self.spaces_before
    }

    #[inline]
    pub fn must_wrap(&self) -> bool {
        self.must_wrap
    }

    #[inline]
    pub fn tokens(&self) -> TokenRange {
        self.tokens
    }

    /// Rendered width of a line item in columns.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The originating token span as an unwrapped line at this item's
    /// indentation. Meaningful for line items only.
    pub fn to_unwrapped_line(&self) -> UnwrappedLine {
        UnwrappedLine::with_range(self.indentation, self.tokens)
    }

    /// Diagnostic rendering with the backing token store.
    pub fn display<'a>(&'a self, tokens: &'a TokenList) -> LayoutItemDisplay<'a> {
        LayoutItemDisplay { item: self, tokens }
    }
}

/// Borrowing `Display` adapter for [`LayoutItem`].
pub struct LayoutItemDisplay<'a> {
    item: &'a LayoutItem,
    tokens: &'a TokenList,
}

impl fmt::Display for LayoutItemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item = self.item;
        if item.kind == LayoutKind::Line {
            write!(
                f,
                "[ {} ], length: {}",
                self.tokens.joined_text(item.tokens),
                item.length
            )?;
        } else {
            write!(f, "[<{}>]", item.kind)?;
        }
        write!(
            f,
            ", indentation: {}, spacing: {}, must wrap: {}",
            item.indentation,
            item.spaces_before,
            if item.must_wrap { "YES" } else { "no" }
        )
    }
}

/// A concrete layout: an item plus sublayouts.
///
/// Line items are always leaves. Composite nodes may be empty; empty
/// composites behave as identities everywhere downstream.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTree {
    item: LayoutItem,
    children: Vec<LayoutTree>,
}

impl LayoutTree {
    pub fn leaf(item: LayoutItem) -> Self {
        LayoutTree {
            item,
            children: Vec::new(),
        }
    }

    pub fn new(item: LayoutItem, children: Vec<LayoutTree>) -> Self {
        LayoutTree { item, children }
    }

    #[inline]
    pub fn item(&self) -> &LayoutItem {
        &self.item
    }

    #[inline]
    pub fn item_mut(&mut self) -> &mut LayoutItem {
        &mut self.item
    }

    #[inline]
    pub fn children(&self) -> &[LayoutTree] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn adopt_subtree(&mut self, child: LayoutTree) {
        self.children.push(child);
    }

    /// Diagnostic rendering with the backing token store, indented by
    /// `indent` spaces.
    pub fn display<'a>(&'a self, tokens: &'a TokenList, indent: usize) -> LayoutTreeDisplay<'a> {
        LayoutTreeDisplay {
            tree: self,
            tokens,
            indent,
        }
    }

    fn fmt_indented(
        &self,
        f: &mut fmt::Formatter<'_>,
        tokens: &TokenList,
        indent: usize,
    ) -> fmt::Result {
        if self.is_leaf() {
            return write!(f, "{:indent$}{{ ({}) }}", "", self.item.display(tokens));
        }
        write!(f, "{:indent$}{{ ({})", "", self.item.display(tokens))?;
        for child in &self.children {
            writeln!(f)?;
            child.fmt_indented(f, tokens, indent + 2)?;
        }
        write!(f, "\n{:indent$}}}", "")
    }
}

/// Borrowing `Display` adapter for [`LayoutTree`]. Never emits a trailing
/// newline; enclosing printers add their own separators.
pub struct LayoutTreeDisplay<'a> {
    tree: &'a LayoutTree,
    tokens: &'a TokenList,
    indent: usize,
}

impl fmt::Display for LayoutTreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_indented(f, self.tokens, self.indent)
    }
}
