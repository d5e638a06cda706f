//! Tokens, spacing constraints, and the flat token store.

use std::fmt;
use std::ops::Range;

/// Decision about the gap before a token.
///
/// Starts out [`Undecided`](BreakDecision::Undecided); formatting passes
/// narrow it down until every token knows whether it continues its line or
/// starts a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BreakDecision {
    /// No decision yet; a later pass will choose.
    #[default]
    Undecided,

    /// The token must stay on the same line as its predecessor.
    MustAppend,

    /// The token must start a new line.
    MustWrap,
}

impl BreakDecision {
    /// Check whether this token is forced onto a new line.
    #[inline]
    pub fn is_forced_wrap(self) -> bool {
        matches!(self, BreakDecision::MustWrap)
    }

    /// Check whether a decision has been made.
    #[inline]
    pub fn is_decided(self) -> bool {
        !matches!(self, BreakDecision::Undecided)
    }
}

/// Spacing constraints on the gap before a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenSpacing {
    /// Spaces required before the token when it is appended to its line.
    pub spaces_required: usize,

    /// Whether the token may, must, or must not start a new line.
    pub break_decision: BreakDecision,
}

/// A token queued for formatting: its text and the spacing decided so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreFormatToken {
    pub text: String,

    /// Constraints on the gap between this token and its predecessor.
    pub before: TokenSpacing,
}

impl PreFormatToken {
    pub fn new(text: impl Into<String>) -> Self {
        PreFormatToken {
            text: text.into(),
            before: TokenSpacing::default(),
        }
    }

    /// Width of the token text in columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Half-open range of token indices into a [`TokenList`].
///
/// Ranges are cheap handles; all formatting structures reference tokens
/// through them instead of borrowing from the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenRange {
    pub start: u32,
    pub end: u32,
}

impl TokenRange {
    /// An empty range anchored at a position.
    #[inline]
    pub const fn empty_at(pos: u32) -> Self {
        TokenRange {
            start: pos,
            end: pos,
        }
    }

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        TokenRange { start, end }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Extend the range so it ends at `end`.
    #[inline]
    pub fn span_up_to(&mut self, end: u32) {
        debug_assert!(end >= self.start);
        self.end = end;
    }

    /// Index range usable for slicing.
    #[inline]
    pub fn as_usize(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Flat, mutable store of every token in a formatting unit.
///
/// Upstream fills it once per unit; the layout optimizer reads token widths
/// and spacing from it and writes final break decisions back.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<PreFormatToken>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList::default()
    }

    /// Build a store from whitespace-free token texts.
    ///
    /// Spacing constraints start out as defaults; callers set
    /// `spaces_required` and break decisions afterwards.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TokenList {
            tokens: texts.into_iter().map(PreFormatToken::new).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: PreFormatToken) -> u32 {
        let index = self.tokens.len() as u32;
        self.tokens.push(token);
        index
    }

    #[inline]
    pub fn get(&self, index: u32) -> &PreFormatToken {
        &self.tokens[index as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, index: u32) -> &mut PreFormatToken {
        &mut self.tokens[index as usize]
    }

    #[inline]
    pub fn range(&self, range: TokenRange) -> &[PreFormatToken] {
        &self.tokens[range.as_usize()]
    }

    #[inline]
    pub fn range_mut(&mut self, range: TokenRange) -> &mut [PreFormatToken] {
        &mut self.tokens[range.as_usize()]
    }

    /// Range covering the whole store.
    #[inline]
    pub fn full_range(&self) -> TokenRange {
        TokenRange::new(0, self.tokens.len() as u32)
    }

    /// Rendered width of a token range in columns.
    ///
    /// Counts every token's text plus the required spaces before each token
    /// except the first (the first token's leading gap belongs to whatever
    /// precedes the range).
    pub fn width(&self, range: TokenRange) -> usize {
        let mut width = 0;
        for (i, token) in self.range(range).iter().enumerate() {
            if i > 0 {
                width += token.before.spaces_required;
            }
            width += token.width();
        }
        width
    }

    /// Token texts joined by single spaces, for diagnostics.
    pub fn joined_text(&self, range: TokenRange) -> String {
        let mut text = String::new();
        for (i, token) in self.range(range).iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(&token.text);
        }
        text
    }
}
