//! Data model shared between quill's formatting passes.
//!
//! The types here form the contract between the upstream passes that produce
//! token partitions (lexing, parsing, partitioning) and the layout optimizer
//! that consumes them:
//!
//! - [`PreFormatToken`]: a token's text plus the spacing constraints decided
//!   so far ([`TokenSpacing`], [`BreakDecision`]).
//! - [`TokenList`]: the flat, mutable store of all tokens in a formatting
//!   unit. Formatting passes address tokens through [`TokenRange`] index
//!   ranges and write final break decisions back into this store.
//! - [`UnwrappedLine`]: a contiguous token range intended as one physical
//!   line's worth of content, before wrapping decisions.
//! - [`TokenPartitionTree`]: an ordered tree of unwrapped lines whose
//!   [`PartitionPolicy`] annotations tell the optimizer how children may be
//!   combined into lines.

mod partition;
mod token;
mod unwrapped_line;

pub use partition::TokenPartitionTree;
pub use token::{BreakDecision, PreFormatToken, TokenList, TokenRange, TokenSpacing};
pub use unwrapped_line::{PartitionPolicy, UnwrappedLine};
