/**
 * The ways a pattern can be rejected.
 */

use thiserror::Error;

/// Raised while turning a pattern into an id stream. The payload is the
/// byte offset the parser choked on, except for name lookups where the
/// offending name tells more than the offset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unbalanced group at byte {0}")]
    UnbalancedGroup(usize),

    #[error("unbalanced character class at byte {0}")]
    UnbalancedClass(usize),

    #[error("inverted range in character class at byte {0}")]
    BadClassRange(usize),

    #[error("unknown group flag at byte {0}")]
    UnknownFlag(usize),

    #[error("missing or malformed group name at byte {0}")]
    BadGroupName(usize),

    #[error("unknown group name `{0}`")]
    UnknownGroupName(String),

    #[error("invalid repetition bounds at byte {0}")]
    BadBounds(usize),

    #[error("nothing to repeat at byte {0}")]
    NothingToRepeat(usize),

    #[error("empty alternation branch at byte {0}")]
    EmptyBranch(usize),

    #[error("dangling escape at byte {0}")]
    DanglingEscape(usize),
}
