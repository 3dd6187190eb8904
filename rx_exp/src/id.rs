/**
 * The postfix id stream: the flat token form the parser emits and the
 * graph compiler consumes.
 */

use std::collections::HashMap;

use rx_charset::CharSet;

/// Bounds of a counted repetition. `upper` is [`Bounds::INFINITE`] for
/// the open-ended forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: usize,
    pub upper: usize,
}

impl Bounds {
    pub const INFINITE: usize = usize::MAX;

    pub fn new(lower: usize, upper: usize) -> Self {
        Self{ lower, upper }
    }
}

/// One token of the id stream. Operands carry their payload; the group
/// tokens carry the capture index assigned while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Id {
    Any,
    Begin,
    End,
    Char(u8),
    Concat,
    Either,

    Paren(usize),
    ParenEnd,
    UnParen,
    NamedPr(usize),
    RefPr(usize),
    AheadPr,
    NegAheadPr,
    AtomicPr,

    More,
    PosMore,
    RelMore,
    Plus,
    PosPlus,
    RelPlus,
    Quest,
    PosQuest,
    RelQuest,
    Repeat(Bounds),
    PosRepeat(Bounds),
    RelRepeat(Bounds),

    Set(CharSet),
    SetEx(CharSet),
}

impl Id {
    /// Binding order on the operator stack; a smaller order binds
    /// tighter. Only the binary operators ever sit on the stack long
    /// enough for the order to matter.
    pub fn order(&self) -> usize {
        match self {
            Id::Concat => 6,
            Id::Either => 8,
            _ => 0,
        }
    }

    /// Quantifiers are postfix already and go straight to the output.
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Id::More
                | Id::PosMore
                | Id::RelMore
                | Id::Plus
                | Id::PosPlus
                | Id::RelPlus
                | Id::Quest
                | Id::PosQuest
                | Id::RelQuest
                | Id::Repeat(_)
                | Id::PosRepeat(_)
                | Id::RelRepeat(_)
        )
    }

    /// Grouping tokens are barriers: draining the operator stack stops
    /// at them.
    pub fn is_paren(&self) -> bool {
        matches!(
            self,
            Id::Paren(_)
                | Id::UnParen
                | Id::NamedPr(_)
                | Id::AheadPr
                | Id::NegAheadPr
                | Id::AtomicPr
        )
    }
}

/// A parsed pattern: the id stream plus the capture bookkeeping.
/// `group_num` counts group 0, so it is one more than the number of
/// capturing groups in the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exp {
    pub group_num: usize,
    pub ids: Vec<Id>,
    pub named_group: HashMap<String, usize>,
}
