
mod char_set;

pub use char_set::{ByteRange, CharSet, RangeSet};
