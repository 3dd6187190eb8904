/**
 * Byte-range sets backing the character classes.
 */

/// An inclusive range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteRange {
    pub first: u8,
    pub last: u8,
}

impl ByteRange {
    pub fn new(first: u8, last: u8) -> Self {
        Self{ first, last }
    }

    pub fn singleton(value: u8) -> Self {
        Self{ first: value, last: value }
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.first <= byte && byte <= self.last
    }
}

/**
 * An unordered collection of positive ranges that can be folded into a
 * sorted, non-overlapping form.
 */

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<ByteRange>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self{ ranges: Vec::new() }
    }

    pub fn insert(&mut self, byte: u8) {
        self.insert_range(byte, byte);
    }

    pub fn insert_range(&mut self, first: u8, last: u8) {
        self.ranges.push(ByteRange::new(first, last));
    }

    /// Moves every range of `other` into this set.
    pub fn append(&mut self, other: RangeSet) {
        self.ranges.extend(other.ranges);
    }

    /// Sorts the ranges and merges the overlapping and touching ones.
    /// Afterwards the ranges are sorted, non-overlapping and maximal.
    pub fn fold(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort();
        let mut result: Vec<ByteRange> = Vec::new();
        let mut cur = self.ranges[0];
        for range in self.ranges.iter().skip(1) {
            if u16::from(range.first) <= u16::from(cur.last) + 1 {
                cur.last = cur.last.max(range.last);
            }
            else {
                result.push(cur);
                cur = *range;
            }
        }
        result.push(cur);
        self.ranges = result;
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.ranges.iter().any(|range| range.contains(byte))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[ByteRange] {
        &self.ranges
    }
}

/**
 * The shorthand classes.
 */

impl RangeSet {
    /// `\d`, the decimal digits.
    pub fn digit() -> Self {
        let mut set = Self::new();
        set.insert_range(b'0', b'9');
        set
    }

    /// `\w`, the word characters.
    pub fn word() -> Self {
        let mut set = Self::new();
        set.insert_range(b'A', b'Z');
        set.insert_range(b'a', b'z');
        set.insert_range(b'0', b'9');
        set.insert(b'_');
        set
    }

    /// `\s`, the ASCII whitespace.
    pub fn space() -> Self {
        let mut set = Self::new();
        set.insert(b'\t');
        set.insert(b'\n');
        set.insert(0x0c);
        set.insert(b'\r');
        set.insert(b' ');
        set
    }
}

/**
 * A full character class: a positive fold plus a list of negated
 * groups. A byte is a member if the positive fold contains it, or if it
 * falls outside at least one of the negated groups.
 */

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    pub pos: RangeSet,
    pub negs: Vec<RangeSet>,
}

impl CharSet {
    pub fn new() -> Self {
        Self{ pos: RangeSet::new(), negs: Vec::new() }
    }

    pub fn from_pos(pos: RangeSet) -> Self {
        Self{ pos, negs: Vec::new() }
    }

    pub fn fold(&mut self) {
        self.pos.fold();
    }

    pub fn contains(&self, byte: u8) -> bool {
        if self.pos.contains(byte) {
            return true;
        }
        self.negs.iter().any(|group| !group.contains(byte))
    }
}

// Tests ///////////////////////////////////////////////////////////////////////
