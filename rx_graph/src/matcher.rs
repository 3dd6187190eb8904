/**
 * The backtracking executor and the match result.
 *
 * Matching is an iterative depth-first walk over the edges, driven by
 * an explicit frame stack; the frame records the position and which
 * sibling edge is up next, so giving up on an edge is just bumping the
 * sibling index and running dry pops the frame. Lookaheads recurse into
 * `run` on the remaining input, which bounds the call depth by pattern
 * nesting, never by input length.
 */

use std::collections::HashMap;

use log::trace;

use crate::graph::{Edge, FuncOp, Graph, NodeId, Status};

/// Edge-evaluation budget of one `find` call. Possessive and atomic
/// constructs are the supported way to prune runaway backtracking; the
/// budget is the backstop that keeps a pathological pattern (a loop
/// matching emptiness forever) from hanging the caller. A search that
/// exhausts it reports no match.
const STEP_LIMIT: u64 = 1 << 22;

/// The result of matching a graph against an input. Group 0 is the
/// overall match; groups whose boundaries never closed read as empty.
pub struct Matcher<'a> {
    ok: bool,
    input: &'a [u8],
    groups: Vec<(usize, usize)>,
    named_group: &'a HashMap<String, usize>,
}

impl<'a> Matcher<'a> {
    fn new(input: &'a [u8], group_num: usize, named_group: &'a HashMap<String, usize>) -> Self {
        Self{ ok: false, input, groups: vec![(0, 0); group_num], named_group }
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn begin_idx(&self) -> usize {
        self.groups[0].0
    }

    pub fn end_idx(&self) -> usize {
        self.groups[0].1
    }

    pub fn size(&self) -> usize {
        self.end_idx() - self.begin_idx()
    }

    /// The overall match, group 0.
    pub fn matched(&self) -> &'a [u8] {
        &self.input[self.begin_idx()..self.end_idx()]
    }

    /// A numbered group's capture; empty when the group never matched.
    pub fn group(&self, idx: usize) -> &'a [u8] {
        match self.groups.get(idx) {
            Some(&(left, right)) if left < right => &self.input[left..right],
            _ => &[],
        }
    }

    /// A named group's capture; empty when the name is unknown or the
    /// group never matched.
    pub fn group_named(&self, name: &str) -> &'a [u8] {
        match self.named_group.get(name) {
            Some(&idx) => self.group(idx),
            None => &[],
        }
    }

    /// Expands a substitution template against this match: `\N` and
    /// `\g<N>` splice numbered captures, `\g<name>` named ones, `\0`
    /// the whole match. A malformed template is a contract violation
    /// and panics.
    pub fn sub(&self, template: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(template.len());
        let mut i = 0;
        while i < template.len() {
            if template[i] != b'\\' {
                out.push(template[i]);
                i += 1;
                continue;
            }
            i += 1;
            assert!(i < template.len(), "dangling backslash in template");
            if template[i].is_ascii_digit() {
                let (idx, after) = digits(template, i);
                i = after;
                assert!(idx < self.groups.len(), "template references group {idx}");
                out.extend_from_slice(self.group(idx));
                continue;
            }
            assert_eq!(template[i], b'g', "unknown template escape");
            i += 1;
            assert!(
                i < template.len() && template[i] == b'<',
                "group reference must be written \\g<...>"
            );
            i += 1;
            if i < template.len() && template[i].is_ascii_digit() {
                let (idx, after) = digits(template, i);
                i = after;
                assert!(
                    i < template.len() && template[i] == b'>',
                    "unclosed group reference in template"
                );
                i += 1;
                assert!(idx < self.groups.len(), "template references group {idx}");
                out.extend_from_slice(self.group(idx));
            }
            else {
                let name_start = i;
                while i < template.len() && template[i] != b'>' {
                    i += 1;
                }
                assert!(i < template.len(), "unclosed group reference in template");
                let name = std::str::from_utf8(&template[name_start..i])
                    .expect("group name in template is not text");
                i += 1;
                out.extend_from_slice(self.group_named(name));
            }
        }
        out
    }
}

fn digits(bytes: &[u8], mut i: usize) -> (usize, usize) {
    let mut value = 0usize;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        value = value * 10 + usize::from(bytes[i] - b'0');
        i += 1;
    }
    (value, i)
}

/**
 * The executor.
 */

// cell state shared by a whole find call, nested lookahead runs
// included, exactly like the edge-embedded cells it replaces
struct Scratch {
    counters: Vec<usize>,
    brakes: Vec<bool>,
    steps: u64,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: usize,
    node: NodeId,
    idx: usize,
}

impl Graph {
    /// Matches the graph against `s`, trying every start position left
    /// to right. Never fails: an unsuccessful search is a `Matcher`
    /// whose `ok()` is false.
    pub fn find<'a>(&'a self, s: &'a [u8]) -> Matcher<'a> {
        let mut matcher = Matcher::new(s, self.group_num, &self.named_group);
        let mut scratch = Scratch{
            counters: vec![0; self.counter_num],
            brakes: vec![false; self.brake_num],
            steps: STEP_LIMIT,
        };
        if let Some((begin, end)) = self.run(self.start, s, &mut matcher.groups, &mut scratch) {
            matcher.ok = true;
            matcher.groups[0] = (begin, end);
        }
        trace!(
            "find over {} bytes: ok={} after {} steps",
            s.len(),
            matcher.ok,
            STEP_LIMIT - scratch.steps
        );
        matcher
    }

    /// Length of the overall match, or -1.
    pub fn match_len(&self, s: &[u8]) -> i32 {
        let matcher = self.find(s);
        if matcher.ok() {
            matcher.size() as i32
        }
        else {
            -1
        }
    }

    /// Success flag plus every group view, group 0 first.
    pub fn match_groups<'a>(&'a self, s: &'a [u8]) -> (bool, Vec<&'a [u8]>) {
        let matcher = self.find(s);
        let groups = (0..self.group_num).map(|idx| matcher.group(idx)).collect();
        (matcher.ok(), groups)
    }

    /// Replaces every non-overlapping leftmost match with the expanded
    /// template. A zero-length match is stepped over by one byte so the
    /// scan always advances.
    pub fn sub(&self, template: &[u8], s: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(s.len());
        let mut rest = s;
        loop {
            let matcher = self.find(rest);
            if !matcher.ok() {
                out.extend_from_slice(rest);
                return out;
            }
            out.extend_from_slice(&rest[..matcher.begin_idx()]);
            let expansion = matcher.sub(template);
            out.extend_from_slice(&expansion);
            let end = matcher.end_idx();
            if matcher.size() == 0 {
                if end == rest.len() {
                    return out;
                }
                out.push(rest[end]);
                rest = &rest[end + 1..];
            }
            else {
                rest = &rest[end..];
            }
        }
    }

    /// One leftmost search from `entry` over `input`. On success the
    /// closed capture boundaries are merged into `groups` and the span
    /// of the overall match is returned. Lookahead edges re-enter this
    /// with the remaining input as a fresh view, which is also what
    /// anchors `^`/`$` to the assertion's own region.
    fn run(
        &self,
        entry: NodeId,
        input: &[u8],
        groups: &mut [(usize, usize)],
        scratch: &mut Scratch,
    ) -> Option<(usize, usize)> {
        let mut boundary = vec![(0usize, 0usize); self.group_num];
        let mut stack: Vec<Frame> = Vec::new();

        'search: for start in 0..=input.len() {
            for pair in boundary.iter_mut() {
                *pair = (start, start);
            }
            stack.clear();
            let mut cur = Frame{ pos: start, node: entry, idx: 0 };
            loop {
                if scratch.steps == 0 {
                    return None;
                }
                scratch.steps -= 1;

                let edge = match self.node(cur.node).edges.get(cur.idx) {
                    Some(edge) => edge,
                    None => {
                        // siblings exhausted: give the parent its turn
                        match stack.pop() {
                            Some(frame) => {
                                cur = frame;
                                cur.idx += 1;
                                continue;
                            }
                            None => continue 'search,
                        }
                    }
                };
                match self.eval(edge, cur.pos, input, &mut boundary, groups, scratch) {
                    None => cur.idx += 1,
                    Some(pos) => {
                        let next = edge.next();
                        if self.node(next).status == Status::Match {
                            for (idx, &(left, right)) in boundary.iter().enumerate().skip(1) {
                                if left < right {
                                    groups[idx] = (left, right);
                                }
                            }
                            return Some((start, pos));
                        }
                        stack.push(cur);
                        cur = Frame{ pos, node: next, idx: 0 };
                    }
                }
            }
        }
        None
    }

    /// Applies one edge at `pos`. `None` means the edge does not pass
    /// here and the walk should try the next sibling.
    fn eval(
        &self,
        edge: &Edge,
        pos: usize,
        input: &[u8],
        boundary: &mut [(usize, usize)],
        groups: &mut [(usize, usize)],
        scratch: &mut Scratch,
    ) -> Option<usize> {
        match edge {
            Edge::Char{ val, .. } => {
                if pos < input.len() && input[pos] == *val {
                    Some(pos + 1)
                }
                else {
                    None
                }
            }
            Edge::Any{ .. } => {
                if pos < input.len() {
                    Some(pos + 1)
                }
                else {
                    None
                }
            }
            Edge::Set{ set, .. } => {
                if pos < input.len() && set.contains(input[pos]) {
                    Some(pos + 1)
                }
                else {
                    None
                }
            }
            Edge::SetEx{ set, .. } => {
                if pos < input.len() && !set.contains(input[pos]) {
                    Some(pos + 1)
                }
                else {
                    None
                }
            }

            Edge::Epsilon{ .. } | Edge::Match{ .. } => Some(pos),
            Edge::Begin{ .. } => {
                if pos == 0 {
                    Some(pos)
                }
                else {
                    None
                }
            }
            Edge::End{ .. } => {
                if pos == input.len() {
                    Some(pos)
                }
                else {
                    None
                }
            }

            Edge::Store{ idx, .. } | Edge::Named{ idx, .. } => {
                boundary[*idx].0 = pos;
                Some(pos)
            }
            Edge::StoreEnd{ idx, .. } | Edge::NamedEnd{ idx, .. } => {
                boundary[*idx].1 = pos;
                Some(pos)
            }
            Edge::Ref{ idx, .. } => {
                let (left, right) = boundary[*idx];
                if left >= right {
                    // an uncaptured group matches emptiness
                    return Some(pos);
                }
                let len = right - left;
                if pos + len <= input.len() && input[pos..pos + len] == input[left..right] {
                    Some(pos + len)
                }
                else {
                    None
                }
            }

            Edge::Func{ op, .. } => {
                match op {
                    FuncOp::ResetCounter(counter) => scratch.counters[counter.0] = 0,
                    FuncOp::ArmBrake(brake) => scratch.brakes[brake.0] = true,
                }
                Some(pos)
            }
            Edge::Brake{ brake, .. } => {
                if scratch.brakes[brake.0] {
                    scratch.brakes[brake.0] = false;
                    Some(pos)
                }
                else {
                    None
                }
            }
            Edge::Repeat{ counter, .. } => {
                scratch.counters[counter.0] += 1;
                Some(pos)
            }
            Edge::Lower{ counter, bound, .. } => {
                if scratch.counters[counter.0] >= *bound {
                    Some(pos)
                }
                else {
                    None
                }
            }
            Edge::Upper{ counter, bound, .. } => {
                if scratch.counters[counter.0] < *bound {
                    Some(pos)
                }
                else {
                    None
                }
            }

            Edge::Ahead{ start, .. } => {
                let rest = &input[pos..];
                let mut sub = vec![(0usize, 0usize); self.group_num];
                if self.run(*start, rest, &mut sub, scratch).is_some() {
                    // captures of a successful assertion are kept,
                    // shifted back into the outer coordinates
                    for (idx, &(left, right)) in sub.iter().enumerate().skip(1) {
                        if left < right {
                            groups[idx] = (pos + left, pos + right);
                        }
                    }
                    Some(pos)
                }
                else {
                    None
                }
            }
            Edge::NegAhead{ start, .. } => {
                let rest = &input[pos..];
                let mut sub = vec![(0usize, 0usize); self.group_num];
                if self.run(*start, rest, &mut sub, scratch).is_none() {
                    Some(pos)
                }
                else {
                    None
                }
            }
        }
    }
}

// Tests ///////////////////////////////////////////////////////////////////////
