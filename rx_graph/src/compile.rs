/**
 * Folds the postfix id stream into the node arena.
 *
 * One pass over the ids with a stack of segments; every construct pops
 * the segments it owns, wires fresh nodes around them, and pushes the
 * combined segment back. Edge order encodes backtracking priority, so
 * the greedy variants offer their element first and the reluctant ones
 * offer their exit first.
 */

use log::debug;

use rx_exp::{parse, Bounds, Exp, Id, SyntaxError};

use crate::graph::{BrakeId, CounterId, Edge, FuncOp, Graph, Node, NodeId, Status};

/// A just-built sub-expression, delimited by its entry and exit nodes.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: NodeId,
    end: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Greedy,
    Possessive,
    Reluctant,
}

struct Builder {
    nodes: Vec<Node>,
    counter_num: usize,
    brake_num: usize,
}

impl Builder {
    fn new() -> Self {
        Self{ nodes: Vec::new(), counter_num: 0, brake_num: 0 }
    }

    fn node(&mut self) -> NodeId {
        self.nodes.push(Node::new());
        NodeId(self.nodes.len() - 1)
    }

    fn edge(&mut self, from: NodeId, edge: Edge) {
        self.nodes[from.0].edges.push(edge);
    }

    fn counter(&mut self) -> CounterId {
        self.counter_num += 1;
        CounterId(self.counter_num - 1)
    }

    fn brake(&mut self) -> BrakeId {
        self.brake_num += 1;
        BrakeId(self.brake_num - 1)
    }

    /// A two-node segment joined by a single edge.
    fn leaf(&mut self, make: impl FnOnce(NodeId) -> Edge) -> Segment {
        let end = self.node();
        let start = self.node();
        let edge = make(end);
        self.edge(start, edge);
        Segment{ start, end }
    }
}

fn pop(stack: &mut Vec<Segment>) -> Segment {
    stack.pop().expect("id stream underflow")
}

impl Graph {
    pub fn compile(pattern: &str) -> Result<Graph, SyntaxError> {
        Ok(Graph::from_exp(parse(pattern)?))
    }

    /// Folds an already-parsed id stream. The stream must be one the
    /// parser could have produced; a malformed stream is a programming
    /// error and panics.
    pub fn from_exp(exp: Exp) -> Graph {
        let Exp{ group_num, ids, named_group } = exp;
        let id_num = ids.len();
        let mut b = Builder::new();
        let mut stack: Vec<Segment> = Vec::new();

        for id in ids {
            match id {
                Id::Char(val) => {
                    let seg = b.leaf(|next| Edge::Char{ next, val });
                    stack.push(seg);
                }
                Id::Any => {
                    let seg = b.leaf(|next| Edge::Any{ next });
                    stack.push(seg);
                }
                Id::Begin => {
                    let seg = b.leaf(|next| Edge::Begin{ next });
                    stack.push(seg);
                }
                Id::End => {
                    let seg = b.leaf(|next| Edge::End{ next });
                    stack.push(seg);
                }
                Id::Set(set) => {
                    let seg = b.leaf(|next| Edge::Set{ next, set });
                    stack.push(seg);
                }
                Id::SetEx(set) => {
                    let seg = b.leaf(|next| Edge::SetEx{ next, set });
                    stack.push(seg);
                }
                Id::RefPr(idx) => {
                    let seg = b.leaf(|next| Edge::Ref{ next, idx });
                    stack.push(seg);
                }

                Id::Concat => {
                    let back = pop(&mut stack);
                    let front = stack.last_mut().expect("id stream underflow");
                    b.nodes[front.end.0]
                        .edges
                        .push(Edge::Epsilon{ next: back.start });
                    front.end = back.end;
                }
                Id::Either => {
                    let right = pop(&mut stack);
                    let left = pop(&mut stack);
                    let end = b.node();
                    let start = b.node();
                    b.edge(start, Edge::Epsilon{ next: left.start });
                    b.edge(start, Edge::Epsilon{ next: right.start });
                    b.edge(left.end, Edge::Epsilon{ next: end });
                    b.edge(right.end, Edge::Epsilon{ next: end });
                    stack.push(Segment{ start, end });
                }

                Id::Paren(idx) => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let start = b.node();
                    b.edge(start, Edge::Store{ next: elem.start, idx });
                    b.edge(elem.end, Edge::StoreEnd{ next: end, idx });
                    stack.push(Segment{ start, end });
                }
                Id::NamedPr(idx) => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let start = b.node();
                    b.edge(start, Edge::Named{ next: elem.start, idx });
                    b.edge(elem.end, Edge::NamedEnd{ next: end, idx });
                    stack.push(Segment{ start, end });
                }
                Id::UnParen | Id::ParenEnd => {}

                Id::More | Id::RelMore => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let start = b.node();
                    if matches!(id, Id::More) {
                        b.edge(start, Edge::Epsilon{ next: elem.start });
                        b.edge(start, Edge::Epsilon{ next: end });
                    }
                    else {
                        b.edge(start, Edge::Epsilon{ next: end });
                        b.edge(start, Edge::Epsilon{ next: elem.start });
                    }
                    b.edge(elem.end, Edge::Epsilon{ next: start });
                    stack.push(Segment{ start, end });
                }
                Id::PosMore => {
                    // the loop node re-offers the element; its exit is a
                    // one-shot brake re-armed on every way in, so once
                    // the loop is left no earlier iteration can resume
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let brake = b.brake();
                    let looper = b.node();
                    b.edge(looper, Edge::Epsilon{ next: elem.start });
                    b.edge(looper, Edge::Brake{ next: end, brake });
                    let start = b.node();
                    b.edge(start, Edge::Func{ next: looper, op: FuncOp::ArmBrake(brake) });
                    b.edge(elem.end, Edge::Epsilon{ next: start });
                    stack.push(Segment{ start, end });
                }

                Id::Quest | Id::RelQuest => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let start = b.node();
                    if matches!(id, Id::Quest) {
                        b.edge(start, Edge::Epsilon{ next: elem.start });
                        b.edge(start, Edge::Epsilon{ next: end });
                    }
                    else {
                        b.edge(start, Edge::Epsilon{ next: end });
                        b.edge(start, Edge::Epsilon{ next: elem.start });
                    }
                    b.edge(elem.end, Edge::Epsilon{ next: end });
                    stack.push(Segment{ start, end });
                }
                Id::PosQuest => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let looper = b.node();
                    b.edge(looper, Edge::Epsilon{ next: elem.start });
                    b.edge(looper, Edge::Epsilon{ next: end });
                    let brake_end = b.node();
                    let brake = b.brake();
                    b.edge(end, Edge::Brake{ next: brake_end, brake });
                    let start = b.node();
                    b.edge(start, Edge::Func{ next: looper, op: FuncOp::ArmBrake(brake) });
                    b.edge(elem.end, Edge::Epsilon{ next: end });
                    stack.push(Segment{ start, end: brake_end });
                }

                Id::Plus => {
                    let elem = pop(&mut stack);
                    let seg = counted(&mut b, elem, Bounds::new(1, Bounds::INFINITE), Mode::Greedy);
                    stack.push(seg);
                }
                Id::PosPlus => {
                    let elem = pop(&mut stack);
                    let seg =
                        counted(&mut b, elem, Bounds::new(1, Bounds::INFINITE), Mode::Possessive);
                    stack.push(seg);
                }
                Id::RelPlus => {
                    let elem = pop(&mut stack);
                    let seg =
                        counted(&mut b, elem, Bounds::new(1, Bounds::INFINITE), Mode::Reluctant);
                    stack.push(seg);
                }
                Id::Repeat(bounds) => {
                    let elem = pop(&mut stack);
                    let seg = counted(&mut b, elem, bounds, Mode::Greedy);
                    stack.push(seg);
                }
                Id::PosRepeat(bounds) => {
                    let elem = pop(&mut stack);
                    let seg = counted(&mut b, elem, bounds, Mode::Possessive);
                    stack.push(seg);
                }
                Id::RelRepeat(bounds) => {
                    let elem = pop(&mut stack);
                    let seg = counted(&mut b, elem, bounds, Mode::Reluctant);
                    stack.push(seg);
                }

                Id::AtomicPr => {
                    let elem = pop(&mut stack);
                    let end = b.node();
                    let brake = b.brake();
                    b.edge(elem.end, Edge::Brake{ next: end, brake });
                    let start = b.node();
                    b.edge(start, Edge::Func{ next: elem.start, op: FuncOp::ArmBrake(brake) });
                    stack.push(Segment{ start, end });
                }

                Id::AheadPr | Id::NegAheadPr => {
                    // the element becomes a self-contained sub-graph in
                    // the same arena; only the assertion edge knows its
                    // entry
                    let elem = pop(&mut stack);
                    b.nodes[elem.end.0].status = Status::Match;
                    let end = b.node();
                    let start = b.node();
                    if matches!(id, Id::AheadPr) {
                        b.edge(start, Edge::Ahead{ next: end, start: elem.start });
                    }
                    else {
                        b.edge(start, Edge::NegAhead{ next: end, start: elem.start });
                    }
                    stack.push(Segment{ start, end });
                }
            }
        }

        // the empty pattern still gets a graph: one free transition
        if stack.is_empty() {
            let seg = b.leaf(|next| Edge::Epsilon{ next });
            stack.push(seg);
        }
        assert_eq!(stack.len(), 1, "unbalanced id stream");
        let seg = pop(&mut stack);
        let end = b.node();
        b.nodes[end.0].status = Status::Match;
        b.edge(seg.end, Edge::Match{ next: end });

        debug!(
            "compiled {} ids into {} nodes ({} groups, {} counters, {} brakes)",
            id_num,
            b.nodes.len(),
            group_num,
            b.counter_num,
            b.brake_num
        );
        Graph{
            nodes: b.nodes,
            start: seg.start,
            group_num,
            named_group,
            counter_num: b.counter_num,
            brake_num: b.brake_num,
        }
    }
}

/// The shared skeleton of `+` and `{m,n}`: a loop node whose first
/// priority re-enters the element while the upper bound allows and
/// whose second leaves once the lower bound is met, with a counter
/// bumped on every completed element. Reluctant swaps the two,
/// possessive seals the exit behind a brake.
fn counted(b: &mut Builder, elem: Segment, bounds: Bounds, mode: Mode) -> Segment {
    let looper = b.node();
    let counter = b.counter();
    b.edge(elem.end, Edge::Repeat{ next: looper, counter });
    let mut start = b.node();
    b.edge(start, Edge::Func{ next: looper, op: FuncOp::ResetCounter(counter) });

    let enter = if bounds.upper == Bounds::INFINITE {
        Edge::Epsilon{ next: elem.start }
    }
    else {
        Edge::Upper{ next: elem.start, counter, bound: bounds.upper }
    };
    let mut end = b.node();
    let exit = if bounds.lower == 0 {
        Edge::Epsilon{ next: end }
    }
    else {
        Edge::Lower{ next: end, counter, bound: bounds.lower }
    };
    if mode == Mode::Reluctant {
        b.edge(looper, exit);
        b.edge(looper, enter);
    }
    else {
        b.edge(looper, enter);
        b.edge(looper, exit);
    }

    if mode == Mode::Possessive {
        let brake_end = b.node();
        let brake = b.brake();
        b.edge(end, Edge::Brake{ next: brake_end, brake });
        let outer = b.node();
        b.edge(outer, Edge::Func{ next: start, op: FuncOp::ArmBrake(brake) });
        start = outer;
        end = brake_end;
    }
    Segment{ start, end }
}

// Tests ///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod compile_tests {
    use std::collections::HashMap;

    use super::*;

    fn postfix(ids: Vec<Id>) -> Graph {
        Graph::from_exp(Exp{ group_num: 1, ids, named_group: HashMap::new() })
    }

    fn match_nodes(graph: &Graph) -> usize {
        graph
            .nodes
            .iter()
            .filter(|node| node.status == Status::Match)
            .count()
    }

    #[test]
    fn single_accepting_node() {
        let graph = Graph::compile("a(b|c)*d").unwrap();
        assert_eq!(match_nodes(&graph), 1);
    }

    #[test]
    fn lookahead_owns_its_own_accepting_node() {
        let graph = Graph::compile("a(?=bc)b").unwrap();
        assert_eq!(match_nodes(&graph), 2);
    }

    #[test]
    fn empty_pattern_compiles() {
        let graph = Graph::compile("").unwrap();
        assert_eq!(graph.match_len(b""), 0);
        assert_eq!(graph.match_len(b"xyz"), 0);
    }

    /**
     * The postfix streams the old hand-driven tests used, fed straight
     * into the compiler.
     */

    #[test]
    fn postfix_concat() {
        let graph = postfix(vec![Id::Char(b'a'), Id::Char(b'a'), Id::Concat]);
        assert_eq!(graph.match_len(b"aa"), 2);
        assert_eq!(graph.match_len(b"aaa"), 2);
        assert_eq!(graph.match_len(b"a"), -1);
        assert_eq!(graph.match_len(b"b"), -1);
        assert_eq!(graph.match_len(b""), -1);
    }

    #[test]
    fn postfix_zero_or_more() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Char(b'a'),
            Id::More,
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b""), -1);
        assert_eq!(graph.match_len(b"b"), -1);
        assert_eq!(graph.match_len(b"a"), 1);
        assert_eq!(graph.match_len(b"aa"), 2);
        assert_eq!(graph.match_len(b"aab"), 2);
    }

    #[test]
    fn postfix_alternative_loop() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Char(b'b'),
            Id::Either,
            Id::More,
            Id::Char(b'a'),
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b"babac"), 4);
    }

    #[test]
    fn postfix_either_one() {
        let graph = postfix(vec![
            Id::Char(b'b'),
            Id::Char(b'a'),
            Id::More,
            Id::Either,
        ]);
        assert_eq!(graph.match_len(b"a"), 1);
        assert_eq!(graph.match_len(b"b"), 1);
    }

    #[test]
    fn postfix_optional() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Quest,
            Id::Char(b'b'),
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b"ab"), 2);
        assert_eq!(graph.match_len(b"b"), 1);
        assert_eq!(graph.match_len(b"a"), -1);
    }

    #[test]
    fn postfix_reluctant_more() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Char(b'a'),
            Id::RelMore,
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b"a"), 1);
        assert_eq!(graph.match_len(b"aa"), 1);
    }

    #[test]
    fn postfix_reluctant_alternative_loop() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Char(b'b'),
            Id::Either,
            Id::RelMore,
            Id::Char(b'a'),
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b"babac"), 2);
    }

    #[test]
    fn postfix_reluctant_optional() {
        let graph = postfix(vec![
            Id::Char(b'a'),
            Id::Char(b'a'),
            Id::RelQuest,
            Id::Concat,
        ]);
        assert_eq!(graph.match_len(b"aa"), 1);
    }
}
