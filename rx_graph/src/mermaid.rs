/**
 * Mermaid dump of the node graph, for eyeballing what the compiler
 * built.
 */

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::graph::{Edge, Graph, NodeId, Status};

impl Graph {
    /// Renders the reachable part of the graph as mermaid flow-chart
    /// lines. Nodes are renumbered in visit order; epsilon edges are
    /// bare arrows; the accepting node gets a `match` self-loop.
    /// Lookahead sub-graphs stay hidden behind their assertion edge,
    /// the way the executor sees them.
    pub fn to_mermaid(&self) -> String {
        let mut numbers: HashMap<NodeId, usize> = HashMap::new();
        numbers.insert(self.start, 0);
        let mut stack = vec![self.start];
        let mut out = String::new();

        while let Some(node_id) = stack.pop() {
            for edge in &self.node(node_id).edges {
                let next = edge.next();
                if !numbers.contains_key(&next) {
                    numbers.insert(next, numbers.len());
                    stack.push(next);
                }
                let from = numbers[&node_id];
                let to = numbers[&next];
                match label(edge) {
                    None => {
                        let _ = writeln!(out, "{}-->{}", from, to);
                    }
                    Some(text) => {
                        let _ = writeln!(out, "{}-->|{}|{}", from, text, to);
                    }
                }
                if self.node(next).status == Status::Match {
                    let _ = writeln!(out, "{}-->|match|{}", to, to);
                }
            }
        }
        out
    }
}

fn label(edge: &Edge) -> Option<String> {
    match edge {
        Edge::Epsilon{ .. } => None,
        Edge::Char{ val, .. } => Some(format!("char: {}", *val as char)),
        Edge::Any{ .. } => Some("any".into()),
        Edge::Begin{ .. } => Some("begin".into()),
        Edge::End{ .. } => Some("end".into()),
        Edge::Set{ set, .. } => Some(format!("[{}]", set.pos.ranges().len())),
        Edge::SetEx{ set, .. } => Some(format!("[^{}]", set.pos.ranges().len())),
        Edge::Store{ idx, .. } => Some(format!("({}", idx)),
        Edge::StoreEnd{ idx, .. } => Some(format!("{})", idx)),
        Edge::Named{ idx, .. } => Some(format!("<{}", idx)),
        Edge::NamedEnd{ idx, .. } => Some(format!("{}>", idx)),
        Edge::Ref{ idx, .. } => Some(format!("<{}>", idx)),
        Edge::Ahead{ .. } => Some("?=".into()),
        Edge::NegAhead{ .. } => Some("?!".into()),
        Edge::Func{ .. } => Some("func".into()),
        Edge::Brake{ .. } => Some("brake".into()),
        Edge::Repeat{ .. } => Some("repeat".into()),
        Edge::Lower{ bound, .. } => Some(format!("lower: {}", bound)),
        Edge::Upper{ bound, .. } => Some(format!("upper: {}", bound)),
        Edge::Match{ .. } => Some("match".into()),
    }
}

// Tests ///////////////////////////////////////////////////////////////////////
