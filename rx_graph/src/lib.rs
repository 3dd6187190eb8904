
extern crate rx_charset;
extern crate rx_exp;

mod compile;
mod graph;
mod matcher;
mod mermaid;

pub use graph::{BrakeId, CounterId, Edge, FuncOp, Graph, Node, NodeId, Status};
pub use matcher::Matcher;

// the parsing surface, so drivers only need this crate
pub use rx_exp::{parse, Bounds, Exp, Id, SyntaxError};
