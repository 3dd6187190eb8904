
mod error;
mod id;
mod parser;

pub use error::SyntaxError;
pub use id::{Bounds, Exp, Id};
pub use parser::parse;
