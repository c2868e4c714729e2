//! XML model and parser

pub mod cursor;
pub mod model;
pub mod parser;

pub use cursor::Cursor;
pub use model::{Content, Document, Element};
pub use parser::{Config, Parser, NESTING_CEILING};
