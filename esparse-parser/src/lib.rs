//! ECMAScript 5 parser.
//!
//! ```
//! let program = esparse_parser::parse("var answer = 6 * 7;").unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod asi;
pub mod ast;
pub mod config;
pub mod dump;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod visitor;

pub use config::ParserConfig;
pub use error::{LexErrorKind, ParseError, ParseResult};
pub use parser::{parse, Parser};
