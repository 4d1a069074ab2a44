pub mod error;
pub mod lexer;
pub mod parser;

pub use error::QueryErr;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Command, Node, NodeKind, Parser, parse};
