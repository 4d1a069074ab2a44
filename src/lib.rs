pub mod engine;
pub mod error;
pub mod query;
pub mod repl;
pub mod storage;

pub use engine::{Engine, Outcome};
pub use error::{Error, Result};
