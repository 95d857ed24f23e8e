pub mod query_parser;
pub use query_parser::*;

pub mod ast;
pub use ast::*;

pub mod parse_error;
pub use parse_error::*;

pub mod parser_config;
pub use parser_config::*;

pub mod word_comparer;
pub use word_comparer::*;

pub mod query_comparers;
pub use query_comparers::*;

pub mod query_scanner;
pub use query_scanner::*;

pub mod clause_extractor;
pub use clause_extractor::*;
