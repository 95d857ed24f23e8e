pub mod operators;
pub use operators::*;

pub mod filter_condition;
pub use filter_condition::*;

pub mod aggregate_function;
pub use aggregate_function::*;

pub mod parsed_query;
pub use parsed_query::*;
