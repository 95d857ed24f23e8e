pub mod parser;
pub use parser::{
    AggregateFunction, AggregateKind, ComparisonOperator, FilterCondition, LogicalOperator, ParsedQuery, ParserConfig,
    QueryError, QueryParser,
};
