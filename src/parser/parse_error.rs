use thiserror::Error;

/// Reasons a query string cannot be turned into a [`ParsedQuery`](crate::parser::ParsedQuery).
///
/// Every variant aborts the whole parse; no partially populated result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("missing required clause '{clause}'")]
    MissingRequiredClause { clause: &'static str },

    #[error("malformed condition '{condition}': {reason}")]
    MalformedCondition { condition: String, reason: String },

    #[error("unknown aggregate function '{name}'")]
    UnknownAggregateFunction { name: String },

    #[error("unknown logical operator '{operator}'")]
    UnknownLogicalOperator { operator: String },

    #[error("empty field in '{clause}' clause")]
    EmptyField { clause: &'static str },

    #[error("unexpected text '{text}' after the source")]
    UnexpectedText { text: String },

    #[error("clause '{clause}' is out of order")]
    MisplacedClause { clause: &'static str },
}

impl QueryError {
    pub fn malformed_condition(condition: &str, reason: &str) -> Self {
        Self::MalformedCondition {
            condition: condition.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn err<T>(self) -> Result<T, QueryError> {
        Err(self)
    }
}
