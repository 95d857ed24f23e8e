use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "==")]
    EqEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
}

impl ComparisonOperator {
    /// Longest symbols first, so `>=` is never read as `>` followed by `=`.
    pub const PRIORITY: [ComparisonOperator; 7] = [
        ComparisonOperator::GtEq,
        ComparisonOperator::LtEq,
        ComparisonOperator::NotEq,
        ComparisonOperator::EqEq,
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
        ComparisonOperator::Eq,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GtEq => ">=",
            ComparisonOperator::LtEq => "<=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::EqEq => "==",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Eq => "=",
        }
    }

    /// Characters that can appear in any operator symbol.
    pub fn is_operator_char(ch: char) -> bool {
        matches!(ch, '>' | '<' | '=' | '!')
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for ComparisonOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::PRIORITY
            .into_iter()
            .find(|op| op.symbol() == value.trim())
            .ok_or_else(|| format!("Invalid comparison operator: '{}'", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl TryFrom<&str> for LogicalOperator {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(LogicalOperator::And),
            "or" => Ok(LogicalOperator::Or),
            _ => QueryError::UnknownLogicalOperator { operator: value.to_string() }.err(),
        }
    }
}
