use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parser::QueryError;

/// `name(field)` with optional inner whitespace.
static CALL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\(\s*([^()]*?)\s*\)$").expect("valid aggregate call pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Min,
    Max,
    Sum,
    Count,
    Avg,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 5] = [
        AggregateKind::Min,
        AggregateKind::Max,
        AggregateKind::Sum,
        AggregateKind::Count,
        AggregateKind::Avg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
            AggregateKind::Sum => "sum",
            AggregateKind::Count => "count",
            AggregateKind::Avg => "avg",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for AggregateKind {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lname = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lname)
            .ok_or_else(|| QueryError::UnknownAggregateFunction { name: value.to_string() })
    }
}

/// An aggregate call from the select list, e.g. `max(win_by_runs)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AggregateFunctionRecord")]
pub struct AggregateFunction {
    field: String,
    function: AggregateKind,
}

#[derive(Deserialize)]
struct AggregateFunctionRecord {
    field: String,
    function: AggregateKind,
}

impl TryFrom<AggregateFunctionRecord> for AggregateFunction {
    type Error = QueryError;

    fn try_from(record: AggregateFunctionRecord) -> Result<Self, Self::Error> {
        if record.field.trim().is_empty() || record.field.trim() != record.field {
            return QueryError::EmptyField { clause: "aggregate" }.err();
        }
        Ok(Self::new(&record.field, record.function))
    }
}

impl AggregateFunction {
    pub fn new(field: &str, function: AggregateKind) -> Self {
        Self { field: field.to_string(), function }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn function(&self) -> AggregateKind {
        self.function
    }

    /// `true` when the select token has call syntax, whatever the function name.
    pub fn is_call(token: &str) -> bool {
        CALL_PATTERN.is_match(token.trim())
    }

    /// Parses a call-shaped select token. Returns `Ok(None)` for plain field tokens.
    pub fn parse(token: &str) -> Result<Option<Self>, QueryError> {
        let Some(captures) = CALL_PATTERN.captures(token.trim()) else {
            return Ok(None);
        };

        let function = AggregateKind::try_from(&captures[1])?;
        let field = captures[2].trim();
        if field.is_empty() {
            return QueryError::EmptyField { clause: "aggregate" }.err();
        }

        Ok(Some(Self::new(field, function)))
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.field)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{AggregateFunction, AggregateKind, QueryError};

    #[test]
    pub fn test_parse_max() {
        let result = AggregateFunction::parse("max(win_by_runs)")
            .expect("Failed to parse aggregate")
            .expect("Expected an aggregate");

        assert_eq!(result.field(), "win_by_runs");
        assert_eq!(result.function(), AggregateKind::Max);
        assert_eq!(result.to_string(), "max(win_by_runs)");
    }

    #[test]
    pub fn test_parse_case_and_spaces() {
        let result = AggregateFunction::parse(" COUNT ( * ) ")
            .expect("Failed to parse aggregate")
            .expect("Expected an aggregate");

        assert_eq!(result.field(), "*");
        assert_eq!(result.function(), AggregateKind::Count);
    }

    #[test]
    pub fn test_plain_field() {
        assert_eq!(AggregateFunction::parse("city"), Ok(None));
        assert_eq!(AggregateFunction::parse("max_runs"), Ok(None));
        assert!(!AggregateFunction::is_call("city"));
        assert!(AggregateFunction::is_call("avg(x)"));
    }

    #[test]
    pub fn test_unknown_function() {
        match AggregateFunction::parse("median(win_by_runs)") {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err, QueryError::UnknownAggregateFunction { name: "median".to_string() }),
        }
    }

    #[test]
    pub fn test_deserialize_checks_field() {
        let result = serde_json::from_value::<AggregateFunction>(serde_json::json!({ "field": " ", "function": "max" }));
        assert!(result.is_err());

        let result = serde_json::from_value::<AggregateFunction>(serde_json::json!({ "field": "*", "function": "count" }));
        assert_eq!(result.ok(), Some(AggregateFunction::new("*", AggregateKind::Count)));
    }

    #[test]
    pub fn test_empty_argument() {
        assert_eq!(AggregateFunction::parse("sum()"), Err(QueryError::EmptyField { clause: "aggregate" }));
    }
}
