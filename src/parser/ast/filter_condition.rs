use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::{ComparisonOperator, ParserConfig, QueryError};

/// One `field operator value` comparison from the WHERE clause.
///
/// The value stays text; typing it is up to whoever evaluates the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterConditionRecord")]
pub struct FilterCondition {
    property_name: String,
    operator: ComparisonOperator,
    property_value: String,
}

#[derive(Deserialize)]
struct FilterConditionRecord {
    property_name: String,
    operator: ComparisonOperator,
    property_value: String,
}

impl TryFrom<FilterConditionRecord> for FilterCondition {
    type Error = QueryError;

    fn try_from(record: FilterConditionRecord) -> Result<Self, Self::Error> {
        let condition = format!("{} {} {}", record.property_name, record.operator, record.property_value);
        if record.property_name.trim().is_empty() || record.property_name.trim() != record.property_name {
            return QueryError::malformed_condition(&condition, "property name must be trimmed and non-empty").err();
        }
        if record.property_value.trim() != record.property_value {
            return QueryError::malformed_condition(&condition, "property value must be trimmed").err();
        }

        Ok(Self::new(&record.property_name, record.operator, &record.property_value))
    }
}

impl FilterCondition {
    pub fn new(property_name: &str, operator: ComparisonOperator, property_value: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
            operator,
            property_value: property_value.to_string(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn property_value(&self) -> &str {
        &self.property_value
    }

    /// Splits a raw condition on the first operator found in
    /// [`ComparisonOperator::PRIORITY`] order.
    pub fn parse(raw: &str, config: &ParserConfig) -> Result<Self, QueryError> {
        let condition = raw.trim();
        if condition.is_empty() {
            return QueryError::malformed_condition(raw, "empty condition").err();
        }

        let Some((position, operator)) = ComparisonOperator::PRIORITY
            .into_iter()
            .find_map(|op| condition.find(op.symbol()).map(|position| (position, op)))
        else {
            return QueryError::malformed_condition(condition, "no comparison operator").err();
        };

        let name = condition[..position].trim();
        let value = condition[position + operator.symbol().len()..].trim();

        let value_has_operator = ParserConfig::unquote(value).is_none() && Self::contains_operator(value);
        if Self::contains_operator(name) || value_has_operator {
            return QueryError::malformed_condition(condition, "more than one comparison operator").err();
        }
        if name.is_empty() {
            return QueryError::malformed_condition(condition, "missing property name").err();
        }
        if value.is_empty() {
            return QueryError::malformed_condition(condition, "missing property value").err();
        }

        Ok(Self::new(name, operator, &config.normalize_value(value)))
    }

    fn contains_operator(text: &str) -> bool {
        ComparisonOperator::PRIORITY.iter().any(|op| text.contains(op.symbol()))
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.property_name, self.operator, self.property_value)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ComparisonOperator, FilterCondition, ParserConfig, QueryError};

    fn parse(text: &str) -> Result<FilterCondition, QueryError> {
        FilterCondition::parse(text, &ParserConfig::default())
    }

    #[test]
    pub fn test_greater_or_equal_without_spaces() {
        let result = parse("season>=2008").expect("Failed to parse condition");

        assert_eq!(result.property_name(), "season");
        assert_eq!(result.operator(), ComparisonOperator::GtEq);
        assert_eq!(result.property_value(), "2008");
    }

    #[test]
    pub fn test_each_operator() {
        let cases = [
            ("a >= 1", ComparisonOperator::GtEq),
            ("a <= 1", ComparisonOperator::LtEq),
            ("a != 1", ComparisonOperator::NotEq),
            ("a == 1", ComparisonOperator::EqEq),
            ("a > 1", ComparisonOperator::Gt),
            ("a < 1", ComparisonOperator::Lt),
            ("a = 1", ComparisonOperator::Eq),
        ];

        for (text, expected) in cases {
            let result = parse(text).expect("Failed to parse condition");
            assert_eq!(result.operator(), expected, "{}", text);
            assert_eq!(result.property_name(), "a");
            assert_eq!(result.property_value(), "1");
        }
    }

    #[test]
    pub fn test_value_with_spaces() {
        let result = parse("  team1 = Royal Challengers Bangalore ").expect("Failed to parse condition");

        assert_eq!(result.property_name(), "team1");
        assert_eq!(result.property_value(), "Royal Challengers Bangalore");
        assert_eq!(result.to_string(), "team1 = Royal Challengers Bangalore");
    }

    #[test]
    pub fn test_no_operator() {
        match parse("season 2008") {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err, QueryError::malformed_condition("season 2008", "no comparison operator")),
        }
    }

    #[test]
    pub fn test_two_operators() {
        assert!(matches!(parse("a >= 1 = 2"), Err(QueryError::MalformedCondition { .. })));
        assert!(matches!(parse("a => 1"), Err(QueryError::MalformedCondition { .. })));
    }

    #[test]
    pub fn test_unrecognized_operator_chars_in_value() {
        let result = parse("result = no result!").expect("Failed to parse condition");
        assert_eq!(result.property_value(), "no result!");

        let result = parse("venue != !unknown").expect("Failed to parse condition");
        assert_eq!(result.operator(), ComparisonOperator::NotEq);
        assert_eq!(result.property_value(), "!unknown");

        assert!(matches!(parse("venue != Chinnaswamy <Bengaluru"), Err(QueryError::MalformedCondition { .. })));
    }

    #[test]
    pub fn test_operator_inside_quoted_value() {
        let result = parse("note = 'a = b'").expect("Failed to parse condition");
        assert_eq!(result.property_value(), "'a = b'");
    }

    #[test]
    pub fn test_missing_sides() {
        assert!(matches!(parse("= 2008"), Err(QueryError::MalformedCondition { .. })));
        assert!(matches!(parse("season >="), Err(QueryError::MalformedCondition { .. })));
        assert!(matches!(parse("   "), Err(QueryError::MalformedCondition { .. })));
    }

    #[test]
    pub fn test_deserialize_checks_name() {
        let result = serde_json::from_value::<FilterCondition>(serde_json::json!({
            "property_name": "", "operator": "=", "property_value": "bat"
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<FilterCondition>(serde_json::json!({
            "property_name": "toss_decision", "operator": "!=", "property_value": "bat"
        }));
        assert_eq!(result.ok(), Some(FilterCondition::new("toss_decision", ComparisonOperator::NotEq, "bat")));
    }

    #[test]
    pub fn test_strip_value_quotes() {
        let result = FilterCondition::parse("toss_decision != 'bat'", &ParserConfig::unquoted_values())
            .expect("Failed to parse condition");
        assert_eq!(result.property_value(), "bat");

        let result = parse("toss_decision != 'bat'").expect("Failed to parse condition");
        assert_eq!(result.property_value(), "'bat'");
    }
}
