use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::parser::{AggregateFunction, FilterCondition, LogicalOperator, QueryError, QueryParser, extract_base_query};

/// Structured form of one query, ready for an execution engine.
///
/// `logical_operators[i]` joins `filter_conditions[i]` and `filter_conditions[i + 1]`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParsedQueryRecord")]
pub struct ParsedQuery {
    query_string: String,
    source_name: String,
    fields: Vec<String>,
    aggregate_functions: Vec<AggregateFunction>,
    filter_conditions: Vec<FilterCondition>,
    logical_operators: Vec<LogicalOperator>,
    group_by_fields: Vec<String>,
    order_by_fields: Vec<String>,
}

#[derive(Deserialize)]
struct ParsedQueryRecord {
    query_string: String,
    source_name: String,
    fields: Vec<String>,
    aggregate_functions: Vec<AggregateFunction>,
    filter_conditions: Vec<FilterCondition>,
    logical_operators: Vec<LogicalOperator>,
    group_by_fields: Vec<String>,
    order_by_fields: Vec<String>,
}

fn check_list(fields: &[String], clause: &'static str) -> Result<(), QueryError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return QueryError::EmptyField { clause }.err();
    }
    Ok(())
}

impl TryFrom<ParsedQueryRecord> for ParsedQuery {
    type Error = QueryError;

    fn try_from(record: ParsedQueryRecord) -> Result<Self, Self::Error> {
        if record.source_name.trim().is_empty() || record.source_name.contains(char::is_whitespace) {
            return QueryError::MissingRequiredClause { clause: "from" }.err();
        }
        if record.fields.is_empty() && record.aggregate_functions.is_empty() {
            return QueryError::MissingRequiredClause { clause: "select" }.err();
        }
        check_list(&record.fields, "select")?;
        check_list(&record.group_by_fields, "group by")?;
        check_list(&record.order_by_fields, "order by")?;
        if record.logical_operators.len() != record.filter_conditions.len().saturating_sub(1) {
            return QueryError::malformed_condition("", "logical operators do not join the conditions").err();
        }

        Ok(Self::new(
            &record.query_string,
            record.source_name,
            record.fields,
            record.aggregate_functions,
            record.filter_conditions,
            record.logical_operators,
            record.group_by_fields,
            record.order_by_fields,
        ))
    }
}

impl ParsedQuery {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        query_string: &str,
        source_name: String,
        fields: Vec<String>,
        aggregate_functions: Vec<AggregateFunction>,
        filter_conditions: Vec<FilterCondition>,
        logical_operators: Vec<LogicalOperator>,
        group_by_fields: Vec<String>,
        order_by_fields: Vec<String>,
    ) -> Self {
        Self {
            query_string: query_string.to_string(),
            source_name,
            fields,
            aggregate_functions,
            filter_conditions,
            logical_operators,
            group_by_fields,
            order_by_fields,
        }
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn aggregate_functions(&self) -> &[AggregateFunction] {
        &self.aggregate_functions
    }

    pub fn filter_conditions(&self) -> &[FilterCondition] {
        &self.filter_conditions
    }

    pub fn logical_operators(&self) -> &[LogicalOperator] {
        &self.logical_operators
    }

    pub fn group_by_fields(&self) -> &[String] {
        &self.group_by_fields
    }

    pub fn order_by_fields(&self) -> &[String] {
        &self.order_by_fields
    }

    /// `select ... from <source>` part of the query, without optional clauses.
    pub fn base_query(&self) -> String {
        extract_base_query(&self.query_string).unwrap_or_default()
    }

    pub fn has_filter(&self) -> bool {
        !self.filter_conditions.is_empty()
    }

    pub fn has_aggregates(&self) -> bool {
        !self.aggregate_functions.is_empty()
    }

    pub fn has_group_by(&self) -> bool {
        !self.group_by_fields.is_empty()
    }

    pub fn has_order_by(&self) -> bool {
        !self.order_by_fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl TryFrom<&str> for ParsedQuery {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        QueryParser::new().parse(value)
    }
}

impl FromStr for ParsedQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(separator)
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParsedQuery(source={}, fields=[{}], aggregates=[{}], conditions=[{}], operators=[{}], group_by=[{}], order_by=[{}])",
               self.source_name,
               join(&self.fields, ", "),
               join(&self.aggregate_functions, ", "),
               join(&self.filter_conditions, ", "),
               join(&self.logical_operators, ", "),
               join(&self.group_by_fields, ", "),
               join(&self.order_by_fields, ", "))
    }
}

impl fmt::Debug for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- '{}'", self, self.query_string)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::parser::ParsedQuery;

    #[test]
    pub fn test_try_from_and_from_str() {
        let text = "select city from data/ipl.csv where season > 2014";

        let from_try: ParsedQuery = ParsedQuery::try_from(text).expect("Failed to parse query");
        let from_str: ParsedQuery = text.parse().expect("Failed to parse query");

        assert_eq!(from_try, from_str);
        assert_eq!(from_try.query_string(), text);
    }

    #[test]
    pub fn test_base_query() {
        let query = ParsedQuery::try_from("select city from data/ipl.csv where season > 2014 order by city")
            .expect("Failed to parse query");

        assert_eq!(query.base_query(), "select city from data/ipl.csv");
    }

    #[test]
    pub fn test_has_predicates() {
        let query = ParsedQuery::try_from("select city,count(id) from data/ipl.csv group by city")
            .expect("Failed to parse query");

        assert!(query.has_aggregates());
        assert!(query.has_group_by());
        assert!(!query.has_filter());
        assert!(!query.has_order_by());
    }

    #[test]
    pub fn test_display() {
        let query = ParsedQuery::try_from("select city,max(win_by_runs) from data/ipl.csv where season >= 2008 and city = bangalore group by city")
            .expect("Failed to parse query");

        assert_eq!(
            query.to_string(),
            "ParsedQuery(source=data/ipl.csv, fields=[city], aggregates=[max(win_by_runs)], conditions=[season >= 2008, city = bangalore], operators=[and], group_by=[city], order_by=[])"
        );
    }

    #[test]
    pub fn test_from_json_keeps_invariants() {
        let query = ParsedQuery::try_from("select city,max(win_by_runs) from data/ipl.csv where season >= 2008 or city = bangalore")
            .expect("Failed to parse query");

        let restored: ParsedQuery = serde_json::from_value(query.to_json()).expect("Failed to restore query");
        assert_eq!(restored, query);

        let mut broken = query.to_json();
        broken["source_name"] = json!("");
        broken["filter_conditions"] = json!([]);
        broken["logical_operators"] = json!(["and", "or"]);
        assert!(serde_json::from_value::<ParsedQuery>(broken).is_err());

        let mut broken = query.to_json();
        broken["logical_operators"] = json!(["or", "and"]);
        assert!(serde_json::from_value::<ParsedQuery>(broken).is_err());
    }

    #[test]
    pub fn test_to_json() {
        let query = ParsedQuery::try_from("select city,max(win_by_runs) from data/ipl.csv where season >= 2008 or city = bangalore")
            .expect("Failed to parse query");

        assert_eq!(query.to_json(), json!({
            "query_string": "select city,max(win_by_runs) from data/ipl.csv where season >= 2008 or city = bangalore",
            "source_name": "data/ipl.csv",
            "fields": ["city"],
            "aggregate_functions": [{ "field": "win_by_runs", "function": "max" }],
            "filter_conditions": [
                { "property_name": "season", "operator": ">=", "property_value": "2008" },
                { "property_name": "city", "operator": "=", "property_value": "bangalore" }
            ],
            "logical_operators": ["or"],
            "group_by_fields": [],
            "order_by_fields": []
        }));
    }
}
