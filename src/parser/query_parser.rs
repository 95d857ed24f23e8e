use tracing::debug;

use crate::parser::{
    AggregateFunction, ClauseLayout, FilterCondition, LogicalOperator, ParsedQuery, ParserConfig, QueryError, QueryScanner,
    split_conditions, split_list,
};

/// Turns query strings into [`ParsedQuery`] values.
///
/// Holds only configuration, so one parser can be shared across threads and
/// reused for any number of queries.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    pub config: ParserConfig,
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, query_string: &str) -> Result<ParsedQuery, QueryError> {
        if query_string.trim().is_empty() {
            return QueryError::EmptyQuery.err();
        }

        let mut scanner = QueryScanner::new(query_string);
        let layout = ClauseLayout::locate(&mut scanner)?;

        let source_name = layout.source_name(&scanner);

        let tokens = layout.selected_tokens(&scanner);
        if tokens.is_empty() {
            return QueryError::MissingRequiredClause { clause: "select" }.err();
        }
        if tokens.iter().any(|token| token.is_empty()) {
            return QueryError::EmptyField { clause: "select" }.err();
        }
        let (calls, fields): (Vec<String>, Vec<String>) = tokens
            .into_iter()
            .partition(|token| AggregateFunction::is_call(token));
        let aggregate_functions = Self::parse_aggregates(&calls)?;

        let (filter_conditions, logical_operators) = match layout.condition_segment(&scanner) {
            Some(segment) => self.parse_where(&segment)?,
            None => (vec![], vec![]),
        };

        let group_by_fields = Self::parse_list(layout.group_by_segment(&scanner), "group by")?;
        let order_by_fields = Self::parse_list(layout.order_by_segment(&scanner), "order by")?;

        debug!(
            target: "csv_query::parser",
            source = %source_name,
            fields = fields.len(),
            aggregates = aggregate_functions.len(),
            conditions = filter_conditions.len(),
            "parsed query"
        );

        Ok(ParsedQuery::new(
            query_string,
            source_name,
            fields,
            aggregate_functions,
            filter_conditions,
            logical_operators,
            group_by_fields,
            order_by_fields,
        ))
    }

    fn parse_aggregates(calls: &[String]) -> Result<Vec<AggregateFunction>, QueryError> {
        let mut aggregates = vec![];
        for call in calls {
            if let Some(aggregate) = AggregateFunction::parse(call)? {
                aggregates.push(aggregate);
            }
        }
        Ok(aggregates)
    }

    fn parse_where(&self, segment: &str) -> Result<(Vec<FilterCondition>, Vec<LogicalOperator>), QueryError> {
        if segment.is_empty() {
            return QueryError::malformed_condition("", "where clause without conditions").err();
        }

        let (conditions, operators) = split_conditions(segment);
        let conditions = conditions
            .iter()
            .map(|condition| FilterCondition::parse(condition, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        let operators = operators
            .iter()
            .map(|operator| LogicalOperator::try_from(operator.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((conditions, operators))
    }

    fn parse_list(segment: Option<String>, clause: &'static str) -> Result<Vec<String>, QueryError> {
        let Some(segment) = segment else {
            return Ok(vec![]);
        };
        Self::non_empty_list(split_list(&segment), clause)
    }

    fn non_empty_list(fields: Vec<String>, clause: &'static str) -> Result<Vec<String>, QueryError> {
        if fields.iter().any(|field| field.is_empty()) {
            return QueryError::EmptyField { clause }.err();
        }
        Ok(fields)
    }
}
