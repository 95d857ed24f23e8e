//! Clause extraction over the raw query text.
//!
//! Every `extract_*` function is independent: it scans the query from scratch and
//! returns `None` or an empty list when its clause is absent. The same segments are
//! available on [`ClauseLayout`] for callers that already located the clauses.
//! Turning the raw segments into typed records is left to
//! [`QueryParser`](crate::parser::QueryParser).

use tracing::trace;

use crate::parser::{AggregateFunction, ComparisonOperator, ParserConfig, QueryError, QueryScanner};

type Span = (usize, usize);

const OPTIONAL_CLAUSES: [&str; 3] = ["where", "group by", "order by"];

/// Positions of the clause keywords found in one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseLayout {
    pub select: Span,
    pub from: Span,
    /// Span of the source token that follows `from`.
    pub source: Span,
    pub r#where: Option<Span>,
    pub group_by: Option<Span>,
    pub order_by: Option<Span>,
}

impl ClauseLayout {
    /// Finds `select`, the first standalone `from` after it, the source token and
    /// then each optional clause after the source.
    ///
    /// Only an optional clause or the end of input may follow the source, and the
    /// optional clauses must keep the `where`, `group by`, `order by` order.
    pub fn locate(scanner: &mut QueryScanner) -> Result<Self, QueryError> {
        let Some(select) = scanner.comparers.select.find(scanner, 0) else {
            return QueryError::MissingRequiredClause { clause: "select" }.err();
        };
        let Some(from) = scanner.comparers.from.find(scanner, select.1) else {
            return QueryError::MissingRequiredClause { clause: "from" }.err();
        };

        scanner.jump_to(from.1);
        scanner.next_non_whitespace();
        if scanner.eof() || Self::starts_optional_clause(scanner) {
            return QueryError::MissingRequiredClause { clause: "from" }.err();
        }
        let pivot = scanner.position;
        Self::skip_token(scanner);
        let source = (pivot, scanner.position);

        scanner.next_non_whitespace();
        if !scanner.eof() && !Self::starts_optional_clause(scanner) {
            let pivot = scanner.position;
            Self::skip_token(scanner);
            return QueryError::UnexpectedText { text: scanner.text_from_pivot(pivot) }.err();
        }

        let scanner = &*scanner;
        let clauses = scanner.comparers.optional_clauses()
            .map(|comparer| comparer.find(scanner, source.1));

        let mut previous: Option<(&'static str, usize)> = None;
        for (name, span) in OPTIONAL_CLAUSES.into_iter().zip(clauses) {
            let Some((start, _)) = span else { continue };
            if let Some((previous_name, previous_start)) = previous {
                if start < previous_start {
                    return QueryError::MisplacedClause { clause: previous_name }.err();
                }
            }
            previous = Some((name, start));
        }

        let [r#where, group_by, order_by] = clauses;
        let layout = Self { select, from, source, r#where, group_by, order_by };
        trace!(target: "csv_query::parser", ?layout, "located clauses");
        Ok(layout)
    }

    fn starts_optional_clause(scanner: &QueryScanner) -> bool {
        scanner.comparers.optional_clauses()
            .iter()
            .any(|comparer| comparer.compare_current(scanner).is_some())
    }

    fn skip_token(scanner: &mut QueryScanner) {
        while !scanner.eof() && !scanner.current().is_whitespace() {
            scanner.next();
        }
    }

    fn clause_starts(&self) -> impl Iterator<Item = usize> + '_ {
        [Some(self.from), self.r#where, self.group_by, self.order_by]
            .into_iter()
            .flatten()
            .map(|span| span.0)
    }

    /// A clause body runs from the end of its keyword to the next clause keyword.
    fn body_end(&self, keyword: Span, length: usize) -> usize {
        self.clause_starts()
            .filter(|start| *start > keyword.0)
            .min()
            .unwrap_or(length)
    }

    fn body(&self, scanner: &QueryScanner, keyword: Span) -> String {
        scanner.text_from_range(keyword.1, self.body_end(keyword, scanner.length)).trim().to_string()
    }

    pub fn source_name(&self, scanner: &QueryScanner) -> String {
        scanner.text_from_range(self.source.0, self.source.1)
    }

    pub fn selected_segment(&self, scanner: &QueryScanner) -> String {
        scanner.text_from_range(self.select.1, self.from.0).trim().to_string()
    }

    pub fn selected_tokens(&self, scanner: &QueryScanner) -> Vec<String> {
        let segment = self.selected_segment(scanner);
        if segment.is_empty() {
            return vec![];
        }
        split_list(&segment)
    }

    pub fn condition_segment(&self, scanner: &QueryScanner) -> Option<String> {
        self.r#where.map(|r#where| self.body(scanner, r#where))
    }

    pub fn group_by_segment(&self, scanner: &QueryScanner) -> Option<String> {
        self.group_by.map(|group_by| self.body(scanner, group_by))
    }

    pub fn order_by_segment(&self, scanner: &QueryScanner) -> Option<String> {
        self.order_by.map(|order_by| self.body(scanner, order_by))
    }

    /// Query text up to the first optional clause, or all of it.
    pub fn base_query(&self, scanner: &QueryScanner) -> String {
        let end = [self.r#where, self.group_by, self.order_by]
            .into_iter()
            .flatten()
            .map(|span| span.0)
            .min()
            .unwrap_or(scanner.length);
        scanner.text_from_range(0, end).trim().to_string()
    }
}

fn layout_of(query: &str) -> Option<(QueryScanner, ClauseLayout)> {
    let mut scanner = QueryScanner::new(query);
    let layout = ClauseLayout::locate(&mut scanner).ok()?;
    Some((scanner, layout))
}

pub fn split_list(segment: &str) -> Vec<String> {
    segment.split(',').map(|item| item.trim().to_string()).collect()
}

pub fn extract_source_name(query: &str) -> Option<String> {
    layout_of(query).map(|(scanner, layout)| layout.source_name(&scanner))
}

/// Raw text between `select` and `from`, trimmed.
pub fn extract_selected_segment(query: &str) -> Option<String> {
    layout_of(query).map(|(scanner, layout)| layout.selected_segment(&scanner))
}

/// Comma separated entries of the select list, trimmed. Empty entries are kept.
pub fn extract_selected_tokens(query: &str) -> Vec<String> {
    layout_of(query)
        .map(|(scanner, layout)| layout.selected_tokens(&scanner))
        .unwrap_or_default()
}

/// Select entries that are not written as calls.
pub fn extract_fields(query: &str) -> Vec<String> {
    extract_selected_tokens(query)
        .into_iter()
        .filter(|token| !AggregateFunction::is_call(token))
        .collect()
}

/// Select entries written as `name(field)`, whatever the name.
pub fn extract_aggregate_segments(query: &str) -> Vec<String> {
    extract_selected_tokens(query)
        .into_iter()
        .filter(|token| AggregateFunction::is_call(token))
        .collect()
}

/// Body of the WHERE clause, `None` when there is no WHERE keyword.
pub fn extract_condition_segment(query: &str) -> Option<String> {
    let (scanner, layout) = layout_of(query)?;
    layout.condition_segment(&scanner)
}

/// Splits a WHERE body on standalone `and`/`or`.
///
/// Returns the raw conditions and the keywords between them, both left to right;
/// there is always exactly one more condition than keyword. A value that starts
/// with a quote right after its operator runs to the matching quote, and keywords
/// inside it do not split.
pub fn split_conditions(segment: &str) -> (Vec<String>, Vec<String>) {
    let mut scanner = QueryScanner::new(segment);
    let mut conditions = vec![];
    let mut operators = vec![];
    let mut pivot = 0;
    let mut quote: Option<char> = None;
    let mut last_significant = '\0';

    while !scanner.eof() {
        let current = scanner.current();

        if let Some(open) = quote {
            if current == open {
                quote = None;
            }
            last_significant = current;
            scanner.next();
            continue;
        }

        if ParserConfig::is_quote(current) && ComparisonOperator::is_operator_char(last_significant) {
            quote = Some(current);
            last_significant = current;
            scanner.next();
            continue;
        }

        let matched = scanner.comparers.logical()
            .into_iter()
            .find_map(|comparer| comparer.compare_current(&scanner));

        match matched {
            Some(end) => {
                conditions.push(scanner.text_from_pivot(pivot).trim().to_string());
                operators.push(scanner.text_from_range(scanner.position, end).to_lowercase());
                scanner.jump_to(end);
                pivot = end;
                last_significant = '\0';
            },
            None => {
                if !current.is_whitespace() {
                    last_significant = current;
                }
                scanner.next();
            },
        }
    }
    conditions.push(scanner.text_from_pivot(pivot).trim().to_string());

    (conditions, operators)
}

pub fn extract_conditions(query: &str) -> Vec<String> {
    extract_condition_segment(query)
        .map(|segment| split_conditions(&segment).0)
        .unwrap_or_default()
}

pub fn extract_logical_operators(query: &str) -> Vec<String> {
    extract_condition_segment(query)
        .map(|segment| split_conditions(&segment).1)
        .unwrap_or_default()
}

pub fn extract_group_by_segment(query: &str) -> Option<String> {
    let (scanner, layout) = layout_of(query)?;
    layout.group_by_segment(&scanner)
}

pub fn extract_group_by_fields(query: &str) -> Vec<String> {
    extract_group_by_segment(query)
        .map(|segment| split_list(&segment))
        .unwrap_or_default()
}

pub fn extract_order_by_segment(query: &str) -> Option<String> {
    let (scanner, layout) = layout_of(query)?;
    layout.order_by_segment(&scanner)
}

pub fn extract_order_by_fields(query: &str) -> Vec<String> {
    extract_order_by_segment(query)
        .map(|segment| split_list(&segment))
        .unwrap_or_default()
}

/// Query text up to the first optional clause.
pub fn extract_base_query(query: &str) -> Option<String> {
    layout_of(query).map(|(scanner, layout)| layout.base_query(&scanner))
}
