use crate::parser::WordComparer;

#[derive(Debug)]
pub struct QueryComparers {
    pub select: WordComparer,
    pub from: WordComparer,
    pub r#where: WordComparer,
    pub group_by: WordComparer,
    pub order_by: WordComparer,
    pub and: WordComparer,
    pub or: WordComparer,
}

impl Default for QueryComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryComparers {
    pub fn new() -> Self {
        Self {
            select: WordComparer::new("SELECT"),
            from: WordComparer::new("FROM"),
            r#where: WordComparer::new("WHERE"),
            group_by: WordComparer::new("GROUP BY"),
            order_by: WordComparer::new("ORDER BY"),
            and: WordComparer::new("AND"),
            or: WordComparer::new("OR"),
        }
    }

    /// Optional clauses that may follow the source, in grammar order.
    pub fn optional_clauses(&self) -> [&WordComparer; 3] {
        [&self.r#where, &self.group_by, &self.order_by]
    }

    pub fn logical(&self) -> [&WordComparer; 2] {
        [&self.and, &self.or]
    }
}
