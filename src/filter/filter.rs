use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::pagination::MAX_WINDOW;
use super::types::{FilterClause, FilterSort, SqlResult};

/// Conjunction of equality clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<FilterClause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Result<Self, FilterError> {
        Self::validate_field(field)?;
        self.clauses.push(FilterClause {
            field: field.to_string(),
            value: value.into(),
        });
        Ok(self)
    }

    /// Adds an equality clause only when the value is present and non-empty.
    pub fn eq_if_present(self, field: &str, value: Option<&str>) -> Result<Self, FilterError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.eq(field, v),
            None => Ok(self),
        }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        FilterWhere::matches(&self.clauses, doc)
    }

    pub fn to_where_sql(&self, starting_param_index: usize) -> SqlResult {
        FilterWhere::generate(&self.clauses, starting_param_index)
    }

    pub fn to_count_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        validate_table_name(table)?;
        let where_result = self.to_where_sql(0);
        let query = if where_result.query.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", table)
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                table, where_result.query
            )
        };
        Ok(SqlResult {
            query,
            params: where_result.params,
        })
    }

    pub(crate) fn validate_field(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidField(name.to_string()));
        }
        Ok(())
    }
}

/// A filtered, ordered and windowed read.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: FilterSort,
    pub skip: u64,
    /// `None` returns every matching document.
    pub limit: Option<u64>,
}

impl FindQuery {
    pub fn new(filter: Filter, sort: FilterSort) -> Self {
        Self {
            filter,
            sort,
            skip: 0,
            limit: None,
        }
    }

    pub fn window(mut self, skip: u64, limit: Option<u64>) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    pub fn to_sql(&self, table: &str) -> Result<SqlResult, FilterError> {
        validate_table_name(table)?;
        Filter::validate_field(&self.sort.field)?;

        let where_result = self.filter.to_where_sql(0);
        let skip = self.skip.min(MAX_WINDOW);
        let limit_clause = match self.limit.map(|limit| limit.min(MAX_WINDOW)) {
            Some(limit) => format!("LIMIT {} OFFSET {}", limit, skip),
            None if skip > 0 => format!("OFFSET {}", skip),
            None => String::new(),
        };

        let query = [
            "SELECT id, doc".to_string(),
            format!("FROM \"{}\"", table),
            if where_result.query.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_result.query)
            },
            FilterOrder::generate(&self.sort),
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult {
            query,
            params: where_result.params,
        })
    }
}

fn validate_table_name(name: &str) -> Result<(), FilterError> {
    Filter::validate_field(name).map_err(|_| FilterError::InvalidTableName(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_params_add_no_clause() {
        let filter = Filter::new()
            .eq_if_present("requester_email", None)
            .unwrap()
            .eq_if_present("donation_status", Some(""))
            .unwrap()
            .eq_if_present("blood_group", Some("  "))
            .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn rejects_unsafe_field_names() {
        assert!(Filter::new().eq("doc'; DROP TABLE users; --", "x").is_err());
        assert!(Filter::new().eq("1abc", "x").is_err());
        assert!(Filter::new().eq("created_at", "x").is_ok());
    }

    #[test]
    fn builds_paged_select() {
        let filter = Filter::new().eq("donation_status", "pending").unwrap();
        let query = FindQuery::new(filter, FilterSort::newest_first("createdAt")).window(20, Some(10));
        let sql = query.to_sql("donations").unwrap();
        assert_eq!(
            sql.query,
            "SELECT id, doc FROM \"donations\" WHERE doc->>'donation_status' = $1 \
             ORDER BY doc->>'createdAt' DESC NULLS LAST LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec!["pending".to_string()]);
    }

    #[test]
    fn unbounded_select_has_no_limit() {
        let query = FindQuery::new(Filter::new(), FilterSort::newest_first("createdAt"));
        let sql = query.to_sql("users").unwrap();
        assert_eq!(
            sql.query,
            "SELECT id, doc FROM \"users\" ORDER BY doc->>'createdAt' DESC NULLS LAST"
        );
    }

    #[test]
    fn window_never_exceeds_bigint() {
        let query = FindQuery::new(Filter::new(), FilterSort::newest_first("createdAt"))
            .window(u64::MAX, Some(u64::MAX));
        let sql = query.to_sql("donations").unwrap();
        let bound = i64::MAX.to_string();
        assert!(sql.query.ends_with(&format!("LIMIT {} OFFSET {}", bound, bound)));

        let query = FindQuery::new(Filter::new(), FilterSort::newest_first("createdAt")).window(u64::MAX, None);
        let sql = query.to_sql("donations").unwrap();
        assert!(sql.query.ends_with(&format!("OFFSET {}", bound)));
    }

    #[test]
    fn count_shares_the_filter() {
        let filter = Filter::new().eq("status", "blocked").unwrap();
        let sql = filter.to_count_sql("users").unwrap();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) AS count FROM \"users\" WHERE doc->>'status' = $1"
        );
    }
}
