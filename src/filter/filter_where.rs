use serde_json::{Map, Value};

use super::types::{value_as_text, FilterClause, SqlResult};

pub struct FilterWhere {
    param_values: Vec<String>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Compile equality clauses into a `WHERE` body. An empty clause list
    /// yields an empty string (match-all).
    pub fn generate(clauses: &[FilterClause], starting_param_index: usize) -> SqlResult {
        let mut filter_where = Self::new(starting_param_index);
        let conditions: Vec<String> = clauses
            .iter()
            .map(|clause| filter_where.build_condition(clause))
            .collect();

        SqlResult {
            query: conditions.join(" AND "),
            params: filter_where.param_values,
        }
    }

    /// In-memory evaluation with the same semantics as the generated SQL.
    pub fn matches(clauses: &[FilterClause], doc: &Map<String, Value>) -> bool {
        clauses.iter().all(|clause| {
            let expected = value_as_text(&clause.value);
            let actual = doc.get(&clause.field).and_then(value_as_text);
            match (expected, actual) {
                (Some(e), Some(a)) => e == a,
                (None, None) => true,
                _ => false,
            }
        })
    }

    fn build_condition(&mut self, clause: &FilterClause) -> String {
        match value_as_text(&clause.value) {
            Some(text) => format!("doc->>'{}' = {}", clause.field, self.param(text)),
            None => format!("doc->>'{}' IS NULL", clause.field),
        }
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clause(field: &str, value: Value) -> FilterClause {
        FilterClause {
            field: field.to_string(),
            value,
        }
    }

    #[test]
    fn empty_clauses_match_everything() {
        let sql = FilterWhere::generate(&[], 0);
        assert!(sql.query.is_empty());
        assert!(sql.params.is_empty());
        assert!(FilterWhere::matches(&[], &Map::new()));
    }

    #[test]
    fn numbers_placeholders_from_offset() {
        let clauses = vec![
            clause("donation_status", json!("pending")),
            clause("blood_group", json!("A+")),
        ];
        let sql = FilterWhere::generate(&clauses, 2);
        assert_eq!(
            sql.query,
            "doc->>'donation_status' = $3 AND doc->>'blood_group' = $4"
        );
        assert_eq!(sql.params, vec!["pending".to_string(), "A+".to_string()]);
    }

    #[test]
    fn matches_compares_text_forms() {
        let doc = json!({"status": "active", "count": 3});
        let doc = doc.as_object().unwrap();
        assert!(FilterWhere::matches(&[clause("status", json!("active"))], doc));
        assert!(FilterWhere::matches(&[clause("count", json!("3"))], doc));
        assert!(!FilterWhere::matches(&[clause("status", json!("blocked"))], doc));
        assert!(!FilterWhere::matches(&[clause("missing", json!("x"))], doc));
    }
}
