use serde_json::Value;

/// True when `record` references another tweet with the given relation
/// type (`retweeted`, `quoted`, `replied_to`). For an array record any
/// element may match.
pub fn is_related(record: &Value, relation: &str) -> bool {
    match record {
        Value::Array(items) => items.iter().any(|item| is_related(item, relation)),
        Value::Object(map) => match map.get("referenced_tweets") {
            Some(Value::Array(references)) => references
                .iter()
                .any(|reference| reference.get("type").and_then(Value::as_str) == Some(relation)),
            _ => false,
        },
        _ => false,
    }
}

/// Row predicate shared by the header pass and the row pass.
#[derive(Debug, Clone, Default)]
pub struct RelatedFilter {
    relation: Option<String>,
}

impl RelatedFilter {
    pub fn new(relation: Option<String>) -> Self {
        Self { relation }
    }

    pub fn relation(&self) -> Option<&str> {
        self.relation.as_deref()
    }

    pub fn accepts(&self, record: &Value) -> bool {
        match &self.relation {
            Some(relation) => is_related(record, relation),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_relation_type() {
        let record = json!({
            "id": "1",
            "text": "hi",
            "referenced_tweets": [{"type": "retweeted", "author": {"username": "bob"}}]
        });

        assert!(is_related(&record, "retweeted"));
        assert!(!is_related(&record, "quoted"));
    }

    #[test]
    fn test_missing_or_null_references_never_match() {
        let plain = json!({"id": "2", "text": "plain"});
        let null_refs = json!({"id": "3", "referenced_tweets": null});

        for relation in ["retweeted", "quoted", "replied_to", ""] {
            assert!(!is_related(&plain, relation));
            assert!(!is_related(&null_refs, relation));
        }
    }

    #[test]
    fn test_any_reference_may_match() {
        let record = json!({"referenced_tweets": [{"type": "quoted"}, {"type": "replied_to"}]});

        assert!(is_related(&record, "replied_to"));
        assert!(is_related(&json!([{"id": "x"}, record]), "quoted"));
    }

    #[test]
    fn test_filter_without_relation_accepts_everything() {
        let filter = RelatedFilter::default();

        assert!(filter.accepts(&json!({"id": "1"})));
        assert!(!RelatedFilter::new(Some("quoted".to_string())).accepts(&json!({"id": "1"})));
    }
}
