//! Resource tag lists.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::value::Value;

/// Tags rendered as `[{"Key": k, "Value": v}, ...]`, sorted by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags(BTreeMap<String, Value>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Tags> for Value {
    fn from(tags: Tags) -> Self {
        Value::List(
            tags.0
                .into_iter()
                .map(|(key, value)| {
                    let mut entry = IndexMap::new();
                    entry.insert("Key".to_string(), Value::String(key));
                    entry.insert("Value".to_string(), value);
                    Value::Map(entry)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, Pseudo};
    use crate::values;
    use serde_json::json;

    #[test]
    fn test_tags_replace_same_key() {
        let tags = Tags::new().with("Name", "a").with("Name", "b");
        assert_eq!(tags.len(), 1);
        assert!(!tags.is_empty());
        assert_eq!(tags.get("Name").and_then(Value::as_str), Some("b"));
    }

    #[test]
    fn test_tags_sorted_by_key() {
        let tags = Tags::new()
            .with("Name", Expr::join(" ", values![Pseudo::StackName, "Logs"]))
            .with("Managed", "Wimpy");

        assert_eq!(
            Value::from(tags).render(),
            json!([
                {"Key": "Managed", "Value": "Wimpy"},
                {"Key": "Name", "Value": {"Fn::Join": [" ", [{"Ref": "AWS::StackName"}, "Logs"]]}}
            ])
        );
    }
}
