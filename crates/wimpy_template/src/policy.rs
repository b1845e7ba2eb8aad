//! IAM policy documents.
//!
//! Bucket policies, key policies and role policies all share the same
//! statement shape; these builders convert into [`Value`] so they can be
//! dropped straight into a resource's property bag.

use indexmap::IndexMap;

use crate::value::Value;

/// Policy language version used by every document that declares one.
pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// Who a statement applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// `{"Service": ...}`, a service principal or a list of them.
    Service(Value),
    /// `{"AWS": ...}`, an account, ARN, `"*"` or a list of them.
    Aws(Value),
}

impl Principal {
    pub fn service(value: impl Into<Value>) -> Self {
        Principal::Service(value.into())
    }

    pub fn aws(value: impl Into<Value>) -> Self {
        Principal::Aws(value.into())
    }
}

impl From<Principal> for Value {
    fn from(principal: Principal) -> Self {
        let (key, value) = match principal {
            Principal::Service(value) => ("Service", value),
            Principal::Aws(value) => ("AWS", value),
        };
        let mut entries = IndexMap::new();
        entries.insert(key.to_string(), value);
        Value::Map(entries)
    }
}

/// Condition block grouped by operator, e.g. `StringEquals`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition(IndexMap<String, IndexMap<String, Value>>);

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.0
            .entry(operator.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        Value::Map(
            condition
                .0
                .into_iter()
                .map(|(operator, keys)| (operator, Value::Map(keys)))
                .collect(),
        )
    }
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sid: Option<String>,
    pub effect: Effect,
    pub principal: Option<Principal>,
    pub action: Option<Value>,
    pub resource: Option<Value>,
    pub condition: Option<Condition>,
}

impl Statement {
    pub fn new(effect: Effect) -> Self {
        Self {
            sid: None,
            effect,
            principal: None,
            action: None,
            resource: None,
            condition: None,
        }
    }

    pub fn allow() -> Self {
        Self::new(Effect::Allow)
    }

    pub fn deny() -> Self {
        Self::new(Effect::Deny)
    }

    pub fn sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn action(mut self, action: impl Into<Value>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<Value>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

impl From<Statement> for Value {
    fn from(statement: Statement) -> Self {
        let mut entries = IndexMap::new();
        if let Some(sid) = statement.sid {
            entries.insert("Sid".to_string(), Value::String(sid));
        }
        entries.insert(
            "Effect".to_string(),
            Value::from(statement.effect.as_str()),
        );
        if let Some(principal) = statement.principal {
            entries.insert("Principal".to_string(), principal.into());
        }
        if let Some(action) = statement.action {
            entries.insert("Action".to_string(), action);
        }
        if let Some(resource) = statement.resource {
            entries.insert("Resource".to_string(), resource);
        }
        if let Some(condition) = statement.condition {
            entries.insert("Condition".to_string(), condition.into());
        }
        Value::Map(entries)
    }
}

/// A policy document: optional version plus ordered statements.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDocument {
    pub version: Option<String>,
    pub statements: Vec<Statement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyDocument {
    /// Document carrying the current policy language version.
    pub fn new() -> Self {
        Self {
            version: Some(POLICY_VERSION.to_string()),
            statements: Vec::new(),
        }
    }

    /// Document without a `Version` key, as trust policies are usually written.
    pub fn unversioned() -> Self {
        Self {
            version: None,
            statements: Vec::new(),
        }
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }
}

impl From<PolicyDocument> for Value {
    fn from(document: PolicyDocument) -> Self {
        let mut entries = IndexMap::new();
        if let Some(version) = document.version {
            entries.insert("Version".to_string(), Value::String(version));
        }
        entries.insert(
            "Statement".to_string(),
            Value::List(document.statements.into_iter().map(Value::from).collect()),
        );
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Expr, Pseudo};
    use crate::values;
    use serde_json::json;

    #[test]
    fn test_trust_policy_has_no_version() {
        let document = PolicyDocument::unversioned().statement(
            Statement::allow()
                .action(vec!["sts:AssumeRole"])
                .principal(Principal::service("ec2.amazonaws.com")),
        );

        assert_eq!(
            Value::from(document).render(),
            json!({
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": {"Service": "ec2.amazonaws.com"},
                    "Action": ["sts:AssumeRole"]
                }]
            })
        );
    }

    #[test]
    fn test_statement_with_condition() {
        let statement = Statement::allow()
            .sid("AWSCloudTrailWrite")
            .principal(Principal::service("cloudtrail.amazonaws.com"))
            .action("s3:PutObject")
            .resource(Expr::join("", values!["arn:aws:s3:::", Expr::reference("LogBucket")]))
            .condition(
                Condition::new()
                    .with("StringEquals", "s3:x-amz-acl", "bucket-owner-full-control")
                    .with("StringEquals", "kms:CallerAccount", Pseudo::AccountId)
                    .with("StringLike", "kms:ViaService", "ec2.*"),
            );

        let rendered = Value::from(statement).render();
        assert_eq!(rendered["Sid"], json!("AWSCloudTrailWrite"));
        assert_eq!(
            rendered["Condition"],
            json!({
                "StringEquals": {
                    "s3:x-amz-acl": "bucket-owner-full-control",
                    "kms:CallerAccount": {"Ref": "AWS::AccountId"}
                },
                "StringLike": {"kms:ViaService": "ec2.*"}
            })
        );
    }

    #[test]
    fn test_document_version() {
        let rendered = Value::from(PolicyDocument::new().statement(Statement::deny())).render();
        assert_eq!(rendered["Version"], json!(POLICY_VERSION));
        assert_eq!(rendered["Statement"][0]["Effect"], json!("Deny"));
    }
}
