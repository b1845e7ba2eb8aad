//! Deferred-reference expressions (CloudFormation intrinsic functions).

use serde_json::{json, Value as Json};

use crate::value::Value;

/// A value resolved by the provisioning service, not at build time.
///
/// Expressions are built bottom-up as plain trees, so they can never be
/// self-referential and rendering always terminates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `{"Ref": name}`: a parameter, a resource or a pseudo-parameter.
    Ref(String),
    /// `{"Fn::GetAtt": [resource, attribute]}`.
    GetAtt { resource: String, attribute: String },
    /// `{"Fn::Join": [delimiter, [values...]]}`.
    Join { delimiter: String, values: Vec<Value> },
    /// `{"Fn::FindInMap": [mapping, top_key, second_key]}`.
    FindInMap {
        mapping: String,
        top_key: Box<Value>,
        second_key: String,
    },
}

impl Expr {
    pub fn reference(name: impl Into<String>) -> Self {
        Expr::Ref(name.into())
    }

    pub fn get_att(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Expr::GetAtt {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, values: Vec<Value>) -> Self {
        Expr::Join {
            delimiter: delimiter.into(),
            values,
        }
    }

    pub fn find_in_map(
        mapping: impl Into<String>,
        top_key: impl Into<Value>,
        second_key: impl Into<String>,
    ) -> Self {
        Expr::FindInMap {
            mapping: mapping.into(),
            top_key: Box::new(top_key.into()),
            second_key: second_key.into(),
        }
    }

    /// Render to the one-key intrinsic-function object.
    pub fn render(&self) -> Json {
        match self {
            Expr::Ref(name) => json!({ "Ref": name }),
            Expr::GetAtt { resource, attribute } => json!({ "Fn::GetAtt": [resource, attribute] }),
            Expr::Join { delimiter, values } => {
                let values: Vec<Json> = values.iter().map(Value::render).collect();
                json!({ "Fn::Join": [delimiter, values] })
            }
            Expr::FindInMap {
                mapping,
                top_key,
                second_key,
            } => json!({ "Fn::FindInMap": [mapping, top_key.render(), second_key] }),
        }
    }
}

/// Values the provisioning service supplies on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pseudo {
    AccountId,
    NotificationArns,
    NoValue,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl Pseudo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pseudo::AccountId => "AWS::AccountId",
            Pseudo::NotificationArns => "AWS::NotificationARNs",
            Pseudo::NoValue => "AWS::NoValue",
            Pseudo::Partition => "AWS::Partition",
            Pseudo::Region => "AWS::Region",
            Pseudo::StackId => "AWS::StackId",
            Pseudo::StackName => "AWS::StackName",
            Pseudo::UrlSuffix => "AWS::URLSuffix",
        }
    }
}

impl std::fmt::Display for Pseudo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Pseudo> for Expr {
    fn from(pseudo: Pseudo) -> Self {
        Expr::Ref(pseudo.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    #[test]
    fn test_reference() {
        assert_eq!(Expr::reference("VPC").render(), json!({"Ref": "VPC"}));
    }

    #[test]
    fn test_pseudo_reference() {
        assert_eq!(
            Expr::from(Pseudo::AccountId).render(),
            json!({"Ref": "AWS::AccountId"})
        );
        assert_eq!(Pseudo::UrlSuffix.to_string(), "AWS::URLSuffix");
    }

    #[test]
    fn test_get_att() {
        assert_eq!(
            Expr::get_att("CloudTrailLogs", "Arn").render(),
            json!({"Fn::GetAtt": ["CloudTrailLogs", "Arn"]})
        );
    }

    #[test]
    fn test_join_renders_nested_references_in_order() {
        let expr = Expr::join(
            "-",
            values![Expr::reference("Environment"), Expr::reference("AppName"), "elb"],
        );

        assert_eq!(
            expr.render(),
            json!({
                "Fn::Join": ["-", [{"Ref": "Environment"}, {"Ref": "AppName"}, "elb"]]
            })
        );
    }

    #[test]
    fn test_join_of_joins() {
        let registry = Expr::join(
            ".",
            values![Pseudo::AccountId, "dkr.ecr", Pseudo::Region, "amazonaws.com"],
        );
        let expr = Expr::join("/", values![registry, Expr::reference("ECRRepository")]);

        assert_eq!(
            expr.render(),
            json!({
                "Fn::Join": ["/", [
                    {"Fn::Join": [".", [
                        {"Ref": "AWS::AccountId"},
                        "dkr.ecr",
                        {"Ref": "AWS::Region"},
                        "amazonaws.com"
                    ]]},
                    {"Ref": "ECRRepository"}
                ]]
            })
        );
    }

    #[test]
    fn test_find_in_map() {
        let expr = Expr::find_in_map("Principals", Pseudo::Region, "ELB");
        assert_eq!(
            expr.render(),
            json!({"Fn::FindInMap": ["Principals", {"Ref": "AWS::Region"}, "ELB"]})
        );
    }
}
