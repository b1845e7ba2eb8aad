//! Declarations collected by a [`Template`](crate::Template).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::tags::Tags;
use crate::value::{render_entries, Properties, Value};

/// Declared type of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    String,
    Number,
    #[serde(rename = "List<Number>")]
    NumberList,
    CommaDelimitedList,
    /// Any other provider-specific type, emitted verbatim
    /// (e.g. `AWS::EC2::VPC::Id`).
    #[serde(untagged)]
    Other(String),
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "String",
            ParameterType::Number => "Number",
            ParameterType::NumberList => "List<Number>",
            ParameterType::CommaDelimitedList => "CommaDelimitedList",
            ParameterType::Other(name) => name,
        }
    }
}

/// A value supplied when the stack is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: ParameterType,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub allowed_values: Vec<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: None,
            default: None,
            allowed_values: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Number)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = values;
        self
    }

    pub(crate) fn render(&self) -> Json {
        let mut out = Map::new();
        out.insert("Type".to_string(), Json::from(self.param_type.as_str()));
        if let Some(description) = &self.description {
            out.insert("Description".to_string(), Json::from(description.as_str()));
        }
        if let Some(default) = &self.default {
            out.insert("Default".to_string(), default.render());
        }
        if !self.allowed_values.is_empty() {
            out.insert(
                "AllowedValues".to_string(),
                Json::Array(self.allowed_values.iter().map(Value::render).collect()),
            );
        }
        Json::Object(out)
    }
}

/// Two-level lookup table, e.g. region to account id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable(IndexMap<String, IndexMap<String, Value>>);

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        top_key: impl Into<String>,
        second_key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.0
            .entry(top_key.into())
            .or_default()
            .insert(second_key.into(), value.into());
        self
    }

    pub fn get(&self, top_key: &str, second_key: &str) -> Option<&Value> {
        self.0.get(top_key).and_then(|row| row.get(second_key))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn render(&self) -> Json {
        Json::Object(
            self.0
                .iter()
                .map(|(key, row)| (key.clone(), Json::Object(render_entries(row))))
                .collect(),
        )
    }
}

/// One declared infrastructure object.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub resource_type: String,
    pub properties: Properties,
    /// Emitted verbatim as `DependsOn`; never resolved locally.
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            properties: Properties::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn with_tags(self, tags: Tags) -> Self {
        self.with_property("Tags", tags)
    }

    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub(crate) fn render(&self) -> Json {
        let mut out = Map::new();
        out.insert("Type".to_string(), Json::from(self.resource_type.as_str()));
        if !self.properties.is_empty() {
            out.insert("Properties".to_string(), Json::Object(self.properties.render()));
        }
        if !self.depends_on.is_empty() {
            out.insert("DependsOn".to_string(), Json::from(self.depends_on.clone()));
        }
        Json::Object(out)
    }
}

/// A value exported from the stack once it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub value: Value,
    pub description: Option<String>,
}

impl Output {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn render(&self) -> Json {
        let mut out = Map::new();
        if let Some(description) = &self.description {
            out.insert("Description".to_string(), Json::from(description.as_str()));
        }
        out.insert("Value".to_string(), self.value.render());
        Json::Object(out)
    }
}
