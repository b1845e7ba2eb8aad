//! The template document builder.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value as Json};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::format::OutputFormat;
use crate::models::{MappingTable, Output, Parameter, Resource};

/// Format version stamped on every template this workspace produces.
pub const DEFAULT_FORMAT_VERSION: &str = "2010-09-09";

/// The independently-keyed declaration categories of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Mapping,
    Parameter,
    Resource,
    Output,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mapping => "mapping",
            Category::Parameter => "parameter",
            Category::Resource => "resource",
            Category::Output => "output",
        }
    }

    /// Top-level document key holding this category.
    pub fn section(&self) -> &'static str {
        match self {
            Category::Mapping => "Mappings",
            Category::Parameter => "Parameters",
            Category::Resource => "Resources",
            Category::Output => "Outputs",
        }
    }

    /// Maximum number of declarations the provisioning service accepts.
    pub fn limit(&self) -> usize {
        match self {
            Category::Mapping => 200,
            Category::Parameter => 200,
            Category::Resource => 500,
            Category::Output => 200,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn logical_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap())
}

fn insert_unique<T>(
    entries: &mut IndexMap<String, T>,
    category: Category,
    name: String,
    item: T,
) -> TemplateResult<()> {
    if !logical_name_pattern().is_match(&name) {
        return Err(TemplateError::InvalidName { category, name });
    }
    if entries.contains_key(&name) {
        return Err(TemplateError::DuplicateName { category, name });
    }
    if entries.len() >= category.limit() {
        return Err(TemplateError::LimitExceeded {
            category,
            limit: category.limit(),
        });
    }

    debug!("Adding {} {}", category, name);
    entries.insert(name, item);
    Ok(())
}

/// Append-only container for one template document.
///
/// Declarations keep their insertion order, which makes rendering
/// deterministic. Nothing is validated beyond name uniqueness and shape;
/// references between declarations are emitted symbolically.
#[derive(Debug, Clone, Default)]
pub struct Template {
    version: Option<String>,
    description: Option<String>,
    mappings: IndexMap<String, MappingTable>,
    parameters: IndexMap<String, Parameter>,
    resources: IndexMap<String, Resource>,
    outputs: IndexMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> TemplateResult<()> {
        let name = parameter.name.clone();
        insert_unique(&mut self.parameters, Category::Parameter, name, parameter)
    }

    pub fn add_mapping(&mut self, name: impl Into<String>, table: MappingTable) -> TemplateResult<()> {
        insert_unique(&mut self.mappings, Category::Mapping, name.into(), table)
    }

    pub fn add_resource(&mut self, resource: Resource) -> TemplateResult<()> {
        let name = resource.name.clone();
        insert_unique(&mut self.resources, Category::Resource, name, resource)
    }

    pub fn add_output(&mut self, output: Output) -> TemplateResult<()> {
        let name = output.name.clone();
        insert_unique(&mut self.outputs, Category::Output, name, output)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&str, &MappingTable)> {
        self.mappings.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Output> {
        self.outputs.values()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn mapping(&self, name: &str) -> Option<&MappingTable> {
        self.mappings.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    /// Number of declarations in a category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Mapping => self.mappings.len(),
            Category::Parameter => self.parameters.len(),
            Category::Resource => self.resources.len(),
            Category::Output => self.outputs.len(),
        }
    }

    /// Build the document object. Unset scalars and empty categories are omitted.
    pub fn render(&self) -> Json {
        let mut doc = Map::new();

        if let Some(version) = &self.version {
            doc.insert("AWSTemplateFormatVersion".to_string(), Json::from(version.as_str()));
        }
        if let Some(description) = &self.description {
            doc.insert("Description".to_string(), Json::from(description.as_str()));
        }

        insert_section(&mut doc, Category::Mapping, &self.mappings, MappingTable::render);
        insert_section(&mut doc, Category::Parameter, &self.parameters, Parameter::render);
        insert_section(&mut doc, Category::Resource, &self.resources, Resource::render);
        insert_section(&mut doc, Category::Output, &self.outputs, Output::render);

        Json::Object(doc)
    }

    /// Four-space indented JSON, the layout the provisioning tooling expects.
    pub fn to_json(&self) -> TemplateResult<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.render().serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn to_yaml(&self) -> TemplateResult<String> {
        Ok(serde_yaml::to_string(&self.render())?)
    }

    pub fn to_string_as(&self, format: OutputFormat) -> TemplateResult<String> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Yaml => self.to_yaml(),
        }
    }
}

fn insert_section<T>(
    doc: &mut Map<String, Json>,
    category: Category,
    entries: &IndexMap<String, T>,
    render: impl Fn(&T) -> Json,
) {
    if entries.is_empty() {
        return;
    }
    let section = entries
        .iter()
        .map(|(name, item)| (name.clone(), render(item)))
        .collect();
    doc.insert(category.section().to_string(), Json::Object(section));
}
