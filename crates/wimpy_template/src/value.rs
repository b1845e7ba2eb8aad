//! Property values: literals mixed with deferred-reference expressions.

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::expr::{Expr, Pseudo};

/// A value inside a resource property bag, an output or a mapping.
///
/// Literals are emitted as-is; [`Expr`] nodes stay symbolic until the
/// provisioning service evaluates the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Expr(Expr),
}

impl Value {
    /// Render into the document's JSON shape.
    pub fn render(&self) -> Json {
        match self {
            Value::String(s) => Json::String(s.clone()),
            Value::Int(n) => Json::from(*n),
            Value::Bool(b) => Json::Bool(*b),
            Value::List(items) => Json::Array(items.iter().map(Value::render).collect()),
            Value::Map(entries) => Json::Object(render_entries(entries)),
            Value::Expr(expr) => expr.render(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}

pub(crate) fn render_entries(entries: &IndexMap<String, Value>) -> Map<String, Json> {
    entries
        .iter()
        .map(|(key, value)| (key.clone(), value.render()))
        .collect()
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::Expr(expr)
    }
}

impl From<Pseudo> for Value {
    fn from(pseudo: Pseudo) -> Self {
        Value::Expr(Expr::from(pseudo))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Properties> for Value {
    fn from(props: Properties) -> Self {
        Value::Map(props.0)
    }
}

/// Build a `Vec<Value>` from heterogeneous items.
///
/// ```
/// use wimpy_template::{values, Expr, Value};
///
/// let parts: Vec<Value> = values![Expr::reference("AppName"), "elb", 80];
/// assert_eq!(parts.len(), 3);
/// ```
#[macro_export]
macro_rules! values {
    ($($item:expr),* $(,)?) => {
        vec![$($crate::Value::from($item)),*]
    };
}

/// Ordered key/value bag used for resource properties and nested objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(IndexMap<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub(crate) fn render(&self) -> Map<String, Json> {
        render_entries(&self.0)
    }
}
