//! Shape descriptors for params and query values, and validation against them.

use crate::error::{Issue, IssueKind, ValidationError};
use crate::query_key::KeyPath;
use serde_json::{Map, Value};
use std::fmt::Display;

/// Expected shape of a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    Boolean,
    Object(ObjectShape),
    /// Array with every element conforming to inner shape.
    Array(Box<Shape>),
}

/// Tag of [`Shape`] variant, without nested data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };

        write!(f, "{name}")
    }
}

impl Shape {
    /// Shorthand for [`Shape::Array`].
    pub fn array(element: Shape) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::String => ShapeKind::String,
            Self::Number => ShapeKind::Number,
            Self::Boolean => ShapeKind::Boolean,
            Self::Object(_) => ShapeKind::Object,
            Self::Array(_) => ShapeKind::Array,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ShapeKind::Number
    }

    /// Shape of a direct child, addressed by `key`.
    ///
    /// Objects are looked up by field name, arrays by element index.
    /// Primitives have no children.
    pub fn child(&self, key: &str) -> Option<&Shape> {
        match self {
            Self::Object(object) => object.get(key),
            Self::Array(element) => key.parse::<usize>().ok().map(|_| element.as_ref()),
            Self::String | Self::Number | Self::Boolean => None,
        }
    }

    fn parse_at(&self, value: Value, path: &mut KeyPath, issues: &mut Vec<Issue>) -> Option<Value> {
        match (self, value) {
            (Self::String, value @ Value::String(_)) => Some(value),
            (Self::Number, value @ Value::Number(_)) => Some(value),
            (Self::Boolean, value @ Value::Bool(_)) => Some(value),
            (Self::Boolean, Value::String(raw)) if raw == "true" || raw == "false" => {
                Some(Value::Bool(raw == "true"))
            }
            (Self::Object(object), Value::Object(map)) => {
                object.parse_map(map, path, issues).map(Value::Object)
            }
            (Self::Array(element), Value::Array(items)) => {
                parse_items(element, items.into_iter().enumerate(), path, issues)
            }
            // Arrays assembled from bracketed query keys arrive as index-keyed maps
            (Self::Array(element), Value::Object(map)) => {
                let items = indexed_items(map, path, issues)?;
                parse_items(element, items.into_iter().enumerate(), path, issues)
            }
            (shape, value) => {
                issues.push(Issue {
                    path: path.clone(),
                    kind: IssueKind::InvalidType {
                        expected: shape.kind(),
                        received: value_kind(&value),
                    },
                });
                None
            }
        }
    }
}

fn parse_items(
    element: &Shape,
    items: impl Iterator<Item = (usize, Value)>,
    path: &mut KeyPath,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let mut output = vec![];
    let mut valid = true;

    for (idx, item) in items {
        path.push(idx.to_string());
        match element.parse_at(item, path, issues) {
            Some(item) => output.push(item),
            None => valid = false,
        }
        path.pop();
    }

    valid.then_some(Value::Array(output))
}

fn indexed_items(
    map: Map<String, Value>,
    path: &mut KeyPath,
    issues: &mut Vec<Issue>,
) -> Option<Vec<Value>> {
    let mut indexed = Vec::with_capacity(map.len());

    for (key, value) in map {
        match key.parse::<usize>() {
            Ok(idx) => indexed.push((idx, value)),
            Err(_) => {
                issues.push(Issue {
                    path: path.clone(),
                    kind: IssueKind::InvalidIndex(key),
                });
                return None;
            }
        }
    }

    indexed.sort_by_key(|(idx, _)| *idx);

    for (expected, (idx, _)) in indexed.iter().enumerate() {
        if expected != *idx {
            issues.push(Issue {
                path: path.clone(),
                kind: IssueKind::InvalidIndex(expected.to_string()),
            });
            return None;
        }
    }

    Some(indexed.into_iter().map(|(_, value)| value).collect())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single named field of [`ObjectShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    shape: Shape,
    required: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Shape of a mapping with known set of fields.
///
/// ```
/// use typath::{ObjectShape, Shape};
///
/// let shape = ObjectShape::new()
///     .field("id", Shape::Number)
///     .optional("tags", Shape::array(Shape::String));
///
/// assert!(shape.get("id").is_some_and(Shape::is_numeric));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    fields: Vec<Field>,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add required field. Redeclaring a field replaces previous declaration.
    pub fn field(self, name: impl Into<String>, shape: Shape) -> Self {
        self.with_field(name.into(), shape, true)
    }

    /// Add optional field. Redeclaring a field replaces previous declaration.
    pub fn optional(self, name: impl Into<String>, shape: Shape) -> Self {
        self.with_field(name.into(), shape, false)
    }

    fn with_field(mut self, name: String, shape: Shape, required: bool) -> Self {
        let field = Field {
            name,
            shape,
            required,
        };

        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }

        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(Field::shape)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Shape addressed by `path`, descending into nested objects and arrays.
    pub fn lookup(&self, path: &KeyPath) -> Option<&Shape> {
        let (first, rest) = path.pieces().split_first()?;

        rest.iter()
            .try_fold(self.get(first)?, |shape, key| shape.child(key))
    }

    /// Count of leading pieces of `path`, that address a declared shape.
    pub fn resolved_depth(&self, path: &KeyPath) -> usize {
        let mut pieces = path.pieces().iter();
        let Some(mut shape) = pieces.next().and_then(|first| self.get(first)) else {
            return 0;
        };
        let mut depth = 1;

        for key in pieces {
            match shape.child(key) {
                Some(child) => {
                    shape = child;
                    depth += 1;
                }
                None => break,
            }
        }

        depth
    }

    /// Validate `value` against this shape.
    ///
    /// Every violation is collected into returned [`ValidationError`].
    /// Keys, not declared by shape, are dropped from the output, and fields
    /// of output follow declaration order.
    pub fn parse(&self, value: Value) -> Result<Map<String, Value>, ValidationError> {
        let mut issues = vec![];
        let mut path = KeyPath::new();

        let parsed = match value {
            Value::Object(map) => self.parse_map(map, &mut path, &mut issues),
            value => {
                issues.push(Issue {
                    path: path.clone(),
                    kind: IssueKind::InvalidType {
                        expected: ShapeKind::Object,
                        received: value_kind(&value),
                    },
                });
                None
            }
        };

        match parsed {
            Some(map) if issues.is_empty() => Ok(map),
            _ => Err(ValidationError::new(issues)),
        }
    }

    fn parse_map(
        &self,
        mut map: Map<String, Value>,
        path: &mut KeyPath,
        issues: &mut Vec<Issue>,
    ) -> Option<Map<String, Value>> {
        let mut output = Map::new();
        let mut valid = true;

        for field in &self.fields {
            path.push(field.name.as_str());

            match map.remove(&field.name) {
                Some(value) => match field.shape.parse_at(value, path, issues) {
                    Some(value) => {
                        output.insert(field.name.clone(), value);
                    }
                    None => valid = false,
                },
                None if field.required => {
                    issues.push(Issue {
                        path: path.clone(),
                        kind: IssueKind::Required,
                    });
                    valid = false;
                }
                None => {}
            }

            path.pop();
        }

        valid.then_some(output)
    }
}

impl From<ObjectShape> for Shape {
    fn from(value: ObjectShape) -> Self {
        Self::Object(value)
    }
}
