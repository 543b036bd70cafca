use crate::definition::PathDefinition;
use crate::error::{Error, Result};
use crate::path_template::Segment;
use crate::query_key::{self, QUERY_COMPONENT};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Characters escaped in substituted path segments.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Structured values to be written into URL.
///
/// ```
/// use serde_json::json;
/// use typath::PathValues;
///
/// let values = PathValues::new()
///     .with_params(&json!({ "id": 1 }))?
///     .with_query(&json!({ "page": 2 }))?;
///
/// assert!(values.params.is_some() && values.query.is_some());
/// # Ok::<(), typath::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathValues {
    pub params: Option<Map<String, Value>>,
    pub query: Option<Map<String, Value>>,
}

impl PathValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set params from any serializable, map-like value.
    pub fn with_params<P: serde::Serialize + ?Sized>(mut self, params: &P) -> Result<Self> {
        self.params = Some(to_map(params, "params")?);
        Ok(self)
    }

    /// Set query from any serializable, map-like value.
    pub fn with_query<Q: serde::Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        self.query = Some(to_map(query, "query")?);
        Ok(self)
    }

    pub fn params_map(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn query_map(mut self, query: Map<String, Value>) -> Self {
        self.query = Some(query);
        self
    }
}

fn to_map<T: serde::Serialize + ?Sized>(
    value: &T,
    section: &'static str,
) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject(section)),
    }
}

/// Write `values` into URL, described by `definition`.
///
/// Captures of template are substituted with same-named params; a capture
/// without a param is left as is. Query, if given, is appended after `?`
/// with nested mappings and arrays flattened into bracketed keys.
/// No validation against shapes is performed.
pub fn serialize(definition: &PathDefinition, values: &PathValues) -> String {
    let mut output = match &values.params {
        Some(params) => substitute_captures(definition, params),
        None => definition.template().as_str().to_owned(),
    };

    if let Some(query) = &values.query {
        output.push('?');
        output.push_str(&serialize_query(query));
    }

    output
}

/// Same as [`serialize`], but for caller-defined params and query types.
pub fn serialize_typed<P, Q>(
    definition: &PathDefinition,
    params: Option<&P>,
    query: Option<&Q>,
) -> Result<String>
where
    P: serde::Serialize,
    Q: serde::Serialize,
{
    let mut values = PathValues::new();

    if let Some(params) = params {
        values = values.with_params(params)?;
    }

    if let Some(query) = query {
        values = values.with_query(query)?;
    }

    Ok(serialize(definition, &values))
}

fn substitute_captures(definition: &PathDefinition, params: &Map<String, Value>) -> String {
    let segments: Vec<Cow<'_, str>> = definition
        .template()
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Static(segment) => Cow::Borrowed(segment.as_str()),
            Segment::Capture(ident) => match params.get(ident) {
                Some(value) => Cow::Owned(
                    utf8_percent_encode(&scalar_string(value), PATH_SEGMENT).to_string(),
                ),
                None => Cow::Owned(format!(":{ident}")),
            },
        })
        .collect();

    segments.join("/")
}

/// Flatten query mapping into `key=value` pairs, joined with `&`.
pub(crate) fn serialize_query(query: &Map<String, Value>) -> String {
    let mut pairs = vec![];

    query_key::flatten(query, |path, value| {
        let value = scalar_string(value);
        let value = utf8_percent_encode(&value, QUERY_COMPONENT);

        pairs.push(format!("{}={value}", path.encode()));
    });

    pairs.join("&")
}

/// String form of value: strings verbatim, other scalars as their literals,
/// containers as JSON text.
fn scalar_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Value::Null => Cow::Borrowed("null"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}
