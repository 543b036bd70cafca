//! Resolution of URLs back into structured values.

use crate::definition::{PathDefinition, SegmentMatching};
use crate::error::{Result, ValidationError};
use crate::path_template::Segment;
use crate::query_key;
use crate::shape::Shape;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use tracing::{debug, trace};
use url::Url;

/// Outcome of matching URL path against template.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsMatch<T = Map<String, Value>> {
    /// Definition declares no params shape, so params weren't looked for.
    Undeclared,
    /// URL doesn't correspond to template.
    NoMatch,
    /// URL matched and captured values passed validation.
    Matched(T),
}

impl<T> ParamsMatch<T> {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Matched params, if any.
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(params) => Some(params),
            Self::Undeclared | Self::NoMatch => None,
        }
    }

    pub fn as_ref(&self) -> ParamsMatch<&T> {
        match self {
            Self::Undeclared => ParamsMatch::Undeclared,
            Self::NoMatch => ParamsMatch::NoMatch,
            Self::Matched(params) => ParamsMatch::Matched(params),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParamsMatch<U> {
        match self {
            Self::Undeclared => ParamsMatch::Undeclared,
            Self::NoMatch => ParamsMatch::NoMatch,
            Self::Matched(params) => ParamsMatch::Matched(f(params)),
        }
    }
}

/// Params and query, resolved from a single URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<P = Map<String, Value>, Q = Map<String, Value>> {
    pub params: ParamsMatch<P>,
    /// `None`, if definition declares no query shape.
    pub query: Option<Q>,
}

impl Resolved {
    /// Deserialize validated params and query into caller types.
    pub fn into_typed<P, Q>(self) -> Result<Resolved<P, Q>>
    where
        P: DeserializeOwned,
        Q: DeserializeOwned,
    {
        let params = match self.params {
            ParamsMatch::Undeclared => ParamsMatch::Undeclared,
            ParamsMatch::NoMatch => ParamsMatch::NoMatch,
            ParamsMatch::Matched(params) => {
                ParamsMatch::Matched(serde_json::from_value(Value::Object(params))?)
            }
        };

        let query = self
            .query
            .map(|query| serde_json::from_value(Value::Object(query)))
            .transpose()?;

        Ok(Resolved { params, query })
    }
}

/// Resolve both params and query of `url`.
///
/// Query is resolved even if path didn't match template.
pub fn resolve(
    definition: &PathDefinition,
    url: &str,
) -> std::result::Result<Resolved, ValidationError> {
    let params = resolve_path_params(definition, url)?;
    let query = resolve_query_params(definition, url)?;

    Ok(Resolved { params, query })
}

/// Same as [`resolve`], deserializing results into caller types.
pub fn resolve_typed<P, Q>(definition: &PathDefinition, url: &str) -> Result<Resolved<P, Q>>
where
    P: DeserializeOwned,
    Q: DeserializeOwned,
{
    resolve(definition, url)?.into_typed()
}

/// Match path of `url` against template, collecting captures.
///
/// `url` is either a path, starting with `/`, or an absolute URL.
/// Literal segments are compared case-insensitively, captured values are
/// percent-decoded and coerced to numbers, where params shape expects one.
///
/// # Errors
///
/// Fails, if captured values do not conform to params shape.
pub fn resolve_path_params(
    definition: &PathDefinition,
    url: &str,
) -> std::result::Result<ParamsMatch, ValidationError> {
    let Some(shape) = definition.params_shape() else {
        return Ok(ParamsMatch::Undeclared);
    };

    trace!(template = %definition.template(), url, "resolving path params");

    let path = extract_path(url);
    let url_segments: Vec<&str> = path.split('/').collect();
    let template_segments = definition.template().segments();

    if definition.segment_matching() == SegmentMatching::Exact
        && url_segments.len() != template_segments.len()
    {
        debug!(
            expected = template_segments.len(),
            actual = url_segments.len(),
            "segment count mismatch"
        );
        return Ok(ParamsMatch::NoMatch);
    }

    let mut params = Map::new();

    for (idx, segment) in template_segments.iter().enumerate() {
        let url_segment = url_segments.get(idx).copied().unwrap_or_default();

        match segment {
            Segment::Capture(ident) => {
                if url_segment.is_empty() {
                    debug!(segment = idx, capture = %ident, "missing capture value");
                    return Ok(ParamsMatch::NoMatch);
                }

                let raw = percent_decode_str(url_segment).decode_utf8_lossy();
                params.insert(ident.clone(), coerce(&raw, shape.get(ident)));
            }
            Segment::Static(literal) => {
                if !eq_ignore_case(literal, url_segment) {
                    debug!(
                        segment = idx,
                        expected = %literal,
                        actual = url_segment,
                        "literal segment mismatch"
                    );
                    return Ok(ParamsMatch::NoMatch);
                }
            }
        }
    }

    shape
        .parse(Value::Object(params))
        .map(ParamsMatch::Matched)
        .inspect_err(|err| debug!(issues = err.issues().len(), "path params failed validation"))
}

/// Unflatten bracketed query keys of `url` into nested mapping.
///
/// `url` is an absolute URL, a path with optional query, or a raw query string.
/// Returns `None`, if definition declares no query shape.
///
/// # Errors
///
/// Fails, if assembled query does not conform to query shape.
pub fn resolve_query_params(
    definition: &PathDefinition,
    url: &str,
) -> std::result::Result<Option<Map<String, Value>>, ValidationError> {
    let Some(shape) = definition.query_shape() else {
        return Ok(None);
    };

    trace!(url, "resolving query params");

    let query = extract_query(url);
    let mut result = Map::new();

    for (mut path, value) in query_key::form_pairs(&query) {
        if path.is_empty() {
            continue;
        }

        // Pieces past the first undeclared one can't change validation outcome,
        // so nesting is bounded by shape depth rather than by the key.
        let depth = shape.resolved_depth(&path);
        if depth < path.len() {
            path.truncate(depth + 1);
        }

        let leaf = coerce(&value, shape.lookup(&path));
        query_key::insert(&mut result, &path, leaf);
    }

    shape
        .parse(Value::Object(result))
        .map(Some)
        .inspect_err(|err| debug!(issues = err.issues().len(), "query params failed validation"))
}

/// Raw string leaf to value, expected by `shape`.
///
/// Only numeric shapes are coerced, and only if `raw` is a finite number.
/// Everything else is left as string for validation to deal with.
fn coerce(raw: &str, shape: Option<&Shape>) -> Value {
    match shape {
        Some(Shape::Number) => {
            parse_number(raw).map_or_else(|| Value::String(raw.to_owned()), Value::Number)
        }
        Some(Shape::String | Shape::Boolean | Shape::Object(_) | Shape::Array(_)) | None => {
            Value::String(raw.to_owned())
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let raw = raw.trim();

    if let Ok(int) = raw.parse::<i64>() {
        return Some(int.into());
    }

    if let Ok(uint) = raw.parse::<u64>() {
        return Some(uint.into());
    }

    raw.parse::<f64>()
        .ok()
        .filter(|float| float.is_finite())
        .and_then(Number::from_f64)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Path component of `url`.
///
/// Paths are used as is (minus query and fragment), absolute URLs are parsed,
/// and anything else yields an empty path.
fn extract_path(url: &str) -> Cow<'_, str> {
    if url.starts_with('/') {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        return Cow::Borrowed(&url[..end]);
    }

    match Url::parse(url) {
        Ok(parsed) => Cow::Owned(parsed.path().to_owned()),
        Err(err) => {
            debug!(url, error = %err, "not an absolute url, treating path as empty");
            Cow::Borrowed("")
        }
    }
}

/// Query component of `url`, without leading `?`.
///
/// Absolute URLs are parsed, paths contribute whatever follows `?`,
/// and anything else is treated as raw query string.
fn extract_query(url: &str) -> Cow<'_, str> {
    if url.starts_with('/') {
        let query = url.split_once('?').map_or("", |(_, query)| query);
        let query = query.split_once('#').map_or(query, |(query, _)| query);

        return Cow::Borrowed(query);
    }

    match Url::parse(url) {
        Ok(parsed) => Cow::Owned(parsed.query().unwrap_or_default().to_owned()),
        Err(_) => {
            let raw = url.strip_prefix('?').unwrap_or(url);
            Cow::Borrowed(raw.split_once('#').map_or(raw, |(query, _)| query))
        }
    }
}
