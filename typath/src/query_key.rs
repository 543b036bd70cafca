//! Bracket-nested query keys (`key[sub][0]`) and the tree walk shared
//! by query serialization and resolution.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt::Display;

/// Characters escaped in query keys and values.
///
/// Brackets are escaped inside key pieces so that only the delimiters,
/// written by [`KeyPath::encode`], are left raw. [`KeyPath::parse_encoded`]
/// splits on raw delimiters before decoding, so such pieces survive.
pub(crate) const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Sequence of keys addressing a value inside nested mapping.
///
/// `nested[deeply][deeper]` corresponds to `["nested", "deeply", "deeper"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    pieces: Vec<String>,
}

impl KeyPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat query key, splitting it on `[` and `]`.
    ///
    /// Empty pieces are dropped, so `a[]`, `a[][b]` and `[a]` are treated
    /// as `a`, `a[b]` and `a` respectively.
    pub fn parse(raw: &str) -> Self {
        let pieces = raw
            .split(['[', ']'])
            .filter(|piece| !piece.is_empty())
            .map(str::to_owned)
            .collect();

        Self { pieces }
    }

    /// Parse percent-encoded wire key, as written by [`KeyPath::encode`].
    ///
    /// Key is split on raw `[` and `]` first, and only then each piece is
    /// form-decoded, so escaped brackets stay part of their piece.
    pub fn parse_encoded(raw: &str) -> Self {
        let pieces = raw
            .split(['[', ']'])
            .filter(|piece| !piece.is_empty())
            .map(|piece| decode_component(piece).into_owned())
            .collect();

        Self { pieces }
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn push(&mut self, piece: impl Into<String>) {
        self.pieces.push(piece.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.pieces.pop()
    }

    /// Keep only first `len` pieces.
    pub fn truncate(&mut self, len: usize) {
        self.pieces.truncate(len);
    }

    /// Percent-encoded wire form of this path, ready to be used as query key.
    pub fn encode(&self) -> String {
        let mut output = String::new();

        for (idx, piece) in self.pieces.iter().enumerate() {
            let piece = utf8_percent_encode(piece, QUERY_COMPONENT);

            if idx == 0 {
                output.extend(piece);
            } else {
                output.push('[');
                output.extend(piece);
                output.push(']');
            }
        }

        output
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, piece) in self.pieces.iter().enumerate() {
            if idx == 0 {
                write!(f, "{piece}")?;
            } else {
                write!(f, "[{piece}]")?;
            }
        }

        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            pieces: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Form-decode a single query component: `+` is a space, then `%XX` escapes.
pub(crate) fn decode_component(raw: &str) -> Cow<'_, str> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(raw).decode_utf8_lossy()
    }
}

/// Split raw query string into `(key, value)` pairs.
///
/// Keys are parsed with [`KeyPath::parse_encoded`], values are form-decoded.
/// Empty pairs are skipped, and a pair without `=` has an empty value.
pub(crate) fn form_pairs(query: &str) -> impl Iterator<Item = (KeyPath, Cow<'_, str>)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (KeyPath::parse_encoded(key), decode_component(value))
        })
}

/// Walk nested mapping depth-first, calling `emit` for every scalar leaf
/// together with its full key path.
///
/// Arrays are walked as mappings keyed by stringified indices. `null` leaves
/// and empty containers produce no calls.
pub(crate) fn flatten<'v>(
    root: &'v Map<String, Value>,
    mut emit: impl FnMut(&KeyPath, &'v Value),
) {
    let mut path = KeyPath::new();
    walk_map(root, &mut path, &mut emit);
}

fn walk_map<'v>(
    map: &'v Map<String, Value>,
    path: &mut KeyPath,
    emit: &mut impl FnMut(&KeyPath, &'v Value),
) {
    for (key, value) in map {
        path.push(key.as_str());
        walk_value(value, path, emit);
        path.pop();
    }
}

fn walk_value<'v>(
    value: &'v Value,
    path: &mut KeyPath,
    emit: &mut impl FnMut(&KeyPath, &'v Value),
) {
    match value {
        Value::Null => {}
        Value::Object(map) => walk_map(map, path, emit),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                path.push(idx.to_string());
                walk_value(item, path, emit);
                path.pop();
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => emit(path, value),
    }
}

/// Store `leaf` at `path` inside `root`, creating intermediate mappings
/// on first visit.
///
/// An intermediate key already holding a non-mapping value is replaced with
/// an empty mapping. The leaf itself overwrites whatever was stored before.
pub(crate) fn insert(root: &mut Map<String, Value>, path: &KeyPath, leaf: Value) {
    let Some((last, parents)) = path.pieces().split_last() else {
        return;
    };

    let mut current = root;

    for key in parents {
        let entry = current
            .entry(key.as_str())
            .or_insert_with(|| Value::Object(Map::new()));

        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }

    current.insert(last.clone(), leaf);
}
