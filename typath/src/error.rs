use crate::query_key::KeyPath;
use crate::shape::ShapeKind;
use std::fmt::Display;

/// Result type for typed (serde-backed) entry points of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error type for parsing `:name` path templates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Segment consisted of a bare `:` without a name.
    #[error("capture token at segment {0} has no name")]
    EmptyCapture(usize),
    /// Capture name contained characters other than `[A-Za-z0-9_]`.
    #[error("capture name `{0}` should only contain word characters")]
    InvalidIdent(String),
    /// The same capture name occured more than once in template.
    #[error("capture `{0}` is declared more than once")]
    DuplicateCapture(String),
}

/// An error type for building [`crate::PathDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Template declares a capture the params shape knows nothing about.
    #[error("capture `{0}` has no matching field in params shape")]
    UnknownCapture(String),
}

/// Single violation found while parsing a value against a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location of offending value, relative to the validated mapping.
    pub path: KeyPath,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field was absent.
    Required,
    /// Value had a different type, than shape declares.
    InvalidType {
        expected: ShapeKind,
        received: &'static str,
    },
    /// Index-keyed mapping couldn't be assembled into an array
    /// (index isn't a number or indices have gaps).
    InvalidIndex(String),
}

impl Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() {
            "<root>".to_owned()
        } else {
            self.path.to_string()
        };

        match &self.kind {
            IssueKind::Required => write!(f, "{path}: required"),
            IssueKind::InvalidType { expected, received } => {
                write!(f, "{path}: expected {expected}, received {received}")
            }
            IssueKind::InvalidIndex(index) => {
                write!(f, "{path}: invalid or missing array index `{index}`")
            }
        }
    }
}

/// Raised when an assembled value does not conform to its shape.
///
/// Enumerates every offending field, not only the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} validation issue(s)", self.issues.len())?;

        for (idx, issue) in self.issues.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Umbrella error for typed entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Converting between caller types and JSON values failed.
    #[error("value conversion failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Params or query value didn't serialize into a JSON object.
    #[error("{0} should serialize into a map-like value")]
    NotAnObject(&'static str),
}
