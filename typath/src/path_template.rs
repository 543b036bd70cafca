use crate::error::TemplateError;

type Result<T> = std::result::Result<T, TemplateError>;

/// Parsed `:name` path template.
///
/// Segments are kept exactly as produced by splitting the template on `/`
/// (including the empty segment before leading slash), so that they line up
/// index-by-index with segments of a matched URL path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
    idents: Vec<String>,
}

impl PathTemplate {
    /// Parse path template, validating capture tokens.
    pub fn new(expr: impl Into<String>) -> Result<Self> {
        let raw = expr.into();
        let mut segments = vec![];
        let mut idents: Vec<String> = vec![];

        for (idx, seg) in raw.split('/').enumerate() {
            match seg.strip_prefix(':') {
                Some("") => return Err(TemplateError::EmptyCapture(idx)),
                Some(ident) => {
                    let ident = assert_ident(ident)?;

                    if idents.iter().any(|existing| existing == ident) {
                        return Err(TemplateError::DuplicateCapture(ident.to_owned()));
                    }

                    idents.push(ident.to_owned());
                    segments.push(Segment::Capture(ident.to_owned()));
                }
                None => segments.push(Segment::Static(seg.to_owned())),
            }
        }

        Ok(Self {
            raw,
            segments,
            idents,
        })
    }

    /// Template, as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get slash-separated segments of parsed template.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get idents of capture variables, in order of appearance.
    pub fn idents(&self) -> &[String] {
        &self.idents
    }

    /// Check, if template contains dynamic captures
    pub fn has_captures(&self) -> bool {
        !self.idents.is_empty()
    }
}

impl std::fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A segment of path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal segment, compared case-insensitively when resolving.
    Static(String),
    /// A `:name` segment, that should be substituted for a value
    /// (contains the name without colon).
    Capture(String),
}

fn is_valid_ident(ident: &str) -> bool {
    ident.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn assert_ident(ident: &str) -> Result<&str> {
    if is_valid_ident(ident) {
        Ok(ident)
    } else {
        Err(TemplateError::InvalidIdent(ident.to_owned()))
    }
}
