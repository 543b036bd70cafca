use crate::error::DefinitionError;
use crate::path_template::PathTemplate;
use crate::shape::ObjectShape;

/// Shapes of values, carried by [`PathDefinition`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathOptions {
    pub params: Option<ObjectShape>,
    pub query: Option<ObjectShape>,
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, shape: ObjectShape) -> Self {
        self.params = Some(shape);
        self
    }

    pub fn query(mut self, shape: ObjectShape) -> Self {
        self.query = Some(shape);
        self
    }
}

/// How URL path segments past the end of template are treated when resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentMatching {
    /// Extra trailing URL segments are ignored, so `/test/1/extra`
    /// still matches `/test/:id`.
    #[default]
    Lenient,
    /// URL path must have exactly as many segments as template.
    Exact,
}

/// Path template together with shapes of its params and query.
///
/// Immutable once built and freely shareable between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDefinition {
    template: PathTemplate,
    params: Option<ObjectShape>,
    query: Option<ObjectShape>,
    segment_matching: SegmentMatching,
}

impl PathDefinition {
    /// Define path with default [`SegmentMatching`].
    ///
    /// Fails, if template is malformed or declares a capture,
    /// missing from params shape.
    pub fn new(template: &str, options: PathOptions) -> Result<Self, DefinitionError> {
        Self::builder(template).options(options).build()
    }

    pub fn builder(template: &str) -> PathDefinitionBuilder {
        PathDefinitionBuilder {
            template: template.to_owned(),
            options: PathOptions::default(),
            segment_matching: SegmentMatching::default(),
        }
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn params_shape(&self) -> Option<&ObjectShape> {
        self.params.as_ref()
    }

    pub fn query_shape(&self) -> Option<&ObjectShape> {
        self.query.as_ref()
    }

    pub fn segment_matching(&self) -> SegmentMatching {
        self.segment_matching
    }
}

/// Builder for [`PathDefinition`].
#[derive(Debug, Clone)]
pub struct PathDefinitionBuilder {
    template: String,
    options: PathOptions,
    segment_matching: SegmentMatching,
}

impl PathDefinitionBuilder {
    pub fn params(mut self, shape: ObjectShape) -> Self {
        self.options.params = Some(shape);
        self
    }

    pub fn query(mut self, shape: ObjectShape) -> Self {
        self.options.query = Some(shape);
        self
    }

    pub fn options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    pub fn segment_matching(mut self, matching: SegmentMatching) -> Self {
        self.segment_matching = matching;
        self
    }

    pub fn build(self) -> Result<PathDefinition, DefinitionError> {
        let template = PathTemplate::new(self.template)?;

        if let Some(params) = &self.options.params {
            if let Some(ident) = template.idents().iter().find(|id| !params.contains(id)) {
                return Err(DefinitionError::UnknownCapture(ident.clone()));
            }
        }

        Ok(PathDefinition {
            template,
            params: self.options.params,
            query: self.options.query,
            segment_matching: self.segment_matching,
        })
    }
}
