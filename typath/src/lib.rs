//! Typed URL path templates.
//!
//! A [`PathDefinition`] couples a `:name` path template with shapes of its
//! params and query. It is used in both directions:
//!
//! * [`serialize`] writes structured values into URL, flattening nested
//!   query values into PHP-style bracketed keys (`key[sub][0]=v`);
//! * [`resolve`] reads URL back, matching path segments, unflattening query
//!   keys, coercing numeric leaves and validating result against the shapes.
//!
//! ```
//! use serde_json::json;
//! use typath::{define_path, resolve, serialize, ObjectShape, PathOptions, PathValues, Shape};
//!
//! let path = define_path(
//!     "/users/:id",
//!     PathOptions::new()
//!         .params(ObjectShape::new().field("id", Shape::Number))
//!         .query(ObjectShape::new().optional("tags", Shape::array(Shape::String))),
//! )?;
//!
//! let url = serialize(
//!     &path,
//!     &PathValues::new()
//!         .with_params(&json!({ "id": 42 }))?
//!         .with_query(&json!({ "tags": ["a", "b"] }))?,
//! );
//! assert_eq!(url, "/users/42?tags[0]=a&tags[1]=b");
//!
//! let resolved = resolve(&path, &url)?;
//! assert_eq!(resolved.params.matched().map(serde_json::Value::Object), Some(json!({ "id": 42 })));
//! # Ok::<(), typath::Error>(())
//! ```

mod definition;
pub mod error;
pub mod path_serializer;
pub mod path_template;
pub mod query_key;
pub mod resolver;
pub mod shape;

pub use definition::{PathDefinition, PathDefinitionBuilder, PathOptions, SegmentMatching};
pub use error::{DefinitionError, Error, Issue, IssueKind, Result, TemplateError, ValidationError};
pub use path_serializer::{serialize, serialize_typed, PathValues};
pub use path_template::{PathTemplate, Segment};
pub use query_key::KeyPath;
pub use resolver::{
    resolve, resolve_path_params, resolve_query_params, resolve_typed, ParamsMatch, Resolved,
};
pub use shape::{Field, ObjectShape, Shape, ShapeKind};

/// Define path from template and shapes of its params and query.
///
/// Shorthand for [`PathDefinition::new`].
pub fn define_path(
    template: &str,
    options: PathOptions,
) -> std::result::Result<PathDefinition, DefinitionError> {
    PathDefinition::new(template, options)
}
