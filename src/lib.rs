//! Schema combinators for validating untrusted, dynamically-typed data.
//!
//! Build a schema tree once, then `parse` values against it:
//!
//! ```
//! use json_guard::{Value, array, number, object, string};
//! use serde_json::json;
//!
//! let user = object([
//!     ("name", string().refine(|v| v.as_str().is_some_and(|s| !s.is_empty()), "name is empty")),
//!     ("scores", array(number())),
//!     ("nickname", string().optional()),
//! ]);
//!
//! let out = user.parse(&Value::from(json!({"name": "ada", "scores": [1, 2], "admin": true}))).unwrap();
//! assert_eq!(out.to_json(), json!({"name": "ada", "scores": [1, 2]}));
//!
//! let err = user.parse(&Value::from(json!({"name": "ada", "scores": [1, "2"]}))).unwrap_err();
//! assert_eq!(err.first().path.to_string(), "$.scores[1]");
//! ```
pub mod value;
pub mod error;
pub mod schema;
pub mod describe;
pub mod descriptor;

pub use error::{ParseResult, Path, PathSegment, TypedParseError, ValidationError, ValidationIssue};
pub use schema::{
    Literal, Schema, SchemaEnum, SchemaKind, Shape, array, boolean, date, enumeration, literal,
    native_enum, number, object, string, union,
};
pub use descriptor::{Descriptor, DescriptorError};
pub use value::{Kind, Value};
