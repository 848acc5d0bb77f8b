//! Schema combinators.
//!
//! A [`Schema`] is a tree of variant nodes (one closed [`SchemaKind`] per node)
//! plus an append-only list of refinements. Parsing walks the schema tree and
//! the data tree in lockstep, carrying the current [`Path`]:
//!
//! - structural check first (kind/shape of the value, recursing into children),
//! - then the node's refinements, in the order they were added.
//!
//! Arrays and objects stop at the first failing child. Unions are the one
//! place that aggregates: if every member fails, all members' issues are
//! reported, in member order.
//!
//! Schemas are built once and reused. Refinements must be attached before the
//! first parse; after that a schema is shared read-only (it is `Send + Sync`).
pub mod literal;
mod primitive;
mod array;
mod object;
mod union;
mod modifier;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::error::{ParseResult, Path, TypedParseError, ValidationError, ValidationIssue};
use crate::value::{Kind, Value};

pub use literal::{Literal, SchemaEnum};

/// Ordered field name → field schema mapping of an object schema.
pub type Shape = IndexMap<String, Schema>;

/// Message used by [`Schema::refine_default`].
pub const DEFAULT_REFINEMENT_MESSAGE: &str = "Invalid value";

// ------------------------------- Types ----------------------------------- //

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// User predicate run after structural validation succeeds.
#[derive(Clone)]
pub struct Refinement {
    predicate: Predicate,
    message: String,
}

#[derive(Debug, Clone)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Date,
    Array(Box<Schema>),
    Object(Shape),
    Literal(Literal),
    Enum(Vec<Literal>),
    /// Non-empty; tried in order, first success wins.
    Union(Vec<Schema>),
    /// Accepts [`Value::Undefined`] without consulting the inner schema.
    Optional(Box<Schema>),
    /// Accepts [`Value::Null`] without consulting the inner schema.
    Nullable(Box<Schema>),
}

#[derive(Debug, Clone)]
pub struct Schema {
    kind: SchemaKind,
    refinements: Vec<Refinement>,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement").field("message", &self.message).finish_non_exhaustive()
    }
}

impl Refinement {
    pub fn message(&self) -> &str { &self.message }
}

impl SchemaKind {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Array(_) => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Union(_) => "union",
            SchemaKind::Optional(_) => "optional",
            SchemaKind::Nullable(_) => "nullable",
        }
    }
}

// ----------------------------- Factories --------------------------------- //

pub fn string() -> Schema { Schema::new(SchemaKind::String) }
pub fn number() -> Schema { Schema::new(SchemaKind::Number) }
pub fn boolean() -> Schema { Schema::new(SchemaKind::Boolean) }
pub fn date() -> Schema { Schema::new(SchemaKind::Date) }

pub fn array(element: Schema) -> Schema {
    Schema::new(SchemaKind::Array(Box::new(element)))
}

/// Fields are validated in the order given here.
pub fn object<K, I>(shape: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    let shape: Shape = shape.into_iter().map(|(k, s)| (k.into(), s)).collect();
    Schema::new(SchemaKind::Object(shape))
}

pub fn literal(value: impl Into<Literal>) -> Schema {
    Schema::new(SchemaKind::Literal(value.into()))
}

/// # Panics
/// With no members: an empty union can never succeed, so this is a
/// construction bug rather than a validation outcome.
pub fn union(members: impl IntoIterator<Item = Schema>) -> Schema {
    let members: Vec<Schema> = members.into_iter().collect();
    assert!(!members.is_empty(), "union() needs at least one member schema");
    Schema::new(SchemaKind::Union(members))
}

/// Membership in a closed set of literal values.
pub fn enumeration<L: Into<Literal>>(values: impl IntoIterator<Item = L>) -> Schema {
    Schema::new(SchemaKind::Enum(values.into_iter().map(Into::into).collect()))
}

/// Membership in the value set of a Rust enum type.
pub fn native_enum<E: SchemaEnum>() -> Schema {
    enumeration(E::values())
}

// ------------------------------ Contract --------------------------------- //

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Schema { kind, refinements: Vec::new() }
    }

    pub fn kind(&self) -> &SchemaKind { &self.kind }

    pub fn refinements(&self) -> &[Refinement] { &self.refinements }

    /// Whether a missing value (absent key) can pass this schema.
    pub fn accepts_absent(&self) -> bool {
        match &self.kind {
            SchemaKind::Optional(_) => true,
            SchemaKind::Nullable(inner) => inner.accepts_absent(),
            SchemaKind::Union(members) => members.iter().any(Schema::accepts_absent),
            _ => false,
        }
    }

    /// New wrapper accepting the absent sentinel; `self` is left as is.
    pub fn optional(&self) -> Schema {
        Schema::new(SchemaKind::Optional(Box::new(self.clone())))
    }

    /// New wrapper accepting null; `self` is left as is.
    pub fn nullable(&self) -> Schema {
        Schema::new(SchemaKind::Nullable(Box::new(self.clone())))
    }

    /// Append a refinement and hand the same schema back for chaining.
    pub fn refine<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refinements.push(Refinement {
            predicate: Arc::new(predicate),
            message: message.into(),
        });
        self
    }

    pub fn refine_default<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refine(predicate, DEFAULT_REFINEMENT_MESSAGE)
    }

    pub fn parse(&self, data: &Value) -> Result<Value, ValidationError> {
        tracing::trace!(schema = self.kind.name(), "parse");
        self.parse_at(&Path::root(), data)
    }

    /// Like [`Schema::parse`] but folds validation failures into the result.
    /// Panics (programming errors) are not intercepted.
    pub fn safe_parse(&self, data: &Value) -> ParseResult {
        self.parse(data).into()
    }

    /// Validate, then decode the validated value into `T` via serde.
    pub fn parse_as<T: DeserializeOwned>(&self, data: &Value) -> Result<T, TypedParseError> {
        let value = self.parse(data)?;
        serde_path_to_error::deserialize(value.to_json()).map_err(|err| {
            let path = err.path().to_string();
            TypedParseError::Decode { path, message: err.into_inner().to_string() }
        })
    }

    /// Recursion step used by composite schemas: structure, then this
    /// node's refinements, with `path` locating `data` from the root.
    pub fn parse_at(&self, path: &Path, data: &Value) -> Result<Value, ValidationError> {
        let out = self.parse_structure(path, data)?;
        self.check_refinements(path, &out)?;
        Ok(out)
    }

    fn parse_structure(&self, path: &Path, data: &Value) -> Result<Value, ValidationError> {
        match &self.kind {
            SchemaKind::String => primitive::parse_primitive(Kind::String, path, data),
            SchemaKind::Number => primitive::parse_primitive(Kind::Number, path, data),
            SchemaKind::Boolean => primitive::parse_primitive(Kind::Boolean, path, data),
            SchemaKind::Date => primitive::parse_primitive(Kind::Date, path, data),
            SchemaKind::Array(element) => array::parse_array(element, path, data),
            SchemaKind::Object(shape) => object::parse_object(shape, path, data),
            SchemaKind::Literal(lit) => literal::parse_literal(lit, path, data),
            SchemaKind::Enum(values) => literal::parse_enum(values, path, data),
            SchemaKind::Union(members) => union::parse_union(members, path, data),
            SchemaKind::Optional(inner) => modifier::parse_optional(inner, path, data),
            SchemaKind::Nullable(inner) => modifier::parse_nullable(inner, path, data),
        }
    }

    /// First failing predicate wins; later ones are not evaluated.
    fn check_refinements(&self, path: &Path, value: &Value) -> Result<(), ValidationError> {
        for refinement in &self.refinements {
            if !(refinement.predicate)(value) {
                tracing::debug!(%path, message = %refinement.message, "refinement rejected value");
                let issue = ValidationIssue::refinement(path, &refinement.message, value);
                return Err(ValidationError::new(issue));
            }
        }
        Ok(())
    }
}

// ------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value { Value::from(json) }

    #[test]
    fn refinements_run_in_order_and_stop_at_first_failure() {
        let schema = number()
            .refine(|_| false, "A")
            .refine(|_| panic!("second refinement must not run"), "B");
        let err = schema.parse(&v(json!(1))).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.first().message, "A");
        assert_eq!(err.first().expected, "refinement");
    }

    #[test]
    fn refinements_only_see_structurally_valid_values() {
        let schema = string().refine(|v| v.as_str().is_some_and(|s| s.len() > 2), "too short");
        let err = schema.parse(&v(json!(12))).unwrap_err();
        assert_eq!(err.first().expected, "string");
        assert_eq!(schema.parse(&v(json!("ab"))).unwrap_err().first().message, "too short");
        assert_eq!(schema.parse(&v(json!("abc"))).unwrap(), v(json!("abc")));
    }

    #[test]
    fn refine_default_uses_generic_message() {
        let err = boolean().refine_default(|v| v.as_bool() == Some(true)).parse(&v(json!(false))).unwrap_err();
        assert_eq!(err.first().message, DEFAULT_REFINEMENT_MESSAGE);
    }

    #[test]
    fn wrappers_leave_original_usable() {
        let base = string();
        let opt = base.optional();
        assert!(opt.parse(&Value::Undefined).is_ok());
        assert!(base.parse(&Value::Undefined).is_err());
        assert!(matches!(base.kind(), SchemaKind::String));
    }

    #[test]
    fn safe_parse_mirrors_parse() {
        let schema = number();
        assert_eq!(schema.safe_parse(&v(json!(2))), ParseResult::Success(v(json!(2))));
        let failed = schema.safe_parse(&v(json!("2")));
        assert!(!failed.is_success());
        assert_eq!(failed.error().unwrap().first().received, "string");
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn safe_parse_does_not_swallow_panics() {
        let schema = number().refine(|_| panic!("boom"), "unused");
        let _ = schema.safe_parse(&v(json!(1)));
    }

    #[test]
    #[should_panic(expected = "at least one member")]
    fn empty_union_is_a_construction_bug() {
        let _ = union(Vec::new());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
        age: Option<u32>,
    }

    #[test]
    fn parse_as_decodes_validated_output() {
        let schema = object([("name", string()), ("age", number().optional())]);
        let user: User = schema.parse_as(&v(json!({"name": "ada", "extra": true}))).unwrap();
        assert_eq!(user, User { name: "ada".into(), age: None });
    }

    #[test]
    fn parse_as_reports_decode_path() {
        let schema = object([("name", string()), ("age", number())]);
        let err = schema.parse_as::<User>(&v(json!({"name": "ada", "age": -1.5}))).unwrap_err();
        match err {
            TypedParseError::Decode { path, .. } => assert_eq!(path, "age"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn schemas_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
