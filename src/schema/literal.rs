//! Exact-value schemas: single literals and closed enumerations.
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Path, ValidationError, ValidationIssue};
use crate::value::Value;

/// A primitive constant. Matching is kind-strict: `1` never equals `"1"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Number(f64),
    String(String),
}

/// Implemented by Rust enums whose variants map onto literal values, so a
/// schema can be derived from the type's value set.
///
/// ```
/// use json_guard::{Literal, SchemaEnum, native_enum};
///
/// enum Level { Low = 0, High = 1 }
///
/// impl SchemaEnum for Level {
///     fn values() -> Vec<Literal> {
///         vec![(Level::Low as i64).into(), (Level::High as i64).into()]
///     }
/// }
///
/// let schema = native_enum::<Level>();
/// assert!(schema.parse(&1.into()).is_ok());
/// assert!(schema.parse(&2.into()).is_err());
/// ```
pub trait SchemaEnum {
    fn values() -> Vec<Literal>;
}

impl Literal {
    pub fn matches(&self, data: &Value) -> bool {
        match (self, data) {
            (Literal::Boolean(a), Value::Boolean(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a == b,
            (Literal::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Same JSON shape as the equivalent [`Value`] (integral numbers as integers).
impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self { Literal::Boolean(b) }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self { Literal::Number(n) }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self { Literal::Number(n as f64) }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self { Literal::Number(n as f64) }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self { Literal::String(s.to_owned()) }
}

impl From<String> for Literal {
    fn from(s: String) -> Self { Literal::String(s) }
}

pub(super) fn parse_literal(lit: &Literal, path: &Path, data: &Value) -> Result<Value, ValidationError> {
    if lit.matches(data) {
        Ok(data.clone())
    } else {
        Err(ValidationError::new(ValidationIssue::mismatch(path, format!("literal {lit}"), data)))
    }
}

pub(super) fn parse_enum(values: &[Literal], path: &Path, data: &Value) -> Result<Value, ValidationError> {
    if values.iter().any(|lit| lit.matches(data)) {
        return Ok(data.clone());
    }
    let members = values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    Err(ValidationError::new(ValidationIssue::mismatch(path, format!("enum [{members}]"), data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{enumeration, literal, native_enum};

    #[derive(Clone, Copy)]
    enum Status {
        Active,
        Archived,
    }

    impl SchemaEnum for Status {
        fn values() -> Vec<Literal> {
            [Status::Active, Status::Archived]
                .into_iter()
                .map(|s| match s {
                    Status::Active => Literal::from("active"),
                    Status::Archived => Literal::from("archived"),
                })
                .collect()
        }
    }

    #[test]
    fn literal_is_kind_strict() {
        let one = literal(1);
        assert!(one.parse(&Value::from(1)).is_ok());
        let err = one.parse(&Value::from("1")).unwrap_err();
        assert_eq!(err.first().expected, "literal 1");
        assert_eq!(err.first().received, "string");
        assert_eq!(literal("a").parse(&Value::from("b")).unwrap_err().first().expected, r#"literal "a""#);
        assert!(literal(true).parse(&Value::from(true)).is_ok());
    }

    #[test]
    fn nan_literal_matches_nothing() {
        assert!(literal(f64::NAN).parse(&Value::Number(f64::NAN)).is_err());
    }

    #[test]
    fn ordinal_enum_membership() {
        let schema = enumeration([0, 1]);
        assert!(schema.parse(&Value::from(0)).is_ok());
        assert!(schema.parse(&Value::from(1)).is_ok());
        let err = schema.parse(&Value::from(2)).unwrap_err();
        assert_eq!(err.first().expected, "enum [0, 1]");
        assert_eq!(err.first().received, "number");
    }

    #[test]
    fn string_enum_from_rust_type() {
        let schema = native_enum::<Status>();
        assert!(schema.parse(&Value::from("archived")).is_ok());
        let err = schema.parse(&Value::from("deleted")).unwrap_err();
        assert_eq!(err.first().expected, r#"enum ["active", "archived"]"#);
    }
}
