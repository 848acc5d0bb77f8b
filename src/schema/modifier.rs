//! Sentinel-permitting wrappers.
use crate::error::{Path, ValidationError};
use crate::value::Value;

use super::Schema;

/// Absent passes straight through; the inner schema (and its refinements)
/// never sees it.
pub(super) fn parse_optional(inner: &Schema, path: &Path, data: &Value) -> Result<Value, ValidationError> {
    match data {
        Value::Undefined => Ok(Value::Undefined),
        _ => inner.parse_at(path, data),
    }
}

pub(super) fn parse_nullable(inner: &Schema, path: &Path, data: &Value) -> Result<Value, ValidationError> {
    match data {
        Value::Null => Ok(Value::Null),
        _ => inner.parse_at(path, data),
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::string;
    use crate::value::Value;

    #[test]
    fn sentinels_are_independent() {
        assert!(string().optional().parse(&Value::Null).is_err());
        assert!(string().nullable().parse(&Value::Undefined).is_err());

        let both = string().optional().nullable();
        assert_eq!(both.parse(&Value::Null).unwrap(), Value::Null);
        assert_eq!(both.parse(&Value::Undefined).unwrap(), Value::Undefined);
        assert_eq!(both.parse(&Value::from("s")).unwrap(), Value::from("s"));
    }

    #[test]
    fn sentinel_skips_inner_refinements() {
        let schema = string().refine(|_| false, "inner").optional();
        assert!(schema.parse(&Value::Undefined).is_ok());
        assert_eq!(schema.parse(&Value::from("x")).unwrap_err().first().message, "inner");
    }

    #[test]
    fn wrapper_refinements_see_the_sentinel() {
        let schema = string().nullable().refine(|v| !v.is_null(), "null not allowed here");
        assert_eq!(schema.parse(&Value::Null).unwrap_err().first().message, "null not allowed here");
    }
}
