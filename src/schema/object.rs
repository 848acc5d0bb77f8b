//! Keyed validation over a fixed shape. Undeclared keys never make it into the
//! output.
use indexmap::IndexMap;

use crate::error::{Path, ValidationError, ValidationIssue};
use crate::value::{UNDEFINED, Value};

use super::Shape;

/// Fields are checked in shape order; the first failing field ends the parse.
pub(super) fn parse_object(
    shape: &Shape,
    path: &Path,
    data: &Value,
) -> Result<Value, ValidationError> {
    let Value::Object(input) = data else {
        return Err(ValidationError::new(ValidationIssue::mismatch(path, "object", data)));
    };
    let mut out = IndexMap::with_capacity(shape.len());
    for (key, field) in shape {
        let value = input.get(key).unwrap_or(&UNDEFINED);
        let parsed = field.parse_at(&path.join(key.as_str()), value)?;
        out.insert(key.clone(), parsed);
    }
    Ok(Value::Object(out))
}
