//! Leaf checks: string, number, boolean, date.
use crate::error::{Path, ValidationError, ValidationIssue};
use crate::value::{Kind, Value};

/// One kind check; the value comes back unchanged on success.
pub(super) fn parse_primitive(
    expected: Kind,
    path: &Path,
    data: &Value,
) -> Result<Value, ValidationError> {
    let ok = match data {
        Value::Number(n) => expected == Kind::Number && !n.is_nan(),
        Value::Date(ts) => expected == Kind::Date && ts.is_some(),
        _ => data.kind() == expected,
    };
    if ok {
        Ok(data.clone())
    } else {
        Err(ValidationError::new(ValidationIssue::mismatch(path, expected.as_str(), data)))
    }
}
