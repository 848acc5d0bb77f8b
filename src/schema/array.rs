//! Element-wise array validation.
use crate::error::{Path, ValidationError, ValidationIssue};
use crate::value::Value;

use super::Schema;

/// Stops at the first failing element; later elements are never looked at.
pub(super) fn parse_array(
    element: &Schema,
    path: &Path,
    data: &Value,
) -> Result<Value, ValidationError> {
    let Value::Array(items) = data else {
        return Err(ValidationError::new(ValidationIssue::mismatch(path, "array", data)));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| element.parse_at(&path.join(index), item))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use crate::error::PathSegment;
    use crate::schema::{array, number, string};
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn fails_fast_on_first_bad_element() {
        let err = array(number()).parse(&Value::from(json!([1, "x", "y"]))).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.first().path.segments(), [PathSegment::Index(1)]);
    }

    #[test]
    fn later_elements_are_not_evaluated() {
        let guarded = number().refine(|v| v.as_f64() != Some(3.0), "three");
        let err = array(guarded).parse(&Value::from(json!([1, "x", 3]))).unwrap_err();
        assert_eq!(err.first().expected, "number");
    }

    #[test]
    fn output_preserves_order_and_length() {
        let out = array(string().nullable()).parse(&Value::from(json!(["a", null, "b"]))).unwrap();
        assert_eq!(out, Value::from(json!(["a", null, "b"])));
        assert_eq!(array(number()).parse(&Value::from(json!([]))).unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn rejects_non_arrays() {
        let err = array(number()).parse(&Value::from(json!({"0": 1}))).unwrap_err();
        assert_eq!(err.first().expected, "array");
        assert_eq!(err.first().received, "object");
    }
}
