//! First-match-wins alternatives.
use crate::error::{Path, ValidationError, ValidationIssue};
use crate::value::Value;

use super::Schema;

/// Members are tried in order against the same value and path. When all of
/// them fail, every member's issues are returned, in member order.
pub(super) fn parse_union(members: &[Schema], path: &Path, data: &Value) -> Result<Value, ValidationError> {
    let mut failures: Option<ValidationError> = None;
    for (branch, member) in members.iter().enumerate() {
        match member.parse_at(path, data) {
            Ok(out) => return Ok(out),
            Err(err) => {
                tracing::debug!(%path, branch, issues = err.issues().len(), "union branch rejected");
                failures = Some(match failures {
                    None => err,
                    Some(acc) => acc.merge(err),
                });
            }
        }
    }
    // `union()` refuses empty member lists; this only guards hand-built kinds
    Err(failures.unwrap_or_else(|| ValidationError::new(ValidationIssue::mismatch(path, "union", data))))
}
