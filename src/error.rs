//! Issue/error vocabulary: located validation failures.
use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

// ———————————————————————————————————————————————————————————————————————————
// PATHS
// ———————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the data tree, root first.
///
/// Paths are values: descending into a child produces a new path via
/// [`Path::join`], so sibling branches never see each other's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self { PathSegment::Key(key.to_owned()) }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self { PathSegment::Key(key) }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self { PathSegment::Index(index) }
}

impl Path {
    pub fn root() -> Self { Self::default() }

    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Path(segments)
    }

    pub fn segments(&self) -> &[PathSegment] { &self.0 }
    pub fn is_root(&self) -> bool { self.0.is_empty() }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

/// `$`, `$.user`, `$.tags[0]`, `$["odd key"]`
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.0 {
            match seg {
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Key(k) if is_plain_key(k) => write!(f, ".{k}")?,
                PathSegment::Key(k) => write!(f, "[{}]", quote_key(k))?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(k: &str) -> bool {
    let mut chars = k.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// JSON string literal, as in issue messages.
fn quote_key(k: &str) -> String {
    serde_json::to_string(k).unwrap_or_else(|_| format!("{k:?}"))
}

// ———————————————————————————————————————————————————————————————————————————
// ISSUES
// ———————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: Path,
    pub message: String,
    /// What the schema wanted (`"string"`, `literal "a"`, `refinement`, ...).
    pub expected: String,
    /// Runtime kind actually found.
    pub received: String,
}

impl ValidationIssue {
    /// Structural mismatch at `path`: message carries path, expectation, and
    /// the offending value rendered as JSON.
    pub fn mismatch(path: &Path, expected: impl Into<String>, data: &Value) -> Self {
        let expected = expected.into();
        let received = data.kind().to_string();
        let message = format!("Expected {expected} at {path}, received {received}: {data}");
        ValidationIssue { path: path.clone(), message, expected, received }
    }

    pub fn refinement(path: &Path, message: impl Into<String>, data: &Value) -> Self {
        ValidationIssue {
            path: path.clone(),
            message: message.into(),
            expected: "refinement".to_owned(),
            received: data.kind().to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// One or more issues from a single failed parse. Never empty.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

impl ValidationError {
    pub fn new(issue: ValidationIssue) -> Self {
        ValidationError { issues: vec![issue] }
    }

    /// `None` for an empty list; an error always has something to say.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Option<Self> {
        if issues.is_empty() { None } else { Some(ValidationError { issues }) }
    }

    pub fn issues(&self) -> &[ValidationIssue] { &self.issues }

    pub fn into_issues(self) -> Vec<ValidationIssue> { self.issues }

    /// Append `other`'s issues after ours, keeping order.
    pub fn merge(mut self, other: ValidationError) -> Self {
        self.issues.extend(other.issues);
        self
    }

    pub fn first(&self) -> &ValidationIssue {
        // non-empty by construction
        &self.issues[0]
    }
}

// ———————————————————————————————————————————————————————————————————————————
// RESULTS
// ———————————————————————————————————————————————————————————————————————————

/// Outcome of `safe_parse`: never an `Err`, always one of the two branches.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Success(Value),
    Failure(ValidationError),
}

impl ParseResult {
    pub fn is_success(&self) -> bool { matches!(self, ParseResult::Success(_)) }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ParseResult::Success(v) => Some(v),
            ParseResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ParseResult::Success(_) => None,
            ParseResult::Failure(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self {
            ParseResult::Success(v) => Ok(v),
            ParseResult::Failure(e) => Err(e),
        }
    }
}

impl From<Result<Value, ValidationError>> for ParseResult {
    fn from(result: Result<Value, ValidationError>) -> Self {
        match result {
            Ok(v) => ParseResult::Success(v),
            Err(e) => ParseResult::Failure(e),
        }
    }
}

/// `{"success": true, "data": ...}` / `{"success": false, "error": {...}}`
impl Serialize for ParseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("ParseResult", 2)?;
        match self {
            ParseResult::Success(data) => {
                st.serialize_field("success", &true)?;
                st.serialize_field("data", data)?;
            }
            ParseResult::Failure(error) => {
                st.serialize_field("success", &false)?;
                st.serialize_field("error", error)?;
            }
        }
        st.end()
    }
}

/// Failure of `Schema::parse_as`: either validation itself or mapping the
/// validated value onto the caller's Rust type.
#[derive(Debug, Error)]
pub enum TypedParseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("validated value does not fit the target type at {path}: {message}")]
    Decode { path: String, message: String },
}

// ———————————————————————————————————————————————————————————————————————————
// TESTS
// ———————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_leaves_parent_untouched() {
        let parent = Path::root().join("users");
        let a = parent.join(0usize);
        let b = parent.join("count");
        assert_eq!(parent.segments().len(), 1);
        assert_eq!(a.to_string(), "$.users[0]");
        assert_eq!(b.to_string(), "$.users.count");
        assert_eq!(Path::root().join("odd key").to_string(), r#"$["odd key"]"#);
    }

    #[test]
    fn quoted_keys_use_json_escapes() {
        assert_eq!(Path::root().join("a\u{1}b").to_string(), r#"$["a\u0001b"]"#);
        assert_eq!(Path::root().join("say \"hi\"").to_string(), r#"$["say \"hi\""]"#);
        assert_eq!(Path::root().join("café").join(0usize).to_string(), "$.café[0]");
    }

    #[test]
    fn path_serializes_as_mixed_array() {
        let path: Path = [PathSegment::from("a"), PathSegment::from(2usize)].into_iter().collect();
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["a", 2]));
    }

    #[test]
    fn mismatch_message_carries_context() {
        let issue = ValidationIssue::mismatch(&Path::root().join("age"), "number", &Value::from("ten"));
        assert_eq!(issue.expected, "number");
        assert_eq!(issue.received, "string");
        assert_eq!(issue.message, r#"Expected number at $.age, received string: "ten""#);
    }

    #[test]
    fn empty_issue_lists_are_not_errors() {
        assert!(ValidationError::from_issues(Vec::new()).is_none());
    }

    #[test]
    fn parse_result_serializes_tagged() {
        let ok = ParseResult::Success(Value::from(1));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true, "data": 1}));

        let issue = ValidationIssue::refinement(&Path::root(), "too small", &Value::from(1));
        let err = ParseResult::Failure(ValidationError::new(issue));
        let out = serde_json::to_value(&err).unwrap();
        assert_eq!(out["success"], json!(false));
        assert_eq!(out["error"]["issues"][0]["message"], json!("too small"));
        assert_eq!(out["error"]["issues"][0]["path"], json!([]));
    }
}
