//! Declarative schema documents.
//!
//! Closures can't live in a file, so the CLI (and anyone else loading schemas
//! from config) describes them as JSON instead. A descriptor is tagged by
//! `"type"`; constraint keywords (`minLength`, `minimum`, `pattern`, ...) are
//! lowered into ordinary refinements, so the result is a plain [`Schema`].
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "name": { "type": "string", "minLength": 1 },
//!     "role": { "type": "enum", "values": ["admin", "user"], "optional": true }
//!   }
//! }
//! ```
use indexmap::IndexMap;
use regex::Regex;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Map;
use thiserror::Error;

use crate::error::Path;
use crate::schema::{self, Literal, Schema};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct Descriptor {
    pub node: Node,
    pub optional: bool,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub enum Node {
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
        integer: bool,
    },
    Boolean,
    Date,
    Array {
        items: Box<Descriptor>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: IndexMap<String, Descriptor>,
    },
    Literal {
        value: Literal,
    },
    Enum {
        values: Vec<Literal>,
    },
    Union {
        any_of: Vec<Descriptor>,
    },
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("invalid schema descriptor at {path}: {message}")]
    Syntax { path: Path, message: String },
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("union needs at least one member")]
    EmptyUnion,
}

const NODE_TYPES: &str = "string, number, boolean, date, array, object, literal, enum, union";

// Keyword sets, one per node type. Children stay raw JSON so they can be
// read with their own path; unknown keywords are errors, never ignored.

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct StringKeys {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberKeys {
    minimum: Option<f64>,
    maximum: Option<f64>,
    #[serde(default)]
    integer: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoKeys {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct ArrayKeys {
    items: serde_json::Value,
    min_items: Option<usize>,
    max_items: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectKeys {
    properties: IndexMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LiteralKeys {
    value: Literal,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumKeys {
    values: Vec<Literal>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct UnionKeys {
    any_of: Vec<serde_json::Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

fn syntax(path: Path, message: impl Into<String>) -> DescriptorError {
    DescriptorError::Syntax { path, message: message.into() }
}

/// Deserialize `value` (found at `at`), reporting failures with the full
/// path: `at` plus whatever serde_path_to_error tracked inside `value`.
fn keys_at<T: DeserializeOwned>(at: &Path, value: serde_json::Value) -> Result<T, DescriptorError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let mut path = at.clone();
        for seg in err.path().iter() {
            path = match seg {
                serde_path_to_error::Segment::Map { key } => path.join(key.as_str()),
                serde_path_to_error::Segment::Seq { index } => path.join(*index),
                _ => continue,
            };
        }
        syntax(path, err.into_inner().to_string())
    })
}

fn read_node(at: &Path, value: serde_json::Value) -> Result<Descriptor, DescriptorError> {
    let serde_json::Value::Object(mut map) = value else {
        return Err(syntax(at.clone(), "expected a descriptor object"));
    };
    let ty = match map.remove("type") {
        Some(serde_json::Value::String(ty)) => ty,
        Some(_) => return Err(syntax(at.join("type"), "`type` must be a string")),
        None => return Err(syntax(at.clone(), "missing `type`")),
    };
    let optional = read_flag(at, &mut map, "optional")?;
    let nullable = read_flag(at, &mut map, "nullable")?;
    let rest = serde_json::Value::Object(map);

    let node = match ty.as_str() {
        "string" => {
            let k: StringKeys = keys_at(at, rest)?;
            Node::String { min_length: k.min_length, max_length: k.max_length, pattern: k.pattern }
        }
        "number" => {
            let k: NumberKeys = keys_at(at, rest)?;
            Node::Number { minimum: k.minimum, maximum: k.maximum, integer: k.integer }
        }
        "boolean" => {
            keys_at::<NoKeys>(at, rest)?;
            Node::Boolean
        }
        "date" => {
            keys_at::<NoKeys>(at, rest)?;
            Node::Date
        }
        "array" => {
            let k: ArrayKeys = keys_at(at, rest)?;
            let items = read_node(&at.join("items"), k.items)?;
            Node::Array { items: Box::new(items), min_items: k.min_items, max_items: k.max_items }
        }
        "object" => {
            let k: ObjectKeys = keys_at(at, rest)?;
            let props_at = at.join("properties");
            let properties = k
                .properties
                .into_iter()
                .map(|(name, field)| read_node(&props_at.join(name.as_str()), field).map(|d| (name, d)))
                .collect::<Result<IndexMap<_, _>, _>>()?;
            Node::Object { properties }
        }
        "literal" => {
            let k: LiteralKeys = keys_at(at, rest)?;
            Node::Literal { value: k.value }
        }
        "enum" => {
            let k: EnumKeys = keys_at(at, rest)?;
            Node::Enum { values: k.values }
        }
        "union" => {
            let k: UnionKeys = keys_at(at, rest)?;
            let members_at = at.join("anyOf");
            let any_of = k
                .any_of
                .into_iter()
                .enumerate()
                .map(|(i, member)| read_node(&members_at.join(i), member))
                .collect::<Result<Vec<_>, _>>()?;
            Node::Union { any_of }
        }
        other => {
            return Err(syntax(
                at.join("type"),
                format!("unknown descriptor type `{other}`, expected one of {NODE_TYPES}"),
            ));
        }
    };
    Ok(Descriptor { node, optional, nullable })
}

fn read_flag(at: &Path, map: &mut Map<String, serde_json::Value>, key: &str) -> Result<bool, DescriptorError> {
    match map.remove(key) {
        None => Ok(false),
        Some(serde_json::Value::Bool(b)) => Ok(b),
        Some(_) => Err(syntax(at.join(key), format!("`{key}` must be a boolean"))),
    }
}

impl Descriptor {
    pub fn from_str(src: &str) -> Result<Self, DescriptorError> {
        let doc = serde_json::from_str(src).map_err(|err| syntax(Path::root(), err.to_string()))?;
        Self::from_json(doc)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let doc = serde_json::from_slice(bytes).map_err(|err| syntax(Path::root(), err.to_string()))?;
        Self::from_json(doc)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, DescriptorError> {
        read_node(&Path::root(), value)
    }

    /// Lower into a schema tree. Fails only on bad regexes and empty unions.
    pub fn build(&self) -> Result<Schema, DescriptorError> {
        let mut out = self.node.build()?;
        if self.optional {
            out = out.optional();
        }
        if self.nullable {
            out = out.nullable();
        }
        Ok(out)
    }
}

/// For embedding descriptors in larger config documents.
impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = serde_json::Value::deserialize(deserializer)?;
        Descriptor::from_json(doc).map_err(D::Error::custom)
    }
}

impl Schema {
    /// Parse a descriptor document and build it in one go.
    pub fn from_descriptor(src: &str) -> Result<Schema, DescriptorError> {
        Descriptor::from_str(src)?.build()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOWERING
// ————————————————————————————————————————————————————————————————————————————

fn str_len(v: &Value) -> usize {
    v.as_str().map(|s| s.chars().count()).unwrap_or(0)
}

fn arr_len(v: &Value) -> usize {
    v.as_array().map(<[Value]>::len).unwrap_or(0)
}

fn num(v: &Value) -> f64 {
    v.as_f64().unwrap_or(f64::NAN)
}

impl Node {
    fn build(&self) -> Result<Schema, DescriptorError> {
        let out = match self {
            Node::String { min_length, max_length, pattern } => {
                let mut s = schema::string();
                if let Some(min) = *min_length {
                    s = s.refine(move |v| str_len(v) >= min, format!("must be at least {min} characters"));
                }
                if let Some(max) = *max_length {
                    s = s.refine(move |v| str_len(v) <= max, format!("must be at most {max} characters"));
                }
                if let Some(pattern) = pattern {
                    let rx = Regex::new(pattern).map_err(|source| DescriptorError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })?;
                    s = s.refine(
                        move |v| v.as_str().is_some_and(|x| rx.is_match(x)),
                        format!("must match pattern {pattern}"),
                    );
                }
                s
            }
            Node::Number { minimum, maximum, integer } => {
                let mut s = schema::number();
                if *integer {
                    s = s.refine(|v| num(v).fract() == 0.0, "must be an integer");
                }
                if let Some(min) = *minimum {
                    s = s.refine(move |v| num(v) >= min, format!("must be >= {min}"));
                }
                if let Some(max) = *maximum {
                    s = s.refine(move |v| num(v) <= max, format!("must be <= {max}"));
                }
                s
            }
            Node::Boolean => schema::boolean(),
            Node::Date => schema::date(),
            Node::Array { items, min_items, max_items } => {
                let mut s = schema::array(items.build()?);
                if let Some(min) = *min_items {
                    s = s.refine(move |v| arr_len(v) >= min, format!("must contain at least {min} items"));
                }
                if let Some(max) = *max_items {
                    s = s.refine(move |v| arr_len(v) <= max, format!("must contain at most {max} items"));
                }
                s
            }
            Node::Object { properties } => {
                let fields = properties
                    .iter()
                    .map(|(name, field)| field.build().map(|s| (name.clone(), s)))
                    .collect::<Result<Vec<_>, DescriptorError>>()?;
                schema::object(fields)
            }
            Node::Literal { value } => schema::literal(value.clone()),
            Node::Enum { values } => schema::enumeration(values.iter().cloned()),
            Node::Union { any_of } => {
                if any_of.is_empty() {
                    return Err(DescriptorError::EmptyUnion);
                }
                let members = any_of.iter().map(Descriptor::build).collect::<Result<Vec<_>, _>>()?;
                schema::union(members)
            }
        };
        Ok(out)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
