//! JSON-Schema-flavoured view of a schema tree, for humans and tooling.
use serde_json::{Map, Value, json};

use crate::schema::{Schema, SchemaKind};

impl Schema {
    /// Render this schema roughly as JSON Schema. Refinement predicates are
    /// opaque, so only their messages are listed (under `x-refinements`).
    pub fn describe(&self) -> Value {
        let mut out = describe_kind(self.kind());
        if !self.refinements().is_empty() {
            let messages = self.refinements().iter().map(|r| Value::from(r.message())).collect();
            if let Value::Object(map) = &mut out {
                map.insert("x-refinements".into(), Value::Array(messages));
            }
        }
        out
    }
}

fn describe_kind(kind: &SchemaKind) -> Value {
    match kind {
        SchemaKind::String => json!({ "type": "string" }),
        SchemaKind::Number => json!({ "type": "number" }),
        SchemaKind::Boolean => json!({ "type": "boolean" }),
        SchemaKind::Date => json!({ "type": "string", "format": "date-time" }),

        SchemaKind::Array(element) => json!({
            "type": "array",
            "items": element.describe(),
        }),

        SchemaKind::Object(shape) => {
            let mut props = Map::new();
            let mut required = Vec::new();
            for (name, field) in shape {
                props.insert(name.clone(), field.describe());
                if !field.accepts_absent() {
                    required.push(Value::from(name.as_str()));
                }
            }
            let mut o = json!({ "type": "object", "properties": props });
            if !required.is_empty() {
                o["required"] = Value::Array(required);
            }
            o
        }

        SchemaKind::Literal(lit) => json!({ "const": lit }),
        SchemaKind::Enum(values) => json!({ "enum": values }),
        SchemaKind::Union(members) => {
            json!({ "anyOf": members.iter().map(Schema::describe).collect::<Vec<_>>() })
        }

        // absence only shows up in the parent's `required` list
        SchemaKind::Optional(inner) => inner.describe(),
        SchemaKind::Nullable(inner) => json!({ "oneOf": [inner.describe(), { "type": "null" }] }),
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{array, date, enumeration, literal, number, object, string, union};
    use serde_json::json;

    #[test]
    fn describes_nested_objects() {
        let schema = object([
            ("id", number()),
            ("name", string().optional()),
            ("tags", array(string()).nullable()),
            ("seen", date()),
        ]);
        assert_eq!(
            schema.describe(),
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "number" },
                    "name": { "type": "string" },
                    "tags": { "oneOf": [
                        { "type": "array", "items": { "type": "string" } },
                        { "type": "null" },
                    ]},
                    "seen": { "type": "string", "format": "date-time" },
                },
                "required": ["id", "tags", "seen"],
            })
        );
    }

    #[test]
    fn describes_closed_sets_and_refinements() {
        assert_eq!(literal("on").describe(), json!({ "const": "on" }));
        assert_eq!(enumeration([0, 1]).describe(), json!({ "enum": [0, 1] }));
        let described = union([string(), number()]).describe();
        assert_eq!(described["anyOf"].as_array().unwrap().len(), 2);

        let refined = number().refine(|_| true, "must be even").describe();
        assert_eq!(refined["x-refinements"], json!(["must be even"]));
    }
}
