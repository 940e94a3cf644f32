//! Data descriptions of declared shapes.
//!
//! Every decoder reports a [`Shape`]. A shape is also a decoder in its own
//! right: it checks the value and hands it back unchanged, which is useful
//! when the shape is only known at runtime or when the caller wants to keep
//! the validated JSON as-is.

use serde_json::{json, Map, Value};

use crate::decoder::{Context, Decoder, Halt};
use crate::primitives::{as_integer, same_value};

/// What a decoder accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    /// An integral number representable as `i64`.
    Integer,
    Boolean,
    Null,
    /// Anything at all.
    Unknown,
    /// Exactly this JSON value.
    Literal(Value),
    Array(Box<Shape>),
    /// `null`, an absent key, or the inner shape.
    Optional(Box<Shape>),
    /// Named fields in declaration order. Extra keys are allowed.
    Object(Vec<(String, Shape)>),
    /// An object with arbitrary keys whose values share one shape.
    Record(Box<Shape>),
    /// The first matching alternative.
    OneOf(Vec<Shape>),
    /// `base` plus a constraint only a typed decoder can check.
    Refined { base: Box<Shape>, description: String },
}

impl Shape {
    /// Name used as `expected` in decode errors.
    pub fn name(&self) -> String {
        match self {
            Shape::String => "string".to_string(),
            Shape::Number => "number".to_string(),
            Shape::Integer => "integer".to_string(),
            Shape::Boolean => "boolean".to_string(),
            Shape::Null => "null".to_string(),
            Shape::Unknown => "unknown".to_string(),
            Shape::Literal(v) => v.to_string(),
            Shape::Array(_) => "array".to_string(),
            Shape::Optional(inner) => format!("{} | null", inner.name()),
            Shape::Object(_) | Shape::Record(_) => "object".to_string(),
            Shape::OneOf(alternatives) => alternatives
                .iter()
                .map(Shape::name)
                .collect::<Vec<_>>()
                .join(" | "),
            Shape::Refined { description, .. } => description.clone(),
        }
    }

    /// JSON Schema (draft 2020-12) describing this shape.
    ///
    /// `Refined` constraints are carried as a `description` only.
    pub fn to_json_schema(&self) -> Value {
        let mut schema = self.schema_fragment();
        if let Value::Object(ref mut obj) = schema {
            obj.insert(
                "$schema".to_string(),
                json!("https://json-schema.org/draft/2020-12/schema"),
            );
        }
        schema
    }

    fn schema_fragment(&self) -> Value {
        match self {
            Shape::String => json!({"type": "string"}),
            Shape::Number => json!({"type": "number"}),
            Shape::Integer => json!({
                "type": "integer",
                "minimum": i64::MIN,
                "maximum": i64::MAX
            }),
            Shape::Boolean => json!({"type": "boolean"}),
            Shape::Null => json!({"type": "null"}),
            Shape::Unknown => json!({}),
            Shape::Literal(v) => json!({"const": v}),
            Shape::Array(items) => json!({"type": "array", "items": items.schema_fragment()}),
            Shape::Optional(inner) => json!({
                "anyOf": [inner.schema_fragment(), {"type": "null"}]
            }),
            Shape::Object(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for (name, shape) in fields {
                    let fragment = shape.schema_fragment();
                    match properties.get_mut(name) {
                        // A repeated name must satisfy every declaration.
                        Some(earlier) => *earlier = json!({"allOf": [earlier.take(), fragment]}),
                        None => {
                            properties.insert(name.clone(), fragment);
                        }
                    }
                    let name = Value::String(name.clone());
                    if !shape.accepts_absent() && !required.contains(&name) {
                        required.push(name);
                    }
                }
                json!({"type": "object", "properties": properties, "required": required})
            }
            Shape::Record(values) => json!({
                "type": "object",
                "additionalProperties": values.schema_fragment()
            }),
            Shape::OneOf(alternatives) => json!({
                "anyOf": alternatives.iter().map(Shape::schema_fragment).collect::<Vec<_>>()
            }),
            Shape::Refined { base, description } => {
                let mut schema = base.schema_fragment();
                if let Value::Object(ref mut obj) = schema {
                    obj.insert("description".to_string(), json!(description));
                }
                schema
            }
        }
    }

    /// Whether an object key with this shape may be left out.
    pub fn accepts_absent(&self) -> bool {
        match self {
            Shape::Optional(_) => true,
            Shape::Refined { base, .. } => base.accepts_absent(),
            _ => false,
        }
    }

    fn check(&self, value: &Value, cx: &mut Context<'_>) -> Result<(), Halt> {
        let ok = match self {
            Shape::String => value.is_string(),
            Shape::Number => value.is_number(),
            Shape::Integer => as_integer(value).is_some(),
            Shape::Boolean => value.is_boolean(),
            Shape::Null => value.is_null(),
            Shape::Unknown => true,
            Shape::Literal(expected) => same_value(value, expected),
            Shape::Array(items) => {
                let Some(arr) = value.as_array() else {
                    return Err(cx.mismatch(self.name(), value));
                };
                let mut outcome = Ok(());
                for (i, item) in arr.iter().enumerate() {
                    if let Err(halt) = cx.at_index(i, |cx| items.check(item, cx)) {
                        outcome = Err(halt);
                        if !cx.keep_going() {
                            break;
                        }
                    }
                }
                return outcome;
            }
            Shape::Optional(inner) => {
                if value.is_null() {
                    return Ok(());
                }
                return inner.check(value, cx);
            }
            Shape::Object(fields) => {
                let Some(obj) = value.as_object() else {
                    return Err(cx.mismatch(self.name(), value));
                };
                let mut outcome = Ok(());
                for (name, shape) in fields {
                    let result = cx.at_key(name, |cx| match obj.get(name) {
                        Some(v) => shape.check(v, cx),
                        None if shape.accepts_absent() => Ok(()),
                        None => Err(cx.missing(shape.name())),
                    });
                    if let Err(halt) = result {
                        outcome = Err(halt);
                        if !cx.keep_going() {
                            break;
                        }
                    }
                }
                return outcome;
            }
            Shape::Record(values) => {
                let Some(obj) = value.as_object() else {
                    return Err(cx.mismatch(self.name(), value));
                };
                let mut outcome = Ok(());
                for (key, v) in obj {
                    if let Err(halt) = cx.at_key(key, |cx| values.check(v, cx)) {
                        outcome = Err(halt);
                        if !cx.keep_going() {
                            break;
                        }
                    }
                }
                return outcome;
            }
            Shape::OneOf(alternatives) => alternatives
                .iter()
                .any(|alt| cx.attempt(|scratch| alt.check(value, scratch)).is_some()),
            Shape::Refined { base, .. } => return base.check(value, cx),
        };
        if ok {
            Ok(())
        } else {
            Err(cx.mismatch(self.name(), value))
        }
    }
}

impl Decoder for Shape {
    type Output = Value;

    fn shape(&self) -> Shape {
        self.clone()
    }

    fn decode_in(&self, value: &Value, cx: &mut Context<'_>) -> Result<Value, Halt> {
        self.check(value, cx)?;
        Ok(value.clone())
    }

    fn decode_absent(&self, cx: &mut Context<'_>) -> Result<Value, Halt> {
        if self.accepts_absent() {
            Ok(Value::Null)
        } else {
            Err(cx.missing(self.name()))
        }
    }
}
