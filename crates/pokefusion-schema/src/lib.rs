//! Declarative schema validation over untyped JSON
//!
//! A [`Schema`] declares required fields, numeric ranges, string lengths,
//! enumerations, array bounds, and nested objects. Validation either
//! yields a value containing exactly the declared fields (unknown fields
//! stripped) or a [`SchemaError`] aggregating every violation as
//! `<dotted.path>: <reason>`. [`validate_as`] deserializes the cleaned
//! value into a typed struct.

pub mod schemas;

use pokefusion_utils::error::{SchemaError, Violation};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The declared shape of one field value.
#[derive(Debug, Clone)]
pub enum Kind {
    /// UTF-8 string with optional length bounds (in characters).
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    /// Integer with optional inclusive bounds. Integral floats (`65.0`)
    /// are accepted and coerced during cleanup.
    Integer { min: Option<i64>, max: Option<i64> },
    /// Any JSON number with optional inclusive bounds.
    Number { min: Option<f64>, max: Option<f64> },
    /// Boolean.
    Bool,
    /// String drawn from a fixed set.
    Enum(&'static [&'static str]),
    /// Array with optional item-count bounds; every element matches `items`.
    Array {
        min_items: Option<usize>,
        max_items: Option<usize>,
        items: Box<Kind>,
    },
    /// Nested object with its own schema.
    Object(Schema),
}

/// One declared field of an object schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    #[must_use]
    pub fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A declared object shape.
#[derive(Debug, Clone)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Validate `value` against this schema.
    ///
    /// Returns a cleaned value containing only declared fields, or a
    /// [`SchemaError`] aggregating every violation found. No side effects.
    pub fn validate(&self, value: &Value) -> Result<Value, SchemaError> {
        let mut violations = Vec::new();
        let cleaned = clean_object(self, value, "", &mut violations);
        if violations.is_empty() {
            Ok(cleaned)
        } else {
            Err(SchemaError::new(violations))
        }
    }
}

/// Validate `value` against `schema` and deserialize the cleaned value.
///
/// # Errors
///
/// Returns the aggregated [`SchemaError`] on any violation, or a
/// single-violation error if the cleaned value still fails to
/// deserialize into `T`.
pub fn validate_as<T: DeserializeOwned>(value: &Value, schema: &Schema) -> Result<T, SchemaError> {
    let cleaned = schema.validate(value)?;
    serde_json::from_value(cleaned).map_err(|e| {
        SchemaError::new(vec![Violation::new("", format!("deserialization failed: {e}"))])
    })
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn clean_object(
    schema: &Schema,
    value: &Value,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    let Some(obj) = value.as_object() else {
        let at = if path.is_empty() { "(root)" } else { path };
        violations.push(Violation::new(at, "must be an object"));
        return Value::Null;
    };

    let mut cleaned = Map::new();
    for field in &schema.fields {
        let field_path = join_path(path, field.name);
        match obj.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(Violation::new(field_path, "required field missing"));
                }
            }
            Some(v) => {
                let cleaned_value = clean_value(&field.kind, v, &field_path, violations);
                cleaned.insert(field.name.to_string(), cleaned_value);
            }
        }
    }
    Value::Object(cleaned)
}

fn clean_value(kind: &Kind, value: &Value, path: &str, violations: &mut Vec<Violation>) -> Value {
    match kind {
        Kind::String { min_len, max_len } => {
            let Some(s) = value.as_str() else {
                violations.push(Violation::new(path, "must be a string"));
                return Value::Null;
            };
            let len = s.chars().count();
            if let Some(min) = min_len {
                if len < *min {
                    violations.push(Violation::new(
                        path,
                        format!("must be at least {min} characters"),
                    ));
                }
            }
            if let Some(max) = max_len {
                if len > *max {
                    violations.push(Violation::new(
                        path,
                        format!("must be at most {max} characters"),
                    ));
                }
            }
            value.clone()
        }
        Kind::Integer { min, max } => {
            let n = match integral_value(value) {
                Some(n) => n,
                None => {
                    violations.push(Violation::new(path, "must be an integer"));
                    return Value::Null;
                }
            };
            if let Some(min) = min {
                if n < *min {
                    violations.push(Violation::new(path, format!("must be at least {min}")));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    violations.push(Violation::new(path, format!("must be at most {max}")));
                }
            }
            Value::Number(n.into())
        }
        Kind::Number { min, max } => {
            let Some(n) = value.as_f64() else {
                violations.push(Violation::new(path, "must be a number"));
                return Value::Null;
            };
            if let Some(min) = min {
                if n < *min {
                    violations.push(Violation::new(path, format!("must be at least {min}")));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    violations.push(Violation::new(path, format!("must be at most {max}")));
                }
            }
            value.clone()
        }
        Kind::Bool => {
            if !value.is_boolean() {
                violations.push(Violation::new(path, "must be a boolean"));
                return Value::Null;
            }
            value.clone()
        }
        Kind::Enum(allowed) => {
            let Some(s) = value.as_str() else {
                violations.push(Violation::new(
                    path,
                    format!("must be one of {}", allowed.join(", ")),
                ));
                return Value::Null;
            };
            if !allowed.contains(&s) {
                violations.push(Violation::new(
                    path,
                    format!("must be one of {}", allowed.join(", ")),
                ));
            }
            value.clone()
        }
        Kind::Array {
            min_items,
            max_items,
            items,
        } => {
            let Some(arr) = value.as_array() else {
                violations.push(Violation::new(path, "must be an array"));
                return Value::Null;
            };
            if let Some(min) = min_items {
                if arr.len() < *min {
                    violations.push(Violation::new(
                        path,
                        format!("must have at least {min} item(s)"),
                    ));
                }
            }
            if let Some(max) = max_items {
                if arr.len() > *max {
                    violations.push(Violation::new(
                        path,
                        format!("must have at most {max} item(s)"),
                    ));
                }
            }
            let cleaned: Vec<Value> = arr
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = join_path(path, &i.to_string());
                    clean_value(items, item, &item_path, violations)
                })
                .collect();
            Value::Array(cleaned)
        }
        Kind::Object(schema) => clean_object(schema, value, path, violations),
    }
}

/// Integer value of a JSON number, accepting integral floats like `65.0`.
fn integral_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Schema {
        Schema::new(vec![
            Field::required(
                "name",
                Kind::String {
                    min_len: Some(1),
                    max_len: Some(50),
                },
            ),
            Field::required(
                "age",
                Kind::Integer {
                    min: Some(0),
                    max: Some(150),
                },
            ),
            Field::optional(
                "tags",
                Kind::Array {
                    min_items: Some(1),
                    max_items: Some(2),
                    items: Box::new(Kind::Enum(&["red", "blue"])),
                },
            ),
            Field::required(
                "address",
                Kind::Object(Schema::new(vec![Field::required(
                    "city",
                    Kind::String {
                        min_len: Some(1),
                        max_len: None,
                    },
                )])),
            ),
        ])
    }

    #[test]
    fn valid_value_round_trips_with_unknowns_stripped() {
        let input = json!({
            "name": "Ash",
            "age": 10,
            "address": {"city": "Pallet Town", "zip": "00000"},
            "extra": "dropped"
        });
        let cleaned = person_schema().validate(&input).unwrap();
        assert_eq!(
            cleaned,
            json!({
                "name": "Ash",
                "age": 10,
                "address": {"city": "Pallet Town"}
            })
        );
    }

    #[test]
    fn missing_required_field_reports_dotted_path() {
        let input = json!({"name": "Ash", "age": 10, "address": {}});
        let err = person_schema().validate(&input).unwrap_err();
        assert!(
            err.to_string().contains("address.city: required field missing"),
            "got: {err}"
        );
    }

    #[test]
    fn aggregates_every_violation() {
        let input = json!({"age": 200, "address": {"city": ""}});
        let err = person_schema().validate(&input).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name: required field missing"), "got: {msg}");
        assert!(msg.contains("age: must be at most 150"), "got: {msg}");
        assert!(
            msg.contains("address.city: must be at least 1 characters"),
            "got: {msg}"
        );
        assert_eq!(err.violations.len(), 3);
    }

    #[test]
    fn enum_violation_names_allowed_values() {
        let input = json!({
            "name": "Ash",
            "age": 10,
            "tags": ["green"],
            "address": {"city": "Pallet Town"}
        });
        let err = person_schema().validate(&input).unwrap_err();
        assert!(
            err.to_string().contains("tags.0: must be one of red, blue"),
            "got: {err}"
        );
    }

    #[test]
    fn array_bounds_are_enforced() {
        let input = json!({
            "name": "Ash",
            "age": 10,
            "tags": ["red", "blue", "red"],
            "address": {"city": "Pallet Town"}
        });
        let err = person_schema().validate(&input).unwrap_err();
        assert!(err.to_string().contains("tags: must have at most 2 item(s)"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = person_schema().validate(&json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("(root): must be an object"));
    }

    #[test]
    fn integral_float_is_coerced() {
        let input = json!({"name": "Ash", "age": 10.0, "address": {"city": "Pallet Town"}});
        let cleaned = person_schema().validate(&input).unwrap();
        assert_eq!(cleaned["age"], json!(10));
    }

    #[test]
    fn fractional_number_is_not_an_integer() {
        let input = json!({"name": "Ash", "age": 10.5, "address": {"city": "Pallet Town"}});
        let err = person_schema().validate(&input).unwrap_err();
        assert!(err.to_string().contains("age: must be an integer"));
    }

    #[test]
    fn number_field_accepts_fractions_within_bounds() {
        let schema = Schema::new(vec![Field::required(
            "weight",
            Kind::Number {
                min: Some(0.1),
                max: Some(999.9),
            },
        )]);

        let cleaned = schema.validate(&json!({"weight": 6.9})).unwrap();
        assert_eq!(cleaned["weight"], json!(6.9));

        let cleaned = schema.validate(&json!({"weight": 7})).unwrap();
        assert_eq!(cleaned["weight"], json!(7));

        let err = schema.validate(&json!({"weight": "heavy"})).unwrap_err();
        assert!(err.to_string().contains("weight: must be a number"));

        let err = schema.validate(&json!({"weight": 0.05})).unwrap_err();
        assert!(err.to_string().contains("weight: must be at least 0.1"));
    }

    #[test]
    fn validate_as_produces_typed_output() {
        #[derive(serde::Deserialize)]
        struct Person {
            name: String,
            age: u8,
        }
        let schema = Schema::new(vec![
            Field::required(
                "name",
                Kind::String {
                    min_len: Some(1),
                    max_len: None,
                },
            ),
            Field::required(
                "age",
                Kind::Integer {
                    min: Some(0),
                    max: Some(150),
                },
            ),
        ]);
        let person: Person =
            validate_as(&json!({"name": "Misty", "age": 12, "junk": true}), &schema).unwrap();
        assert_eq!(person.name, "Misty");
        assert_eq!(person.age, 12);
    }
}
