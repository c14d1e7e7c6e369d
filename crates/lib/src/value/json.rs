//! JSON import and export for the value model.
//!
//! JSON is an acyclic format, so export walks the graph with the current
//! path of container identities and fails with [`ValueError::CyclicValue`]
//! when a value is reachable from itself. Import can never produce a cycle.
//!
//! Mapping rules:
//!
//! - `Missing` and `Null` both export as JSON `null`; import always produces
//!   `Null` (JSON has no way to say "missing").
//! - Numbers import as `Int` when exactly representable as `i64`, otherwise
//!   `Float`. Non-finite floats export as `null`, matching what
//!   `JSON.stringify` does.
//! - `Bytes` export as an array of numbers.
//! - `Pairs` export as an array of `[key, value]` entries and `Set` as an
//!   array of elements, since JSON objects only take string keys. They do
//!   not round-trip: importing those arrays yields plain lists.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

use super::{Value, ValueError};

impl Value {
    /// Converts this value to a [`serde_json::Value`].
    ///
    /// Fails with [`ValueError::CyclicValue`] if the graph contains a
    /// reference cycle.
    pub fn to_json(&self) -> Result<serde_json::Value, ValueError> {
        fn go(value: &Value, path: &mut Vec<usize>) -> Result<serde_json::Value, ValueError> {
            let identity = value.identity();
            if let Some(id) = identity {
                if path.contains(&id) {
                    return Err(ValueError::CyclicValue {
                        context: format!("{} is reachable from itself", value.type_name()),
                    });
                }
                path.push(id);
            }
            let json = match value {
                Value::Missing | Value::Null => serde_json::Value::Null,
                Value::Bool(b) => serde_json::Value::Bool(*b),
                Value::Int(n) => serde_json::Value::from(*n),
                Value::Float(x) => {
                    // from_f64 returns None for NaN and infinities
                    serde_json::Number::from_f64(*x)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
                Value::Text(s) => serde_json::Value::String(s.clone()),
                Value::Bytes(b) => {
                    serde_json::Value::Array(b.iter().map(|&byte| byte.into()).collect())
                }
                Value::Record(r) => {
                    let mut map = serde_json::Map::with_capacity(r.len());
                    for (k, v) in r.entries() {
                        map.insert(k, go(&v, path)?);
                    }
                    serde_json::Value::Object(map)
                }
                Value::List(l) => {
                    let mut items = Vec::with_capacity(l.len());
                    for v in l.to_vec() {
                        items.push(go(&v, path)?);
                    }
                    serde_json::Value::Array(items)
                }
                Value::Pairs(p) => {
                    let mut entries = Vec::with_capacity(p.len());
                    for (k, v) in p.entries() {
                        entries.push(serde_json::Value::Array(vec![
                            go(&k, path)?,
                            go(&v, path)?,
                        ]));
                    }
                    serde_json::Value::Array(entries)
                }
                Value::Set(s) => {
                    let mut items = Vec::with_capacity(s.len());
                    for v in s.to_vec() {
                        items.push(go(&v, path)?);
                    }
                    serde_json::Value::Array(items)
                }
            };
            if identity.is_some() {
                path.pop();
            }
            Ok(json)
        }
        go(self, &mut Vec::new())
    }

    /// Builds a value from a [`serde_json::Value`]. Objects become records,
    /// arrays become lists; the result is always acyclic.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX also lands here, as a float
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.to_json().map_err(S::Error::custom)?;
        json.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_json(&json))
    }
}
