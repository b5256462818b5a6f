//! value representation
//!
//! The configuration tree is made of the following data types
//! - null
//! - boolean (true/false)
//! - integer (signed, currently: i64 - may change)
//! - decimal (currently: f64 - may change)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//!
//! Everything except array and object is a scalar. Only string scalars can carry
//! placeholders, every other scalar is left alone by the resolvers.
//!
//! Object order is kept for serialization but ignored by equality.
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

/// All possible value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Vec<Value>),
    Object(indexmap::IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::empty_object()
    }
}

impl Value {
    pub fn empty_object() -> Self {
        Value::Object(Default::default())
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&indexmap::IndexMap<String, Value>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Insert `value` under `key`
    ///
    /// Turns `self` into an empty object first when it is anything else.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        if !matches!(self, Value::Object(_)) {
            *self = Value::empty_object();
        }

        let Value::Object(object) = self else {
            unreachable!("value was just turned into an object")
        };
        object.insert(key.into(), value.into())
    }

    /// Walk a dotted path (`a.b.0.c`)
    ///
    /// Objects are indexed by key, arrays by numeric segments.
    pub fn get_path(&self, dotted_path: &str) -> Option<&Value> {
        dotted_path
            .split('.')
            .try_fold(self, |current, segment| match current {
                Value::Object(object) => object.get(segment),
                Value::Array(array) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| array.get(index)),
                _ => None,
            })
    }

    /// Mutable counterpart of [Value::get_path]
    pub fn get_path_mut(&mut self, dotted_path: &str) -> Option<&mut Value> {
        dotted_path
            .split('.')
            .try_fold(self, |current, segment| match current {
                Value::Object(object) => object.get_mut(segment),
                Value::Array(array) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| array.get_mut(index)),
                _ => None,
            })
    }

    /// Text used when this value is substituted into a string
    ///
    /// `None` for null and for collections: those have no textual form inside a string.
    pub fn to_substitution(&self) -> Option<String> {
        match self {
            Value::Null | Value::Array(_) | Value::Object(_) => None,
            Value::Boolean(value) => Some(value.to_string()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Decimal(value) => Some(value.to_string()),
            Value::String(value) => Some(value.clone()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_yaml::Number> for Value {
    fn from(value: serde_yaml::Number) -> Self {
        if let Some(int) = value.as_i64() {
            return Value::Integer(int);
        }

        // u64 above i64::MAX and floats both end up here
        value
            .as_f64()
            .map(Value::Decimal)
            .unwrap_or(Value::Null)
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => b.into(),
            Yaml::Number(n) => n.into(),
            Yaml::String(s) => s.into(),
            Yaml::Sequence(sequence) => sequence.into(),
            Yaml::Mapping(mapping) => Value::Object(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), v.into()))
                    .collect(),
            ),
            // tags carry no meaning for configuration, keep the tagged value
            Yaml::Tagged(tagged) => tagged.value.into(),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Null => String::new(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        complex => serde_yaml::to_string(&complex)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl<K: ToString, V: Into<Value>> From<hcl::value::Map<K, V>> for Value {
    fn from(value: hcl::value::Map<K, V>) -> Self {
        Value::Object(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }
}

impl From<hcl::Number> for Value {
    fn from(value: hcl::Number) -> Self {
        if let Some(int) = value.as_i64() {
            return Value::Integer(int);
        }

        value
            .as_f64()
            .map(Value::Decimal)
            .unwrap_or(Value::Null)
    }
}

impl From<hcl::Value> for Value {
    fn from(value: hcl::Value) -> Value {
        match value {
            hcl::Value::Null => Value::Null,
            hcl::Value::Bool(b) => b.into(),
            hcl::Value::Number(n) => n.into(),
            hcl::Value::String(s) => s.into(),
            hcl::Value::Array(a) => a.into(),
            hcl::Value::Object(o) => o.into(),
        }
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
            person:
              name: Antonio Carlos
              tags: [one, two]
            "#,
        )
        .unwrap();
        yaml.into()
    }

    #[test]
    fn get_path_walks_objects_and_arrays() {
        let value = sample();

        assert_eq!(
            value.get_path("person.name"),
            Some(&Value::from("Antonio Carlos"))
        );
        assert_eq!(value.get_path("person.tags.1"), Some(&Value::from("two")));
        assert_eq!(value.get_path("person.missing"), None);
        assert_eq!(value.get_path("person.name.deeper"), None);
    }

    #[test]
    fn substitution_text() {
        assert_eq!(Value::Integer(42).to_substitution().as_deref(), Some("42"));
        assert_eq!(Value::Decimal(1.5).to_substitution().as_deref(), Some("1.5"));
        assert_eq!(Value::Boolean(true).to_substitution().as_deref(), Some("true"));
        assert_eq!(Value::Null.to_substitution(), None);
        assert_eq!(sample().to_substitution(), None);
    }

    #[test]
    fn object_equality_ignores_order() {
        let one: Value = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        let two: Value = [("b", 2i64), ("a", 1i64)].into_iter().collect();
        assert_eq!(one, two);
    }

    #[test]
    fn yaml_keys_are_stringified() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\n~: nothing").unwrap();
        let value: Value = yaml.into();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "true", ""]);
    }
}
