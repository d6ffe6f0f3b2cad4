//! Value containers shared by the config documents and the resolver.
//!
//! `OrderedMap` preserves first-insertion order so resolved output is
//! deterministic and diff-stable across runs. `PlatformValue` is the tagged
//! form of "plain value or per-platform map", decided once when the raw
//! document is deserialized rather than re-inspected at every read.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::platform::Platform;

/// A string-keyed map that keeps first-insertion order.
///
/// Re-inserting an existing key replaces the value in place, so override
/// layers never reshuffle the output (same semantics as object spread in the
/// JSON-like downstream format).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert a value, keeping the key's original position when it already
    /// exists. Returns the previous value for an existing key.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a mapping with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Duplicate keys: last one wins, position of the first kept.
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Either a plain value or one alternative per platform.
///
/// The shape is decided at the parse boundary: a YAML mapping counts as a
/// per-platform map if and only if at least one of its keys is a platform
/// identifier. Anything else — scalars, sequences, and mappings with no
/// platform keys — is carried as an opaque plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformValue<T> {
    Plain(T),
    PerPlatform(BTreeMap<Platform, T>),
}

impl<T> PlatformValue<T> {
    /// Collapse to the value applicable on `platform`.
    ///
    /// Total and pure: a plain value passes through unchanged for every
    /// platform; a per-platform map yields `None` when the platform has no
    /// entry.
    pub fn resolve(&self, platform: Platform) -> Option<&T> {
        match self {
            Self::Plain(value) => Some(value),
            Self::PerPlatform(map) => map.get(&platform),
        }
    }
}

impl<T: DeserializeOwned> PlatformValue<T> {
    /// Apply the platform-map heuristic to an already-parsed YAML value.
    pub fn from_yaml(raw: serde_yaml::Value) -> Result<Self, serde_yaml::Error> {
        if let serde_yaml::Value::Mapping(map) = &raw {
            let has_platform_key = map
                .keys()
                .any(|k| k.as_str().is_some_and(|s| Platform::from_key(s).is_some()));
            if has_platform_key {
                let mut per_platform = BTreeMap::new();
                for (key, value) in map {
                    // Non-platform keys inside a platform map are ignored.
                    if let Some(platform) = key.as_str().and_then(Platform::from_key) {
                        per_platform.insert(platform, serde_yaml::from_value(value.clone())?);
                    }
                }
                return Ok(Self::PerPlatform(per_platform));
            }
        }
        Ok(Self::Plain(serde_yaml::from_value(raw)?))
    }
}

impl<T: Serialize> Serialize for PlatformValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(value) => value.serialize(serializer),
            Self::PerPlatform(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (platform, value) in map {
                    out.serialize_entry(platform.as_str(), value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for PlatformValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        Self::from_yaml(raw).map_err(serde::de::Error::custom)
    }
}

/// Convert a platform-resolved YAML value into the JSON-shaped form used for
/// passthrough output. Non-string mapping keys are coerced to strings; YAML
/// tags are dropped.
pub fn yaml_to_json(value: &serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::from(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(s) => Json::from(s.clone()),
        Yaml::Sequence(seq) => Json::Array(seq.iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in map {
                obj.insert(yaml_key_string(key), yaml_to_json(value));
            }
            Json::Object(obj)
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn yaml_key_string(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn ordered_map_preserves_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("b".to_string(), 1);
        map.insert("a".to_string(), 2);
        map.insert("c".to_string(), 3);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn ordered_map_reinsert_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        let previous = map.insert("a".to_string(), 10);

        assert_eq!(previous, Some(1));
        let entries: Vec<_> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(entries, vec![("a", 10), ("b", 2)]);
    }

    #[test]
    fn ordered_map_deserializes_in_document_order() {
        let map: OrderedMap<String> = serde_yaml::from_str("z: one\nm: two\na: three\n").unwrap();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["z", "m", "a"]);
    }

    #[test]
    fn plain_scalar_parses_as_plain() {
        let value: PlatformValue<String> = PlatformValue::from_yaml(yaml("\"hello\"")).unwrap();
        assert_eq!(value, PlatformValue::Plain("hello".to_string()));
    }

    #[test]
    fn mapping_with_platform_key_parses_as_per_platform() {
        let value: PlatformValue<String> =
            PlatformValue::from_yaml(yaml("darwin: /usr/local/bin\nlinux: /usr/bin\n")).unwrap();

        assert_eq!(value.resolve(Platform::Darwin), Some(&"/usr/local/bin".to_string()));
        assert_eq!(value.resolve(Platform::Linux), Some(&"/usr/bin".to_string()));
        assert_eq!(value.resolve(Platform::Win32), None);
    }

    #[test]
    fn mixed_mapping_is_still_a_platform_map() {
        // One platform key is enough; the stray key is ignored.
        let value: PlatformValue<String> =
            PlatformValue::from_yaml(yaml("linux: /usr/bin\nstray: ignored\n")).unwrap();

        assert_eq!(value.resolve(Platform::Linux), Some(&"/usr/bin".to_string()));
        assert_eq!(value.resolve(Platform::Darwin), None);
    }

    #[test]
    fn mapping_without_platform_keys_is_opaque() {
        let value: PlatformValue<serde_yaml::Value> =
            PlatformValue::from_yaml(yaml("host: example.com\nport: 8080\n")).unwrap();

        let resolved = value.resolve(Platform::Darwin).unwrap();
        assert!(resolved.is_mapping());
        // Identical for every platform.
        assert_eq!(value.resolve(Platform::Win32), Some(resolved));
    }

    #[rstest::rstest]
    #[case(Platform::Darwin)]
    #[case(Platform::Win32)]
    #[case(Platform::Linux)]
    fn plain_value_resolves_identically_for_every_platform(#[case] platform: Platform) {
        let value: PlatformValue<Vec<String>> =
            PlatformValue::from_yaml(yaml("[a, b]")).unwrap();
        assert_eq!(
            value.resolve(platform),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn per_platform_serializes_back_to_a_keyed_mapping() {
        let value: PlatformValue<String> =
            PlatformValue::from_yaml(yaml("darwin: brew\nlinux: apt\n")).unwrap();
        let out = serde_json::to_value(&value).unwrap();
        assert_eq!(out, json!({"darwin": "brew", "linux": "apt"}));
    }

    #[test]
    fn yaml_to_json_covers_all_variants() {
        let value = yaml("str: text\nnum: 3\nfloat: 1.5\nflag: true\nnothing: null\nlist: [1, two]\nnested:\n  k: v\n");
        assert_eq!(
            yaml_to_json(&value),
            json!({
                "str": "text",
                "num": 3,
                "float": 1.5,
                "flag": true,
                "nothing": null,
                "list": [1, "two"],
                "nested": {"k": "v"},
            })
        );
    }
}
