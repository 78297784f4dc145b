//! Field mapping table: local user field name -> dotted path into the provider user
//!
//! Paths are resolved with [`resolve_path`] over a generic JSON tree. A path
//! that cannot be followed resolves to `None` and the local field is left unset.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::models::ProviderUser;

/// Ordered mapping table
///
/// Entries keep the order they were configured in; a repeated local field
/// keeps its first position and takes the last path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, String)>,
}

impl FieldMap {
    #[must_use]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        entries.into_iter().collect()
    }

    fn insert(&mut self, local: String, path: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == local) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((local, path)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(local field, provider path)` pairs in configured order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct top-level source keys of all paths, in first-seen order,
    /// that are not already present on the provider user
    #[must_use]
    pub fn missing_sources(&self, provider_user: &ProviderUser) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for (_, path) in self.iter() {
            let top = top_level_key(path);
            if top.is_empty() || provider_user.contains_key(top) {
                continue;
            }
            if !missing.iter().any(|m| m == top) {
                missing.push(top.to_string());
            }
        }
        missing
    }

    /// Resolve every mapped path against the provider user
    ///
    /// Only resolved paths appear in the result.
    #[must_use]
    pub fn resolve_all(&self, provider_user: &ProviderUser) -> Vec<(String, Value)> {
        self.iter()
            .filter_map(|(local, path)| {
                resolve_in_user(provider_user, path).map(|value| (local.to_string(), value.clone()))
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (local, path) in iter {
            map.insert(local, path);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (local, path) in &self.entries {
            map.serialize_entry(local, path)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a table of local field names to dotted provider paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::default();
                while let Some((local, path)) = access.next_entry::<String, String>()? {
                    map.insert(local, path);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

fn top_level_key(path: &str) -> &str {
    path.split('.').next().unwrap_or_default()
}

fn resolve_in_user<'a>(provider_user: &'a ProviderUser, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = provider_user.get(segments.next()?)?;
    walk(first, segments)
}

/// Follow a dotted path through objects (by key) and arrays (by numeric index)
///
/// Returns `None` when a key is missing, an index is not a number or out of
/// range, or the path tries to step through a scalar or `null`.
#[must_use]
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    walk(root, path.split('.'))
}

fn walk<'a, 'p>(start: &'a Value, segments: impl Iterator<Item = &'p str>) -> Option<&'a Value> {
    segments.fold(Some(start), |current, segment| match current? {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(value: Value) -> ProviderUser {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> FieldMap {
        FieldMap::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_resolve_nested_and_array_paths() {
        let root = json!({
            "profile": {"bio": "hello", "tags": ["a", "b"]},
            "zero": 0,
            "flag": false,
            "nothing": null
        });

        assert_eq!(resolve_path(&root, "profile.bio"), Some(&json!("hello")));
        assert_eq!(resolve_path(&root, "profile.tags.1"), Some(&json!("b")));
        // Falsy leaves still resolve
        assert_eq!(resolve_path(&root, "zero"), Some(&json!(0)));
        assert_eq!(resolve_path(&root, "flag"), Some(&json!(false)));
        assert_eq!(resolve_path(&root, "nothing"), Some(&Value::Null));
    }

    #[test]
    fn test_unresolvable_paths() {
        let root = json!({"profile": {"bio": "hello"}, "nothing": null, "tags": ["a"]});

        assert_eq!(resolve_path(&root, "address.zip"), None);
        assert_eq!(resolve_path(&root, "profile.bio.length"), None);
        assert_eq!(resolve_path(&root, "nothing.inner"), None);
        assert_eq!(resolve_path(&root, "tags.first"), None);
        assert_eq!(resolve_path(&root, "tags.5"), None);
    }

    #[test]
    fn test_missing_sources_uses_top_level_keys() {
        let provider_user = user(json!({"id": 1, "profile": {}}));
        let field_map = map(&[
            ("bio", "profile.bio"),
            ("city", "address.city"),
            ("zip", "address.zip"),
            ("company", "company"),
        ]);

        let missing = field_map.missing_sources(&provider_user);
        assert_eq!(missing.len(), 2);
        assert!(missing.contains(&"address".to_string()));
        assert!(missing.contains(&"company".to_string()));
        assert!(!missing.contains(&"profile".to_string()));
    }

    #[test]
    fn test_missing_sources_follow_configured_order() {
        let provider_user = user(json!({"id": 1}));
        let field_map = map(&[
            ("zeta", "role.name"),
            ("alpha", "avatar.url"),
            ("middle", "role.id"),
        ]);
        assert_eq!(
            field_map.missing_sources(&provider_user),
            vec!["role".to_string(), "avatar".to_string()]
        );
    }

    #[test]
    fn test_repeated_field_keeps_position_and_last_path() {
        let field_map = map(&[("b", "x"), ("a", "y"), ("b", "z")]);
        let entries: Vec<_> = field_map.iter().collect();
        assert_eq!(entries, vec![("b", "z"), ("a", "y")]);
    }

    #[test]
    fn test_toml_table_order_is_kept() {
        #[derive(Deserialize)]
        struct Wrapper {
            map: FieldMap,
        }

        let parsed: Wrapper = basic_toml::from_str(
            "[map]\nzeta = \"role.name\"\nalpha = \"avatar.url\"\n",
        )
        .unwrap();
        let locals: Vec<_> = parsed.map.iter().map(|(local, _)| local).collect();
        assert_eq!(locals, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_sources_empty_when_all_present() {
        let provider_user = user(json!({"profile": {"bio": "x"}, "company": "acme"}));
        let field_map = map(&[("bio", "profile.bio"), ("company", "company")]);
        assert!(field_map.missing_sources(&provider_user).is_empty());
    }

    #[test]
    fn test_resolve_all_skips_unresolved() {
        let provider_user = user(json!({"profile": {"bio": "x"}}));
        let field_map = map(&[("bio", "profile.bio"), ("zip", "address.zip")]);

        let resolved = field_map.resolve_all(&provider_user);
        assert_eq!(resolved, vec![("bio".to_string(), json!("x"))]);
    }

    #[test]
    fn test_resolve_all_is_idempotent() {
        let provider_user = user(json!({"profile": {"bio": "x", "age": 3}}));
        let field_map = map(&[("bio", "profile.bio"), ("age", "profile.age")]);

        assert_eq!(
            field_map.resolve_all(&provider_user),
            field_map.resolve_all(&provider_user)
        );
    }
}
