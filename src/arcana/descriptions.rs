//! Result mapping: arcana id → sphere category → text.
//!
//! Both levels are `serde_json` objects (built with `preserve_order`), so
//! keys keep insertion order, i.e. first appearance in the document.
//! Overwriting an existing key replaces the text in place, so the key keeps
//! its original position.

use serde::Serialize;
use serde_json::{Map, Value};

use super::categories::SphereCategory;

/// Spheres extracted for a single arcana: category key → text.
pub type SphereTexts = Map<String, Value>;

/// Complete extraction result, keyed by arcana id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArcanaDescriptions {
    arcanas: Map<String, Value>,
}

impl ArcanaDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an arcana id without adding text. No-op if already present.
    pub fn ensure_arcana(&mut self, id: &str) {
        self.arcanas
            .entry(id)
            .or_insert_with(|| Value::Object(SphereTexts::new()));
    }

    /// Store section text under (arcana id, category); last write wins.
    /// Returns true if an earlier value was replaced.
    pub fn insert(&mut self, id: &str, category: SphereCategory, text: String) -> bool {
        self.arcanas
            .entry(id)
            .or_insert_with(|| Value::Object(SphereTexts::new()))
            .as_object_mut()
            .and_then(|spheres| spheres.insert(category.as_str().to_string(), Value::String(text)))
            .is_some()
    }

    pub fn arcana(&self, id: &str) -> Option<&SphereTexts> {
        self.arcanas.get(id).and_then(Value::as_object)
    }

    pub fn get(&self, id: &str, category: SphereCategory) -> Option<&str> {
        self.arcana(id)?.get(category.as_str())?.as_str()
    }

    /// Arcana ids with their spheres, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SphereTexts)> {
        self.arcanas
            .iter()
            .filter_map(|(id, spheres)| Some((id.as_str(), spheres.as_object()?)))
    }

    /// Number of arcanas.
    pub fn len(&self) -> usize {
        self.arcanas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcanas.is_empty()
    }

    /// Total number of stored (arcana, category) texts.
    pub fn sphere_count(&self) -> usize {
        self.iter().map(|(_, spheres)| spheres.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_in_place() {
        let mut descriptions = ArcanaDescriptions::new();
        assert!(!descriptions.insert("3", SphereCategory::Money, "first".to_string()));
        assert!(!descriptions.insert("3", SphereCategory::Health, "health".to_string()));
        assert!(descriptions.insert("3", SphereCategory::Money, "second".to_string()));

        let entry = descriptions.arcana("3").unwrap();
        let keys: Vec<&str> = entry.keys().map(String::as_str).collect();
        assert_eq!(keys, ["money", "health"]);
        assert_eq!(descriptions.get("3", SphereCategory::Money), Some("second"));
        assert_eq!(descriptions.get("3", SphereCategory::Health), Some("health"));
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let mut descriptions = ArcanaDescriptions::new();
        descriptions.insert("10", SphereCategory::Year, "y".to_string());
        descriptions.insert("2", SphereCategory::Talents, "t".to_string());
        descriptions.insert("10", SphereCategory::Brand, "b".to_string());

        let json = serde_json::to_string(&descriptions).unwrap();
        assert_eq!(json, r#"{"10":{"year":"y","brand":"b"},"2":{"talents":"t"}}"#);
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions.sphere_count(), 3);
    }

    #[test]
    fn test_ensure_arcana_is_idempotent() {
        let mut descriptions = ArcanaDescriptions::new();
        descriptions.ensure_arcana("7");
        descriptions.ensure_arcana("7");
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions.arcana("7").unwrap().is_empty());
        assert_eq!(serde_json::to_string(&descriptions).unwrap(), r#"{"7":{}}"#);
    }

    #[test]
    fn test_iter_yields_document_order() {
        let mut descriptions = ArcanaDescriptions::new();
        descriptions.ensure_arcana("22");
        descriptions.insert("1", SphereCategory::Talents, "t".to_string());
        descriptions.insert("22", SphereCategory::Brand, "b".to_string());

        let ids: Vec<&str> = descriptions.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["22", "1"]);
        assert_eq!(descriptions.get("1", SphereCategory::Brand), None);
        assert_eq!(descriptions.get("5", SphereCategory::Brand), None);
    }
}
