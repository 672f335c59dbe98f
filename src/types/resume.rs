// src/types/resume.rs
//! Resume document structures shared by every converter

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use crate::utils::generate_id;

// ===== Document =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "section name", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default = "generate_id")]
    pub id: String,
}

impl ResumeDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Regenerate ids that are empty or already used earlier in the document.
    /// Returns how many ids were replaced.
    pub fn ensure_unique_ids(&mut self) -> usize {
        let mut seen = HashSet::new();
        let mut replaced = 0;

        for section in &mut self.sections {
            if section.id.is_empty() || seen.contains(&section.id) {
                let mut id = generate_id();
                while seen.contains(&id) {
                    id = generate_id();
                }
                section.id = id;
                replaced += 1;
            }
            seen.insert(section.id.clone());
        }

        replaced
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.content.len()).sum()
    }
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Vec::new(),
            id: generate_id(),
        }
    }

    pub fn with_content(mut self, content: Vec<ContentItem>) -> Self {
        self.content = content;
        self
    }
}

// ===== Content item =====

/// Open key/value record. Key order is significant and preserved through
/// serialization; re-inserting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentItem {
    fields: Vec<(String, String)>,
}

impl ContentItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContentItem {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut item = ContentItem::new();
        for (key, value) in iter {
            item.insert(key, value);
        }
        item
    }
}

impl Serialize for ContentItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ContentItemVisitor)
    }
}

struct ContentItemVisitor;

impl<'de> Visitor<'de> for ContentItemVisitor {
    type Value = ContentItem;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut item = ContentItem::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            item.insert(key, value_to_text(value));
        }
        Ok(item)
    }
}

// AI-extracted payloads often carry numbers or lists where text is expected
fn value_to_text(value: serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        object @ Value::Object(_) => object.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_item_preserves_insertion_order() {
        let mut item = ContentItem::new();
        item.insert("Zeta", "1");
        item.insert("Alpha", "2");
        item.insert("Mid", "3");
        item.insert("Zeta", "updated");

        let keys: Vec<_> = item.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(item.get("Zeta"), Some("updated"));
    }

    #[test]
    fn test_section_json_uses_section_name_key() {
        let section = Section {
            name: "Experience".to_string(),
            content: vec![],
            id: "x1".to_string(),
        };

        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["section name"], "Experience");
        assert_eq!(value["id"], "x1");
    }

    #[test]
    fn test_deserialize_keeps_key_order_and_accepts_name_alias() {
        let json = r#"{
            "title": "A - B",
            "sections": [
                {"name": "Experience", "id": "x1", "content": [
                    {"job title": "Eng", "Organization": "Acme", "Duration": "2020-2024"}
                ]}
            ]
        }"#;

        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.sections[0].name, "Experience");

        let keys: Vec<_> = doc.sections[0].content[0].keys().collect();
        assert_eq!(keys, vec!["job title", "Organization", "Duration"]);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let json = r#"{"GPA": 3.9, "Skills": ["Rust", "Go"], "Current": true, "Note": null}"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.get("GPA"), Some("3.9"));
        assert_eq!(item.get("Skills"), Some("Rust, Go"));
        assert_eq!(item.get("Current"), Some("true"));
        assert_eq!(item.get("Note"), Some(""));
    }

    #[test]
    fn test_missing_section_id_is_generated() {
        let json = r#"{"title": "T", "sections": [{"section name": "S", "content": []}]}"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.sections[0].id.len(), 7);
    }

    #[test]
    fn test_ensure_unique_ids_replaces_duplicates_and_empty() {
        let mut doc = ResumeDocument::new("T");
        for id in ["a", "a", ""] {
            let mut section = Section::new("S");
            section.id = id.to_string();
            doc.sections.push(section);
        }

        assert_eq!(doc.ensure_unique_ids(), 2);
        assert_eq!(doc.sections[0].id, "a");
        assert_ne!(doc.sections[1].id, "a");
        assert!(!doc.sections[2].id.is_empty());
        assert_ne!(doc.sections[1].id, doc.sections[2].id);
    }
}
