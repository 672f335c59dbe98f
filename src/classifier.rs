// src/classifier.rs
//! Heuristic field classification for open key/value content items.
//!
//! Each semantic role scans the item's keys independently, in key order, for
//! the first key whose lowercased name contains one of the role's patterns.
//! Keys are not consumed, so one key can satisfy several roles.

use serde::Serialize;

use crate::types::ContentItem;
use crate::utils::key_contains;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Title,
    Organization,
    Duration,
    Description,
    Degree,
    Gpa,
    Category,
    Skills,
}

impl FieldRole {
    pub const ALL: [FieldRole; 8] = [
        FieldRole::Title,
        FieldRole::Organization,
        FieldRole::Duration,
        FieldRole::Description,
        FieldRole::Degree,
        FieldRole::Gpa,
        FieldRole::Category,
        FieldRole::Skills,
    ];

    /// Lowercase substrings searched for in key names, in priority order
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            FieldRole::Title => &["title", "position"],
            FieldRole::Organization => &["organization", "company"],
            FieldRole::Duration => &["duration", "period", "date"],
            FieldRole::Description => &["description", "summary"],
            FieldRole::Degree => &["degree", "education"],
            FieldRole::Gpa => &["gpa", "grade"],
            FieldRole::Category => &["category", "type"],
            FieldRole::Skills => &["skills", "abilities"],
        }
    }

    /// Key name the parsers use when reconstructing this role
    pub fn conventional_key(self) -> &'static str {
        match self {
            FieldRole::Title => "job title",
            FieldRole::Organization => "Organization",
            FieldRole::Duration => "Duration",
            FieldRole::Description => "Description",
            FieldRole::Degree => "Degree",
            FieldRole::Gpa => "GPA",
            FieldRole::Category => "Category",
            FieldRole::Skills => "Skills",
        }
    }

    pub fn matches(self, key: &str) -> bool {
        self.patterns().iter().any(|pattern| key_contains(key, pattern))
    }
}

/// Rendering template chosen for a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemTemplate {
    Experience,
    Education,
    Skills,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    pub title: Option<FieldMatch<'a>>,
    pub organization: Option<FieldMatch<'a>>,
    pub duration: Option<FieldMatch<'a>>,
    pub description: Option<FieldMatch<'a>>,
    pub degree: Option<FieldMatch<'a>>,
    pub gpa: Option<FieldMatch<'a>>,
    pub category: Option<FieldMatch<'a>>,
    pub skills: Option<FieldMatch<'a>>,
}

impl<'a> Classification<'a> {
    pub fn get(&self, role: FieldRole) -> Option<FieldMatch<'a>> {
        match role {
            FieldRole::Title => self.title,
            FieldRole::Organization => self.organization,
            FieldRole::Duration => self.duration,
            FieldRole::Description => self.description,
            FieldRole::Degree => self.degree,
            FieldRole::Gpa => self.gpa,
            FieldRole::Category => self.category,
            FieldRole::Skills => self.skills,
        }
    }

    pub fn template(&self) -> ItemTemplate {
        if self.title.is_some() {
            ItemTemplate::Experience
        } else if self.degree.is_some() {
            ItemTemplate::Education
        } else if self.category.is_some() && self.skills.is_some() {
            ItemTemplate::Skills
        } else {
            ItemTemplate::Generic
        }
    }

    /// Roles that found a key, with the key they claimed
    pub fn matched(&self) -> Vec<(FieldRole, &'a str)> {
        FieldRole::ALL
            .iter()
            .filter_map(|&role| self.get(role).map(|m| (role, m.key)))
            .collect()
    }
}

/// First key (in item order) matching the role, if any
pub fn find_field(item: &ContentItem, role: FieldRole) -> Option<FieldMatch<'_>> {
    item.iter()
        .find(|(key, _)| role.matches(key))
        .map(|(key, value)| FieldMatch { key, value })
}

pub fn classify(item: &ContentItem) -> Classification<'_> {
    Classification {
        title: find_field(item, FieldRole::Title),
        organization: find_field(item, FieldRole::Organization),
        duration: find_field(item, FieldRole::Duration),
        description: find_field(item, FieldRole::Description),
        degree: find_field(item, FieldRole::Degree),
        gpa: find_field(item, FieldRole::Gpa),
        category: find_field(item, FieldRole::Category),
        skills: find_field(item, FieldRole::Skills),
    }
}
