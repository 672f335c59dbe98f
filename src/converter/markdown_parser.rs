// src/converter/markdown_parser.rs
//! Line-oriented reconstruction of a resume from Markdown.
//!
//! Inverse of the Markdown renderer's conventions: `#` title, `##` section,
//! `###` item heading with an optional trailing `(duration)`, a fully bold
//! line for the organization, `**Key:** value` pairs, and free text folded
//! into `Description`. Arbitrary Markdown never fails to parse, it only
//! yields coarser items.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::classifier::FieldRole;
use crate::types::{ContentItem, ResumeDocument, Section};
use crate::utils::key_contains;

pub const DEFAULT_TITLE: &str = "Untitled Resume";
/// Section receiving items that appear before the first `##` heading
pub const PREAMBLE_SECTION: &str = "Summary";

static HEADING_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*\(([^()]*)\)\s*$").expect("heading regex is valid")
});
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*(.+?):\*\*\s*(.*)$").expect("key/value regex is valid")
});
static BOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*$").expect("bold regex is valid"));
static PLAIN_GPA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^gpa:\s*(.*)$").expect("gpa regex is valid"));

pub fn from_markdown(text: &str) -> ResumeDocument {
    let mut parser = MarkdownParser::default();
    for line in text.lines() {
        parser.line(line);
    }
    let doc = parser.finish();

    debug!(
        "Parsed markdown into {} sections / {} items",
        doc.sections.len(),
        doc.item_count()
    );
    doc
}

#[derive(Debug)]
struct Heading {
    text: String,
    duration: Option<String>,
}

#[derive(Debug, Default)]
struct ItemBuilder {
    heading: Option<Heading>,
    fields: ContentItem,
}

impl ItemBuilder {
    fn with_heading(rest: &str) -> Self {
        let heading = match HEADING_DURATION.captures(rest) {
            Some(caps) => Heading {
                text: caps[1].to_string(),
                duration: Some(caps[2].trim().to_string()),
            },
            None => Heading {
                text: rest.to_string(),
                duration: None,
            },
        };

        Self {
            heading: Some(heading),
            fields: ContentItem::new(),
        }
    }

    fn append_description(&mut self, line: &str) {
        let key = FieldRole::Description.conventional_key();
        match self.fields.get_mut(key) {
            Some(description) => {
                description.push(' ');
                description.push_str(line);
            }
            None => self.fields.insert(key, line),
        }
    }

    // The heading goes under `Degree` when the item looks like an education
    // entry, otherwise under `job title`.
    fn finish(self, in_education_section: bool) -> ContentItem {
        let Some(heading) = self.heading else {
            return self.fields;
        };

        let gpa_key = FieldRole::Gpa.conventional_key();
        let heading_role = if in_education_section || self.fields.contains_key(gpa_key) {
            FieldRole::Degree
        } else {
            FieldRole::Title
        };

        let mut item = ContentItem::new();
        item.insert(heading_role.conventional_key(), heading.text);
        if let Some(duration) = heading.duration {
            item.insert(FieldRole::Duration.conventional_key(), duration);
        }
        for (key, value) in self.fields.iter() {
            item.insert(key, value);
        }
        item
    }
}

#[derive(Debug, Default)]
struct MarkdownParser {
    title: Option<String>,
    sections: Vec<Section>,
    section: Option<Section>,
    item: Option<ItemBuilder>,
}

impl MarkdownParser {
    fn line(&mut self, raw: &str) {
        let line = raw.trim();

        if line.is_empty() {
            // blank lines separate the paragraphs of a heading item, but
            // close any other item
            if self.item.as_ref().is_some_and(|item| item.heading.is_none()) {
                self.flush_item();
            }
            return;
        }

        if let Some(rest) = strip_heading(line, "###") {
            self.flush_item();
            self.item = Some(ItemBuilder::with_heading(rest));
        } else if let Some(rest) = strip_heading(line, "##") {
            self.flush_item();
            self.flush_section();
            self.section = Some(Section::new(rest));
        } else if let Some(rest) = strip_heading(line, "#") {
            self.title = Some(rest.to_string());
        } else if let Some(caps) = KEY_VALUE.captures(line) {
            self.key_value(caps[1].trim(), caps[2].trim());
        } else if let Some(caps) = PLAIN_GPA.captures(line) {
            self.current_item()
                .fields
                .insert(FieldRole::Gpa.conventional_key(), caps[1].trim());
        } else if let Some(caps) = BOLD_LINE.captures(line) {
            self.current_item()
                .fields
                .insert(FieldRole::Organization.conventional_key(), caps[1].trim());
        } else {
            self.current_item().append_description(line);
        }
    }

    fn key_value(&mut self, key: &str, value: &str) {
        if key.eq_ignore_ascii_case("gpa") {
            self.current_item()
                .fields
                .insert(FieldRole::Gpa.conventional_key(), value);
            return;
        }

        // key/value lines never belong to a `###` entry
        if self.item.as_ref().is_some_and(|item| item.heading.is_some()) {
            self.flush_item();
        }

        if key_contains(key, "skill") || key_contains(self.section_name(), "skill") {
            let category_key = FieldRole::Category.conventional_key();
            if self
                .item
                .as_ref()
                .is_some_and(|item| item.fields.contains_key(category_key))
            {
                self.flush_item();
            }

            let item = self.current_item();
            item.fields.insert(category_key, key);
            item.fields
                .insert(FieldRole::Skills.conventional_key(), value);
        } else {
            self.current_item().fields.insert(key, value);
        }
    }

    fn current_item(&mut self) -> &mut ItemBuilder {
        self.item.get_or_insert_with(ItemBuilder::default)
    }

    fn section_name(&self) -> &str {
        self.section.as_ref().map(|s| s.name.as_str()).unwrap_or("")
    }

    fn flush_item(&mut self) {
        let Some(builder) = self.item.take() else {
            return;
        };

        let item = builder.finish(key_contains(self.section_name(), "education"));
        if item.is_empty() {
            return;
        }

        self.section
            .get_or_insert_with(|| Section::new(PREAMBLE_SECTION))
            .content
            .push(item);
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.section.take() {
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> ResumeDocument {
        self.flush_item();
        self.flush_section();

        ResumeDocument {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            sections: self.sections,
        }
    }
}

/// `marker` alone or followed by a space; `####` does not match `###`
fn strip_heading<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix(' ').map(str::trim)
}
