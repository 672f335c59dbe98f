// src/converter/html_parser.rs
//! DOM-based reconstruction of a resume from HTML.
//!
//! Keyed to the class names emitted by the HTML renderer. Foreign HTML
//! degrades to coarser extraction (`<h2>` blocks, then the whole body); only
//! a document with nothing readable produces the error placeholder.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::classifier::FieldRole;
use crate::converter::markdown_parser::DEFAULT_TITLE;
use crate::types::{ContentItem, ResumeDocument, Section};
use crate::utils::clean_text;

pub const PARSE_ERROR_TITLE: &str = "HTML Parse Error";
pub const PARSE_ERROR_SECTION: &str = "Error";
/// Key used for opaque blocks of text extracted by the fallbacks
pub const CONTENT_KEY: &str = "Content";

/// Parse HTML into a document. Never fails: unusable input yields the
/// placeholder document.
pub fn from_html(text: &str) -> ResumeDocument {
    match try_from_html(text) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Failed to parse HTML resume: {:#}", e);
            parse_error_document(&e)
        }
    }
}

pub fn parse_error_document(error: &anyhow::Error) -> ResumeDocument {
    let mut note = ContentItem::new();
    note.insert(
        CONTENT_KEY,
        format!(
            "The HTML document could not be converted ({}). Check that it is a complete HTML resume.",
            error
        ),
    );

    let mut doc = ResumeDocument::new(PARSE_ERROR_TITLE);
    doc.sections
        .push(Section::new(PARSE_ERROR_SECTION).with_content(vec![note]));
    doc
}

pub fn try_from_html(text: &str) -> Result<ResumeDocument> {
    let document = Html::parse_document(text);
    let heading = first_heading(&document)?;
    let title = match &heading {
        Some(title) => title.clone(),
        None => fallback_title(&document)?,
    };

    let mut sections = parse_marked_sections(&document)?;
    if sections.is_empty() {
        debug!("No .section elements, falling back to <h2> scan");
        sections = parse_h2_sections(&document)?;
    }
    // A titled page without sections is a resume with no sections yet
    if sections.is_empty() && heading.is_none() {
        debug!("No <h1> or <h2> elements, falling back to body text");
        let body = body_text(&document)?;
        if body.is_empty() {
            anyhow::bail!("document has no readable content");
        }

        let mut item = ContentItem::new();
        item.insert(CONTENT_KEY, body);
        sections.push(Section::new(CONTENT_KEY).with_content(vec![item]));
    }

    Ok(ResumeDocument { title, sections })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector '{}': {}", css, e))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn first_text(scope: &ElementRef<'_>, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(scope.select(&selector).next().map(|e| element_text(&e)))
}

fn first_heading(document: &Html) -> Result<Option<String>> {
    let h1 = selector("h1")?;
    Ok(document.select(&h1).next().map(|e| element_text(&e)))
}

fn fallback_title(document: &Html) -> Result<String> {
    let title = selector("title")?;
    Ok(document
        .select(&title)
        .next()
        .map(|e| element_text(&e))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string()))
}

// ===== Renderer-produced structure =====

fn parse_marked_sections(document: &Html) -> Result<Vec<Section>> {
    let section_selector = selector(".section")?;
    let item_selector = selector(".item")?;

    let mut sections = Vec::new();
    for section_el in document.select(&section_selector) {
        let name = first_text(&section_el, ".section-title")?.unwrap_or_default();
        let mut section = Section::new(name);

        for item_el in section_el.select(&item_selector) {
            section.content.push(parse_item(&item_el)?);
        }
        sections.push(section);
    }

    Ok(sections)
}

fn parse_item(item_el: &ElementRef<'_>) -> Result<ContentItem> {
    let skills_category = selector(".skills-category")?;
    if let Some(category_el) = item_el.select(&skills_category).next() {
        return parse_skills_item(item_el, &category_el);
    }

    let generic = selector(".generic-field")?;
    if item_el.select(&generic).next().is_some() {
        return parse_generic_item(item_el, &generic);
    }

    let mut item = ContentItem::new();
    for element in item_el.descendants().filter_map(ElementRef::wrap) {
        let role = if has_class(&element, "item-title") {
            FieldRole::Title
        } else if has_class(&element, "item-degree") {
            FieldRole::Degree
        } else if has_class(&element, "item-duration") {
            FieldRole::Duration
        } else if has_class(&element, "item-organization") {
            FieldRole::Organization
        } else if has_class(&element, "item-description") {
            FieldRole::Description
        } else if has_class(&element, "item-gpa") {
            FieldRole::Gpa
        } else {
            continue;
        };

        let value = match role {
            FieldRole::Gpa => gpa_value(&element)?,
            _ => element_text(&element),
        };
        item.insert(field_key(&element, role), value);
    }

    Ok(item)
}

fn field_key(element: &ElementRef<'_>, role: FieldRole) -> String {
    element
        .value()
        .attr("data-key")
        .filter(|key| !key.is_empty())
        .unwrap_or(role.conventional_key())
        .to_string()
}

fn gpa_value(element: &ElementRef<'_>) -> Result<String> {
    if let Some(value) = first_text(element, ".field-value")? {
        return Ok(value);
    }
    let text = element_text(element);
    Ok(text
        .strip_prefix("GPA:")
        .map(str::trim)
        .unwrap_or(&text)
        .to_string())
}

fn parse_skills_item(item_el: &ElementRef<'_>, category_el: &ElementRef<'_>) -> Result<ContentItem> {
    let category = element_text(category_el)
        .trim_end_matches(':')
        .trim()
        .to_string();

    let mut item = ContentItem::new();
    item.insert(field_key(category_el, FieldRole::Category), category);

    let skills_list = selector(".skills-list")?;
    match item_el.select(&skills_list).next() {
        Some(list_el) => item.insert(field_key(&list_el, FieldRole::Skills), element_text(&list_el)),
        None => {
            // foreign markup: skills are whatever follows the category label
            let full = element_text(item_el);
            let label = element_text(category_el);
            let rest = full.strip_prefix(label.as_str()).unwrap_or(&full).trim();
            item.insert(FieldRole::Skills.conventional_key(), rest);
        }
    }

    Ok(item)
}

fn parse_generic_item(item_el: &ElementRef<'_>, generic: &Selector) -> Result<ContentItem> {
    let label_selector = selector(".field-label")?;
    let value_selector = selector(".field-value")?;

    let mut item = ContentItem::new();
    for field_el in item_el.select(generic) {
        let label_el = field_el.select(&label_selector).next();
        let label = label_el
            .map(|e| element_text(&e).trim_end_matches(':').trim().to_string())
            .unwrap_or_default();

        let value = match field_el.select(&value_selector).next() {
            Some(value_el) => element_text(&value_el),
            None => {
                let full = element_text(&field_el);
                let label_text = label_el.map(|e| element_text(&e)).unwrap_or_default();
                full.strip_prefix(label_text.as_str())
                    .unwrap_or(&full)
                    .trim()
                    .to_string()
            }
        };

        let key = field_el
            .value()
            .attr("data-key")
            .map(str::to_string)
            .unwrap_or(label);
        item.insert(key, value);
    }

    Ok(item)
}

// ===== Fallbacks for foreign HTML =====

fn parse_h2_sections(document: &Html) -> Result<Vec<Section>> {
    let h2 = selector("h2")?;

    let mut sections = Vec::new();
    for heading in document.select(&h2) {
        let mut parts = Vec::new();
        for sibling in heading.next_siblings() {
            if let Some(element) = ElementRef::wrap(sibling) {
                if element.value().name() == "h2" {
                    break;
                }
                parts.push(element.text().collect::<String>());
            } else if let Some(text) = sibling.value().as_text() {
                parts.push(String::from(&**text));
            }
        }

        let mut section = Section::new(clean_text(&element_text(&heading)));
        let content = clean_text(&parts.join(" "));
        if !content.is_empty() {
            let mut item = ContentItem::new();
            item.insert(CONTENT_KEY, content);
            section.content.push(item);
        }
        sections.push(section);
    }

    Ok(sections)
}

fn body_text(document: &Html) -> Result<String> {
    let body = selector("body")?;
    Ok(document
        .select(&body)
        .next()
        .map(|e| clean_text(&e.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default())
}
