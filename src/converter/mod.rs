// src/converter/mod.rs
//! Conversions between the structured resume form, Markdown and HTML

pub mod html_parser;
pub mod html_renderer;
pub mod markdown_parser;
pub mod markdown_renderer;

pub use html_parser::from_html;
pub use html_renderer::{to_html, to_html_with, HtmlOptions};
pub use markdown_parser::from_markdown;
pub use markdown_renderer::to_markdown;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::classifier::{classify, FieldRole, ItemTemplate};
use crate::types::ResumeDocument;
use crate::utils::get_file_extension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    #[serde(alias = "md")]
    Markdown,
    #[serde(alias = "htm")]
    Html,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Markdown => "md",
            DocumentFormat::Html => "html",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        get_file_extension(name)?.parse().ok()
    }
}

impl FromStr for DocumentFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "html" | "htm" => Ok(DocumentFormat::Html),
            other => anyhow::bail!(
                "Unsupported format: {}. Use json, markdown (md) or html",
                other
            ),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Html => "html",
        };
        f.write_str(name)
    }
}

/// Serialize a document as pretty JSON
pub fn to_json(doc: &ResumeDocument) -> Result<String> {
    serde_json::to_string_pretty(doc).context("Failed to serialize resume to JSON")
}

/// Load a document from JSON, repairing missing or duplicated section ids
pub fn from_json(text: &str) -> Result<ResumeDocument> {
    let mut doc: ResumeDocument =
        serde_json::from_str(text).context("Failed to parse resume JSON")?;

    let repaired = doc.ensure_unique_ids();
    if repaired > 0 {
        debug!("Regenerated {} section ids", repaired);
    }
    Ok(doc)
}

#[derive(Debug, Clone, Default)]
pub struct ResumeConverter {
    pub html: HtmlOptions,
}

impl ResumeConverter {
    pub fn new(html: HtmlOptions) -> Self {
        Self { html }
    }

    pub fn render(&self, doc: &ResumeDocument, format: DocumentFormat) -> Result<String> {
        info!(
            "Rendering '{}' ({} sections) as {}",
            doc.title,
            doc.sections.len(),
            format
        );

        match format {
            DocumentFormat::Json => to_json(doc),
            DocumentFormat::Markdown => Ok(to_markdown(doc)),
            DocumentFormat::Html => Ok(to_html_with(doc, &self.html)),
        }
    }

    /// Only JSON can fail; the text parsers always produce a document
    pub fn parse(&self, text: &str, format: DocumentFormat) -> Result<ResumeDocument> {
        let doc = match format {
            DocumentFormat::Json => from_json(text)?,
            DocumentFormat::Markdown => from_markdown(text),
            DocumentFormat::Html => from_html(text),
        };

        info!(
            "Parsed {} input into '{}' ({} sections, {} items)",
            format,
            doc.title,
            doc.sections.len(),
            doc.item_count()
        );
        Ok(doc)
    }

    pub fn convert(&self, text: &str, from: DocumentFormat, to: DocumentFormat) -> Result<String> {
        let doc = self.parse(text, from)?;
        self.render(&doc, to)
    }
}

// ===== Classification report =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub section: String,
    pub index: usize,
    pub template: ItemTemplate,
    pub matched: Vec<(FieldRole, String)>,
    /// Keys no role claimed; rendered only by the generic template
    pub unclassified: Vec<String>,
}

/// Describe which template and keys the classifier picks for every item
pub fn inspect(doc: &ResumeDocument) -> Vec<ItemReport> {
    let mut reports = Vec::new();

    for section in &doc.sections {
        for (index, item) in section.content.iter().enumerate() {
            let fields = classify(item);
            let matched: Vec<(FieldRole, String)> = fields
                .matched()
                .into_iter()
                .map(|(role, key)| (role, key.to_string()))
                .collect();
            let unclassified = item
                .keys()
                .filter(|key| !matched.iter().any(|(_, k)| k.as_str() == *key))
                .map(str::to_string)
                .collect();

            reports.push(ItemReport {
                section: section.name.clone(),
                index,
                template: fields.template(),
                matched,
                unclassified,
            });
        }
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentItem, Section};

    const SCENARIO_JSON: &str = r#"{
        "title": "A - B",
        "sections": [{
            "name": "Experience",
            "content": [{"job title": "Eng", "Organization": "Acme", "Duration": "2020-2024", "Description": "Built things."}],
            "id": "x1"
        }]
    }"#;

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<DocumentFormat>().unwrap(), DocumentFormat::Markdown);
        assert_eq!("HTML".parse::<DocumentFormat>().unwrap(), DocumentFormat::Html);
        assert_eq!("json".parse::<DocumentFormat>().unwrap(), DocumentFormat::Json);
        assert!("pdf".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("out/cv.MD")),
            Some(DocumentFormat::Markdown)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.htm")),
            Some(DocumentFormat::Html)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("cv.docx")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("cv")), None);
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_json::to_string(&DocumentFormat::Markdown).unwrap(), "\"markdown\"");
        let parsed: DocumentFormat = serde_json::from_str("\"md\"").unwrap();
        assert_eq!(parsed, DocumentFormat::Markdown);
    }

    #[test]
    fn test_json_to_markdown_scenario() {
        let converter = ResumeConverter::default();
        let md = converter
            .convert(SCENARIO_JSON, DocumentFormat::Json, DocumentFormat::Markdown)
            .unwrap();

        let lines: Vec<&str> = md.lines().collect();
        assert!(lines.contains(&"### Eng (2020-2024)"));
        assert!(lines.contains(&"**Acme**"));
        assert!(lines.contains(&"Built things."));

        let back = converter.parse(&md, DocumentFormat::Markdown).unwrap();
        assert_eq!(back.sections.len(), 1);
        assert_eq!(back.sections[0].name, "Experience");
        let expected: ContentItem = [
            ("job title", "Eng"),
            ("Duration", "2020-2024"),
            ("Organization", "Acme"),
            ("Description", "Built things."),
        ]
        .into_iter()
        .collect();
        assert_eq!(back.sections[0].content, vec![expected]);
    }

    #[test]
    fn test_json_round_trip_keeps_ids() {
        let doc = from_json(SCENARIO_JSON).unwrap();
        let again = from_json(&to_json(&doc).unwrap()).unwrap();

        assert_eq!(doc, again);
        assert_eq!(again.sections[0].id, "x1");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse resume JSON"));
    }

    #[test]
    fn test_html_parse_never_errors() {
        let converter = ResumeConverter::default();
        let doc = converter.parse("<not-even-html", DocumentFormat::Html).unwrap();
        assert_eq!(doc.sections[0].name, "Error");
    }

    #[test]
    fn test_converter_uses_html_options() {
        let converter = ResumeConverter::new(HtmlOptions {
            escape_values: false,
            ..HtmlOptions::default()
        });
        let mut doc = ResumeDocument::new("<b>Bold</b>");
        doc.sections.push(Section::new("S"));

        let html = converter.render(&doc, DocumentFormat::Html).unwrap();
        assert!(html.contains("<h1><b>Bold</b></h1>"));
    }

    #[test]
    fn test_inspect_reports_templates_and_unclassified_keys() {
        let doc = from_json(
            r#"{"title": "T", "sections": [{"section name": "Mixed", "content": [
                {"Position": "Dev", "Company": "Initech", "Location": "Austin"},
                {"Hobby": "Chess"}
            ]}]}"#,
        )
        .unwrap();

        let reports = inspect(&doc);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].template, ItemTemplate::Experience);
        assert_eq!(
            reports[0].matched,
            vec![
                (FieldRole::Title, "Position".to_string()),
                (FieldRole::Organization, "Company".to_string())
            ]
        );
        assert_eq!(reports[0].unclassified, vec!["Location".to_string()]);
        assert_eq!(reports[1].template, ItemTemplate::Generic);
        assert_eq!(reports[1].unclassified, vec!["Hobby".to_string()]);
    }
}
