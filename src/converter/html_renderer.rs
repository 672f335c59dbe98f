// src/converter/html_renderer.rs
//! Standalone HTML rendering. The class names emitted here are the contract
//! the HTML parser relies on.

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, Classification, FieldMatch, ItemTemplate};
use crate::types::{ContentItem, ResumeDocument};
use crate::utils::html_escape;

const STYLESHEET: &str = r#"
    body { font-family: "Helvetica Neue", Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 40px 24px; color: #222; line-height: 1.5; }
    h1 { font-size: 2em; margin-bottom: 0.5em; border-bottom: 2px solid #14A4E6; padding-bottom: 0.2em; }
    .section { margin-top: 1.5em; }
    .section-title { font-size: 1.3em; color: #14A4E6; text-transform: uppercase; letter-spacing: 0.05em; margin-bottom: 0.5em; }
    .item { margin-bottom: 1em; }
    .item-title, .item-degree { font-size: 1.1em; margin: 0; }
    .item-duration { color: #757575; font-style: italic; margin: 0; }
    .item-organization { font-weight: bold; margin: 0.2em 0; }
    .item-description { margin: 0.4em 0; white-space: pre-line; }
    .item-gpa { margin: 0.2em 0; }
    .skills-category { font-weight: bold; }
    .field-label { font-weight: bold; }
    .generic-field { margin: 0.1em 0; }
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Escape field values before interpolation. Disabling reproduces raw
    /// interpolation, which lets markup in values through unchanged.
    pub escape_values: bool,
    pub lang: String,
    /// Appended to the built-in stylesheet
    pub extra_css: Option<String>,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            escape_values: true,
            lang: "en".to_string(),
            extra_css: None,
        }
    }
}

pub fn to_html(doc: &ResumeDocument) -> String {
    to_html_with(doc, &HtmlOptions::default())
}

pub fn to_html_with(doc: &ResumeDocument, options: &HtmlOptions) -> String {
    let renderer = HtmlRenderer { options };
    renderer.document(doc)
}

struct HtmlRenderer<'o> {
    options: &'o HtmlOptions,
}

impl HtmlRenderer<'_> {
    fn text(&self, value: &str) -> String {
        if self.options.escape_values {
            html_escape(value)
        } else {
            value.to_string()
        }
    }

    fn document(&self, doc: &ResumeDocument) -> String {
        let mut html = String::new();
        let title = self.text(&doc.title);

        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(
            "<html lang=\"{}\">\n",
            html_escape(&self.options.lang)
        ));
        html.push_str("<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str("<style>");
        html.push_str(STYLESHEET);
        if let Some(css) = &self.options.extra_css {
            html.push_str(css);
            html.push('\n');
        }
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", title));

        for section in &doc.sections {
            html.push_str(&format!(
                "<div class=\"section\" data-id=\"{}\">\n",
                html_escape(&section.id)
            ));
            html.push_str(&format!(
                "<h2 class=\"section-title\">{}</h2>\n",
                self.text(&section.name)
            ));
            for item in &section.content {
                html.push_str(&self.item(item));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn item(&self, item: &ContentItem) -> String {
        let fields = classify(item);

        let body = match fields.template() {
            ItemTemplate::Experience => self.heading_item(&fields, fields.title, "item-title"),
            ItemTemplate::Education => self.heading_item(&fields, fields.degree, "item-degree"),
            ItemTemplate::Skills => match (fields.category, fields.skills) {
                (Some(category), Some(skills)) => format!(
                    "<span class=\"skills-category\" data-key=\"{}\">{}:</span> <span class=\"skills-list\" data-key=\"{}\">{}</span>\n",
                    html_escape(category.key),
                    self.text(category.value),
                    html_escape(skills.key),
                    self.text(skills.value)
                ),
                _ => self.generic_fields(item),
            },
            ItemTemplate::Generic => self.generic_fields(item),
        };

        let class = match fields.template() {
            ItemTemplate::Skills => "item skills-item",
            _ => "item",
        };
        format!("<div class=\"{}\">\n{}</div>\n", class, body)
    }

    fn field(&self, tag: &str, class: &str, field: FieldMatch<'_>) -> String {
        format!(
            "<{tag} class=\"{class}\" data-key=\"{}\">{}</{tag}>\n",
            html_escape(field.key),
            self.text(field.value)
        )
    }

    fn heading_item(
        &self,
        fields: &Classification<'_>,
        heading: Option<FieldMatch<'_>>,
        heading_class: &str,
    ) -> String {
        let mut html = String::new();

        if let Some(heading) = heading {
            html.push_str(&self.field("h3", heading_class, heading));
        }
        if let Some(duration) = fields.duration {
            html.push_str(&self.field("p", "item-duration", duration));
        }
        if let Some(org) = fields.organization {
            html.push_str(&self.field("p", "item-organization", org));
        }

        match fields.template() {
            ItemTemplate::Experience => {
                if let Some(description) = fields.description {
                    html.push_str(&self.field("p", "item-description", description));
                }
            }
            _ => {
                if let Some(gpa) = fields.gpa {
                    html.push_str(&format!(
                        "<p class=\"item-gpa\" data-key=\"{}\"><span class=\"field-label\">GPA:</span> <span class=\"field-value\">{}</span></p>\n",
                        html_escape(gpa.key),
                        self.text(gpa.value)
                    ));
                }
            }
        }

        html
    }

    fn generic_fields(&self, item: &ContentItem) -> String {
        item.iter()
            .map(|(key, value)| {
                format!(
                    "<div class=\"generic-field\" data-key=\"{}\"><span class=\"field-label\">{}:</span> <span class=\"field-value\">{}</span></div>\n",
                    html_escape(key),
                    self.text(key),
                    self.text(value)
                )
            })
            .collect()
    }
}
