// src/converter/markdown_renderer.rs

use crate::classifier::{classify, Classification, ItemTemplate};
use crate::types::{ContentItem, ResumeDocument};

/// Render a document as Markdown.
///
/// Blocks (headings, paragraphs, items) are separated by blank lines; the
/// lines of a generic item stay consecutive so the parser can regroup them.
pub fn to_markdown(doc: &ResumeDocument) -> String {
    let mut blocks = vec![format!("# {}", doc.title)];

    for section in &doc.sections {
        blocks.push(format!("## {}", section.name));
        for item in &section.content {
            blocks.extend(render_item(item));
        }
    }

    let mut markdown = blocks.join("\n\n");
    markdown.push('\n');
    markdown
}

fn render_item(item: &ContentItem) -> Vec<String> {
    let fields = classify(item);

    match fields.template() {
        ItemTemplate::Experience => heading_block(&fields, fields.title.map(|m| m.value)),
        ItemTemplate::Education => {
            let mut blocks = heading_block(&fields, fields.degree.map(|m| m.value));
            if let Some(gpa) = fields.gpa {
                blocks.push(format!("GPA: {}", gpa.value));
            }
            blocks
        }
        ItemTemplate::Skills => match (fields.category, fields.skills) {
            (Some(category), Some(skills)) => {
                vec![format!("**{}:** {}", category.value, skills.value)]
            }
            _ => generic_block(item),
        },
        ItemTemplate::Generic => generic_block(item),
    }
}

// Shared heading / organization layout of experience and education items
fn heading_block(fields: &Classification<'_>, heading: Option<&str>) -> Vec<String> {
    let mut blocks = Vec::new();

    let heading = heading.unwrap_or_default();
    match fields.duration {
        Some(duration) => blocks.push(format!("### {} ({})", heading, duration.value)),
        None => blocks.push(format!("### {}", heading)),
    }

    if let Some(org) = fields.organization {
        blocks.push(format!("**{}**", org.value));
    }

    if fields.template() == ItemTemplate::Experience {
        if let Some(description) = fields.description {
            blocks.push(description.value.to_string());
        }
    }

    blocks
}

fn generic_block(item: &ContentItem) -> Vec<String> {
    let lines: Vec<String> = item
        .iter()
        .map(|(key, value)| format!("**{}:** {}", key, value))
        .collect();

    // an empty item still occupies a (blank) line
    vec![lines.join("\n")]
}
