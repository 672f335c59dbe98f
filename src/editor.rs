// src/editor.rs
//! In-place document edits issued by the resume editor: section and item
//! add / delete / copy / paste / reorder, and field edits.

use anyhow::Result;

use crate::types::{ContentItem, ResumeDocument, Section};
use crate::utils::generate_id;

impl ResumeDocument {
    fn section_index(&self, id: &str) -> Result<usize> {
        self.sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| anyhow::anyhow!("Section not found: {}", id))
    }

    fn existing_section_mut(&mut self, id: &str) -> Result<&mut Section> {
        let index = self.section_index(id)?;
        Ok(&mut self.sections[index])
    }

    fn fresh_id(&self) -> String {
        let mut id = generate_id();
        while self.section(&id).is_some() {
            id = generate_id();
        }
        id
    }

    /// Append an empty section and return its id
    pub fn add_section(&mut self, name: impl Into<String>) -> String {
        let mut section = Section::new(name);
        section.id = self.fresh_id();
        let id = section.id.clone();
        self.sections.push(section);
        id
    }

    pub fn remove_section(&mut self, id: &str) -> Result<Section> {
        let index = self.section_index(id)?;
        Ok(self.sections.remove(index))
    }

    pub fn rename_section(&mut self, id: &str, name: impl Into<String>) -> Result<()> {
        self.existing_section_mut(id)?.name = name.into();
        Ok(())
    }

    /// Copy a section (with a new id) right after the original
    pub fn duplicate_section(&mut self, id: &str) -> Result<String> {
        let index = self.section_index(id)?;
        let mut copy = self.sections[index].clone();
        copy.id = self.fresh_id();
        let new_id = copy.id.clone();
        self.sections.insert(index + 1, copy);
        Ok(new_id)
    }

    /// Drag-and-drop reorder: remove at `from`, insert at `to`
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<()> {
        move_within(&mut self.sections, from, to, "section")
    }

    pub fn add_item(&mut self, section_id: &str, item: ContentItem) -> Result<usize> {
        let section = self.existing_section_mut(section_id)?;
        section.content.push(item);
        Ok(section.content.len() - 1)
    }

    /// Paste an item at `index` (equal to the length appends)
    pub fn insert_item(&mut self, section_id: &str, index: usize, item: ContentItem) -> Result<()> {
        let section = self.existing_section_mut(section_id)?;
        if index > section.content.len() {
            anyhow::bail!(
                "Item index {} out of range for section '{}' ({} items)",
                index,
                section.name,
                section.content.len()
            );
        }
        section.content.insert(index, item);
        Ok(())
    }

    pub fn remove_item(&mut self, section_id: &str, index: usize) -> Result<ContentItem> {
        let section = self.existing_section_mut(section_id)?;
        check_index(section, index)?;
        Ok(section.content.remove(index))
    }

    /// Copy an item right after the original and return the copy's index
    pub fn duplicate_item(&mut self, section_id: &str, index: usize) -> Result<usize> {
        let section = self.existing_section_mut(section_id)?;
        check_index(section, index)?;
        let copy = section.content[index].clone();
        section.content.insert(index + 1, copy);
        Ok(index + 1)
    }

    pub fn move_item(&mut self, section_id: &str, from: usize, to: usize) -> Result<()> {
        let section = self.existing_section_mut(section_id)?;
        move_within(&mut section.content, from, to, "item")
    }

    /// Drag an item into another section. The document is untouched when
    /// either end is invalid.
    pub fn move_item_between(
        &mut self,
        source_id: &str,
        from: usize,
        target_id: &str,
        to: usize,
    ) -> Result<()> {
        if source_id == target_id {
            return self.move_item(source_id, from, to);
        }

        let source = self.section_index(source_id)?;
        let target = self.section_index(target_id)?;
        check_index(&self.sections[source], from)?;
        if to > self.sections[target].content.len() {
            anyhow::bail!(
                "Item index {} out of range for section '{}'",
                to,
                self.sections[target].name
            );
        }

        let item = self.sections[source].content.remove(from);
        self.sections[target].content.insert(to, item);
        Ok(())
    }

    pub fn set_field(
        &mut self,
        section_id: &str,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let section = self.existing_section_mut(section_id)?;
        check_index(section, index)?;
        section.content[index].insert(key, value);
        Ok(())
    }

    pub fn remove_field(&mut self, section_id: &str, index: usize, key: &str) -> Result<Option<String>> {
        let section = self.existing_section_mut(section_id)?;
        check_index(section, index)?;
        Ok(section.content[index].remove(key))
    }
}

fn check_index(section: &Section, index: usize) -> Result<()> {
    if index >= section.content.len() {
        anyhow::bail!(
            "Item index {} out of range for section '{}' ({} items)",
            index,
            section.name,
            section.content.len()
        );
    }
    Ok(())
}

fn move_within<T>(list: &mut Vec<T>, from: usize, to: usize, what: &str) -> Result<()> {
    if from >= list.len() || to >= list.len() {
        anyhow::bail!(
            "Cannot move {} from {} to {}: only {} entries",
            what,
            from,
            to,
            list.len()
        );
    }
    let entry = list.remove(from);
    list.insert(to, entry);
    Ok(())
}

/// Starter document offered for a new resume
pub fn blank_template() -> ResumeDocument {
    let mut doc = ResumeDocument::new("Your Name - Your Title");

    doc.sections.push(Section::new("Summary").with_content(vec![[(
        "Summary",
        "A short overview of your experience and goals.",
    )]
    .into_iter()
    .collect()]));

    doc.sections.push(Section::new("Experience").with_content(vec![[
        ("job title", "Job Title"),
        ("Organization", "Company Name"),
        ("Duration", "2020 - Present"),
        ("Description", "Key responsibilities and achievements."),
    ]
    .into_iter()
    .collect()]));

    doc.sections.push(Section::new("Education").with_content(vec![[
        ("Degree", "Degree Name"),
        ("Organization", "University Name"),
        ("Duration", "2016 - 2020"),
        ("GPA", "4.0"),
    ]
    .into_iter()
    .collect()]));

    doc.sections.push(Section::new("Skills").with_content(vec![[
        ("Category", "Technical"),
        ("Skills", "Skill 1, Skill 2, Skill 3"),
    ]
    .into_iter()
    .collect()]));

    doc.ensure_unique_ids();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, ItemTemplate};

    fn item(pairs: &[(&str, &str)]) -> ContentItem {
        pairs.iter().copied().collect()
    }

    fn names(doc: &ResumeDocument) -> Vec<&str> {
        doc.sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_add_rename_remove_section() {
        let mut doc = ResumeDocument::new("T");
        let a = doc.add_section("A");
        let b = doc.add_section("B");
        assert_ne!(a, b);

        doc.rename_section(&a, "Alpha").unwrap();
        assert_eq!(names(&doc), vec!["Alpha", "B"]);

        let removed = doc.remove_section(&b).unwrap();
        assert_eq!(removed.name, "B");
        assert!(doc.remove_section(&b).is_err());
    }

    #[test]
    fn test_duplicate_section_gets_new_id_after_original() {
        let mut doc = ResumeDocument::new("T");
        let a = doc.add_section("A");
        doc.add_item(&a, item(&[("Hobby", "Chess")])).unwrap();
        doc.add_section("B");

        let copy = doc.duplicate_section(&a).unwrap();
        assert_ne!(copy, a);
        assert_eq!(names(&doc), vec!["A", "A", "B"]);
        assert_eq!(doc.sections[1].id, copy);
        assert_eq!(doc.sections[1].content, doc.sections[0].content);
    }

    #[test]
    fn test_move_section_keeps_ids() {
        let mut doc = ResumeDocument::new("T");
        let ids: Vec<String> = ["A", "B", "C"].iter().map(|n| doc.add_section(*n)).collect();

        doc.move_section(0, 2).unwrap();
        assert_eq!(names(&doc), vec!["B", "C", "A"]);
        assert_eq!(doc.sections[2].id, ids[0]);

        assert!(doc.move_section(0, 3).is_err());
        assert_eq!(names(&doc), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_item_operations() {
        let mut doc = ResumeDocument::new("T");
        let s = doc.add_section("S");
        doc.add_item(&s, item(&[("k", "1")])).unwrap();
        doc.add_item(&s, item(&[("k", "2")])).unwrap();

        assert_eq!(doc.duplicate_item(&s, 0).unwrap(), 1);
        doc.insert_item(&s, 3, item(&[("k", "3")])).unwrap();
        doc.move_item(&s, 3, 0).unwrap();

        let values: Vec<_> = doc.sections[0]
            .content
            .iter()
            .map(|i| i.get("k").unwrap())
            .collect();
        assert_eq!(values, vec!["3", "1", "1", "2"]);

        assert_eq!(doc.remove_item(&s, 0).unwrap(), item(&[("k", "3")]));
        assert!(doc.remove_item(&s, 10).is_err());
        assert!(doc.insert_item(&s, 10, ContentItem::new()).is_err());
    }

    #[test]
    fn test_move_item_between_sections() {
        let mut doc = ResumeDocument::new("T");
        let a = doc.add_section("A");
        let b = doc.add_section("B");
        doc.add_item(&a, item(&[("Hobby", "Chess")])).unwrap();

        assert!(doc.move_item_between(&a, 0, &b, 5).is_err());
        assert_eq!(doc.sections[0].content.len(), 1);

        doc.move_item_between(&a, 0, &b, 0).unwrap();
        assert!(doc.sections[0].content.is_empty());
        assert_eq!(doc.sections[1].content, vec![item(&[("Hobby", "Chess")])]);
    }

    #[test]
    fn test_field_edits() {
        let mut doc = ResumeDocument::new("T");
        let s = doc.add_section("S");
        doc.add_item(&s, item(&[("Hobby", "Chess")])).unwrap();

        doc.set_field(&s, 0, "job title", "Dev").unwrap();
        assert_eq!(classify(&doc.sections[0].content[0]).template(), ItemTemplate::Experience);

        assert_eq!(doc.remove_field(&s, 0, "Hobby").unwrap(), Some("Chess".to_string()));
        assert_eq!(doc.remove_field(&s, 0, "Hobby").unwrap(), None);
        assert!(doc.set_field("missing", 0, "k", "v").is_err());
    }

    #[test]
    fn test_blank_template_covers_every_template() {
        let doc = blank_template();
        let templates: Vec<_> = doc
            .sections
            .iter()
            .flat_map(|s| s.content.iter().map(|i| classify(i).template()))
            .collect();

        assert_eq!(
            templates,
            vec![
                ItemTemplate::Generic,
                ItemTemplate::Experience,
                ItemTemplate::Education,
                ItemTemplate::Skills
            ]
        );
        assert_eq!(doc.clone().ensure_unique_ids(), 0);
    }
}
