pub mod resume;

pub use resume::{ContentItem, ResumeDocument, Section};
