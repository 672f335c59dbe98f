pub mod classifier;
pub mod cli;
pub mod converter;
pub mod core;
pub mod editor;
pub mod types;
pub mod utils;
pub mod web;

pub use converter::{
    from_html, from_json, from_markdown, inspect, to_html, to_json, to_markdown, DocumentFormat,
    ResumeConverter,
};
pub use editor::blank_template;
pub use types::{ContentItem, ResumeDocument, Section};
pub use web::start_web_server;
