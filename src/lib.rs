//! Pulls a topic → questions mapping out of an HTML page.
//!
//! Paragraphs that look like a title open a topic; the text of later
//! paragraphs and `<ul>` items is collected under it until the next title.

pub mod document;
pub mod error;
pub mod extract;
pub mod output;

use std::path::Path;

pub use document::Element;
pub use error::{Error, Result};
pub use extract::{extract, is_valid_topic, QuestionsByTopic};

pub const DEFAULT_INPUT: &str = "questions.html";
pub const DEFAULT_OUTPUT: &str = "questions.json";

pub fn extract_file(path: &Path) -> Result<QuestionsByTopic> {
    let elements = document::load_elements(path)?;
    Ok(extract(elements))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Escape everything outside printable ASCII as `\uXXXX`.
    pub ensure_ascii: bool,
    /// Echo the JSON to stdout before writing the file.
    pub print: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ensure_ascii: true,
            print: true,
        }
    }
}

/// Read, extract, render and write in one go. Returns the rendered JSON.
pub fn convert(input: &Path, output: &Path, options: ConvertOptions) -> Result<String> {
    let questions = extract_file(input)?;
    let json = output::to_json_pretty(&questions, options.ensure_ascii)?;
    output::emit(&json, output, options.print)?;
    Ok(json)
}
