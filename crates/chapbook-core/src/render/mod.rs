//! Source conversion and page templating.

mod html;
mod markdown;
pub mod template;

pub use html::strip_style_blocks;
pub use markdown::markdown_to_html;

use crate::model::SourceFormat;

/// Turn a chapter's source text into the HTML that goes into its body section.
pub fn convert(text: &str, format: SourceFormat, math: bool) -> String {
    match format {
        SourceFormat::Markdown => markdown_to_html(text, math),
        SourceFormat::Html => strip_style_blocks(text),
    }
}
