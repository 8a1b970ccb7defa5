use std::sync::OnceLock;

use regex::Regex;

fn style_block_regex() -> &'static Regex {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    STYLE.get_or_init(|| {
        Regex::new(r"(?is)(<!--.*?-->)|<style\b[^>]*>.*?</style\s*>")
            .expect("style pattern is valid")
    })
}

/// Remove every `<style>` element; all other markup is kept byte for byte.
/// Comments are matched first and kept whole.
pub fn strip_style_blocks(html: &str) -> String {
    style_block_regex().replace_all(html, "$1").into_owned()
}
