use pulldown_cmark::{html, CowStr, Event, Options, Parser};

/// Convert Markdown to HTML.
///
/// With `math` enabled, `$...$` and `$$...$$` become MathJax `math/tex`
/// script blocks instead of literal text.
pub fn markdown_to_html(text: &str, math: bool) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    if math {
        options.insert(Options::ENABLE_MATH);
    }

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::InlineMath(tex) => Event::InlineHtml(math_script(&tex, false)),
        Event::DisplayMath(tex) => Event::InlineHtml(math_script(&tex, true)),
        other => other,
    });

    let mut html_output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

fn math_script(tex: &str, display: bool) -> CowStr<'static> {
    let kind = if display {
        "math/tex; mode=display"
    } else {
        "math/tex"
    };
    // A literal "</" would close the script element early.
    let body = tex.replace("</", "<\\/");
    CowStr::from(format!(r#"<script type="{}">{}</script>"#, kind, body))
}
