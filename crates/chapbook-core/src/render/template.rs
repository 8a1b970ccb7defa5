use std::fmt::Write;

use crate::model::Breakpoints;
use crate::utils::{escape_attr, escape_text};

const STYLESHEET: &str = r#"body {
    margin: 0;
    font-family: Arial, sans-serif;
}
.sidebar {
    height: 100%;
    width: 200px;
    position: fixed;
    z-index: 1;
    top: 0;
    left: 0;
    background-color: #111;
    overflow-x: hidden;
    padding-top: 20px;
}
.sidebar a {
    padding: 10px 15px;
    text-decoration: none;
    font-size: 18px;
    color: #818181;
    display: block;
}
.sidebar a:hover,
.collapsible:hover {
    background-color: #575757;
    color: #f1f1f1;
}
.sidebar a.active,
.collapsible.active {
    background-color: #ffffff;
    color: #000000;
}
.collapsible {
    padding: 10px 15px;
    font-size: 18px;
    color: #818181;
    display: block;
    cursor: pointer;
}
.sidebar a[class^="level-"] { padding-left: 65px; font-size: 12px; background-color: #f7f7f7; }
.sidebar a.level-1 { padding-left: 15px; font-size: 16px; background-color: #f7f7f7; }
.sidebar a.level-2 { padding-left: 25px; font-size: 14px; background-color: #f7f7f7; }
.sidebar a.level-3 { padding-left: 35px; font-size: 13px; background-color: #f7f7f7; }
.sidebar a.level-4 { padding-left: 45px; font-size: 12px; background-color: #f7f7f7; }
.sidebar a.level-5,
.sidebar a.level-6 { padding-left: 55px; font-size: 12px; background-color: #f7f7f7; }
.main-content {
    margin-left: 200px;
    padding: 0px 10px;
}
.hidden {
    display: none;
}"#;

const SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function() {
    document.querySelectorAll('.collapsible').forEach(function(collapsible) {
        collapsible.addEventListener('click', function() {
            var target = document.getElementById(this.getAttribute('href').slice(1));
            if (target) {
                target.scrollIntoView({ behavior: 'smooth' });
            }
            var children = document.getElementById(this.getAttribute('data-target').slice(1));
            if (children) {
                children.classList.toggle('collapse');
            }
        });
    });
});"#;

/// Sidebar block for one chapter: a label that scrolls to the chapter and
/// toggles the nested breakpoint links below it.
pub fn sidebar_entry(chapter: &str, breakpoints: &Breakpoints) -> String {
    let id = escape_attr(chapter);
    let mut out = String::new();

    let _ = writeln!(
        out,
        r##"<div class="collapsible" href="#{id}" data-toggle="collapse" data-target="#collapse-{id}">{}</div>"##,
        escape_text(chapter)
    );
    let _ = writeln!(out, r#"<div id="collapse-{id}" class="collapse">"#);
    for bp in breakpoints.iter() {
        let _ = writeln!(
            out,
            r##"<a class="level-{}" href="#{}">{}</a><br>"##,
            bp.level,
            escape_attr(&bp.name),
            escape_text(&bp.name)
        );
    }
    out.push_str("</div>\n");
    out
}

/// Body section for one chapter.
pub fn body_section(chapter: &str, content: &str) -> String {
    let mut out = String::with_capacity(content.len() + chapter.len() + 24);
    let _ = writeln!(out, r#"<div id="{}">"#, escape_attr(chapter));
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</div>\n");
    out
}

/// Wrap sidebar and body markup in the full page shell.
pub fn render_page(title: &str, sidebar: &str, body: &str) -> String {
    let mut out = String::with_capacity(STYLESHEET.len() + SCRIPT.len() + sidebar.len() + body.len() + 1024);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_text(title));
    let _ = writeln!(out, "<style>\n{}\n</style>", STYLESHEET);
    out.push_str(
        "<link rel=\"stylesheet\" href=\"https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css\">\n",
    );
    out.push_str(
        "<script src=\"https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/js/bootstrap.min.js\"></script>\n",
    );
    out.push_str(
        "<script type=\"text/javascript\" async src=\"https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.7/MathJax.js?config=TeX-MML-AM_CHTML\"></script>\n",
    );
    let _ = writeln!(out, "<script>\n{}\n</script>", SCRIPT);
    out.push_str("</head>\n<body>\n");

    out.push_str("<div class=\"sidebar\">\n");
    out.push_str(sidebar);
    out.push_str("</div>\n");

    out.push_str("<div class=\"main-content\">\n");
    out.push_str(body);
    out.push_str("</div>\n");

    out.push_str("</body>\n</html>\n");
    out
}
