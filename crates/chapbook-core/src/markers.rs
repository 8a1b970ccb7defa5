//! Breakpoint markers: `<!-- BREAKPOINT[_<level>]: <name> -->`.
//!
//! Extraction and anchor substitution are two independent passes over the
//! same grammar. Substitution looks each marker's name up in the extracted
//! set rather than relying on scan order.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::model::{Breakpoints, DEFAULT_BREAKPOINT_LEVEL};
use crate::utils::escape_attr;

/// How malformed markers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerMode {
    /// Bad levels and empty names are errors.
    #[default]
    Strict,
    /// Bad levels fall back to the default level; empty names are skipped.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerError {
    /// 1-based line in the converted content.
    pub line: usize,
    pub reason: String,
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // [ \t] instead of \s keeps every match on a single line.
    MARKER.get_or_init(|| {
        Regex::new(r"<!--[ \t]*BREAKPOINT(?:_([^:\n]*?))?[ \t]*:[ \t]*(.*?)[ \t]*-->")
            .expect("breakpoint pattern is valid")
    })
}

/// Scan `content` line by line and collect child name => level.
pub fn extract_breakpoints(content: &str, mode: MarkerMode) -> Result<Breakpoints, MarkerError> {
    let mut breakpoints = Breakpoints::new();

    for (idx, line) in content.lines().enumerate() {
        for caps in marker_regex().captures_iter(line) {
            let line_no = idx + 1;
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            if name.is_empty() {
                match mode {
                    MarkerMode::Strict => {
                        return Err(MarkerError {
                            line: line_no,
                            reason: "breakpoint has no chapter name".to_string(),
                        })
                    }
                    MarkerMode::Lenient => {
                        log::warn!("skipping unnamed breakpoint on line {}", line_no);
                        continue;
                    }
                }
            }

            let level = match caps.get(1) {
                None => DEFAULT_BREAKPOINT_LEVEL,
                Some(raw) => match parse_level(raw.as_str()) {
                    Some(level) => level,
                    None if mode == MarkerMode::Lenient => {
                        log::warn!(
                            "breakpoint '{}' has invalid level {:?}, using {}",
                            name,
                            raw.as_str(),
                            DEFAULT_BREAKPOINT_LEVEL
                        );
                        DEFAULT_BREAKPOINT_LEVEL
                    }
                    None => {
                        return Err(MarkerError {
                            line: line_no,
                            reason: format!(
                                "invalid level {:?} for breakpoint '{}'",
                                raw.as_str(),
                                name
                            ),
                        })
                    }
                },
            };

            breakpoints.insert(name.to_string(), level);
        }
    }

    Ok(breakpoints)
}

fn parse_level(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|level| *level >= 1)
}

/// Invisible zero-size anchor that replaces a marker.
pub fn anchor_tag(name: &str) -> String {
    format!(
        r#"<a id="{}" style="display: inline; height: 0; margin: 0; padding: 0;"></a>"#,
        escape_attr(name)
    )
}

/// Replace every marker whose name is in `breakpoints` with its anchor.
/// Markers that were not extracted are left as they are.
pub fn insert_anchors(content: &str, breakpoints: &Breakpoints) -> String {
    if breakpoints.is_empty() {
        return content.to_string();
    }

    marker_regex()
        .replace_all(content, |caps: &Captures| {
            let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            if breakpoints.level_of(name).is_some() {
                anchor_tag(name)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_and_levels(bps: &Breakpoints) -> Vec<(String, u8)> {
        bps.iter().map(|bp| (bp.name.clone(), bp.level)).collect()
    }

    #[test]
    fn test_extract_default_level() {
        let bps = extract_breakpoints("<p>x</p>\n<!-- BREAKPOINT: Intro -->\n", MarkerMode::Strict)
            .unwrap();
        assert_eq!(names_and_levels(&bps), vec![("Intro".to_string(), 2)]);
    }

    #[test]
    fn test_extract_explicit_levels_and_spacing() {
        let content = "<!--BREAKPOINT_3:Deep Dive-->\n<!--   BREAKPOINT_1 :  Top   -->";
        let bps = extract_breakpoints(content, MarkerMode::Strict).unwrap();
        assert_eq!(
            names_and_levels(&bps),
            vec![("Deep Dive".to_string(), 3), ("Top".to_string(), 1)]
        );
    }

    #[test]
    fn test_extract_multiple_on_one_line() {
        let content = "<!-- BREAKPOINT: A --> text <!-- BREAKPOINT_4: B -->";
        let bps = extract_breakpoints(content, MarkerMode::Strict).unwrap();
        assert_eq!(
            names_and_levels(&bps),
            vec![("A".to_string(), 2), ("B".to_string(), 4)]
        );
    }

    #[test]
    fn test_repeated_name_keeps_position_takes_last_level() {
        let content = "<!-- BREAKPOINT: A -->\n<!-- BREAKPOINT: B -->\n<!-- BREAKPOINT_3: A -->";
        let bps = extract_breakpoints(content, MarkerMode::Strict).unwrap();
        assert_eq!(
            names_and_levels(&bps),
            vec![("A".to_string(), 3), ("B".to_string(), 2)]
        );
    }

    #[test]
    fn test_ordinary_comments_are_ignored() {
        let content = "<!-- just a note: hello -->\n<!-- BREAKPOINTS are cool -->";
        let bps = extract_breakpoints(content, MarkerMode::Strict).unwrap();
        assert!(bps.is_empty());
    }

    #[test]
    fn test_strict_rejects_bad_level() {
        let content = "ok\n<!-- BREAKPOINT_x: Intro -->";
        let err = extract_breakpoints(content, MarkerMode::Strict).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("\"x\""), "{}", err.reason);

        let err = extract_breakpoints("<!-- BREAKPOINT_0: Intro -->", MarkerMode::Strict)
            .unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_strict_rejects_empty_name() {
        let err = extract_breakpoints("<!-- BREAKPOINT: -->", MarkerMode::Strict).unwrap_err();
        assert!(err.reason.contains("no chapter name"));
    }

    #[test]
    fn test_lenient_defaults_bad_level_and_skips_empty() {
        let content = "<!-- BREAKPOINT_x: Intro -->\n<!-- BREAKPOINT: -->";
        let bps = extract_breakpoints(content, MarkerMode::Lenient).unwrap();
        assert_eq!(names_and_levels(&bps), vec![("Intro".to_string(), 2)]);
    }

    #[test]
    fn test_insert_anchors_replaces_plain_and_leveled_markers() {
        let content = "<h1>T</h1>\n<!-- BREAKPOINT: Intro -->\n<p>a</p>\n<!-- BREAKPOINT_3: Deep -->";
        let bps = extract_breakpoints(content, MarkerMode::Strict).unwrap();
        let out = insert_anchors(content, &bps);

        assert!(!out.contains("BREAKPOINT"));
        assert_eq!(
            out,
            format!(
                "<h1>T</h1>\n{}\n<p>a</p>\n{}",
                anchor_tag("Intro"),
                anchor_tag("Deep")
            )
        );
    }

    #[test]
    fn test_insert_anchors_matches_by_name_not_position() {
        let content = "<!-- BREAKPOINT: B -->\n<!-- BREAKPOINT: A -->";
        let mut bps = Breakpoints::new();
        bps.insert("A".to_string(), 2);
        bps.insert("B".to_string(), 2);

        let out = insert_anchors(content, &bps);
        assert_eq!(out, format!("{}\n{}", anchor_tag("B"), anchor_tag("A")));
    }

    #[test]
    fn test_insert_anchors_leaves_unknown_markers() {
        let content = "<!-- BREAKPOINT: A -->\n<!-- BREAKPOINT: -->";
        let bps = extract_breakpoints(content, MarkerMode::Lenient).unwrap();
        let out = insert_anchors(content, &bps);
        assert!(out.ends_with("<!-- BREAKPOINT: -->"));
        assert!(out.starts_with(&anchor_tag("A")));
    }

    #[test]
    fn test_anchor_tag_escapes_name() {
        assert_eq!(
            anchor_tag(r#"Q&A "x""#),
            r#"<a id="Q&amp;A &quot;x&quot;" style="display: inline; height: 0; margin: 0; padding: 0;"></a>"#
        );
    }
}
