use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default nesting level of a breakpoint without an explicit `_<level>` suffix.
pub const DEFAULT_BREAKPOINT_LEVEL: u8 = 2;

/// A named unit of content backed by one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    pub path: PathBuf,
}

impl Chapter {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn format(&self) -> SourceFormat {
        SourceFormat::from_path(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Markdown,
    Html,
}

impl SourceFormat {
    /// `.md` (any case) is Markdown; everything else is treated as HTML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("md") => SourceFormat::Markdown,
            _ => SourceFormat::Html,
        }
    }
}

/// A sub-section declared inside a chapter with a breakpoint marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    pub level: u8,
}

/// Breakpoints of one chapter in first-seen order.
///
/// A repeated name keeps its original position and takes the latest level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakpoints {
    entries: Vec<Breakpoint>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, level: u8) {
        match self.entries.iter_mut().find(|bp| bp.name == name) {
            Some(existing) => existing.level = level,
            None => self.entries.push(Breakpoint { name, level }),
        }
    }

    pub fn level_of(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|bp| bp.name == name)
            .map(|bp| bp.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-chapter summary gathered while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterStats {
    pub name: String,
    pub format: SourceFormat,
    pub breakpoints: usize,
    pub bytes: usize,
}

/// The assembled output document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub sidebar: String,
    pub body: String,
    pub html: String,
    pub chapters: Vec<ChapterStats>,
    pub digest: String,
}

impl CompiledDocument {
    pub fn breakpoint_count(&self) -> usize {
        self.chapters.iter().map(|c| c.breakpoints).sum()
    }
}
