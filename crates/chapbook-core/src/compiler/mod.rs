use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::markers::{extract_breakpoints, insert_anchors, MarkerMode};
use crate::model::{Chapter, ChapterStats, CompiledDocument};
use crate::registry::ChapterRegistry;
use crate::render::{self, template};
use crate::utils::sha256_hex;
use crate::vfs::FileSystem;


#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub title: String,
    /// Base directory for relative chapter paths
    pub source_root: PathBuf,
    pub math: bool,
    pub marker_mode: MarkerMode,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "Chapbook".to_string(),
            source_root: PathBuf::from("."),
            math: true,
            marker_mode: MarkerMode::Strict,
        }
    }
}

/// Result of compiling a single chapter.
struct CompiledChapter {
    sidebar: String,
    body: String,
    stats: ChapterStats,
}

/// Assembles a registry's chapters into one HTML document.
///
/// Compilation is a pure function of the registry and the file contents it
/// points to: no timestamps, no randomness. Any chapter error aborts the
/// whole compile.
pub struct Compiler<'a> {
    fs: &'a dyn FileSystem,
    options: &'a CompileOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(fs: &'a dyn FileSystem, options: &'a CompileOptions) -> Self {
        Self { fs, options }
    }

    pub fn compile(&self, registry: &ChapterRegistry) -> Result<CompiledDocument> {
        let mut sidebar = String::new();
        let mut body = String::new();
        let mut chapters = Vec::with_capacity(registry.len());

        for chapter in registry.iter() {
            let compiled = self.compile_chapter(chapter)?;
            sidebar.push_str(&compiled.sidebar);
            body.push_str(&compiled.body);
            chapters.push(compiled.stats);
        }

        let html = template::render_page(&self.options.title, &sidebar, &body);
        let digest = sha256_hex(&html);

        Ok(CompiledDocument {
            sidebar,
            body,
            html,
            chapters,
            digest,
        })
    }

    fn compile_chapter(&self, chapter: &Chapter) -> Result<CompiledChapter> {
        let path = self.resolve(&chapter.path);
        let source = self
            .fs
            .read_to_string(&path)
            .map_err(|e| Error::SourceRead {
                chapter: chapter.name.clone(),
                path: path.clone(),
                source: e,
            })?;

        let format = chapter.format();
        let converted = render::convert(&source, format, self.options.math);

        let breakpoints = extract_breakpoints(&converted, self.options.marker_mode).map_err(
            |e| Error::MarkerParse {
                chapter: chapter.name.clone(),
                line: e.line,
                reason: e.reason,
            },
        )?;
        let content = insert_anchors(&converted, &breakpoints);

        log::debug!(
            "compiled chapter '{}' ({:?}, {} breakpoints, {} bytes)",
            chapter.name,
            format,
            breakpoints.len(),
            content.len()
        );

        Ok(CompiledChapter {
            sidebar: template::sidebar_entry(&chapter.name, &breakpoints),
            body: template::body_section(&chapter.name, &content),
            stats: ChapterStats {
                name: chapter.name.clone(),
                format,
                breakpoints: breakpoints.len(),
                bytes: content.len(),
            },
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.options.source_root.join(path)
        }
    }
}

/// Write the compiled document to `path`.
///
/// Returns `false` when the file on disk already has identical contents and
/// the write was skipped.
pub fn write_output(document: &CompiledDocument, path: &Path, fs: &dyn FileSystem) -> Result<bool> {
    if fs.exists(path) {
        if let Ok(existing) = fs.read_to_string(path) {
            if sha256_hex(&existing) == document.digest {
                log::debug!("{} is up to date, skipping write", path.display());
                return Ok(false);
            }
        }
    }

    fs.write_atomic(path, document.html.as_bytes())
        .map_err(|e| Error::io(path, e))?;
    Ok(true)
}
