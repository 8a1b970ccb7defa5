use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, TryLockError};

use crate::compiler::{write_output, CompileOptions, Compiler};
use crate::config::ChapbookConfig;
use crate::error::{Error, Result};
use crate::model::{Chapter, CompiledDocument};
use crate::registry::ChapterRegistry;
use crate::vfs::FileSystem;


/// Extensions picked up by [`Project::import_dir`].
pub const IMPORT_EXTENSIONS: &[&str] = &["md", "html", "htm"];

/// The Project is the high-level facade the front-end talks to.
///
/// *   **Mutations** go through `Project` methods. Each one changes the
///     registry and persists it; a failed mutation or a failed persist
///     leaves both the in-memory and on-disk registry as they were.
/// *   **Builds** compile the current registry and write the output file.
///     Compiling never mutates the registry, and only one compile may be in
///     flight per project.
///
/// Rebuilding after a mutation is the caller's job.
pub struct Project {
    root: PathBuf,
    config: ChapbookConfig,
    registry: ChapterRegistry,
    fs: Arc<dyn FileSystem>,
    compile_lock: Mutex<()>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub document: CompiledDocument,
    pub output: PathBuf,
    /// `false` when the output was already up to date
    pub written: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub added: Vec<String>,
    /// Chapter names that already existed
    pub skipped: Vec<String>,
    /// Files whose name cannot be used as a chapter name or stored path
    pub invalid: Vec<PathBuf>,
}

impl Project {
    /// Open the project described by `config_path`. A missing config file
    /// means defaults rooted at the config's directory.
    pub fn open(config_path: &Path, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let config = if fs.exists(config_path) {
            let text = fs
                .read_to_string(config_path)
                .map_err(|e| Error::io(config_path, e))?;
            ChapbookConfig::from_yaml(&text)?
        } else {
            log::debug!("no config at {}, using defaults", config_path.display());
            ChapbookConfig::default()
        };

        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self::new(root, config, fs)
    }

    pub fn new(root: PathBuf, config: ChapbookConfig, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let registry_path = root.join(&config.project.registry);
        let registry = ChapterRegistry::load(&registry_path, &*fs)?;
        log::debug!(
            "loaded {} chapters from {}",
            registry.len(),
            registry_path.display()
        );

        Ok(Self {
            root,
            config,
            registry,
            fs,
            compile_lock: Mutex::new(()),
        })
    }

    /// Write a default config to `config_path` unless one exists.
    /// Returns whether a file was created.
    pub fn init(config_path: &Path, fs: &dyn FileSystem) -> Result<bool> {
        if fs.exists(config_path) {
            return Ok(false);
        }
        let yaml = ChapbookConfig::default().to_yaml()?;
        fs.write_atomic(config_path, yaml.as_bytes())
            .map_err(|e| Error::io(config_path, e))?;
        Ok(true)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ChapbookConfig {
        &self.config
    }

    pub fn registry(&self) -> &ChapterRegistry {
        &self.registry
    }

    pub fn registry_path(&self) -> PathBuf {
        self.root.join(&self.config.project.registry)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.project.output)
    }

    pub fn source_root(&self) -> PathBuf {
        match &self.config.project.source_root {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Registry mutations (persisted immediately)
    // ------------------------------------------------------------------------

    pub fn add_chapter(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.mutate(|registry| registry.add(name, path))
    }

    pub fn insert_chapter(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
        before_index: usize,
    ) -> Result<()> {
        let path = path.into();
        self.mutate(|registry| registry.insert(name, path, before_index))
    }

    pub fn remove_chapter(&mut self, name: &str) -> Result<Chapter> {
        self.mutate(|registry| registry.remove(name))
    }

    pub fn reorder_chapters<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        self.mutate(|registry| registry.reorder(names))
    }

    pub fn move_chapter(&mut self, name: &str, to_index: usize) -> Result<()> {
        self.mutate(|registry| registry.move_chapter(name, to_index))
    }

    /// Add every Markdown/HTML file under `dir` as a chapter named after its
    /// file stem, in path order. Names already present are skipped.
    pub fn import_dir(&mut self, dir: &Path) -> Result<ImportReport> {
        let dir = self.root.join(dir);
        let files = self.fs.list_files(&dir, IMPORT_EXTENSIONS);
        let source_root = self.source_root();

        self.mutate(|registry| {
            let mut report = ImportReport::default();
            for file in files {
                let name = match file.file_stem().and_then(|s| s.to_str()) {
                    Some(name) if file.to_str().is_some() && !name.trim().is_empty() => name,
                    _ => {
                        log::warn!("skipping {}: not a usable chapter name", file.display());
                        report.invalid.push(file.clone());
                        continue;
                    }
                };
                if registry.contains(name) {
                    log::warn!("skipping {}: chapter '{}' already exists", file.display(), name);
                    report.skipped.push(name.to_string());
                    continue;
                }
                let stored = file
                    .strip_prefix(&source_root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| file.clone());
                registry.add(name, stored)?;
                report.added.push(name.to_string());
            }
            Ok(report)
        })
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut ChapterRegistry) -> Result<T>) -> Result<T> {
        let snapshot = self.registry.clone();
        let value = match op(&mut self.registry) {
            Ok(value) => value,
            Err(e) => {
                self.registry = snapshot;
                return Err(e);
            }
        };

        if let Err(e) = self.registry.persist(&self.registry_path(), &*self.fs) {
            self.registry = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    // ------------------------------------------------------------------------
    // Compilation
    // ------------------------------------------------------------------------

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            title: self.config.project.title.clone(),
            source_root: self.source_root(),
            math: self.config.render.math,
            marker_mode: self.config.marker_mode(),
        }
    }

    /// Compile without writing anything.
    pub fn compile(&self) -> Result<CompiledDocument> {
        let _guard = match self.compile_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(Error::CompileInProgress),
        };

        let options = self.compile_options();
        Compiler::new(&*self.fs, &options).compile(&self.registry)
    }

    /// Compile and write the output file. On error the previous output is
    /// left untouched.
    pub fn build(&self) -> Result<BuildReport> {
        let document = self.compile()?;
        let output = self.output_path();
        let written = write_output(&document, &output, &*self.fs)?;

        if self.config.logging.show_compile_stats {
            log::info!(
                "compiled {} chapters ({} breakpoints, {} bytes) into {} [{}]",
                document.chapters.len(),
                document.breakpoint_count(),
                document.html.len(),
                output.display(),
                &document.digest[..12]
            );
        }

        Ok(BuildReport {
            document,
            output,
            written,
        })
    }
}
