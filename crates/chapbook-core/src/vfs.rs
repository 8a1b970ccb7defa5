use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Abstract interface for file system operations.
pub trait FileSystem: Send + Sync {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// Replace `path` with `contents` so that readers see either the old
    /// file or the complete new one, never a partial write.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;

    /// List all files whose extension is one of `extensions` (case-insensitive)
    /// under the root directory, recursively, sorted by path.
    fn list_files(&self, root: &Path, extensions: &[&str]) -> Vec<PathBuf>;
}

/// Standard implementation of FileSystem using std::fs, tempfile and walkdir.
pub struct PhysicalFileSystem;

impl FileSystem for PhysicalFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn list_files(&self, root: &Path, extensions: &[&str]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    if extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)) {
                        files.push(path.to_path_buf());
                    }
                }
            }
        }

        files.sort();
        files
    }
}
