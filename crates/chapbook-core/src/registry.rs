use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::model::Chapter;
use crate::vfs::FileSystem;

/// Ordered chapter name => source path mapping.
///
/// Iteration order is document order. Every mutation either succeeds
/// completely or leaves the registry untouched.
#[derive(Debug, Clone, Default)]
pub struct ChapterRegistry {
    chapters: Vec<Chapter>,
    index: HashMap<String, usize>,
}

impl PartialEq for ChapterRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.chapters == other.chapters
    }
}

impl Eq for ChapterRegistry {}

impl ChapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted registry. A missing file yields an empty registry.
    pub fn load(path: &Path, fs: &dyn FileSystem) -> Result<Self> {
        if !fs.exists(path) {
            log::debug!("no registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let text = fs.read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text).map_err(|e| Error::RegistryFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn persist(&self, path: &Path, fs: &dyn FileSystem) -> Result<()> {
        let json = self.to_json().map_err(|e| Error::RegistryFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs.write_atomic(path, json.as_bytes())
            .map_err(|e| Error::io(path, e))
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn add(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<()> {
        let at = self.chapters.len();
        self.insert(name, path, at)
    }

    /// Insert before `before_index`; `len()` appends.
    pub fn insert(&mut self, name: &str, path: impl Into<PathBuf>, before_index: usize) -> Result<()> {
        validate_name(name)?;
        if self.index.contains_key(name) {
            return Err(Error::DuplicateChapter(name.to_string()));
        }
        if before_index > self.chapters.len() {
            return Err(Error::IndexOutOfRange {
                index: before_index,
                max: self.chapters.len(),
            });
        }

        let path: PathBuf = path.into();
        if path.to_str().is_none() {
            return Err(Error::InvalidChapterPath(path));
        }
        self.chapters.insert(before_index, Chapter::new(name, path));
        self.reindex_from(before_index);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Chapter> {
        let pos = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let removed = self.chapters.remove(pos);
        self.index.remove(name);
        self.reindex_from(pos);
        Ok(removed)
    }

    /// Replace the iteration order. `names` must be a permutation of the
    /// current chapter names.
    pub fn reorder<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.chapters.len() {
            return Err(Error::InvalidOrder(format!(
                "expected {} names, got {}",
                self.chapters.len(),
                names.len()
            )));
        }

        let mut seen = vec![false; self.chapters.len()];
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let pos = self
                .position(name)
                .ok_or_else(|| Error::InvalidOrder(format!("unknown chapter '{}'", name)))?;
            if seen[pos] {
                return Err(Error::InvalidOrder(format!("chapter '{}' listed twice", name)));
            }
            seen[pos] = true;
            order.push(pos);
        }

        let mut old: Vec<Option<Chapter>> = self.chapters.drain(..).map(Some).collect();
        self.chapters = order
            .into_iter()
            .filter_map(|pos| old[pos].take())
            .collect();
        self.reindex_from(0);
        Ok(())
    }

    /// Move one chapter so that it ends up at `to_index`.
    pub fn move_chapter(&mut self, name: &str, to_index: usize) -> Result<()> {
        let from = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        if to_index >= self.chapters.len() {
            return Err(Error::IndexOutOfRange {
                index: to_index,
                max: self.chapters.len() - 1,
            });
        }

        let chapter = self.chapters.remove(from);
        self.chapters.insert(to_index, chapter);
        self.reindex_from(from.min(to_index));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Chapter> {
        self.position(name).map(|pos| &self.chapters[pos])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    fn reindex_from(&mut self, start: usize) {
        for (pos, chapter) in self.chapters.iter().enumerate().skip(start) {
            self.index.insert(chapter.name.clone(), pos);
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidChapterName(name.to_string()));
    }
    Ok(())
}

impl Serialize for ChapterRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.name, &chapter.path)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChapterRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = ChapterRegistry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object mapping chapter names to file paths")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        use serde::de::Error as _;

        let mut registry = ChapterRegistry::new();
        while let Some((name, path)) = access.next_entry::<String, PathBuf>()? {
            registry.add(&name, path).map_err(A::Error::custom)?;
        }
        Ok(registry)
    }
}
