use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("chapter '{0}' already exists")]
    DuplicateChapter(String),

    #[error("chapter '{0}' not found")]
    NotFound(String),

    #[error("index {index} is out of range (expected 0..={max})")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("new order does not match the current chapters: {0}")]
    InvalidOrder(String),

    #[error("invalid chapter name {0:?}")]
    InvalidChapterName(String),

    #[error("chapter path {} is not valid UTF-8", .0.display())]
    InvalidChapterPath(PathBuf),

    #[error("cannot read source of chapter '{chapter}' ({}): {source}", .path.display())]
    SourceRead {
        chapter: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed breakpoint in chapter '{chapter}' at line {line}: {reason}")]
    MarkerParse {
        chapter: String,
        line: usize,
        reason: String,
    },

    #[error("registry file {} is malformed: {reason}", .path.display())]
    RegistryFormat { path: PathBuf, reason: String },

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("a compile is already in progress for this project")]
    CompileInProgress,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
