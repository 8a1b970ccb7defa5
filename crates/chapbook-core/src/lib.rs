//! Chapbook Core Library
//!
//! Chapter registry, breakpoint markers and the HTML document compiler.
//! File access goes through the [`vfs::FileSystem`] trait.
//!

pub mod compiler;
pub mod config;
pub mod error;
pub mod markers;
pub mod model;
pub mod project;
pub mod registry;
pub mod render;
pub mod utils;
pub mod vfs;

pub use compiler::{write_output, CompileOptions, Compiler};
pub use config::{ChapbookConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use markers::MarkerMode;
pub use model::{Breakpoint, Breakpoints, Chapter, CompiledDocument, SourceFormat};
pub use project::{BuildReport, ImportReport, Project};
pub use registry::ChapterRegistry;
pub use vfs::{FileSystem, PhysicalFileSystem};
