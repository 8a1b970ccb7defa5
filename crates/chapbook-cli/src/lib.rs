//! Chapbook CLI Library
//!
//! Command-line front-end: turns subcommands into Project calls.
//! Mutating commands persist the registry and then rebuild the output.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chapbook_core::{PhysicalFileSystem, Project, CONFIG_FILE_NAME};

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "chapbook")]
#[command(about = "Assemble ordered Markdown/HTML chapters into one HTML document", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Do not rebuild the output after changing the chapter list
    #[arg(long, global = true)]
    pub no_build: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file
    Init,

    /// Show chapters in document order
    List,

    /// Append a chapter
    Add { name: String, path: PathBuf },

    /// Insert a chapter before the given position
    Insert {
        name: String,
        path: PathBuf,
        #[arg(long)]
        before: usize,
    },

    /// Remove a chapter
    Remove { name: String },

    /// Set the complete chapter order
    Reorder {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Move one chapter to a new position
    Move { name: String, index: usize },

    /// Add every Markdown/HTML file under a directory
    Import { dir: PathBuf },

    /// Compile and write the output document
    Build,

    /// Compile without writing and report breakpoints per chapter
    Check,
}

impl Command {
    fn mutates_registry(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Insert { .. }
                | Command::Remove { .. }
                | Command::Reorder { .. }
                | Command::Move { .. }
                | Command::Import { .. }
        )
    }
}

/// Execute a parsed command, writing user-facing output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let fs = Arc::new(PhysicalFileSystem);

    if let Command::Init = cli.command {
        if Project::init(&cli.config, &*fs)? {
            writeln!(out, "created {}", cli.config.display())?;
        } else {
            writeln!(out, "{} already exists", cli.config.display())?;
        }
        return Ok(());
    }

    log::debug!("opening project {}", cli.config.display());
    let mut project = Project::open(&cli.config, fs)
        .with_context(|| format!("opening project {}", cli.config.display()))?;

    match &cli.command {
        Command::Init => {}
        Command::List => {
            for (pos, chapter) in project.registry().iter().enumerate() {
                writeln!(out, "{:>3}  {}  {}", pos, chapter.name, chapter.path.display())?;
            }
        }
        Command::Add { name, path } => {
            project
                .add_chapter(name, path.clone())
                .with_context(|| format!("adding chapter '{}'", name))?;
            writeln!(out, "added '{}'", name)?;
        }
        Command::Insert { name, path, before } => {
            project
                .insert_chapter(name, path.clone(), *before)
                .with_context(|| format!("inserting chapter '{}'", name))?;
            writeln!(out, "inserted '{}' at {}", name, before)?;
        }
        Command::Remove { name } => {
            project
                .remove_chapter(name)
                .with_context(|| format!("removing chapter '{}'", name))?;
            writeln!(out, "removed '{}'", name)?;
        }
        Command::Reorder { names } => {
            project
                .reorder_chapters(names.as_slice())
                .context("reordering chapters")?;
            writeln!(out, "reordered {} chapters", names.len())?;
        }
        Command::Move { name, index } => {
            project
                .move_chapter(name, *index)
                .with_context(|| format!("moving chapter '{}'", name))?;
            writeln!(out, "moved '{}' to {}", name, index)?;
        }
        Command::Import { dir } => {
            let report = project
                .import_dir(dir)
                .with_context(|| format!("importing {}", dir.display()))?;
            writeln!(out, "imported {} chapters", report.added.len())?;
            for name in &report.skipped {
                writeln!(out, "skipped '{}' (already present)", name)?;
            }
            for file in &report.invalid {
                writeln!(out, "skipped {} (not a usable chapter name)", file.display())?;
            }
        }
        Command::Build => build(&project, out)?,
        Command::Check => {
            let document = project.compile().context("compiling")?;
            for chapter in &document.chapters {
                writeln!(
                    out,
                    "{}  {:?}  {} breakpoints",
                    chapter.name, chapter.format, chapter.breakpoints
                )?;
            }
            writeln!(out, "ok: {} chapters", document.chapters.len())?;
        }
    }

    if cli.command.mutates_registry() && !cli.no_build {
        build(&project, out)?;
    }
    Ok(())
}

fn build(project: &Project, out: &mut dyn Write) -> Result<()> {
    let report = project.build().context("building output")?;
    if report.written {
        writeln!(out, "wrote {}", report.output.display())?;
    } else {
        writeln!(out, "{} is up to date", report.output.display())?;
    }
    Ok(())
}
