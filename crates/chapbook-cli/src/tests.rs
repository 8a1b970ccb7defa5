use crate::{run, Cli, Command};
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run_args(root: &Path, args: &[&str]) -> anyhow::Result<String> {
    let config = root.join("chapbook.yml");
    let mut argv = vec![
        "chapbook".to_string(),
        "--config".to_string(),
        config.to_string_lossy().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));

    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_parse_insert_requires_before() {
    assert!(Cli::try_parse_from(["chapbook", "insert", "A", "a.md"]).is_err());

    let cli = Cli::try_parse_from(["chapbook", "insert", "A", "a.md", "--before", "2"]).unwrap();
    match cli.command {
        Command::Insert { name, before, .. } => {
            assert_eq!(name, "A");
            assert_eq!(before, 2);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_parse_reorder_requires_names() {
    assert!(Cli::try_parse_from(["chapbook", "reorder"]).is_err());
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();

    let out = run_args(temp_dir.path(), &["init"]).unwrap();
    assert!(out.starts_with("created"));
    assert!(temp_dir.path().join("chapbook.yml").exists());

    let out = run_args(temp_dir.path(), &["init"]).unwrap();
    assert!(out.contains("already exists"));
}

#[test]
fn test_add_persists_and_builds() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("intro.md"), "# Intro\n\n<!-- BREAKPOINT: Goals -->\n").unwrap();

    let out = run_args(root, &["add", "Intro", "intro.md"]).unwrap();
    assert!(out.contains("added 'Intro'"));
    assert!(out.contains("wrote"));

    let map = fs::read_to_string(root.join("file_map.json")).unwrap();
    assert!(map.contains("\"Intro\""));
    let html = fs::read_to_string(root.join("main.html")).unwrap();
    assert!(html.contains("<div id=\"Intro\">"));
    assert!(html.contains(r##"<a class="level-2" href="#Goals">Goals</a>"##));
}

#[test]
fn test_no_build_skips_output() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    run_args(root, &["--no-build", "add", "Later", "later.md"]).unwrap();

    assert!(root.join("file_map.json").exists());
    assert!(!root.join("main.html").exists());
}

#[test]
fn test_list_reorder_move_remove() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    for name in ["a", "b", "c"] {
        fs::write(root.join(format!("{}.md", name)), name).unwrap();
        run_args(root, &["--no-build", "add", name, &format!("{}.md", name)]).unwrap();
    }

    run_args(root, &["--no-build", "reorder", "c", "a", "b"]).unwrap();
    run_args(root, &["--no-build", "move", "b", "0"]).unwrap();
    run_args(root, &["remove", "a"]).unwrap();

    let listing = run_args(root, &["list"]).unwrap();
    let names: Vec<&str> = listing
        .lines()
        .map(|line| line.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(names, vec!["b", "c"]);

    let html = fs::read_to_string(root.join("main.html")).unwrap();
    assert!(html.find("<div id=\"b\">").unwrap() < html.find("<div id=\"c\">").unwrap());
    assert!(!html.contains("<div id=\"a\">"));
}

#[test]
fn test_duplicate_add_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    run_args(root, &["--no-build", "add", "A", "a.md"]).unwrap();

    let err = run_args(root, &["--no-build", "add", "A", "b.md"]).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("adding chapter 'A'"), "{}", message);
    assert!(message.contains("already exists"), "{}", message);
}

#[test]
fn test_check_reports_missing_chapter_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    run_args(root, &["--no-build", "add", "Ghost", "ghost.md"]).unwrap();

    let err = run_args(root, &["check"]).unwrap_err();
    assert!(format!("{:#}", err).contains("Ghost"));
    assert!(!root.join("main.html").exists());
}

#[test]
fn test_import_then_check() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src").join("one.md"), "<!-- BREAKPOINT_3: Deep -->\n").unwrap();
    fs::write(root.join("src").join("two.html"), "<p>two</p>").unwrap();

    let out = run_args(root, &["--no-build", "import", "src"]).unwrap();
    assert!(out.contains("imported 2 chapters"));

    let out = run_args(root, &["check"]).unwrap();
    assert!(out.contains("one  Markdown  1 breakpoints"), "{}", out);
    assert!(out.contains("two  Html  0 breakpoints"), "{}", out);
    assert!(out.contains("ok: 2 chapters"));
}
