//! Command-line interface for archlens.

use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::analysis::{Analyzer, FsLoader};
use crate::config::{self, Config, DEFAULT_CONFIG_NAMES};
use crate::diagram;
use crate::report::{self, GateOutcome};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Output formats accepted by `--format`.
const FORMATS: &[&str] = &["pretty", "json", "plantuml"];

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules", "build", "target", "out", "bin"];

/// Directories holding test sources, skipped unless test files are included.
const TEST_DIRS: &[&str] = &["test", "tests", "testdata", "test_data"];

lazy_static! {
    /// `FooTest.java`, `FooTests.java`, `FooIT.java`
    static ref TEST_FILE: Regex = Regex::new(r"(?:Test|Tests|IT)\.[A-Za-z]+$").unwrap();
}

/// Architecture metrics and class diagrams for Java-like source trees.
///
/// Archlens finds class and interface declarations without a compiler,
/// classifies the relationships between them (inheritance, composition,
/// aggregation, association, dependency), and reports coupling,
/// instability, abstractness and distance from the main sequence.
#[derive(Parser)]
#[command(name = "archlens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source tree
    Analyze(AnalyzeArgs),
    /// Write a default archlens config file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or plantuml
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Write json or plantuml output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when any type's distance from the main sequence exceeds this
    #[arg(long)]
    pub max_distance: Option<f64>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "archlens.yaml")]
    pub output: PathBuf,
}

/// Commented default config written by `archlens init`.
const DEFAULT_CONFIG: &str = include_str!("templates/default.yaml");

/// Whether a file name looks like a test source.
pub fn is_test_file(name: &str) -> bool {
    TEST_FILE.is_match(name)
}

/// Collect files under `root`, as `/`-separated paths relative to it,
/// sorted for a stable order.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<String>> {
    let include_tests = config.should_include_test_files();
    let excluded = config.exclusion_matcher()?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            let name: &str = &name;
            // Skip hidden directories
            if name.starts_with('.') {
                return false;
            }
            // Skip vendor and build output directories
            if SKIPPED_DIRS.contains(&name) {
                return false;
            }
            include_tests || !TEST_DIRS.contains(&name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !include_tests && is_test_file(&name) {
            continue;
        }

        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if excluded.is_match(&rel) {
            debug!(path = %rel, "excluded by config");
            continue;
        }
        files.push(rel);
    }

    Ok(files)
}

/// Find the config to use: the explicit path, or one discovered in the
/// current directory, or none.
fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => Config::discover(Path::new(".")),
    };
    match path {
        Some(p) => {
            let config = Config::parse_file(&p)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", p.display(), e))?;
            Ok((config, Some(p)))
        }
        None => Ok((Config::default(), None)),
    }
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Validate format
    if !FORMATS.contains(&args.format.as_str()) {
        eprintln!(
            "Error: invalid format {:?}, must be one of: {}",
            args.format,
            FORMATS.join(", ")
        );
        return Ok(EXIT_ERROR);
    }
    if args.output.is_some() && args.format == "pretty" {
        eprintln!("Error: --output requires --format json or plantuml");
        return Ok(EXIT_ERROR);
    }

    // Load config if present
    let (mut config, config_path) = match resolve_config(args.config.as_deref()) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if args.max_distance.is_some() {
        config.max_distance = args.max_distance;
    }

    // Validate config
    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // Collect files relative to a base directory
    let (base_dir, files) = if abs_path.is_dir() {
        let files = collect_files(&abs_path, &config)?;
        (abs_path.clone(), files)
    } else {
        let parent = abs_path.parent().unwrap_or(Path::new("/")).to_path_buf();
        let name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (parent, vec![name])
    };
    debug!(files = files.len(), base = %base_dir.display(), "collected files");

    // An empty tree still produces a (header-only) report below
    if files.is_empty() {
        eprintln!("Warning: no files to analyze");
    }

    // Run analysis
    let analyzer = Analyzer::from_config(&config);
    let loader = FsLoader::new(&base_dir);
    let result = match analyzer.analyze(&files, &loader) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if !files.is_empty() && !result.has_types() {
        eprintln!("Warning: no type declarations found");
    }

    let gate = GateOutcome::evaluate(&result, config.max_distance);

    // Output results
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());
    let path_str = args.path.to_string_lossy().to_string();

    match args.format.as_str() {
        "json" => {
            let json = report::build_json_report(&path_str, config_str.as_deref(), &result, &gate);
            let mut out = open_output(args.output.as_deref())?;
            report::write_json(&mut out, &json)?;
            out.flush()?;
        }
        "plantuml" => {
            let uml = diagram::render_with(&result, &config.diagram);
            let mut out = open_output(args.output.as_deref())?;
            writeln!(out, "{}", uml)?;
            out.flush()?;
        }
        _ => {
            report::write_pretty(&path_str, config_str.as_deref(), &result, &gate);
        }
    }

    // Return appropriate exit code
    if gate.passed() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Stdout, or a freshly created file.
fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .map_err(|e| anyhow::anyhow!("failed to create {}: {}", p.display(), e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_CONFIG) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: archlens analyze . --config {}", args.output.display());
    if !DEFAULT_CONFIG_NAMES.iter().any(|n| args.output.ends_with(n)) {
        println!(
            "  (only {} are picked up without --config)",
            DEFAULT_CONFIG_NAMES.join(" and ")
        );
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "class X {}").unwrap();
    }

    #[test]
    fn test_is_test_file() {
        assert!(is_test_file("OrderTest.java"));
        assert!(is_test_file("OrderTests.java"));
        assert!(is_test_file("OrderIT.java"));
        assert!(!is_test_file("Order.java"));
        assert!(!is_test_file("Testing.java"));
    }

    #[test]
    fn test_collect_files_skips_noise() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/main/java/App.java");
        touch(temp.path(), "src/main/java/AppTest.java");
        touch(temp.path(), "src/test/java/Helper.java");
        touch(temp.path(), ".git/objects/Blob.java");
        touch(temp.path(), "target/classes/Gen.java");
        touch(temp.path(), "src/generated/Proto.java");
        touch(temp.path(), "README.md");

        let config = Config {
            excluded_paths: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(temp.path(), &config).unwrap();
        assert_eq!(files, vec!["README.md", "src/main/java/App.java"]);
    }

    #[test]
    fn test_collect_files_with_tests() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/main/java/App.java");
        touch(temp.path(), "src/test/java/AppTest.java");

        let config = Config {
            include_test_files: Some(true),
            ..Default::default()
        };
        let files = collect_files(temp.path(), &config).unwrap();
        assert_eq!(files, vec!["src/main/java/App.java", "src/test/java/AppTest.java"]);
    }

    #[test]
    fn test_init_writes_parseable_config() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("archlens.yaml");
        let code = run_init(&InitArgs {
            output: output.clone(),
        })
        .unwrap();
        assert_eq!(code, EXIT_SUCCESS);

        let config = Config::parse_file(&output).unwrap();
        assert!(config::validate(&config).is_ok());

        // Refuses to overwrite
        let code = run_init(&InitArgs { output }).unwrap();
        assert_eq!(code, EXIT_ERROR);
    }
}
