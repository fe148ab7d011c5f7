use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ctxpack::{
    assemble_context, filter_entries, language_for, walk, CtxpackError, PackOptions, Result,
    Session,
};

const LONG_HELP: &str = r#"
Workflow:
  1. ctxpack explore <PATH>   - Walk the project and record every file path
  2. Edit .ctxpack/.pathsignore to adjust exclusions
  3. ctxpack list             - Preview which files survive the patterns
  4. ctxpack pack             - Write the Markdown context document

Ignore patterns (.ctxpack/.pathsignore), one per line:
  node_modules     - Exclude this name wherever it appears
  /build           - Exclude only at the project root
  dist/            - Exclude directories (and everything beneath) only
  *.log            - Shell glob, tested against names and whole paths
  # ...            - Comment lines and blank lines are skipped

Examples:
  # Explore the current directory
  ctxpack explore .
  # Preview the included files as JSON
  ctxpack list --format json
  # Pack with a custom header and output path
  ctxpack pack --name "My Project" --summary "A web crawler." -o context.md

For more information, visit: https://github.com/ctxpack/ctxpack
"#;

/// Pack a project's text files into one Markdown document for LLM context.
#[derive(Parser, Debug)]
#[command(
    name = "ctxpack",
    version,
    about = "Pack a project's text files into one Markdown document for LLM context.",
    after_long_help = LONG_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory that holds the .ctxpack session data
    #[arg(
        long,
        value_name = "DIR",
        env = "CTXPACK_DIR",
        default_value = ".",
        global = true
    )]
    dir: PathBuf,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a project directory and record every file path for filtering
    Explore {
        /// The project directory to explore
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Show the files that survive the current ignore patterns
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: ListFormat,
    },
    /// Filter, read and pack the project files into a Markdown document
    Pack {
        /// Project name for the document header
        #[arg(short, long, default_value = "Unnamed Project")]
        name: String,

        /// A short summary of the project's goal
        #[arg(short, long, default_value = "No project summary provided.")]
        summary: String,

        /// Output file (defaults to .ctxpack/context.md)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListFormat {
    /// One path per line
    Plain,
    /// JSON array for scripting
    Json,
}

#[derive(Serialize)]
struct IncludedFileInfo {
    path: String,
    language: &'static str,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Command::Explore { path } => explore(&path, &cli.dir),
        Command::List { format } => list(format, &cli.dir),
        Command::Pack {
            name,
            summary,
            output,
        } => pack(name, summary, output, &cli.dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ctxpack={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn explore(path: &Path, base: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .map_err(|_| CtxpackError::RootNotFound {
            path: path.to_path_buf(),
        })?;

    let entries = walk(&root)?;

    let session = Session::new(base);
    session.initialize()?;
    session.write_root(&root)?;
    session.write_entries(&entries)?;

    let files = entries.iter().filter(|entry| !entry.is_dir).count();
    println!("Recorded {files} file paths under {}", root.display());
    println!(
        "Edit {} to adjust exclusions, then run 'ctxpack list' or 'ctxpack pack'.",
        session.ignore_path().display()
    );
    Ok(())
}

fn list(format: ListFormat, base: &Path) -> Result<()> {
    let session = Session::new(base);
    let entries = session.read_entries()?;
    let patterns = session.load_patterns();
    let included = filter_entries(&entries, &patterns);

    match format {
        ListFormat::Plain => {
            for file in &included {
                println!("{}", file.path);
            }
        }
        ListFormat::Json => {
            let infos: Vec<IncludedFileInfo> = included
                .into_iter()
                .map(|file| IncludedFileInfo {
                    language: language_for(&file.path),
                    path: file.path,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&infos)?);
        }
    }
    Ok(())
}

fn pack(name: String, summary: String, output: Option<PathBuf>, base: &Path) -> Result<()> {
    let session = Session::new(base);
    let root = session.read_root()?;
    let entries = session.read_entries()?;
    let patterns = session.load_patterns();
    let included = filter_entries(&entries, &patterns);

    let options = PackOptions {
        project_name: name,
        summary,
    };
    let document = assemble_context(&root, &included, &options);

    let output_path = output.unwrap_or_else(|| session.output_path());
    fs::write(&output_path, document)?;

    println!(
        "Packed {} included files into {}",
        included.len(),
        output_path.display()
    );
    Ok(())
}
