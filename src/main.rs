use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use treesim_core::{Method, OutputFormat, TreesimConfig, TreesimError};

#[derive(Parser)]
#[command(
    name = "treesim",
    version,
    about = "Compare two snapshots of a source tree, ignoring comments and blank lines",
    long_about = "treesim reports per-file similarity between two versions of a codebase,\n\
                  weighted by lines of code. Comments and blank lines are stripped before\n\
                  scoring, so documentation-only edits count as unchanged.\n\n\
                  Examples:\n  \
                    treesim dirs v1/ v2/                      Compare two directories\n  \
                    treesim dirs v1/ v2/ --exclude 'test_*'   Skip matching files\n  \
                    treesim revs --repo . v1.0.0 HEAD         Compare two git revisions\n  \
                    treesim init                              Write a default .treesim.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .treesim.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for the report.\n\n\
                       Formats:\n  \
                         text      Aligned table with a total row (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown table"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// Glob patterns to exclude (matched against relative path and file name)
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Glob patterns to include; when given, only matching files are compared
    #[arg(long, num_args = 1..)]
    include: Vec<String>,

    /// Comparison method: ratio or distance (default: ratio)
    #[arg(
        long,
        long_help = "Comparison method.\n\n\
                       ratio     Insert/delete edit ratio over both texts (default)\n  \
                       distance  Levenshtein distance normalized by the longer text"
    )]
    method: Option<Method>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two directory trees
    #[command(long_about = "Compare two directory trees.\n\n\
        Files are keyed by their path relative to each root. Files present on one\n\
        side only are reported as added or removed with 0% similarity.\n\n\
        Examples:\n  treesim dirs old/ new/\n  treesim dirs old/ new/ --method distance --include 'contracts/*'")]
    Dirs {
        /// Original tree
        original: PathBuf,
        /// Updated tree
        updated: PathBuf,
        #[command(flatten)]
        args: CompareArgs,
    },
    /// Compare two revisions of a git repository
    #[command(long_about = "Compare two revisions of a git repository.\n\n\
        Both revisions are exported to temporary directories and compared like\n\
        `treesim dirs`. The working tree is not touched.\n\n\
        Examples:\n  treesim revs v1.0.0 v2.0.0\n  treesim revs --repo ../project main~10 main")]
    Revs {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Original revision (commit, tag, or branch)
        original: String,
        /// Updated revision (commit, tag, or branch)
        updated: String,
        #[command(flatten)]
        args: CompareArgs,
    },
    /// Create a default .treesim.toml configuration file
    #[command(long_about = "Create a default .treesim.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .treesim.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const DEFAULT_CONFIG: &str = r#"# treesim configuration

# Comparison method: "ratio" or "distance"
method = "ratio"

[filter]
# Glob patterns matched against the relative path and the file name.
exclude = []
# When non-empty, only matching files are compared.
include = []

[walk]
# Descend into dot-files and dot-directories such as .git
hidden = false
# Skip paths listed in .gitignore files
gitignore = false

# Extra extension mappings (solidity, rust, python, vyper, scilla)
[languages]
# ".pyi" = "python"
"#;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TREESIM_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("treesim v{version}: comment-insensitive similarity between two source trees\n");

    println!("Quick start:");
    println!("  treesim dirs old/ new/           Compare two directories");
    println!("  treesim revs v1.0.0 HEAD         Compare two git revisions");
    println!("  treesim init                     Create a .treesim.toml config file\n");

    println!("Run 'treesim <command> --help' for details.");
}

fn apply_overrides(mut config: TreesimConfig, args: CompareArgs) -> TreesimConfig {
    config.filter.exclude.extend(args.exclude);
    config.filter.include.extend(args.include);
    if let Some(method) = args.method {
        config.method = method;
    }
    config
}

fn spinner(message: &'static str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

fn run_comparison(
    original: &Path,
    updated: &Path,
    config: &TreesimConfig,
    format: OutputFormat,
) -> Result<()> {
    let pb = spinner("Comparing trees...");
    let outcome = treesim_compare::compare_dirs(original, updated, config);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = match outcome {
        Ok(report) => report,
        Err(TreesimError::NoMatchingFiles) => {
            println!("No matching files found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Text => {
            for notice in &report.notices {
                println!("{notice}");
            }
            if !report.notices.is_empty() {
                println!();
            }
            print!("{report}");
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => TreesimConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".treesim.toml");
            if default_path.exists() {
                tracing::debug!(path = %default_path.display(), "loading config");
                TreesimConfig::from_file(default_path)?
            } else {
                TreesimConfig::default()
            }
        }
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!("method: {}", config.method);
    }

    match cli.command {
        None => print_welcome(),
        Some(Command::Dirs {
            original,
            updated,
            args,
        }) => {
            let config = apply_overrides(config, args);
            run_comparison(&original, &updated, &config, cli.format)?;
        }
        Some(Command::Revs {
            repo,
            original,
            updated,
            args,
        }) => {
            let config = apply_overrides(config, args);
            let left = tempfile::tempdir().into_diagnostic()?;
            let right = tempfile::tempdir().into_diagnostic()?;

            let left_count =
                treesim_compare::snapshot::export_revision(&repo, &original, left.path())?;
            let right_count =
                treesim_compare::snapshot::export_revision(&repo, &updated, right.path())?;
            if cli.verbose {
                eprintln!("exported {left_count} files at {original}, {right_count} at {updated}");
            }

            run_comparison(left.path(), right.path(), &config, cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".treesim.toml");
            if path.exists() {
                miette::bail!(".treesim.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .treesim.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "treesim", &mut std::io::stdout());
        }
    }

    Ok(())
}
