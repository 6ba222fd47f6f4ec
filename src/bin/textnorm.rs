//! CLI tool to normalize text read from stdin or a file.
//!
//! Usage:
//!   textnorm norm < input.txt
//!   textnorm lf trail -i input.txt -o out/normalized.txt
//!   textnorm --list

use clap::Parser;
use log::debug;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use textnorm::{Catalog, Execution, Pipeline};
use tracing_subscriber::EnvFilter;

/// Apply named text transformers, in order, to UTF-8 input.
///
/// With no keys the input is copied through unchanged.
#[derive(Parser)]
#[command(name = "textnorm", version)]
struct Cli {
    /// Transformer keys to apply, in order (see --list)
    keys: Vec<String>,

    /// Read input from file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List the available transformer keys and exit
    #[arg(short, long)]
    list: bool,

    /// Run each stage on its own thread
    #[arg(short, long)]
    threaded: bool,

    /// Log stage and rune count details on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "textnorm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("textnorm: error: {message}");
    process::exit(1);
}

fn open_input(path: Option<&Path>) -> Box<dyn Read + Send> {
    match path {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(e) => fail(format_args!("cannot open input '{}': {e}", path.display())),
        },
        None => Box::new(io::stdin()),
    }
}

/// Creating the output truncates it, so it must not be the input file.
fn check_distinct(input: Option<&Path>, output: Option<&Path>) {
    let (Some(input), Some(output)) = (input, output) else {
        return;
    };
    if let (Ok(a), Ok(b)) = (fs::canonicalize(input), fs::canonicalize(output))
        && a == b
    {
        fail(format_args!(
            "input and output are the same file: '{}'",
            output.display()
        ));
    }
}

fn create_output(path: &Path) -> File {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        fail(format_args!(
            "cannot create output directory for '{}': {e}",
            path.display()
        ));
    }
    match File::create(path) {
        Ok(file) => file,
        Err(e) => fail(format_args!("cannot create output '{}': {e}", path.display())),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = Catalog::standard();
    if cli.list {
        print!("{}", catalog.usage());
        return;
    }

    // Unknown keys are reported before any input is read.
    let transformer = match catalog.resolve(&cli.keys) {
        Ok(transformer) => transformer,
        Err(e) => fail(format_args!("{e}\navailable transformers:\n{}", catalog.usage())),
    };

    let execution = if cli.threaded {
        Execution::Threaded
    } else {
        Execution::Inline
    };
    debug!("keys {:?}, {execution:?} execution", cli.keys);

    check_distinct(cli.input.as_deref(), cli.output.as_deref());

    let pipeline = Pipeline::new(transformer).execution(execution);
    let input = open_input(cli.input.as_deref());
    let result = match &cli.output {
        Some(path) => pipeline.run(input, create_output(path)),
        None => pipeline.run(input, io::stdout().lock()),
    };

    match result {
        Ok(summary) => {
            debug!("{} rune(s) in, {} rune(s) out", summary.runes_in, summary.runes_out);
        }
        Err(e) => fail(e),
    }
}
