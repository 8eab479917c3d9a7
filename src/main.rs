//! smpsearch: convert a simple query (JSON) into an Elasticsearch request body
//!
//! This is the command line entry point. The conversion itself lives in the
//! library.

use anyhow::{Context, Result};
use smpsearch::{
    config::{self, Settings},
    Converter, ElasticConverter, SimpleQuery,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Parsed command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    strict: bool,
    pretty: bool,
}

enum Command {
    Run(Options),
    Help,
    Version,
}

fn main() -> Result<()> {
    let options = match parse_args(std::env::args().skip(1))? {
        Command::Run(options) => options,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("smpsearch {}", smpsearch::VERSION);
            return Ok(());
        }
    };

    let settings = load_settings(options.config.as_deref())?;

    // Initialize logging; stdout carries the document, so log to stderr
    let level = if settings.general.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config::init(settings)?;

    let raw = read_input(options.input.as_ref())?;
    let query: SimpleQuery = serde_json::from_str(&raw).context("Invalid query JSON")?;
    debug!(
        "Parsed query with {} filters and {} aggregations",
        query.filters.len(),
        query.aggregations.len()
    );

    if options.strict {
        query.validate()?;
    }

    let mut converter = ElasticConverter::configured();
    if options.pretty {
        converter = converter.pretty(true);
    }
    info!("Converting query for {}", converter.name());

    println!("{}", converter.convert(&query));
    Ok(())
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Command> {
    let mut options = Options::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a file argument", arg))?;
                options.config = Some(PathBuf::from(path));
            }
            "--strict" => options.strict = true,
            "--pretty" => options.pretty = true,
            "-" => options.input = None,
            flag if flag.starts_with('-') => anyhow::bail!("Unknown option: {}", flag),
            path => options.input = Some(PathBuf::from(path)),
        }
    }

    Ok(Command::Run(options))
}

/// Read the query from a file, or stdin when no file is given
fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Load settings from an explicit path, a known location, or defaults
fn load_settings(explicit: Option<&std::path::Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        let mut settings = Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        settings.merge_env();
        return Ok(settings);
    }

    // Check environment variable first
    if let Ok(path) = std::env::var("SMPSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let paths = [
        PathBuf::from("smpsearch.yml"),
        PathBuf::from("config/smpsearch.yml"),
        dirs::config_dir()
            .map(|p| p.join("smpsearch/settings.yml"))
            .unwrap_or_default(),
    ];

    for path in paths.iter() {
        if path.is_file() {
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
smpsearch v{}
Convert a simple search query into an Elasticsearch request body

USAGE:
    smpsearch [OPTIONS] [FILE]

Reads the query JSON from FILE, or from stdin when FILE is absent or "-".

OPTIONS:
    -c, --config <FILE>    Path to configuration file
        --strict           Reject unsupported operators and aggregation types
        --pretty           Indent the emitted JSON
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    SMPSEARCH_SETTINGS_PATH    Path to settings file
    SMPSEARCH_DEBUG            Enable debug logging (true/false)
    SMPSEARCH_TIMESTAMP_FIELD  Field the date range applies to
    SMPSEARCH_PRETTY           Indent the emitted JSON (true/false)
"#,
        smpsearch::VERSION
    );
}
