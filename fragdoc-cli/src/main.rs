//! Command-line interface for fragdoc
//! Assembles the configured fragments into one document and writes it out.
//!
//! Usage:
//!   fragdoc build [--config `<path>`] [--output `<path>`] [--stdout] [--quiet]   - Assemble the document
//!   fragdoc config [--config `<path>`]                                         - Print the resolved configuration
//!   fragdoc stages                                                           - List the pipeline stages

mod progress;

use clap::{Arg, ArgAction, ArgMatches, Command};
use fragdoc_config::{FragdocConfig, Loader, ProgressDisplay, CONFIG_FILE_NAME};
use fragdoc_core::sink::{
    notify, write_atomic, write_lines, DotProgress, NoProgress, ProgressObserver,
};
use fragdoc_core::transforms::standard;
use fragdoc_core::{assemble, Manifest};
use log::{debug, LevelFilter};
use progress::SpinnerProgress;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("build", sub)) => handle_build_command(&matches, sub),
        Some(("config", _)) => handle_config_command(&matches),
        Some(("stages", _)) => handle_stages_command(&matches),
        _ => unreachable!("clap requires a subcommand"),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("fragdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Assemble one reStructuredText document from ordered fragments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file (default: ./fragdoc.toml if present)"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Override a configuration key, e.g. rules.default_kind=rust"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("build")
                .about("Assemble the document and write it out")
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("stdout")
                        .help("Write here instead of the configured output"),
                )
                .arg(
                    Arg::new("stdout")
                        .long("stdout")
                        .action(ArgAction::SetTrue)
                        .help("Print the document instead of writing a file"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .short('q')
                        .action(ArgAction::SetTrue)
                        .help("Do not show progress"),
                ),
        )
        .subcommand(Command::new("config").about("Print the resolved configuration as JSON"))
        .subcommand(Command::new("stages").about("List the stages of the document pipeline"))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Configuration plus the file it came from
struct Loaded {
    config: FragdocConfig,
    /// Directory relative paths in the configuration are resolved against
    base_dir: PathBuf,
    origin: PathBuf,
}

fn load_config(matches: &ArgMatches) -> CliResult<Loaded> {
    let cwd = std::env::current_dir()?;

    let (mut loader, origin) = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let path = cwd.join(path);
            (Loader::new().with_file(&path), path)
        }
        None => {
            let path = cwd.join(CONFIG_FILE_NAME);
            (Loader::new().with_optional_file(&path), path)
        }
    };

    for setting in matches.get_many::<String>("set").into_iter().flatten() {
        loader = loader.with_assignment(setting)?;
    }

    let base_dir = origin.parent().map(Path::to_path_buf).unwrap_or(cwd);
    debug!("configuration origin: {}", origin.display());

    Ok(Loaded {
        config: loader.build()?,
        base_dir,
        origin,
    })
}

/// Handle the build command
fn handle_build_command(matches: &ArgMatches, sub: &ArgMatches) -> CliResult<()> {
    let Loaded {
        config,
        base_dir,
        origin,
    } = load_config(matches)?;

    let mut manifest = config.manifest(&base_dir, &origin, &chrono::Local::now())?;
    if let Some(output) = sub.get_one::<PathBuf>("output") {
        manifest.output = std::env::current_dir()?.join(output);
    }

    let lines = assemble(&manifest, &config.rules);

    if sub.get_flag("stdout") {
        write_lines(io::stdout().lock(), lines)?;
        return Ok(());
    }

    let observer = progress_observer(&config, &manifest, sub.get_flag("quiet"));
    let stream = notify(lines, observer, config.progress.tick_interval);
    write_atomic(manifest.output(), stream)?;
    Ok(())
}

fn progress_observer(
    config: &FragdocConfig,
    manifest: &Manifest,
    quiet: bool,
) -> Box<dyn ProgressObserver> {
    if quiet || !config.progress.enabled {
        return Box::new(NoProgress);
    }
    let name = manifest
        .output()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| manifest.output().display().to_string());
    match config.progress.display {
        ProgressDisplay::Spinner => Box::new(SpinnerProgress::new(name)),
        ProgressDisplay::Dots => Box::new(DotProgress::new(name, io::stdout())),
    }
}

/// Handle the config command
fn handle_config_command(matches: &ArgMatches) -> CliResult<()> {
    let Loaded { config, .. } = load_config(matches)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Handle the stages command
fn handle_stages_command(matches: &ArgMatches) -> CliResult<()> {
    let Loaded {
        config,
        base_dir,
        origin,
    } = load_config(matches)?;
    let manifest = config.manifest(&base_dir, &origin, &chrono::Local::now())?;

    let pipeline = standard::document(&manifest, &config.rules);

    println!("Document pipeline stages:\n");
    for (index, name) in pipeline.stage_names().into_iter().enumerate() {
        println!("  {}. {}", index + 1, name);
    }
    Ok(())
}
