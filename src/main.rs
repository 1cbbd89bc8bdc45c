//! Keyed line sort
//!
//! Sorts lines of a single input by one column key, or checks that the input
//! is already sorted.

use clap::{Arg, ArgAction, Command};
use std::process;
use tracing_subscriber::EnvFilter;

// Import from the library modules
use keysort::{
    config::{CheckMode, NumericMode, SortConfig, SortConfigBuilder},
    error::{SortError, SortResult},
    sort,
};

fn main() {
    let result = run();
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("sort: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run() -> SortResult<i32> {
    let matches = build_cli().get_matches();

    // Build configuration from command line arguments
    let config = parse_config_from_matches(&matches)?;
    init_logging(config.debug);

    // Get input files
    let input_files: Vec<String> = matches
        .get_many::<String>("files")
        .unwrap_or_default()
        .cloned()
        .collect();

    // Execute the sort operation
    sort(&config, &input_files)
}

/// Diagnostics go to stderr; RUST_LOG overrides the default level
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_cli() -> Command {
    Command::new("sort")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("sort [OPTION]... [FILE]")
        .about("Sort lines of text by a column key")
        .long_about("Sort lines of text by a column key, or check that they are already sorted.\n\nWith no FILE, or when FILE is -, read standard input.")
        .disable_help_flag(true) // We use -h for human-numeric-sort
        .disable_version_flag(true)

        // Input file
        .arg(Arg::new("files")
            .help("Input file to sort (use '-' or omit for stdin)")
            .num_args(0..)
            .value_name("FILE"))

        // Sort modes
        .arg(Arg::new("numeric-sort")
            .short('n')
            .long("numeric-sort")
            .help("Compare according to numerical value")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("human-numeric-sort")
            .short('h')
            .long("human-numeric-sort")
            .help("Compare human readable numbers (e.g., 2K 1G)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("month-sort")
            .short('M')
            .long("month-sort")
            .help("Compare by month names")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("sort")
            .long("sort")
            .help("Sort according to WORD")
            .long_help("Sort according to WORD: human-numeric -h, month -M, numeric -n")
            .value_name("WORD")
            .value_parser(["human-numeric", "month", "numeric"]))

        // Sort modifiers
        .arg(Arg::new("reverse")
            .short('r')
            .long("reverse")
            .help("Reverse the result of comparisons")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("unique")
            .short('u')
            .long("unique")
            .help("Output only the first of an equal run")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("ignore-trailing-blanks")
            .short('b')
            .long("ignore-trailing-blanks")
            .help("Ignore trailing blanks in the key")
            .action(ArgAction::SetTrue))

        // Key options
        .arg(Arg::new("key")
            .short('k')
            .long("key")
            .help("Sort by column N (1-based); 0 means the whole line")
            .value_name("N")
            .value_parser(clap::value_parser!(usize)))
        .arg(Arg::new("field-separator")
            .short('t')
            .long("field-separator")
            .help("Use SEP as the column delimiter (default: tab)")
            .value_name("SEP"))

        // Operation modes
        .arg(Arg::new("check")
            .short('c')
            .long("check")
            .help("Check for sorted input; do not sort")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("check-silent")
            .short('C')
            .help("Like -c, but do not report first bad line")
            .action(ArgAction::SetTrue))

        // Output
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Write result to FILE instead of standard output")
            .value_name("FILE"))
        .arg(Arg::new("debug")
            .long("debug")
            .help("Log diagnostics to stderr")
            .action(ArgAction::SetTrue))

        // Add explicit help and version options since we disabled the automatic ones
        .arg(Arg::new("help")
            .long("help")
            .help("Display this help and exit")
            .action(ArgAction::Help))
        .arg(Arg::new("version")
            .long("version")
            .help("Output version information and exit")
            .action(ArgAction::Version))
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> SortResult<SortConfig> {
    let mut builder = SortConfigBuilder::new();

    if matches.get_flag("numeric-sort") {
        builder = builder.numeric_mode(NumericMode::Plain);
    }
    if matches.get_flag("human-numeric-sort") {
        builder = builder.numeric_mode(NumericMode::Human);
    }
    if matches.get_flag("month-sort") {
        builder = builder.month();
    }
    if let Some(sort_word) = matches.get_one::<String>("sort") {
        builder = match sort_word.as_str() {
            "month" => builder.month(),
            word => builder.numeric_mode(word.parse::<NumericMode>()?),
        };
    }

    // Apply boolean flags
    if matches.get_flag("reverse") {
        builder = builder.reverse();
    }
    if matches.get_flag("unique") {
        builder = builder.unique();
    }
    if matches.get_flag("ignore-trailing-blanks") {
        builder = builder.ignore_trailing_blanks();
    }
    if matches.get_flag("check-silent") {
        builder = builder.check(CheckMode::Quiet);
    } else if matches.get_flag("check") {
        builder = builder.check(CheckMode::Diagnose);
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }

    if let Some(&column) = matches.get_one::<usize>("key") {
        builder = builder.key_column(column);
    }
    if let Some(sep) = matches.get_one::<String>("field-separator") {
        builder = builder.delimiter(sep);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        if matches.get_flag("check") || matches.get_flag("check-silent") {
            return Err(SortError::conflicting_options(
                "options '-co' are incompatible",
            ));
        }
        builder = builder.output_file(output.clone());
    }

    // build() validates the final configuration
    builder.build()
}
