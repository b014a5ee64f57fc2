use std::io::{self, BufRead, IsTerminal};
use std::time::Duration;

use clap::value_parser;
use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use insertnums::parsing;
use insertnums::problem;
use insertnums::session::{InsertError, Session};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("insertnums")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Insert sequences of numbers, letters, or computed values into a list of selections.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log diagnostic detail to standard error."),
        )
        .subcommand(
            Command::new("insert")
                .about("Fill each line of standard input according to the given format string")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_parser(value_parser!(usize))
                        .help("Fill this many empty selections instead of reading standard input."),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Recover from failures where possible, reporting them as notices, as a live preview would."),
                )
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_parser(value_parser!(u64))
                        .default_value("100")
                        .help("Milliseconds generation may run before being cut short."),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for the random helpers, making output repeatable."),
                )
                .arg(
                    Arg::new("format")
                        .required(true)
                        .help("The format string, for example '1:1~03' or 'i|_*2'."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse the given format string and show how it was understood")
                .arg(
                    Arg::new("format")
                        .required(true)
                        .help("The format string to check."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match matches.subcommand() {
        Some(("insert", submatches)) => {
            let format = submatches
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or_default();

            let quiet = submatches.get_flag("quiet");
            let budget = submatches
                .get_one::<u64>("budget")
                .copied()
                .unwrap_or(100);
            let seed = submatches
                .get_one::<u64>("seed")
                .copied();

            let session = Session::default()
                .with_quiet(quiet)
                .with_budget(Duration::from_millis(budget))
                .with_seed(seed);

            let mut slots: Vec<String> = match submatches.get_one::<usize>("count") {
                Some(count) => vec![String::new(); *count],
                None => match read_slots() {
                    Ok(slots) => slots,
                    Err(error) => {
                        eprintln!(
                            "{}: Unable to read standard input: {}",
                            "error".bright_red(),
                            error
                        );
                        std::process::exit(1);
                    }
                },
            };

            debug!(slots = slots.len(), "Inserting {:?}", format);

            match session.insert(format, &mut slots) {
                Ok(report) => {
                    for line in problem::notices(&report.notices) {
                        eprintln!("{}", line);
                    }
                    for slot in &slots {
                        println!("{}", slot);
                    }
                }
                Err(error) => {
                    report_error(&error, quiet);
                    std::process::exit(1);
                }
            }
        }
        Some(("check", submatches)) => {
            let format = submatches
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or_default();

            match parsing::parse(format) {
                Ok(spec) => {
                    println!("{:?} {}", spec.mode(), spec);
                }
                Err(error) => {
                    report_error(&InsertError::Parse(error), false);
                    std::process::exit(1);
                }
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: insertnums [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn read_slots() -> io::Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .collect()
}

fn report_error(error: &InsertError, quiet: bool) {
    if quiet {
        eprintln!("{}", problem::concise_error(error));
    } else {
        let styled = io::stderr().is_terminal();
        eprintln!("{}", problem::full_error(error, styled));
    }
}
