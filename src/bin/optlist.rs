use std::env;
use std::ffi::OsString;
use std::io;
use std::process;

use log::{LevelFilter, Log, Metadata, Record};
use optlist::{Error, ParseConfig, ParsedOptions, Preset, parse_reader_with_config};

const HELP: &str = "\
optlist - split key/value option lists

Usage:
  optlist parse [OPTIONS] [INPUT...]
  optlist --help
  optlist --version

Commands:
  parse     Parse option lists and print their entries
";

const PARSE_HELP: &str = "\
optlist parse - parse option lists and print their entries

Usage:
  optlist parse [OPTIONS] [--] [INPUT...]

Reads standard input when no INPUT is given.

Options:
      --preset <NAME>     Separator preset: `default` (' ' and '=') or `css` (';' and ':').
      --css               Alias for --preset css.
  -p, --pair-sep <CHAR>   Character separating pairs.
  -s, --value-sep <CHAR>  Character separating a key from its value.
  -v, --verbose           Print parser diagnostics to stderr. Repeat for more.
  -q, --quiet             Suppress all diagnostics.
  -h, --help              Show this help text.
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseCommand {
    Help,
    Execute(ParseArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ParseArgs {
    preset: Preset,
    pair_separator: Option<char>,
    value_separator: Option<char>,
    verbosity: u8,
    quiet: bool,
    inputs: Vec<String>,
}

impl ParseArgs {
    fn config(&self) -> ParseConfig {
        let mut config = self.preset.config();
        if let Some(pair_separator) = self.pair_separator {
            config = config.pair_separator(pair_separator);
        }
        if let Some(value_separator) = self.value_separator {
            config = config.value_separator(value_separator);
        }
        config
    }

    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbosity) {
            (true, _) => LevelFilter::Off,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "optlist: [{}] {}",
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    process::exit(run(env::args_os()));
}

fn run(args: impl IntoIterator<Item = OsString>) -> i32 {
    let mut args = args.into_iter();
    let _bin = args.next();

    let Some(subcommand) = args.next() else {
        print_help();
        return 0;
    };

    let subcommand = subcommand.to_string_lossy();
    match subcommand.as_ref() {
        "-h" | "--help" | "help" => {
            print_help();
            0
        }
        "-V" | "--version" | "version" => {
            print_version();
            0
        }
        "parse" => match parse_parse_args(args.collect()) {
            Ok(ParseCommand::Help) => {
                print_parse_help();
                0
            }
            Ok(ParseCommand::Execute(parse_args)) => match execute_parse(&parse_args) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("optlist: {err}");
                    1
                }
            },
            Err(err) => {
                eprintln!("optlist: {err}");
                eprintln!("Try `optlist parse --help`.");
                1
            }
        },
        unknown => {
            eprintln!("optlist: unknown subcommand `{unknown}`");
            eprintln!("Try `optlist --help`.");
            1
        }
    }
}

fn parse_parse_args(args: Vec<OsString>) -> Result<ParseCommand, String> {
    let mut parsed = ParseArgs::default();
    let mut index = 0usize;
    while index < args.len() {
        let token = args[index].to_string_lossy();
        match token.as_ref() {
            "--" => {
                index += 1;
                break;
            }
            "-h" | "--help" => return Ok(ParseCommand::Help),
            "--preset" => {
                index += 1;
                let value = option_value(&args, index, "--preset")?;
                parsed.preset = value.parse().map_err(|err: Error| err.to_string())?;
                index += 1;
            }
            value if value.starts_with("--preset=") => {
                parsed.preset = value["--preset=".len()..]
                    .parse()
                    .map_err(|err: Error| err.to_string())?;
                index += 1;
            }
            "--css" => {
                parsed.preset = Preset::Css;
                index += 1;
            }
            "-p" | "--pair-sep" => {
                index += 1;
                let value = option_value(&args, index, "-p/--pair-sep")?;
                parsed.pair_separator =
                    Some(optlist::separator(&value).map_err(|err| err.to_string())?);
                index += 1;
            }
            "-s" | "--value-sep" => {
                index += 1;
                let value = option_value(&args, index, "-s/--value-sep")?;
                parsed.value_separator =
                    Some(optlist::separator(&value).map_err(|err| err.to_string())?);
                index += 1;
            }
            "-v" | "--verbose" => {
                parsed.verbosity = parsed.verbosity.saturating_add(1);
                index += 1;
            }
            "-q" | "--quiet" => {
                parsed.quiet = true;
                index += 1;
            }
            unknown if unknown.starts_with('-') && unknown.len() > 1 => {
                return Err(format!("unknown option `{unknown}`"));
            }
            _ => break,
        }
    }

    parsed.inputs = args[index..]
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    Ok(ParseCommand::Execute(parsed))
}

fn option_value(args: &[OsString], index: usize, name: &str) -> Result<String, String> {
    args.get(index)
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| format!("missing value for `{name}`"))
}

fn execute_parse(parse_args: &ParseArgs) -> Result<(), Error> {
    init_logging(parse_args.log_level());
    let config = parse_args.config();

    if parse_args.inputs.is_empty() {
        let parsed = parse_reader_with_config(io::stdin().lock(), config)?;
        print_options(&parsed);
        return Ok(());
    }

    let with_headers = parse_args.inputs.len() > 1;
    for input in &parse_args.inputs {
        let parsed = optlist::parse_str_with_config(input, config);
        if with_headers {
            println!("# {parsed}");
        }
        print_options(&parsed);
    }
    Ok(())
}

fn print_options(parsed: &ParsedOptions) {
    for (key, value) in parsed {
        println!("[{key}] => {value}");
    }
}

fn print_help() {
    println!("{HELP}");
}

fn print_parse_help() {
    println!("{PARSE_HELP}");
}

fn print_version() {
    println!("optlist {}", env!("CARGO_PKG_VERSION"));
}
