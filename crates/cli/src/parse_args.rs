use std::ffi::OsString;
use std::path::PathBuf;

pub const HELP: &str = "\
scene-cli - inspect and normalize scene documents

USAGE:
  scene-cli [OPTIONS] <COMMAND> [FILE]

COMMANDS:
  check <file>     Decode a document and print one line per shape
  fmt <file>       Decode a document and print its canonical encoding
  replay <file>    Feed each line of <file> as one update, stopping at STOP
  sample           Print a reference document

FILE may be '-' or omitted to read stdin.

OPTIONS:
  -h, --help       Prints help information
  -v, --verbose    Log skipped updates and fallbacks
  -vv, --debug     Log everything
";

/// Log level chosen on the command line. `RUST_LOG` still overrides it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Warn,
            Verbosity::Verbose => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => Input::File(path),
            _ => Input::Stdin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check(Input),
    Fmt(Input),
    Replay(Input),
    Sample,
}

#[derive(Debug)]
pub struct AppArgs {
    pub command: Command,
    pub verbosity: Verbosity,
}

#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error(transparent)]
    Parse(#[from] pico_args::Error),
    #[error("missing command, see --help")]
    MissingCommand,
    #[error("unknown command '{0}', see --help")]
    UnknownCommand(String),
}

/// `None` means help was requested.
pub fn parse_args(args: Vec<OsString>) -> Result<Option<AppArgs>, ArgsError> {
    let mut pargs = pico_args::Arguments::from_vec(args);

    if pargs.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let verbosity = if pargs.contains("--debug") || pargs.contains("-vv") {
        Verbosity::Debug
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let name: String = pargs.free_from_str().map_err(|e| match e {
        pico_args::Error::MissingArgument => ArgsError::MissingCommand,
        e => ArgsError::Parse(e),
    })?;
    let mut input =
        || -> Result<Input, ArgsError> { Ok(Input::from_arg(pargs.opt_free_from_str()?)) };

    let command = match name.as_str() {
        "check" => Command::Check(input()?),
        "fmt" => Command::Fmt(input()?),
        "replay" => Command::Replay(input()?),
        "sample" => Command::Sample,
        _ => return Err(ArgsError::UnknownCommand(name.clone())),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(Some(AppArgs { command, verbosity }))
}
