mod parse_args;
mod report;

use log::{debug, info};
use scene::{FeedEvent, SceneFeed};
use std::io::{self, Read, Write};
use thiserror::Error;

use crate::parse_args::{ArgsError, Command, HELP, Input, parse_args};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] scene::DecodeError),

    #[error(transparent)]
    Encode(#[from] scene::EncodeError),

    #[error("no update was accepted")]
    NoScene,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("scene-cli: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let Some(args) = parse_args(std::env::args_os().skip(1).collect())? else {
        print!("{}", HELP);
        return Ok(());
    };

    env_logger::Builder::new()
        .filter_level(args.verbosity.level_filter())
        .parse_default_env()
        .init();
    debug!("{:?}", args);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Check(input) => check(&read_input(input)?, &mut out),
        Command::Fmt(input) => fmt(&read_input(input)?, &mut out),
        Command::Replay(input) => replay(&read_input(input)?, &mut out),
        Command::Sample => {
            writeln!(out, "{}", scene::encode_string(&report::sample_scene())?)?;
            Ok(())
        }
    }
}

fn read_input(input: &Input) -> Result<Vec<u8>, CliError> {
    match input {
        Input::Stdin => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|source| CliError::Read {
                name: "stdin".to_string(),
                source,
            })?;
            Ok(buf)
        }
        Input::File(path) => std::fs::read(path).map_err(|source| CliError::Read {
            name: path.display().to_string(),
            source,
        }),
    }
}

fn check(bytes: &[u8], out: &mut impl Write) -> Result<(), CliError> {
    let scene = scene::decode(bytes)?;
    for (i, shape) in scene.items.iter().enumerate() {
        writeln!(out, "{}", report::describe_shape(i, shape))?;
    }
    writeln!(out, "{}", report::summary(&scene))?;
    Ok(())
}

fn fmt(bytes: &[u8], out: &mut impl Write) -> Result<(), CliError> {
    let scene = scene::decode(bytes)?;
    out.write_all(&scene::encode(&scene)?)?;
    writeln!(out)?;
    Ok(())
}

/// Each non-empty line is one transport message.
fn replay(bytes: &[u8], out: &mut impl Write) -> Result<(), CliError> {
    let mut feed = SceneFeed::new();
    for (n, line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let lineno = n + 1;
        match feed.accept(line) {
            FeedEvent::Updated { shapes } => writeln!(out, "line {lineno}: {shapes} shapes")?,
            FeedEvent::Skipped(err) => writeln!(out, "line {lineno}: skipped, {err}")?,
            FeedEvent::Stopped => {
                writeln!(out, "line {lineno}: stop")?;
                break;
            }
            FeedEvent::Ignored => break,
        }
    }

    let stats = feed.stats();
    info!("{} updates accepted, {} skipped", stats.accepted, stats.skipped);
    let scene = feed.latest().current().ok_or(CliError::NoScene)?;
    writeln!(out, "{}", report::summary(&scene))?;
    Ok(())
}
