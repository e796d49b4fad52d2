// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use iconcrop::server;
use iconcrop::session::{self, Session};

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

const HELP: &str = "\
iconcrop removes the empty space around SVG icons.

USAGE:
  iconcrop [OPTIONS] <svg-dir>

  iconcrop icons/
  iconcrop --out cropped/ --port 3000 icons/
  iconcrop --batch icons/

OPTIONS:
  -h, --help                    Prints this help
  -V, --version                 Prints version

  -o, --out DIR                 Sets the output directory
                                [default: ./out]
  -p, --port PORT               Sets the review page port
                                [default: 8080]
  --batch                       Crops all icons without the review page
  --no-open                     Does not open the review page in a browser

  --quiet                       Disables all messages
  --verbose                     Prints debug messages

ARGS:
  <svg-dir>                     A directory with SVG icons
";

#[derive(Debug)]
struct Args {
    svg_dir: PathBuf,
    out_dir: PathBuf,
    port: u16,
    batch: bool,
    no_open: bool,
    quiet: bool,
    verbose: bool,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    Ok(Args {
        out_dir:    input.opt_value_from_str(["-o", "--out"])?.unwrap_or_else(|| PathBuf::from("./out")),
        port:       input.opt_value_from_str(["-p", "--port"])?.unwrap_or(8080),
        batch:      input.contains("--batch"),
        no_open:    input.contains("--no-open"),
        quiet:      input.contains("--quiet"),
        verbose:    input.contains("--verbose"),
        svg_dir:    input.free_from_str()?,
    })
}

fn parse_args() -> Result<Args, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    if !args.svg_dir.is_dir() {
        return Err(format!("'{}' is not a directory", args.svg_dir.display()));
    }

    Ok(args)
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            let level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
            log::set_max_level(level);
        }
    }

    session::ensure_distinct_dirs(&args.svg_dir, &args.out_dir).map_err(|e| e.to_string())?;
    std::fs::create_dir_all(&args.out_dir)
        .map_err(|e| format!("failed to create '{}' cause {}", args.out_dir.display(), e))?;

    let session = Session::new(&args.svg_dir, &args.out_dir).map_err(|e| e.to_string())?;
    if session.is_empty() {
        return Err(format!("'{}' has no SVG files", args.svg_dir.display()));
    }

    if args.batch {
        return crop_all(session);
    }

    let config = server::Config {
        port: args.port,
        open_browser: !args.no_open,
    };
    server::run(session, &config).map_err(|e| e.to_string())
}

fn crop_all(mut session: Session) -> Result<(), String> {
    let total = session.len();
    let mut failed = 0;
    while let Some(icon) = session.next_icon() {
        let icon = match icon {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to read an icon cause {}.", e);
                failed += 1;
                continue;
            }
        };

        let res = session
            .crop_icon(&icon)
            .and_then(|cropped| session.save(&icon.name, &cropped));

        if let Err(e) = res {
            log::warn!("Failed to crop {} cause {}.", icon.name, e);
            failed += 1;
        }
    }

    if failed != 0 {
        return Err(format!("failed to crop {} of {} icons", failed, total));
    }

    println!("Cropped {} icons into {}.", total, session.out_dir().display());
    Ok(())
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                log::Level::Error => eprintln!("Error: {}", record.args()),
                log::Level::Warn  => eprintln!("Warning: {}", record.args()),
                log::Level::Info  => eprintln!("{}", record.args()),
                log::Level::Debug => eprintln!("Debug: {}", record.args()),
                log::Level::Trace => eprintln!("Trace: {}", record.args()),
            }
        }
    }

    fn flush(&self) {}
}
