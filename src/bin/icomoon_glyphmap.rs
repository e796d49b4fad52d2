// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

const HELP: &str = "\
icomoon-glyphmap converts an IcoMoon selection.json into a glyphmap.json.

The result is saved next to the input file.

USAGE:
  icomoon-glyphmap <selection.json>

OPTIONS:
  -h, --help                    Prints this help
  -V, --version                 Prints version
  --quiet                       Disables messages

ARGS:
  <selection.json>              An IcoMoon selection file
";

fn process() -> Result<(), String> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let quiet = input.contains("--quiet");
    let path: PathBuf = match input.free_from_str() {
        Ok(v) => v,
        Err(e) => {
            println!("{}", HELP);
            return Err(e.to_string());
        }
    };

    if !quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Info);
        }
    }

    iconcrop::glyphmap::convert_icomoon_file(&path).map_err(|e| e.to_string())?;
    Ok(())
}

/// A simple stdout logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                log::Level::Error | log::Level::Warn => eprintln!("Warning: {}", record.args()),
                _ => println!("{}", record.args()),
            }
        }
    }

    fn flush(&self) {}
}
