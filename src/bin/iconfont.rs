// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use iconcrop::font;

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

const HELP: &str = "\
iconfont packs a directory of SVG icons into a font and a glyph map.

USAGE:
  iconfont [OPTIONS] --svg <DIR> <font-name>

  iconfont --svg out/ MyIcons
  iconfont --svg out/ --out assets/fonts MyIcons

OPTIONS:
  -h, --help                    Prints this help
  -V, --version                 Prints version

  --svg DIR                     Sets the directory with SVG icons
  -o, --out DIR                 Sets the output directory
                                [default: ./font]
  --generator PATH              Sets the font generator executable
                                [default: svgtofont]
  --skip-generator              Only converts an existing info.json
                                into glyphmap.json

  --quiet                       Disables all messages
  --verbose                     Prints debug messages

ARGS:
  <font-name>                   Font family name
";

#[derive(Debug)]
struct Args {
    font_name: String,
    svg_dir: PathBuf,
    out_dir: Option<PathBuf>,
    generator: Option<PathBuf>,
    skip_generator: bool,
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
        svg_dir:        input.value_from_str("--svg")?,
        out_dir:        input.opt_value_from_str(["-o", "--out"])?,
        generator:      input.opt_value_from_str("--generator")?,
        skip_generator: input.contains("--skip-generator"),
        quiet:          input.contains("--quiet"),
        verbose:        input.contains("--verbose"),
        font_name:      input.free_from_str()?,
    })
}

fn process() -> Result<(), String> {
    let args = match collect_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e.to_string());
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            let level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
            log::set_max_level(level);
        }
    }

    if !args.svg_dir.is_dir() {
        return Err(format!("'{}' is not a directory", args.svg_dir.display()));
    }

    let mut opt = font::Options {
        font_name: args.font_name,
        svg_dir: args.svg_dir,
        generator: args.generator,
        skip_generator: args.skip_generator,
        ..font::Options::default()
    };

    if let Some(out_dir) = args.out_dir {
        opt.out_dir = out_dir;
    }

    let path = font::generate(&opt).map_err(|e| e.to_string())?;
    println!("Saved {}.", path.display());
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
