use ls8::{
    config::{Config, UnknownOpcodePolicy},
    emulator::{Emulator, StdIo},
    error::{ExecutionError, LoadError},
    image,
};

use clap::{App, Arg, ArgMatches};
use slog::{o, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

enum Error {
    Load(LoadError),
    Execution(ExecutionError),
    Usage(String),
}

impl From<LoadError> for Error {
    fn from(e: LoadError) -> Error {
        Error::Load(e)
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Error {
        Error::Execution(e)
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("ls8")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility for assembling and executing LS-8 programs")
        .arg(Arg::with_name("program")
             .help("File containing a program image or assembly source")
             .value_name("PROGRAM")
             .index(1))
        .arg(Arg::with_name("strict")
             .help("Stop at unknown opcodes instead of skipping them")
             .long("strict"))
        .arg(Arg::with_name("trace")
             .help("Print the processor state before every instruction")
             .long("trace")
             .short("t"))
        .arg(Arg::with_name("verbose")
             .help("Enables verbose logging")
             .long("verbose")
             .short("v"))
        .arg(Arg::with_name("max-cycles")
             .help("Stop after executing this many instructions")
             .long("max-cycles")
             .value_name("CYCLES")
             .takes_value(true))
        .get_matches()
}

fn main() {
    let args = parse_arguments();

    match run(&args) {
        Ok(()) => (),
        Err(err) => {
            match err {
                Error::Load(LoadError::MissingProgramArgument) =>
                    eprintln!("usage: ls8 [--strict] [--trace] PROGRAM"),
                Error::Load(err) => eprintln!("ls8: {}", err),
                Error::Execution(err) => eprintln!("ls8: execution error: {}", err),
                Error::Usage(msg) => eprintln!("ls8: {}", msg),
            }

            std::process::exit(1);
        },
    }
}

fn run(args: &ArgMatches) -> Result<(), Error> {
    let file_path = args.value_of("program")
        .ok_or(LoadError::MissingProgramArgument)?;

    let mut config = Config::default();

    if args.is_present("strict") {
        config.unknown_opcode = UnknownOpcodePolicy::Fail;
    }

    if let Some(cycles) = args.value_of("max-cycles") {
        let cycles = cycles.parse()
            .map_err(|_| Error::Usage(format!("invalid cycle count '{}'", cycles)))?;
        config = config.with_max_cycles(cycles);
    }

    let program = image::read_program(file_path)?;

    let mut emulator = Emulator::from_image(&program, StdIo)?
        .with_config(config);

    if args.is_present("verbose") {
        let decorator = TermDecorator::new().stderr().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        emulator.set_logger(Logger::root(drain, o!("program" => file_path.to_string())));
    }

    if args.is_present("trace") {
        while !emulator.halted {
            eprintln!("{}", emulator.snapshot());
            emulator.step()?;
        }
    } else {
        emulator.run()?;
    }

    Ok(())
}
