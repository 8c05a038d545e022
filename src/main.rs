extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs;
use std::io::{self, Read};

use regasm::assembler::ast::{self, Statement};

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tCanonical: {}\n\tPrint Debug: {}\n\tInfile: {}",
        verbosity_filter(args.occurrences_of("verbose")),
        args.is_present("canonical"),
        args.is_present("print-debug"),
        args.value_of("INPUT").unwrap_or("-")
    );

    let source = match read_source(args.value_of("INPUT")) {
        Err(err) => {
            error!("fatal: unable to read input `{}`: {}", args.value_of("INPUT").unwrap_or("-"), err);
            std::process::exit(1);
        },
        Ok(source) => source,
    };

    let program = match regasm::parse_program(&source) {
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        },
        Ok(program) => program,
    };
    info!("Parsed {} statement(s).", program.len());

    if args.is_present("print-debug") {
        println!("{}", debug_grid(&program));
    } else if args.is_present("canonical") {
        println!("{}", ast::render(&program));
    } else {
        for stmt in program.iter() {
            println!("{}", stmt);
        }
    }
}

/// Reads the whole input file, or standard input when no file (or `-`) is given.
fn read_source(path: Option<&str>) -> io::Result<String> {
    match path {
        None | Some("-") => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        },
        Some(path) => fs::read_to_string(path),
    }
}

fn debug_grid(program: &[Statement]) -> String {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (idx, stmt) in program.iter().enumerate() {
        grid.add(Cell::from(format!("{:4}:", idx + 1)));
        grid.add(Cell::from(stmt.opcode.to_string()));
        grid.add(Cell::from(stmt.dst.to_string()));
        grid.add(Cell::from(stmt.src.to_string()));
    }

    grid.fit_into_columns(4).to_string()
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use; reads standard input when absent or `-`")
            .required(false)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("canonical")
            .short("c")
            .long("canonical")
            .takes_value(false)
            .help("prints the program on a single line, statements separated by `; `"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .long("print-debug")
            .alias("show")
            .takes_value(false)
            .help("prints a table of numbered statements to STDOUT"))
        .get_matches()
}

fn verbosity_filter(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(verbosity_filter(verbosity))
        .chain(std::io::stderr())
        .apply().ok();
}
