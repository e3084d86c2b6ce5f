use argbind::{ArgParser, ConsoleInterface};
use std::path::Path;
use std::process::ExitCode;

/// Accepts path-like text: no control characters and no doubled separators.
fn is_valid_filename(text: &str) -> bool {
    !text.is_empty()
        && !text.chars().any(char::is_control)
        && !text.contains("//")
        && !text.contains("\\\\")
}

fn is_regular_file(text: &str) -> bool {
    Path::new(text).is_file()
}

fn is_directory(text: &str) -> bool {
    Path::new(text).is_dir()
}

fn main() -> ExitCode {
    let interface = ConsoleInterface::default();
    let mut verbose = false;

    let mut parser = ArgParser::new("files");
    parser.add_help(Some('h'), "help", "Reports the size of a file (paths may contain spaces).");
    parser
        .add_composite_argument(Some('i'), "input")
        .help("File path for input file")
        .add_validate(is_valid_filename)
        .add_is_good(is_regular_file);
    parser
        .add_composite_argument(Some('o'), "output")
        .help("File path for output directory")
        .add_validate(is_valid_filename)
        .add_is_good(is_directory);
    parser
        .add_flag(Some('v'), "verbose")
        .help("Show the resolved paths")
        .store_value(&mut verbose);

    if !parser.parse_env(&interface) {
        parser.print_help(&interface);
        return ExitCode::FAILURE;
    }

    if parser.help() {
        parser.print_help(&interface);
        return ExitCode::SUCCESS;
    }

    let input = parser.get_composite_value("input");
    let output = parser.get_composite_value("output");
    drop(parser);

    if verbose {
        println!("Input: {input}");
        println!("Output: {output}");
    }

    match std::fs::metadata(input.as_str()) {
        Ok(metadata) => {
            println!("{input}: {} bytes", metadata.len());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Cannot read '{input}': {error}");
            ExitCode::FAILURE
        }
    }
}
