use argbind::{prelude::*, ArgParser, ConsoleInterface, ConversionError, UserInterface};
use std::fmt;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Sum,
    Product,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Sum => write!(f, "sum"),
            Action::Product => write!(f, "mul"),
        }
    }
}

impl ArgValue for Action {
    const TYPE_NAME: &'static str = "Action";

    fn convert(text: &str) -> Result<Self, ConversionError> {
        match text {
            "sum" => Ok(Action::Sum),
            "mul" => Ok(Action::Product),
            _ => Err(ConversionError::InvalidFormat {
                text: text.to_string(),
                type_name: Self::TYPE_NAME,
            }),
        }
    }
}

fn main() -> ExitCode {
    let interface = ConsoleInterface::default();
    let mut values: Vec<i32> = Vec::default();

    let mut parser = ArgParser::new("accumulate").with_type::<Action>();
    parser.add_help(Some('h'), "help", "Program accumulate arguments");
    parser
        .add_int_argument(None, "N")
        .help("Integers to accumulate")
        .multi_value(1)
        .positional()
        .store_values(&mut values);
    parser
        .add_argument::<Action>(Some('a'), "action")
        .help("Accumulation to apply (sum or mul)");

    if !parser.parse_env(&interface) {
        interface.print("Wrong argument".to_string());
        parser.print_help(&interface);
        return ExitCode::FAILURE;
    }

    if parser.help() {
        parser.print_help(&interface);
        return ExitCode::SUCCESS;
    }

    let action = parser.get_value::<Action>("action");
    drop(parser);

    match action {
        Action::Sum => println!("Result: {}", values.iter().sum::<i32>()),
        Action::Product => println!("Result: {}", values.iter().product::<i32>()),
    }

    ExitCode::SUCCESS
}
