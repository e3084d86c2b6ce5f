use argbind::{prelude::*, ArgParser, ArgumentError, ConversionError, ParseError, ParsingStatus};
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

fn split(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn is_valid_filename(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_control) && !text.contains("//")
}

fn is_regular_file(text: &str) -> bool {
    Path::new(text).is_file()
}

fn is_directory(text: &str) -> bool {
    Path::new(text).is_dir()
}

fn file_parser<'a>() -> ArgParser<'a> {
    let mut parser = ArgParser::new("My Parser");
    parser.add_help(Some('h'), "help", "Some Description about program");
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
        .add_flag(Some('s'), "flag1")
        .help("Use some logic")
        .default(true);
    parser.add_flag(Some('p'), "flag2").help("Use some logic");
    parser.add_int_argument(None, "number").help("Some Number");
    parser
}

#[test]
fn builder_compiles() {
    ArgParser::new("organization");
}

#[test]
fn help_description() {
    let mut parser = ArgParser::new("My Parser");
    parser.add_help(Some('h'), "help", "Some Description about program");
    parser
        .add_string_argument(Some('i'), "input")
        .help("File path for input file")
        .multi_value(1);
    parser
        .add_flag(Some('s'), "flag1")
        .help("Use some logic")
        .default(true);
    parser.add_flag(Some('p'), "flag2").help("Use some logic");
    parser.add_int_argument(None, "number").help("Some Number");

    assert!(parser.parse(&split("app --help")));
    assert!(parser.help());
    assert_eq!(
        parser.help_description(),
        concat!(
            "My Parser\n",
            "Some Description about program\n",
            "\n",
            "OPTIONS:\n",
            "-i,  --input=<string>:  File path for input file [repeated, min args = 1]\n",
            "     --number=<int>:  Some Number\n",
            "-s,  --flag1:  Use some logic [default = true]\n",
            "-p,  --flag2:  Use some logic\n",
            "\n",
            "-h,  --help:  Display this help and exit\n",
        )
    );
}

#[test]
fn composite_paths() {
    let file = NamedTempFile::new().unwrap();
    let directory = TempDir::new().unwrap();
    let file_name = file.path().to_str().unwrap();
    let directory_name = directory.path().to_str().unwrap();
    let mut parser = file_parser();

    assert!(parser.parse(&split(&format!(
        "app --number 2 -s -i {file_name} -o={directory_name}"
    ))));
    assert_eq!(parser.get_composite_value("input"), file_name);
    assert_eq!(parser.get_composite_value("output"), directory_name);
    assert!(parser.get_flag("flag1"));
    assert!(!parser.get_flag("flag2"));
    assert_eq!(parser.get_int_value("number"), 2);
}

#[test]
fn composite_path_with_spaces() {
    let directory = TempDir::new().unwrap();
    let spaced = directory.path().join("my input file.txt");
    std::fs::write(&spaced, "content").unwrap();
    let directory_name = directory.path().to_str().unwrap();
    let mut tokens = vec!["app".to_string(), "-i".to_string()];
    tokens.extend(split(spaced.to_str().unwrap()));
    tokens.push(format!("--output={directory_name}"));
    tokens.push("--number=3".to_string());
    let mut parser = file_parser();

    assert!(parser.parse(&tokens));
    assert_eq!(
        parser.get_composite_value("input"),
        spaced.to_str().unwrap()
    );
}

#[test]
fn composite_missing_file() {
    let directory = TempDir::new().unwrap();
    let directory_name = directory.path().to_str().unwrap();
    let mut parser = file_parser();

    assert_eq!(
        parser.try_parse(&split(&format!(
            "app --number 2 -s -i hfeooohfe -o={directory_name}"
        ))),
        Err(ParseError::Arguments(vec![ArgumentError::IncorrectValue(
            "input".to_string()
        )]))
    );
}

#[test]
fn composite_missing_directory() {
    let file = NamedTempFile::new().unwrap();
    let file_name = file.path().to_str().unwrap();
    let mut parser = file_parser();

    assert!(!parser.parse(&split(&format!(
        "app --number 2 -s -i {file_name} -o=./aiejfpeqjfoiqwd"
    ))));
    assert_eq!(
        parser.argument_status("output"),
        Some(ParsingStatus::InvalidValue)
    );
}

#[test]
fn repeated_parsing() {
    let file = NamedTempFile::new().unwrap();
    let directory = TempDir::new().unwrap();
    let file_name = file.path().to_str().unwrap();
    let directory_name = directory.path().to_str().unwrap();
    let tokens = split(&format!(
        "app --number 2 -s -i {file_name} -o={directory_name} --test={file_name}"
    ));
    let mut parser = file_parser();
    let test = parser
        .add_composite_argument(Some('t'), "test")
        .help("File path for test")
        .add_validate(is_valid_filename);

    assert!(parser.parse(&tokens));

    if parser.get_flag("flag1") {
        test.add_is_good(is_regular_file);
    } else if parser.get_flag("flag2") {
        test.add_is_good(is_directory);
    }

    assert!(parser.parse(&tokens));
    assert_eq!(parser.get_composite_value("test"), file_name);
    assert!(!parser.parse(&split(&format!(
        "app --number 2 -i {file_name} -o={directory_name} --test={directory_name}"
    ))));
}

#[test]
fn positional_sinks() {
    let mut values: Vec<i32> = Vec::default();
    let mut parser = ArgParser::new("My Parser");
    parser
        .add_int_argument(None, "Param1")
        .multi_value(1)
        .positional()
        .store_values(&mut values);

    assert!(parser.parse(&split("app 1 2 3 4 5")));
    drop(parser);
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[test]
fn minimum_count() {
    let mut values: Vec<i32> = Vec::default();
    let mut parser = ArgParser::new("My Parser");
    parser
        .add_int_argument(Some('p'), "param1")
        .multi_value(10)
        .store_values(&mut values);

    assert_eq!(
        parser.try_parse(&split("app --param1=1 --param1=2 --param1=3")),
        Err(ParseError::Arguments(vec![ArgumentError::NotEnoughValues(
            "param1".to_string()
        )]))
    );
    drop(parser);
    assert_eq!(values, vec![1, 2, 3]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Sum,
    Mul,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Sum => write!(f, "sum"),
            Action::Mul => write!(f, "mul"),
        }
    }
}

impl ArgValue for Action {
    const TYPE_NAME: &'static str = "Action";

    fn convert(text: &str) -> Result<Self, ConversionError> {
        match text {
            "sum" => Ok(Action::Sum),
            "mul" => Ok(Action::Mul),
            _ => Err(ConversionError::InvalidFormat {
                text: text.to_string(),
                type_name: Self::TYPE_NAME,
            }),
        }
    }
}

#[test]
fn accumulate() {
    let mut values: Vec<i32> = Vec::default();
    let mut action = Action::Sum;
    let mut parser = ArgParser::new("Program").with_type::<Action>();
    parser
        .add_int_argument(None, "N")
        .multi_value(1)
        .positional()
        .store_values(&mut values);
    parser
        .add_argument::<Action>(Some('a'), "action")
        .help("Action type")
        .store_value(&mut action);
    parser.add_help(Some('h'), "help", "Program accumulate arguments");

    assert!(parser.parse(&split("app -a mul 1 2 3 4")));
    assert!(!parser.help());
    drop(parser);
    assert_eq!(action, Action::Mul);
    assert_eq!(values.iter().product::<i32>(), 24);
}

#[test]
fn accumulate_help() {
    let mut parser = ArgParser::new("Program").with_type::<Action>();
    parser.add_int_argument(None, "N").multi_value(1).positional();
    parser
        .add_argument::<Action>(Some('a'), "action")
        .help("Action type");
    parser.add_help(Some('h'), "help", "Program accumulate arguments");

    assert!(parser.parse(&split("app --help")));
    assert!(parser.help());
    assert_eq!(
        parser.help_description(),
        concat!(
            "Program\n",
            "Program accumulate arguments\n",
            "\n",
            "OPTIONS:\n",
            "     --N=<int>:   [repeated, positional, min args = 1]\n",
            "-a,  --action=<Action>:  Action type\n",
            "\n",
            "-h,  --help:  Display this help and exit\n",
        )
    );

    assert!(!parser.parse(&split("app -a div 1 2")));
    assert!(!parser.parse(&split("app 1 2")));
}
