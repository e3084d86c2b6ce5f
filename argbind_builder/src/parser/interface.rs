use std::cell::RefCell;
use std::io::Write;

use crate::parser::base::ParseError;

/// Where the parser reports its messages.
///
/// Parsing is silent unless an interface is supplied (see [`ArgParser::parse_with`](./struct.ArgParser.html#method.parse_with)).
pub trait UserInterface {
    /// Show a regular message (ex: the help text).
    fn print(&self, message: String);

    /// Show a parse failure.
    fn print_error(&self, error: &ParseError);
}

/// Reports messages on stdout and errors on stderr.
#[derive(Debug, Default)]
pub struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: &ParseError) {
        eprintln!("{error}");
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct SilentInterface {}

impl UserInterface for SilentInterface {
    fn print(&self, _message: String) {
        // Do nothing.
    }

    fn print_error(&self, _error: &ParseError) {
        // Do nothing.
    }
}

/// Writes messages, each newline terminated, onto an arbitrary stream when enabled.
#[derive(Debug)]
pub struct ConditionalOutput<W: Write> {
    stream: RefCell<W>,
    enabled: bool,
}

impl<W: Write> ConditionalOutput<W> {
    /// Create a conditional output over the stream.
    pub fn new(stream: W, enabled: bool) -> Self {
        Self {
            stream: RefCell::new(stream),
            enabled,
        }
    }

    /// Release the underlying stream.
    pub fn into_inner(self) -> W {
        self.stream.into_inner()
    }

    fn write(&self, message: impl std::fmt::Display) {
        if self.enabled {
            // Write failures are ignored.
            let _ = writeln!(self.stream.borrow_mut(), "{message}");
        }
    }
}

impl<W: Write> UserInterface for ConditionalOutput<W> {
    fn print(&self, message: String) {
        self.write(message);
    }

    fn print_error(&self, error: &ParseError) {
        self.write(error);
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::{ParseError, UserInterface};
    use std::cell::RefCell;

    #[derive(Default)]
    pub(crate) struct InMemoryInterface {
        message: RefCell<Option<Vec<String>>>,
        error: RefCell<Option<String>>,
    }

    impl UserInterface for InMemoryInterface {
        fn print(&self, message: String) {
            // Allows for print() to be called many times, concatenating the messages.
            self.message
                .borrow_mut()
                .get_or_insert_with(Vec::default)
                .push(message);
        }

        fn print_error(&self, error: &ParseError) {
            // Assumes print_error() is only ever called once.
            self.error.borrow_mut().replace(error.to_string());
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume(self) -> (Option<String>, Option<String>) {
            let InMemoryInterface { message, error } = self;

            (
                message.take().map(|messages| messages.join("\n")),
                error.take(),
            )
        }

        pub(crate) fn consume_error(self) -> String {
            let (message, error) = self.consume();
            assert_eq!(message, None);
            error.unwrap()
        }
    }
}
