use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use thiserror::Error;

use crate::api::builder::{ArgumentBuilder, Declaration, Declared};
use crate::convert::{ArgValue, CompositeString};
use crate::model::{ParsingStatus, TypeTag};
use crate::parser::{
    tokenize, Argument, ConfigError, KeyIndex, ParseError, Parser, Printer, SilentInterface,
    UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for retrieving a value from the parser.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// No argument was declared with this long name.
    #[error("No argument '--{0}' was declared.")]
    Undeclared(String),
    /// The argument holds values of a different type.
    #[error("Argument '--{name}' holds {declared} values, not {requested}.")]
    TypeMismatch {
        /// The long name of the argument.
        name: String,
        /// The display name of the requested type.
        requested: &'static str,
        /// The display name of the declared type.
        declared: &'static str,
    },
    /// The argument has no value at this index (ex: it was not seen, or the parser has not parsed yet).
    #[error("Argument '--{name}' has no value at index {index}.")]
    Missing {
        /// The long name of the argument.
        name: String,
        /// The requested index.
        index: usize,
    },
}

/// The command line argument parser.
///
/// Declare the arguments with [`ArgParser::add_argument`] (or the per-type shorthands such as [`ArgParser::add_int_argument`]), then parse.
/// The parser may be used to parse many times; every parse starts from a clean state.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::ArgParser;
///
/// let mut parser = ArgParser::new("program");
/// parser.add_help(Some('h'), "help", "Adds up numbers.");
/// parser.add_int_argument(Some('n'), "number").multi_value(1).positional();
/// parser.add_flag(Some('v'), "verbose");
///
/// assert!(parser.parse(&["program", "-v", "1", "2", "3"]));
/// assert!(!parser.help());
/// assert!(parser.get_flag("verbose"));
/// assert_eq!(parser.get_int_value_at("number", 2), 3);
/// ```
pub struct ArgParser<'a> {
    program: String,
    declarations: Vec<Rc<RefCell<dyn Declared<'a> + 'a>>>,
    arguments: Vec<Box<dyn Argument<'a> + 'a>>,
    index: KeyIndex,
    help_index: Option<usize>,
    deferred_error: Option<ConfigError>,
}

impl<'a> std::fmt::Debug for ArgParser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgParser")
            .field("program", &self.program)
            .field("index", &self.index)
            .field("help_index", &self.help_index)
            .field("deferred_error", &self.deferred_error)
            .finish_non_exhaustive()
    }
}

macro_rules! typed_arguments {
    ($lt:lifetime; $($t:ty => $add:ident, $get:ident, $get_at:ident;)*) => {
        $(
            #[doc = concat!("Declare an argument of type `", stringify!($t), "`.")]
            #[doc = ""]
            #[doc = concat!("Shorthand for `add_argument::<", stringify!($t), ">`.")]
            pub fn $add(
                &mut self,
                short: Option<char>,
                long: impl Into<String>,
            ) -> ArgumentBuilder<$lt, $t> {
                self.add_argument::<$t>(short, long)
            }

            #[doc = concat!("Get the value of a `", stringify!($t), "` argument.")]
            #[doc = ""]
            #[doc = concat!("Shorthand for `get_value::<", stringify!($t), ">`; panics in the same cases.")]
            pub fn $get(&self, name: &str) -> $t {
                self.get_value::<$t>(name)
            }

            #[doc = concat!("Get the value at `index` of a `", stringify!($t), "` argument.")]
            #[doc = ""]
            #[doc = concat!("Shorthand for `get_value_at::<", stringify!($t), ">`; panics in the same cases.")]
            pub fn $get_at(&self, name: &str, index: usize) -> $t {
                self.get_value_at::<$t>(name, index)
            }
        )*
    };
}

impl<'a> ArgParser<'a> {
    /// Create a parser for `program`.
    ///
    /// The built-in value types are registered in this order (which is also the order of the help message):
    /// `String`, [`CompositeString`], `i16`, `i32`, `i64`, `u16`, `u32`, `u64`, `f32`, `f64`, `bool`, `char`.
    pub fn new(program: impl Into<String>) -> Self {
        let mut index = KeyIndex::default();

        for tag in [
            TypeTag::of::<String>(),
            TypeTag::of::<CompositeString>(),
            TypeTag::of::<i16>(),
            TypeTag::of::<i32>(),
            TypeTag::of::<i64>(),
            TypeTag::of::<u16>(),
            TypeTag::of::<u32>(),
            TypeTag::of::<u64>(),
            TypeTag::of::<f32>(),
            TypeTag::of::<f64>(),
            TypeTag::of::<bool>(),
            TypeTag::of::<char>(),
        ] {
            index.register_type(tag);
        }

        Self {
            program: program.into(),
            declarations: Vec::default(),
            arguments: Vec::default(),
            index,
            help_index: None,
            deferred_error: None,
        }
    }

    /// Register an additional value type, after all the previously registered types.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{prelude::*, ArgParser, ConversionError};
    ///
    /// #[derive(Debug, Clone, Copy, PartialEq)]
    /// struct Even(u32);
    /// # impl std::fmt::Display for Even {
    /// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    /// #         write!(f, "{}", self.0)
    /// #     }
    /// # }
    ///
    /// impl ArgValue for Even {
    ///     const TYPE_NAME: &'static str = "even";
    ///
    ///     fn convert(text: &str) -> Result<Self, ConversionError> {
    ///         match u32::convert(text)? {
    ///             n if n % 2 == 0 => Ok(Even(n)),
    ///             _ => Err(ConversionError::Rejected { text: text.to_string() }),
    ///         }
    ///     }
    /// }
    ///
    /// let mut parser = ArgParser::new("program").with_type::<Even>();
    /// parser.add_argument::<Even>(None, "count");
    ///
    /// assert!(!parser.parse(&["program", "--count=3"]));
    /// assert!(parser.parse(&["program", "--count=4"]));
    /// assert_eq!(parser.get_value::<Even>("count"), Even(4));
    /// ```
    pub fn with_type<T: ArgValue>(mut self) -> Self {
        self.index.register_type(TypeTag::of::<T>());
        self
    }

    /// Declare an argument of type `T` with an optional short key (ex: `-n`) and a long key (ex: `--number`).
    /// Configure it further through the returned [`ArgumentBuilder`].
    ///
    /// An empty or duplicate key, or an unregistered type, is a configuration error reported by the next parse.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{ArgParser, ParseError};
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_argument::<u64>(Some('s'), "size");
    /// parser.add_argument::<String>(Some('s'), "source");
    ///
    /// assert_matches::assert_matches!(
    ///     parser.try_parse(&["program"]),
    ///     Err(ParseError::Config(_))
    /// );
    /// ```
    pub fn add_argument<T: ArgValue>(
        &mut self,
        short: Option<char>,
        long: impl Into<String>,
    ) -> ArgumentBuilder<'a, T> {
        let long = long.into();
        let offset = self.declarations.len();

        if let Err(error) = self
            .index
            .insert(&TypeTag::of::<T>(), short, &long, offset)
        {
            self.defer(error);
        }

        let inner = Rc::new(RefCell::new(Declaration::<T>::new(short, long)));
        self.declarations.push(inner.clone());
        ArgumentBuilder::new(inner)
    }

    /// Declare the help flag.
    /// The `description` documents the program, and is shown at the top of [`ArgParser::help_description`].
    ///
    /// When the help flag is present, the parse succeeds regardless of the other arguments.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_help(Some('h'), "help", "My program.");
    /// parser.add_int_argument(None, "required");
    ///
    /// assert!(parser.parse(&["program", "-h"]));
    /// assert!(parser.help());
    /// ```
    pub fn add_help(
        &mut self,
        short: Option<char>,
        long: impl Into<String>,
        description: impl Into<String>,
    ) -> ArgumentBuilder<'a, bool> {
        let offset = self.declarations.len();
        let builder = self.add_argument::<bool>(short, long).help(description);
        self.help_index.replace(offset);
        builder
    }

    typed_arguments! { 'a;
        String => add_string_argument, get_string_value, get_string_value_at;
        CompositeString => add_composite_argument, get_composite_value, get_composite_value_at;
        i16 => add_short_argument, get_short_value, get_short_value_at;
        i32 => add_int_argument, get_int_value, get_int_value_at;
        i64 => add_long_argument, get_long_value, get_long_value_at;
        u16 => add_ushort_argument, get_ushort_value, get_ushort_value_at;
        u32 => add_uint_argument, get_uint_value, get_uint_value_at;
        u64 => add_ulong_argument, get_ulong_value, get_ulong_value_at;
        f32 => add_float_argument, get_float_value, get_float_value_at;
        f64 => add_double_argument, get_double_value, get_double_value_at;
        bool => add_flag, get_flag, get_flag_at;
        char => add_char_argument, get_char_value, get_char_value_at;
    }

    /// Change the name the help message shows for the type `T` (ex: `<int>` to `<number>`).
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_help(None, "help", "");
    /// parser.add_int_argument(None, "count");
    /// parser.set_alias_for_type::<i32>("number");
    ///
    /// assert!(parser.help_description().contains("--count=<number>"));
    /// ```
    pub fn set_alias_for_type<T: ArgValue>(&mut self, display: impl Into<String>) {
        if let Err(error) = self.index.set_alias(&TypeTag::of::<T>(), display) {
            self.defer(error);
        }
    }

    /// Parse the tokens, where the first token is the program invocation.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{ArgParser, ArgumentError, ParseError};
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_int_argument(None, "count");
    ///
    /// assert_eq!(
    ///     parser.try_parse(&["program", "--count=x"]),
    ///     Err(ParseError::Arguments(vec![ArgumentError::IncorrectValue("count".to_string())]))
    /// );
    /// ```
    pub fn try_parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), ParseError> {
        if let Some(error) = &self.deferred_error {
            return Err(ParseError::Config(error.clone()));
        }

        self.refresh();
        let tokens = tokenize(tokens);
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsing tokens: {tokens:?}.");
        }
        let mut parser = Parser::new(&self.index, &mut self.arguments);
        parser.consume(&tokens)?;
        parser.finalize(self.help_index)
    }

    /// Parse the tokens silently, where the first token is the program invocation.
    /// Returns whether the parse succeeded.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        self.parse_with(tokens, &SilentInterface::default())
    }

    /// Parse the tokens, reporting any error on `user_interface`.
    /// Returns whether the parse succeeded.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{ArgParser, ConditionalOutput};
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_int_argument(None, "count");
    /// let output = ConditionalOutput::new(Vec::default(), true);
    ///
    /// assert!(!parser.parse_with(&["program"], &output));
    /// assert_eq!(
    ///     String::from_utf8(output.into_inner()).unwrap(),
    ///     "Not enough values were passed to --count.\n"
    /// );
    /// ```
    pub fn parse_with<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        user_interface: &dyn UserInterface,
    ) -> bool {
        match self.try_parse(tokens) {
            Ok(()) => true,
            Err(error) => {
                user_interface.print_error(&error);
                false
            }
        }
    }

    /// Parse the process arguments ([`std::env::args`]), reporting any error on `user_interface`.
    /// Returns whether the parse succeeded.
    pub fn parse_env(&mut self, user_interface: &dyn UserInterface) -> bool {
        let tokens: Vec<String> = env::args().collect();
        self.parse_with(&tokens, user_interface)
    }

    /// Whether the help flag was present in the last parse.
    pub fn help(&self) -> bool {
        self.help_index
            .and_then(|offset| self.arguments.get(offset))
            .and_then(|argument| argument.value_at(0))
            .and_then(|value| value.downcast::<bool>().ok())
            .map(|value| *value)
            .unwrap_or(false)
    }

    /// Render the help message, or the empty string when no help flag was declared.
    ///
    /// Arguments are listed by type (in type registration order), then in declaration order.
    pub fn help_description(&self) -> String {
        let Some(help_offset) = self.help_index else {
            return String::default();
        };
        let help = self.declarations[help_offset].borrow();
        let help_info = help.info();
        let mut printer = Printer::new(
            self.program.as_str(),
            help_info.description.as_str(),
            help_info.short,
            help_info.long.as_str(),
        );

        for bucket in self.index.buckets() {
            for offset in bucket.ordered() {
                if offset == help_offset {
                    continue;
                }

                let declaration = self.declarations[offset].borrow();
                printer.add(
                    declaration.info(),
                    &bucket.display,
                    declaration.default_display(),
                );
            }
        }

        printer.render()
    }

    /// Show the help message on `user_interface`.
    pub fn print_help(&self, user_interface: &dyn UserInterface) {
        user_interface.print(self.help_description().trim_end_matches('\n').to_string());
    }

    /// Get the value at `index` of argument `name`.
    ///
    /// For a repeated argument, `index` selects among all the values of the last parse (falling back to the default at index `0`).
    /// Otherwise, index `0` is the most recent value.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{ArgParser, ValueError};
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_int_argument(None, "count");
    /// assert!(parser.parse(&["program", "--count=3"]));
    ///
    /// assert_eq!(parser.try_get_value::<i32>("count", 0), Ok(3));
    /// assert_eq!(
    ///     parser.try_get_value::<u32>("count", 0),
    ///     Err(ValueError::TypeMismatch {
    ///         name: "count".to_string(),
    ///         requested: "unsigned int",
    ///         declared: "int",
    ///     })
    /// );
    /// ```
    pub fn try_get_value<T: ArgValue>(&self, name: &str, index: usize) -> Result<T, ValueError> {
        let offset = self
            .index
            .lookup(name)
            .ok_or_else(|| ValueError::Undeclared(name.to_string()))?;
        let declared = self.declarations[offset].borrow().info().type_tag;
        let requested = TypeTag::of::<T>();

        if declared.id() != requested.id() {
            return Err(ValueError::TypeMismatch {
                name: name.to_string(),
                requested: requested.name(),
                declared: declared.name(),
            });
        }

        let value = self
            .arguments
            .get(offset)
            .and_then(|argument| argument.value_at(index))
            .ok_or_else(|| ValueError::Missing {
                name: name.to_string(),
                index,
            })?;

        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("internal error - argument value must match its declared type"),
        }
    }

    /// Get the value of argument `name`.
    ///
    /// # Panics
    /// Panics in the cases where [`ArgParser::try_get_value`] returns an error.
    pub fn get_value<T: ArgValue>(&self, name: &str) -> T {
        self.get_value_at(name, 0)
    }

    /// Get the value at `index` of argument `name`.
    ///
    /// # Panics
    /// Panics in the cases where [`ArgParser::try_get_value`] returns an error.
    pub fn get_value_at<T: ArgValue>(&self, name: &str, index: usize) -> T {
        match self.try_get_value(name, index) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }

    /// The status argument `name` ended the last parse with, or `None` for an undeclared argument (or before the first parse).
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{ArgParser, ParsingStatus};
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_int_argument(None, "count").multi_value(2);
    /// assert!(!parser.parse(&["program", "--count", "1"]));
    ///
    /// assert_eq!(parser.argument_status("count"), Some(ParsingStatus::InsufficientValues));
    /// ```
    pub fn argument_status(&self, name: &str) -> Option<ParsingStatus> {
        let offset = self.index.lookup(name)?;
        self.arguments.get(offset).map(|argument| argument.status())
    }

    fn defer(&mut self, error: ConfigError) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Deferring configuration error: {error}.");
        }
        self.deferred_error.get_or_insert(error);
    }

    fn refresh(&mut self) {
        self.arguments = self
            .declarations
            .iter()
            .map(|declaration| declaration.borrow().build())
            .collect();

        for argument in self.arguments.iter_mut() {
            argument.clear_stored();
        }
    }
}
