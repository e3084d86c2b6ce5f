use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

use crate::constant::*;
use crate::convert::ArgValue;
use crate::model::{ParsingStatus, TypeTag};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for an invalid parser configuration (ex: two arguments sharing the same long name).
///
/// Configuration errors are deferred: they are reported by the next parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A problem with the values passed to one argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// The argument received fewer values than its minimum.
    #[error("Not enough values were passed to --{0}.")]
    NotEnoughValues(String),
    /// At least one value could not be converted or was rejected.
    #[error("An incorrect value was passed to --{0}.")]
    IncorrectValue(String),
}

/// Error for a failed parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A lone `-` token appeared before the terminator.
    #[error("Cannot use a lone '-' as an argument.")]
    LoneDash,
    /// A token referred to an argument which was never declared.
    #[error("Used nonexistent argument: {0}")]
    NonexistentArgument(String),
    /// One or more arguments ended the parse in a bad state.
    #[error("{}", join_errors(.0))]
    Arguments(Vec<ArgumentError>),
    /// The parser was configured incorrectly.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_errors(errors: &[ArgumentError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

pub(crate) type Predicate<'a> = Rc<dyn Fn(&str) -> bool + 'a>;

pub(crate) fn always<'a>() -> Predicate<'a> {
    Rc::new(|_: &str| true)
}

/// The declaration-time description of an argument.
#[derive(Clone)]
pub(crate) struct ArgumentInfo<'a> {
    pub(crate) short: Option<char>,
    pub(crate) long: String,
    pub(crate) description: String,
    pub(crate) type_tag: TypeTag,
    pub(crate) is_flag: bool,
    pub(crate) minimum_values: usize,
    pub(crate) is_multi_value: bool,
    pub(crate) is_positional: bool,
    pub(crate) has_store_value: bool,
    pub(crate) has_store_values: bool,
    pub(crate) has_default: bool,
    pub(crate) validate: Predicate<'a>,
    pub(crate) is_good: Predicate<'a>,
}

impl<'a> ArgumentInfo<'a> {
    pub(crate) fn new<T: ArgValue>(short: Option<char>, long: impl Into<String>) -> Self {
        Self {
            short,
            long: long.into(),
            description: String::default(),
            type_tag: TypeTag::of::<T>(),
            is_flag: T::FLAG,
            minimum_values: 0,
            is_multi_value: false,
            is_positional: false,
            has_store_value: false,
            has_store_values: false,
            has_default: false,
            validate: always(),
            is_good: always(),
        }
    }
}

impl<'a> std::fmt::Debug for ArgumentInfo<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentInfo")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("type_tag", &self.type_tag)
            .field("minimum_values", &self.minimum_values)
            .field("is_multi_value", &self.is_multi_value)
            .field("is_positional", &self.is_positional)
            .finish_non_exhaustive()
    }
}

/// Where the first value of an occurrence comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lead<'t> {
    /// Text after the `=` of the key token.
    Inline(&'t str),
    /// The key token had no `=`: flags synthesize their value, others take the next token.
    Bare,
    /// Matching leftover tokens by position.
    Positional,
}

/// Behaviour of a declared argument at parse time, independent of its value type.
///
/// We need this at the middle/top of the parser so that arguments of different types may all be driven in a single scan.
pub(crate) trait Argument<'a> {
    fn info(&self) -> &ArgumentInfo<'a>;

    /// Consume one occurrence (and for repeated arguments, all the values that follow).
    /// Values are read from `window` starting at `cursor`; returns the cursor after the last value used.
    fn consume(&mut self, window: &[&str], cursor: usize, lead: Lead<'_>) -> usize;

    /// Reconcile the occurrence count with the minimum; `false` when too few values were seen.
    fn check_limit(&mut self) -> bool;

    fn status(&self) -> ParsingStatus;

    fn used_values(&self) -> usize;

    /// Reset the occurrence count and any bound sinks.
    fn clear_stored(&mut self);

    fn value_at(&self, index: usize) -> Option<Box<dyn Any>>;
}

/// The arguments of one value type, with the name the help message shows for that type.
#[derive(Debug)]
pub(crate) struct TypeBucket {
    pub(crate) tag: TypeTag,
    pub(crate) display: String,
    pub(crate) arguments: HashMap<String, usize>,
}

impl TypeBucket {
    /// The declaration indices of this bucket, in declaration order.
    pub(crate) fn ordered(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.arguments.values().copied().collect();
        indices.sort_unstable();
        indices
    }
}

/// Maps long and short keys onto declaration indices.
#[derive(Debug, Default)]
pub(crate) struct KeyIndex {
    buckets: Vec<TypeBucket>,
    short_to_long: HashMap<char, String>,
}

impl KeyIndex {
    pub(crate) fn register_type(&mut self, tag: TypeTag) {
        if self.bucket(&tag).is_none() {
            self.buckets.push(TypeBucket {
                display: tag.name().to_string(),
                tag,
                arguments: HashMap::default(),
            });
        }
    }

    pub(crate) fn set_alias(
        &mut self,
        tag: &TypeTag,
        display: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let bucket = self
            .buckets
            .iter_mut()
            .find(|bucket| bucket.tag.id() == tag.id())
            .ok_or_else(|| unregistered(tag))?;
        bucket.display = display.into();
        Ok(())
    }

    pub(crate) fn insert(
        &mut self,
        tag: &TypeTag,
        short: Option<char>,
        long: &str,
        index: usize,
    ) -> Result<(), ConfigError> {
        if long.is_empty() {
            return Err(ConfigError(
                "Cannot declare an argument with an empty long name.".to_string(),
            ));
        }

        if self.lookup(long).is_some() {
            return Err(ConfigError(format!(
                "Cannot duplicate the argument '--{long}'."
            )));
        }

        if let Some(s) = short {
            if let Some(existing) = self.short_to_long.get(&s) {
                return Err(ConfigError(format!(
                    "Cannot duplicate the short key '-{s}' (already used by '--{existing}')."
                )));
            }
        }

        let bucket = self
            .buckets
            .iter_mut()
            .find(|bucket| bucket.tag.id() == tag.id())
            .ok_or_else(|| unregistered(tag))?;
        bucket.arguments.insert(long.to_string(), index);

        if let Some(s) = short {
            self.short_to_long.insert(s, long.to_string());
        }

        Ok(())
    }

    /// Find the declaration index of a long key, searching the buckets in type order.
    pub(crate) fn lookup(&self, long: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find_map(|bucket| bucket.arguments.get(long).copied())
    }

    pub(crate) fn buckets(&self) -> &[TypeBucket] {
        &self.buckets
    }

    fn bucket(&self, tag: &TypeTag) -> Option<&TypeBucket> {
        self.buckets.iter().find(|bucket| bucket.tag.id() == tag.id())
    }

    /// Resolve a `-`-prefixed token into its candidate long keys.
    /// Only the last candidate receives the text after `=`.
    pub(crate) fn resolve<'t>(
        &self,
        token: &'t str,
    ) -> Result<Vec<(String, Option<&'t str>)>, ParseError> {
        let nonexistent = || ParseError::NonexistentArgument(token.to_string());

        if let Some(body) = token.strip_prefix("--") {
            let (key, inline) = match body.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (body, None),
            };

            if key.is_empty() {
                return Err(nonexistent());
            }

            return Ok(vec![(key.to_string(), inline)]);
        }

        let body = token.strip_prefix('-').ok_or_else(nonexistent)?;
        let (shorts, inline) = match body.split_once('=') {
            Some((shorts, value)) => (shorts, Some(value)),
            None => (body, None),
        };

        if shorts.is_empty() {
            return Err(nonexistent());
        }

        let mut candidates = Vec::default();

        for s in shorts.chars() {
            let long = self.short_to_long.get(&s).ok_or_else(nonexistent)?;
            candidates.push((long.clone(), None));
        }

        if let Some(last) = candidates.last_mut() {
            last.1 = inline;
        }

        Ok(candidates)
    }
}

fn unregistered(tag: &TypeTag) -> ConfigError {
    ConfigError(format!(
        "The type '{tag}' is not registered with the parser (see `ArgParser::with_type`)."
    ))
}

/// Prepare the raw Cli tokens: strip one leading and one trailing quote, then append the sentinel terminator.
pub(crate) fn tokenize<S: AsRef<str>>(arguments: &[S]) -> Vec<String> {
    const QUOTES: [char; 2] = ['\'', '"'];

    arguments
        .iter()
        .map(|argument| {
            let argument = argument.as_ref();
            let argument = argument.strip_prefix(&QUOTES[..]).unwrap_or(argument);
            let argument = argument.strip_suffix(&QUOTES[..]).unwrap_or(argument);
            argument.to_string()
        })
        .chain(std::iter::once(TERMINATOR.to_string()))
        .collect()
}

pub(crate) struct Parser<'p, 'a> {
    index: &'p KeyIndex,
    arguments: &'p mut [Box<dyn Argument<'a> + 'a>],
}

impl<'p, 'a> std::fmt::Debug for Parser<'p, 'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser{..}").finish()
    }
}

impl<'p, 'a> Parser<'p, 'a> {
    pub(crate) fn new(index: &'p KeyIndex, arguments: &'p mut [Box<dyn Argument<'a> + 'a>]) -> Self {
        Self { index, arguments }
    }

    /// Drive the arguments over the tokenized input.
    /// Index 0 is the program invocation and the last token is the sentinel terminator.
    pub(crate) fn consume(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        let terminator = tokens
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, token)| **token == TERMINATOR)
            .map(|(i, _)| i)
            .unwrap_or(tokens.len());
        let window = &tokens[..terminator];
        let mut claimed = vec![false; tokens.len()];
        let mut position = 1;

        // 1. Named arguments, up to the terminator.
        while position < terminator {
            let token = window[position];

            if !token.starts_with('-') {
                position += 1;
                continue;
            }

            if token == "-" {
                return Err(ParseError::LoneDash);
            }

            let candidates = self.index.resolve(token)?;
            let mut cursor = position + 1;

            for (long, inline) in candidates {
                let offset = self
                    .index
                    .lookup(&long)
                    .ok_or_else(|| ParseError::NonexistentArgument(token.to_string()))?;
                let lead = match inline {
                    Some(value) => Lead::Inline(value),
                    None => Lead::Bare,
                };
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token '{token}' dispatches to --{long} ({lead:?}) at cursor {cursor}.");
                }
                cursor = self.arguments[offset].consume(window, cursor, lead);
            }

            for flag in claimed.iter_mut().take(cursor).skip(position) {
                *flag = true;
            }

            position = cursor;
        }

        // 2. Whatever remains goes to the positional arguments not already given by name.
        let leftovers: Vec<&str> = (1..tokens.len().saturating_sub(1))
            .filter(|i| *i != terminator && !claimed[*i])
            .map(|i| tokens[i])
            .collect();
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Positional leftovers: {leftovers:?}.");
        }
        let mut cursor = 0;

        for argument in self
            .arguments
            .iter_mut()
            .filter(|argument| argument.info().is_positional && argument.used_values() == 0)
        {
            if cursor >= leftovers.len() {
                break;
            }

            cursor = argument.consume(&leftovers, cursor, Lead::Positional);
        }

        Ok(())
    }

    /// Aggregate the argument states into the parse result.
    pub(crate) fn finalize(&mut self, help: Option<usize>) -> Result<(), ParseError> {
        if let Some(offset) = help {
            let requested = self.arguments[offset]
                .value_at(0)
                .and_then(|value| value.downcast::<bool>().ok())
                .map(|value| *value)
                .unwrap_or(false);

            if requested {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Help requested, skipping argument checks.");
                }
                return Ok(());
            }
        }

        let mut errors = Vec::default();

        for argument in self.arguments.iter_mut() {
            if !argument.check_limit() {
                errors.push(ArgumentError::NotEnoughValues(argument.info().long.clone()));
            }

            if argument.status() == ParsingStatus::InvalidValue {
                errors.push(ArgumentError::IncorrectValue(argument.info().long.clone()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Arguments(errors))
        }
    }
}
