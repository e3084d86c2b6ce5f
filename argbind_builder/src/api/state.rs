use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::constant::FLAG_PRESENT;
use crate::convert::{accumulate, ArgValue, ConversionError};
use crate::model::ParsingStatus;
use crate::parser::{Argument, ArgumentInfo, Lead};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A caller owned variable which the parser writes into.
pub(crate) type Sink<'a, T> = Rc<RefCell<&'a mut T>>;

/// The sequence of parsed values: kept by the state, or written through to a caller owned `Vec`.
pub(crate) enum Values<'a, T> {
    Owned(Vec<T>),
    Borrowed(Sink<'a, Vec<T>>),
}

impl<'a, T: Clone> Values<'a, T> {
    fn push(&mut self, value: T) {
        match self {
            Values::Owned(values) => values.push(value),
            Values::Borrowed(values) => values.borrow_mut().push(value),
        }
    }

    fn get(&self, index: usize) -> Option<T> {
        match self {
            Values::Owned(values) => values.get(index).cloned(),
            Values::Borrowed(values) => values.borrow().get(index).cloned(),
        }
    }

    fn clear(&mut self) {
        match self {
            Values::Owned(values) => values.clear(),
            Values::Borrowed(values) => values.borrow_mut().clear(),
        }
    }
}

/// The runtime state of one declared argument for a single parse.
pub(crate) struct ArgumentState<'a, T> {
    info: ArgumentInfo<'a>,
    status: ParsingStatus,
    counter: usize,
    value: Option<T>,
    default: Option<T>,
    stored_value: Option<Sink<'a, T>>,
    values: Values<'a, T>,
}

impl<'a, T: ArgValue> ArgumentState<'a, T> {
    pub(crate) fn new(
        info: ArgumentInfo<'a>,
        default: Option<T>,
        stored_value: Option<Sink<'a, T>>,
        stored_values: Option<Sink<'a, Vec<T>>>,
    ) -> Self {
        Self {
            info,
            status: ParsingStatus::NotSeen,
            counter: 0,
            value: default.clone(),
            default,
            stored_value,
            values: match stored_values {
                Some(values) => Values::Borrowed(values),
                None => Values::Owned(Vec::default()),
            },
        }
    }

    /// Convert `text` into a value, returning the number of `following` tokens it also used.
    fn obtain(&self, text: &str, following: &[&str]) -> Result<(T, usize), ConversionError> {
        if T::COMPOSITE {
            let (joined, used) =
                accumulate(text, following, &*self.info.validate, &*self.info.is_good)?;
            return Ok((T::convert(&joined)?, used));
        }

        let value = T::convert(text)?;

        if !T::FLAG && !(self.info.is_good)(text) {
            return Err(ConversionError::Rejected {
                text: text.to_string(),
            });
        }

        Ok((value, 0))
    }

    fn record(&mut self, value: T) {
        self.values.push(value.clone());
        self.value.replace(value);
    }
}

impl<'a, T: ArgValue> Argument<'a> for ArgumentState<'a, T> {
    fn info(&self) -> &ArgumentInfo<'a> {
        &self.info
    }

    fn consume(&mut self, window: &[&str], mut cursor: usize, lead: Lead<'_>) -> usize {
        if self.status == ParsingStatus::NotSeen {
            self.status = ParsingStatus::Success;
        }

        let positional = lead == Lead::Positional;
        let mut lead = lead;

        loop {
            let text = match lead {
                Lead::Inline(value) => Some(value),
                Lead::Bare if T::FLAG => Some(FLAG_PRESENT),
                Lead::Bare | Lead::Positional => {
                    let next = window.get(cursor).copied();

                    if next.is_some() {
                        cursor += 1;
                    }

                    next
                }
            };
            self.counter += 1;

            let Some(text) = text else {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("--{} is missing its value.", self.info.long);
                }
                self.status = ParsingStatus::InvalidValue;
                break;
            };

            match self.obtain(text, &window[cursor..]) {
                Ok((value, used)) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("--{} accepted '{value}' ({used} extra tokens).", self.info.long);
                    }
                    cursor += used;
                    self.record(value);
                }
                Err(_error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("--{} did not accept '{text}': {_error}", self.info.long);
                    }
                    self.status = ParsingStatus::InvalidValue;

                    // A failed composite leaves no reliable boundary for the next value.
                    if T::COMPOSITE {
                        break;
                    }
                }
            }

            if !self.info.is_multi_value {
                break;
            }

            match window.get(cursor) {
                Some(next) if positional || !next.starts_with('-') => lead = Lead::Positional,
                _ => break,
            }
        }

        self.check_limit();

        if let (Some(sink), Some(value)) = (&self.stored_value, &self.value) {
            **sink.borrow_mut() = value.clone();
        }

        cursor
    }

    fn check_limit(&mut self) -> bool {
        if self.counter < self.info.minimum_values {
            if self.status != ParsingStatus::InvalidValue {
                self.status = ParsingStatus::InsufficientValues;
            }

            false
        } else {
            if self.status == ParsingStatus::InsufficientValues {
                self.status = ParsingStatus::Success;
            }

            true
        }
    }

    fn status(&self) -> ParsingStatus {
        self.status
    }

    fn used_values(&self) -> usize {
        self.counter
    }

    fn clear_stored(&mut self) {
        self.values.clear();
        self.counter = 0;
        self.status = ParsingStatus::NotSeen;
        self.value = self.default.clone();

        if let (Some(sink), Some(default)) = (&self.stored_value, &self.default) {
            **sink.borrow_mut() = default.clone();
        }
    }

    fn value_at(&self, index: usize) -> Option<Box<dyn Any>> {
        let value = if self.info.is_multi_value {
            self.values
                .get(index)
                .or_else(|| (index == 0).then(|| self.value.clone()).flatten())
        } else if index == 0 {
            self.value.clone()
        } else {
            self.values.get(index)
        };

        value.map(|value| Box::new(value) as Box<dyn Any>)
    }
}
