use thiserror::Error;

use crate::constant::COMPOSITE_LIMIT;

/// Behaviour to convert an input `&str` into a typed argument value.
///
/// `argbind` implements this for its built-in types (strings, integers, floats, `bool`, `char` and [`CompositeString`]).
/// Implement it for your own type and declare the type via [`ArgParser::with_type`](./struct.ArgParser.html#method.with_type) to use it in arguments.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::{prelude::*, ConversionError};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Action {
///     Sum,
///     Mul,
/// }
/// # impl std::fmt::Display for Action {
/// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
/// #         match self {
/// #             Action::Sum => write!(f, "sum"),
/// #             Action::Mul => write!(f, "mul"),
/// #         }
/// #     }
/// # }
///
/// impl ArgValue for Action {
///     const TYPE_NAME: &'static str = "action";
///
///     fn convert(text: &str) -> Result<Self, ConversionError> {
///         match text {
///             "sum" => Ok(Action::Sum),
///             "mul" => Ok(Action::Mul),
///             _ => Err(ConversionError::InvalidFormat {
///                 text: text.to_string(),
///                 type_name: Self::TYPE_NAME,
///             }),
///         }
///     }
/// }
///
/// assert_eq!(Action::convert("mul").unwrap(), Action::Mul);
/// ```
pub trait ArgValue: Clone + std::fmt::Display + 'static {
    /// The name used for this type in the help message (ex: `int`).
    const TYPE_NAME: &'static str;

    /// Whether the type may appear on the Cli without an explicit value (ex: `--verbose`).
    const FLAG: bool = false;

    /// Whether a value may be reconstructed by joining multiple whitespace separated tokens.
    const COMPOSITE: bool = false;

    /// Convert the text into a value of this type.
    fn convert(text: &str) -> Result<Self, ConversionError>;

    /// The default every argument of this type receives when none is configured.
    fn implicit_default() -> Option<Self> {
        None
    }
}

/// The reasons a token may fail to convert into an argument value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The text is not in the format of the type.
    #[error("'{text}' cannot convert to {type_name}.")]
    InvalidFormat {
        /// The offending text.
        text: String,
        /// The display name of the target type.
        type_name: &'static str,
    },
    /// The text is well formed but the value does not fit the type.
    #[error("'{text}' is out of range for {type_name}.")]
    OutOfRange {
        /// The offending text.
        text: String,
        /// The display name of the target type.
        type_name: &'static str,
    },
    /// The text is not a recognized character escape sequence.
    #[error("'{text}' is not a recognized escape sequence.")]
    InvalidEscape {
        /// The offending text.
        text: String,
    },
    /// The text was rejected by a caller supplied predicate.
    #[error("'{text}' was rejected.")]
    Rejected {
        /// The offending text.
        text: String,
    },
    /// A composite value ran out of tokens before it was accepted.
    #[error("'{text}' could not be completed into an accepted value.")]
    Incomplete {
        /// The accumulated text.
        text: String,
    },
}

/// A string value which may span multiple Cli tokens (ex: a path containing spaces).
///
/// Tokens are joined with a single space until the argument's acceptance predicate is satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeString(String);

impl CompositeString {
    /// Create a composite string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// View the composite string as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the underlying `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::ops::Deref for CompositeString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for CompositeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompositeString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CompositeString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for CompositeString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CompositeString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl ArgValue for String {
    const TYPE_NAME: &'static str = "string";

    fn convert(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl ArgValue for CompositeString {
    const TYPE_NAME: &'static str = "CompositeString";
    const COMPOSITE: bool = true;

    fn convert(text: &str) -> Result<Self, ConversionError> {
        Ok(CompositeString::from(text))
    }
}

impl ArgValue for bool {
    const TYPE_NAME: &'static str = "bool";
    const FLAG: bool = true;

    fn convert(text: &str) -> Result<Self, ConversionError> {
        match text {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(ConversionError::InvalidFormat {
                text: text.to_string(),
                type_name: Self::TYPE_NAME,
            }),
        }
    }

    fn implicit_default() -> Option<Self> {
        Some(false)
    }
}

impl ArgValue for char {
    const TYPE_NAME: &'static str = "char";

    fn convert(text: &str) -> Result<Self, ConversionError> {
        if text.starts_with('\\') {
            return unescape(text);
        }

        let mut chars = text.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConversionError::InvalidFormat {
                text: text.to_string(),
                type_name: Self::TYPE_NAME,
            }),
        }
    }
}

macro_rules! integer_value {
    ($t:ty, $name:literal) => {
        impl ArgValue for $t {
            const TYPE_NAME: &'static str = $name;

            fn convert(text: &str) -> Result<Self, ConversionError> {
                let wide = parse_integer(text, Self::TYPE_NAME)?;
                <$t>::try_from(wide).map_err(|_| ConversionError::OutOfRange {
                    text: text.to_string(),
                    type_name: Self::TYPE_NAME,
                })
            }
        }
    };
}

integer_value!(i16, "short");
integer_value!(i32, "int");
integer_value!(i64, "long long");
integer_value!(u16, "unsigned short");
integer_value!(u32, "unsigned int");
integer_value!(u64, "unsigned long long");

macro_rules! float_value {
    ($t:ty, $name:literal) => {
        impl ArgValue for $t {
            const TYPE_NAME: &'static str = $name;

            fn convert(text: &str) -> Result<Self, ConversionError> {
                let value: $t = text.parse().map_err(|_| ConversionError::InvalidFormat {
                    text: text.to_string(),
                    type_name: Self::TYPE_NAME,
                })?;

                // A finite literal which overflows parses as infinity.
                if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
                    return Err(ConversionError::OutOfRange {
                        text: text.to_string(),
                        type_name: Self::TYPE_NAME,
                    });
                }

                Ok(value)
            }
        }
    };
}

float_value!(f32, "float");
float_value!(f64, "double");

/// Parse an integer in the style of `strtoll` with base `0`.
/// Hexadecimal (`0x..`), octal (`0..`) and decimal are accepted, with an optional sign.
fn parse_integer(text: &str, type_name: &'static str) -> Result<i128, ConversionError> {
    let invalid = || ConversionError::InvalidFormat {
        text: text.to_string(),
        type_name,
    };
    let (negative, unsigned) = if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    };
    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    // The digits are validated, so the only possible failure is an i128 overflow.
    let magnitude =
        i128::from_str_radix(digits, radix).map_err(|_| ConversionError::OutOfRange {
            text: text.to_string(),
            type_name,
        })?;

    Ok(if negative { -magnitude } else { magnitude })
}

fn unescape(text: &str) -> Result<char, ConversionError> {
    let invalid = || ConversionError::InvalidEscape {
        text: text.to_string(),
    };
    let body = &text[1..];
    let mut chars = body.chars();
    let lead = chars.next().ok_or_else(invalid)?;
    let simple = match lead {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\x0c'),
        'b' => Some('\x08'),
        'v' => Some('\x0b'),
        'a' => Some('\x07'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    };

    if let Some(c) = simple {
        return if chars.as_str().is_empty() {
            Ok(c)
        } else {
            Err(invalid())
        };
    }

    let (radix, digits, max_digits) = if lead == 'x' {
        (16, chars.as_str(), 2)
    } else if lead.is_digit(8) {
        (8, body, 3)
    } else {
        return Err(invalid());
    };

    if digits.is_empty()
        || digits.len() > max_digits
        || !digits.chars().all(|c| c.is_digit(radix))
    {
        return Err(invalid());
    }

    match u32::from_str_radix(digits, radix) {
        Ok(code) if code <= u8::MAX as u32 => Ok(char::from(code as u8)),
        _ => Err(invalid()),
    }
}

/// Accumulate a composite value, starting from `first` and extending with the `following` tokens.
///
/// Returns the accepted text along with the number of `following` tokens it used.
pub(crate) fn accumulate(
    first: &str,
    following: &[&str],
    validate: &dyn Fn(&str) -> bool,
    is_good: &dyn Fn(&str) -> bool,
) -> Result<(String, usize), ConversionError> {
    if !validate(first) {
        return Err(ConversionError::Rejected {
            text: first.to_string(),
        });
    }

    let mut accumulated = first.to_string();
    let mut used = 0;

    loop {
        if is_good(&accumulated) {
            return Ok((accumulated, used));
        }

        match following.get(used) {
            Some(next) if !next.starts_with('-') && accumulated.len() <= COMPOSITE_LIMIT => {
                accumulated.push(' ');
                accumulated.push_str(next);
                used += 1;

                if !validate(&accumulated) {
                    return Err(ConversionError::Rejected { text: accumulated });
                }
            }
            _ => return Err(ConversionError::Incomplete { text: accumulated }),
        }
    }
}
