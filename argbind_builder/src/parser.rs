mod base;
mod interface;
mod printer;

pub(crate) use base::*;
pub use base::{ArgumentError, ConfigError, ParseError};
pub use interface::*;
pub(crate) use printer::*;
