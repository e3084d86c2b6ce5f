//! Builder module for `argbind`.
//! See [documentation root](https://docs.rs/argbind/latest/argbind/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod convert;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use convert::{CompositeString, ConversionError};
pub use model::*;
pub use parser::{
    ArgumentError, ConditionalOutput, ConfigError, ConsoleInterface, ParseError, SilentInterface,
    UserInterface,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
