//! Traits which, typically, may be imported without concern: `use argbind::prelude::*`.

pub use crate::convert::ArgValue;
