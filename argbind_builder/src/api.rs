mod builder;
mod core;
mod state;

pub use self::builder::*;
pub use self::core::*;
