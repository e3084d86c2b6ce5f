//! `argbind` is a typed, registry style command line parser for Rust.
//!
//! Arguments are declared on an [`ArgParser`], each with a value type, a long key and an optional short key.
//! After a parse, values are read back from the parser by long key, or written straight into caller-owned variables ("sinks").
//! `argbind` prioritizes the following concerns:
//! * *Typed values*:
//! The user declares the value type (ex: `i32`) and never converts `&str -> T` directly.
//! Additional types plug in through [`ArgValue`](./prelude/trait.ArgValue.html) and [`ArgParser::with_type`].
//! * *Caller supplied validation*:
//! Each argument accepts an acceptance predicate, and multi-token ("composite") values accept a second validation predicate.
//! * *Repeated parsing*:
//! The same parser may be used for many parses, each starting from a clean state.
//! * *Plain diagnostics*:
//! Failures are reported as one human readable line per problem, and the help message lists every argument with its type and notes.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/accumulate.rs")]
//! ```
//!
//! ```console
//! $ accumulate --help
//! accumulate
//! Program accumulate arguments
//!
//! OPTIONS:
//!      --N=<int>:  Integers to accumulate [repeated, positional, min args = 1]
//! -a,  --action=<Action>:  Accumulation to apply (sum or mul)
//!
//! -h,  --help:  Display this help and exit
//!
//! $ accumulate -a mul 1 2 3 4
//! Result: 24
//!
//! $ accumulate 1 2 3
//! Not enough values were passed to --action.
//! Wrong argument
//! <help message>
//! ```
//!
//! # Declaring arguments
//! Start with [`ArgParser::new`], then declare arguments via [`ArgParser::add_argument`] (or a shorthand such as [`ArgParser::add_int_argument`] or [`ArgParser::add_flag`]).
//! Each declaration returns an [`ArgumentBuilder`] for further configuration:
//! * [`ArgumentBuilder::multi_value`]: the argument may repeat, and must receive at least `n` values.
//! * [`ArgumentBuilder::positional`]: the argument also matches the tokens no named argument claimed.
//! * [`ArgumentBuilder::default`]: the value used when the argument does not appear; an argument without a default is required.
//! * [`ArgumentBuilder::store_value`] & [`ArgumentBuilder::store_values`]: bind the argument to caller-owned variables.
//! * [`ArgumentBuilder::add_validate`] & [`ArgumentBuilder::add_is_good`]: install the predicates.
//! * [`ArgumentBuilder::help`]: document the argument in the help message.
//!
//! Configuration problems (ex: a duplicate key) do not panic; they are reported by the next parse as [`ConfigError`].
//!
//! ### Built-in types
//! ```console
//! Type              | Help name           | Accepts
//! ------------------------------------------------------------------------------------------
//! String            | string              | any token
//! CompositeString   | CompositeString     | whitespace joined tokens, until `is_good` accepts
//! i16 / i32 / i64   | short / int / long long           | decimal, 0x hex or 0 octal, with sign
//! u16 / u32 / u64   | unsigned short / int / long long  | decimal, 0x hex or 0 octal
//! f32 / f64         | float / double      | decimal and exponent notation
//! bool              | bool                | flag; `true`, `false`, `1` or `0` after `=`
//! char              | char                | a single character or an escape (ex: `\t`, `\x41`)
//! ```
//!
//! ### Sinks
//! Sinks are mutable borrows held by the parser, so drop the parser before reading them.
//! ```
//! use argbind::ArgParser;
//!
//! let mut items: Vec<u32> = Vec::default();
//! let mut parser = ArgParser::new("summer");
//! parser
//!     .add_uint_argument(None, "item")
//!     .multi_value(1)
//!     .positional()
//!     .store_values(&mut items);
//!
//! assert!(parser.parse(&["summer", "1", "2", "3"]));
//! drop(parser);
//! assert_eq!(items.iter().sum::<u32>(), 6);
//! ```
//!
//! # Cli Semantics
//! `argbind` parses the Cli tokens according to the following set of rules.
//!
//! * The first token is the program invocation, and is skipped.
//! * One leading and one trailing quote (`'` or `"`) are stripped from each token.
//! * Named arguments are matched by `--NAME` (or short name `-N`), up to the first `--` token.
//! A value follows either as the next token, or after `=` (ex: `--key=123` is equivalent to `--key 123`).
//! * Multiple short names may be combined into a single token (ex: `-abc`).
//! The `=` separator applies *only* to the final short name (ex: `-abc=123`).
//! * Flags take no value token; `--flag=false` is used to set them explicitly.
//! * Repeated arguments keep matching subsequent tokens, until a token starting with `-`.
//! * Every token not claimed by a named argument is matched against the positional arguments, in declaration order.
//! Tokens after `--` are always positional (ex: `-- -1` passes `-1` positionally), and unmatched tokens are ignored.
//! * A lone `-`, or an undeclared name, fails the parse immediately.
//! * When the help flag is present the parse succeeds, whatever the other arguments.
//!
//! # Features
//! * `tracing_debug`: Emit debug logs via [tracing](https://docs.rs/tracing) while parsing.
pub use argbind_builder::*;
