use std::cell::RefCell;
use std::rc::Rc;

use crate::api::state::{ArgumentState, Sink};
use crate::convert::ArgValue;
use crate::parser::{Argument, ArgumentInfo};

pub(crate) struct Declaration<'a, T: ArgValue> {
    info: ArgumentInfo<'a>,
    default: Option<T>,
    stored_value: Option<Sink<'a, T>>,
    stored_values: Option<Sink<'a, Vec<T>>>,
}

impl<'a, T: ArgValue> Declaration<'a, T> {
    pub(crate) fn new(short: Option<char>, long: impl Into<String>) -> Self {
        Self {
            info: ArgumentInfo::new::<T>(short, long),
            default: None,
            stored_value: None,
            stored_values: None,
        }
    }
}

/// Behaviour of a declaration, independent of its value type.
pub(crate) trait Declared<'a> {
    /// The declaration as configured (before the arity rules are applied).
    fn info(&self) -> &ArgumentInfo<'a>;

    /// The default value as shown in the help message, when it is worth showing.
    fn default_display(&self) -> Option<String>;

    /// Freeze the declaration into a fresh state for one parse.
    fn build(&self) -> Box<dyn Argument<'a> + 'a>;
}

impl<'a, T: ArgValue> Declared<'a> for Declaration<'a, T> {
    fn info(&self) -> &ArgumentInfo<'a> {
        &self.info
    }

    fn default_display(&self) -> Option<String> {
        let value = self.default.as_ref()?.to_string();
        let implicit = T::implicit_default().map(|implicit| implicit.to_string());

        if T::FLAG && implicit.as_ref() == Some(&value) {
            None
        } else {
            Some(value)
        }
    }

    fn build(&self) -> Box<dyn Argument<'a> + 'a> {
        let mut info = self.info.clone();
        let default = self.default.clone().or_else(T::implicit_default);
        info.has_default = default.is_some();

        if info.minimum_values == 0 && !info.has_default {
            info.minimum_values = 1;
        }

        Box::new(ArgumentState::new(
            info,
            default,
            self.stored_value.clone(),
            self.stored_values.clone(),
        ))
    }
}

/// A handle onto an argument declared with [`ArgParser::add_argument`](./struct.ArgParser.html#method.add_argument).
///
/// Every method configures the same underlying declaration, so the handle may be dropped after configuring (the parser keeps the declaration).
/// Changes apply from the next parse onwards.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::ArgParser;
///
/// let mut values: Vec<i32> = Vec::default();
/// let mut parser = ArgParser::new("program");
/// parser
///     .add_argument::<i32>(Some('n'), "number")
///     .multi_value(2)
///     .store_values(&mut values)
///     .help("Some numbers.");
///
/// assert!(parser.parse(&["program", "-n", "1", "2", "3"]));
/// drop(parser);
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
pub struct ArgumentBuilder<'a, T: ArgValue> {
    inner: Rc<RefCell<Declaration<'a, T>>>,
}

impl<'a, T: ArgValue> Clone for ArgumentBuilder<'a, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T: ArgValue> std::fmt::Debug for ArgumentBuilder<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentBuilder")
            .field("info", &self.inner.borrow().info)
            .finish_non_exhaustive()
    }
}

impl<'a, T: ArgValue> ArgumentBuilder<'a, T> {
    pub(crate) fn new(inner: Rc<RefCell<Declaration<'a, T>>>) -> Self {
        Self { inner }
    }

    fn update(self, apply: impl FnOnce(&mut Declaration<'a, T>)) -> Self {
        apply(&mut *self.inner.borrow_mut());
        self
    }

    /// Allow the argument to appear repeatedly, requiring at least `minimum` values.
    /// A repeated argument keeps consuming the tokens that follow it, until a token starting with `-`.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_argument::<String>(None, "item").multi_value(3);
    ///
    /// assert!(!parser.parse(&["program", "--item", "a", "b"]));
    /// assert!(parser.parse(&["program", "--item", "a", "b", "--item=c"]));
    /// assert_eq!(parser.get_value_at::<String>("item", 2), "c");
    /// ```
    pub fn multi_value(self, minimum: usize) -> Self {
        self.update(|declaration| {
            declaration.info.is_multi_value = true;
            declaration.info.minimum_values = minimum;
        })
    }

    /// Allow the argument to be matched by position (in declaration order) from the tokens left over by named arguments.
    /// An argument given by name in the same parse does not take leftover tokens.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_argument::<i32>(None, "count").positional();
    ///
    /// assert!(parser.parse(&["program", "7"]));
    /// assert_eq!(parser.get_value::<i32>("count"), 7);
    /// assert!(parser.parse(&["program", "--count", "7", "8"]));
    /// assert_eq!(parser.get_value::<i32>("count"), 7);
    /// ```
    pub fn positional(self) -> Self {
        self.update(|declaration| declaration.info.is_positional = true)
    }

    /// Write the most recent value into `variable` after every parse.
    /// When a default is configured, `variable` is reset to it at the start of every parse.
    pub fn store_value(self, variable: &'a mut T) -> Self {
        self.update(|declaration| {
            declaration.info.has_store_value = true;
            declaration.stored_value = Some(Rc::new(RefCell::new(variable)));
        })
    }

    /// Write every value into `variables`, which is cleared at the start of every parse.
    pub fn store_values(self, variables: &'a mut Vec<T>) -> Self {
        self.update(|declaration| {
            declaration.info.has_store_values = true;
            declaration.stored_values = Some(Rc::new(RefCell::new(variables)));
        })
    }

    /// Use `value` when the argument does not appear.
    /// An argument with a default is not required.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser.add_argument::<String>(Some('m'), "mode").default("fast".to_string());
    ///
    /// assert!(parser.parse(&["program"]));
    /// assert_eq!(parser.get_value::<String>("mode"), "fast");
    /// ```
    pub fn default(self, value: T) -> Self {
        self.update(|declaration| {
            declaration.info.has_default = true;
            declaration.default = Some(value);
        })
    }

    /// Install the predicate which every (partial) composite value must satisfy.
    /// Replaces any previously installed predicate.
    pub fn add_validate(self, validate: impl Fn(&str) -> bool + 'a) -> Self {
        self.update(|declaration| declaration.info.validate = Rc::new(validate))
    }

    /// Install the acceptance predicate for the argument's values.
    /// For composite values, tokens are joined until this predicate is satisfied.
    /// Replaces any previously installed predicate.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::ArgParser;
    ///
    /// let mut parser = ArgParser::new("program");
    /// parser
    ///     .add_argument::<u32>(None, "port")
    ///     .add_is_good(|text| text != "0");
    ///
    /// assert!(!parser.parse(&["program", "--port=0"]));
    /// assert!(parser.parse(&["program", "--port=80"]));
    /// ```
    pub fn add_is_good(self, is_good: impl Fn(&str) -> bool + 'a) -> Self {
        self.update(|declaration| declaration.info.is_good = Rc::new(is_good))
    }

    /// Document the argument in the help message.
    /// If repeated, only the final description applies.
    pub fn help(self, description: impl Into<String>) -> Self {
        self.update(|declaration| declaration.info.description = description.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParsingStatus;
    use crate::parser::Lead;

    fn builder<T: ArgValue>() -> (ArgumentBuilder<'static, T>, Rc<RefCell<Declaration<'static, T>>>) {
        let inner = Rc::new(RefCell::new(Declaration::new(Some('a'), "arg")));
        (ArgumentBuilder::new(inner.clone()), inner)
    }

    #[test]
    fn builder_configures_declaration() {
        // Setup
        let (builder, inner) = builder::<i32>();

        // Execute
        builder
            .multi_value(2)
            .positional()
            .default(5)
            .help("Some text")
            .help("Final text");

        // Verify
        let declaration = inner.borrow();
        let info = declaration.info();
        assert_eq!(info.short, Some('a'));
        assert_eq!(info.long, "arg");
        assert_eq!(info.description, "Final text");
        assert_eq!(info.minimum_values, 2);
        assert!(info.is_multi_value);
        assert!(info.is_positional);
        assert!(info.has_default);
        assert!(!info.has_store_value);
        assert!(!info.has_store_values);
        assert_eq!(declaration.default_display(), Some("5".to_string()));
    }

    #[test]
    fn builder_clone_shares() {
        let (builder, inner) = builder::<i32>();
        let _ = builder.clone().positional();
        assert!(inner.borrow().info().is_positional);
    }

    #[test]
    fn build_requires_a_value() {
        let (_builder, inner) = builder::<String>();
        let mut argument = inner.borrow().build();
        assert_eq!(argument.info().minimum_values, 1);
        assert!(!argument.check_limit());
        assert_eq!(argument.status(), ParsingStatus::InsufficientValues);
        // The declaration itself is untouched.
        assert_eq!(inner.borrow().info().minimum_values, 0);
    }

    #[test]
    fn build_with_default() {
        let (builder, inner) = builder::<String>();
        builder.default("x".to_string());
        let mut argument = inner.borrow().build();
        assert_eq!(argument.info().minimum_values, 0);
        assert!(argument.check_limit());
        assert_eq!(
            *argument.value_at(0).unwrap().downcast::<String>().unwrap(),
            "x"
        );
    }

    #[test]
    fn build_flag() {
        let (_builder, inner) = builder::<bool>();
        let mut argument = inner.borrow().build();
        assert!(argument.info().has_default);
        assert_eq!(argument.info().minimum_values, 0);
        assert!(argument.check_limit());
        assert!(!*argument.value_at(0).unwrap().downcast::<bool>().unwrap());
        assert_eq!(inner.borrow().default_display(), None);
    }

    #[test]
    fn default_display_flag() {
        let (builder, inner) = builder::<bool>();
        let builder = builder.default(false);
        assert_eq!(inner.borrow().default_display(), None);
        builder.default(true);
        assert_eq!(inner.borrow().default_display(), Some("true".to_string()));
    }

    #[test]
    fn build_applies_predicates() {
        // Setup
        let (builder, inner) = builder::<String>();
        builder
            .add_is_good(|text| text.len() < 3)
            .add_is_good(|text| text.len() < 5);
        let mut argument = inner.borrow().build();

        // Execute
        argument.consume(&["p", "--arg=abcd"], 2, Lead::Inline("abcd"));

        // Verify
        assert_eq!(argument.status(), ParsingStatus::Success);
    }

    #[test]
    fn build_shares_sinks() {
        let mut value: i32 = 0;
        {
            let inner = Rc::new(RefCell::new(Declaration::<i32>::new(None, "arg")));
            ArgumentBuilder::new(inner.clone()).store_value(&mut value);
            let mut first = inner.borrow().build();
            first.consume(&["p", "--arg=1"], 2, Lead::Inline("1"));
            let mut second = inner.borrow().build();
            second.consume(&["p", "--arg=2"], 2, Lead::Inline("2"));
        }
        assert_eq!(value, 2);
    }
}
