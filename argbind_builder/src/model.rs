use std::any::TypeId;

/// The parse status of a single declared argument.
///
/// Every argument starts each parse as [`ParsingStatus::NotSeen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingStatus {
    /// The argument was not encountered on the Cli.
    /// This is acceptable when the argument has a default, or no minimum.
    NotSeen,
    /// A value could not be converted, or was rejected by the acceptance predicate.
    InvalidValue,
    /// The argument was encountered fewer times than its declared minimum.
    InsufficientValues,
    /// All values were accepted.
    Success,
}

impl std::fmt::Display for ParsingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Identifies the element type of an argument.
///
/// Arguments are bucketed by their `TypeTag` both for typed value retrieval and for help ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// The tag of the element type `T`.
    pub fn of<T: crate::prelude::ArgValue>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::TYPE_NAME,
        }
    }

    /// The default display name for this type (ex: `int`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn id(&self) -> TypeId {
        self.id
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::CompositeString;

    #[test]
    fn type_tag() {
        assert_eq!(TypeTag::of::<i32>(), TypeTag::of::<i32>());
        assert_ne!(TypeTag::of::<i32>(), TypeTag::of::<i64>());
        assert_ne!(TypeTag::of::<String>(), TypeTag::of::<CompositeString>());
        assert_eq!(TypeTag::of::<i32>().name(), "int");
        assert_eq!(TypeTag::of::<u64>().to_string(), "unsigned long long");
    }

    #[test]
    fn parsing_status_display() {
        assert_eq!(ParsingStatus::NotSeen.to_string(), "NotSeen");
        assert_eq!(ParsingStatus::InvalidValue.to_string(), "InvalidValue");
    }
}
