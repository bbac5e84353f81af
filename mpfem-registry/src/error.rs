use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// The reason an operation was rejected because of the current state of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateViolation {
    /// A child was added to an item that holds a value.
    ChildOfValue,
    /// A value was stored in an item that has children.
    ValueOfContainer,
    /// A value of one type was stored in (or requested from) a slot of another type.
    ValueTypeMismatch { expected: &'static str, found: &'static str },
    /// A value was requested from an item that does not hold one.
    EmptyValue,
    /// The root item of a registry cannot be removed.
    RootRemoval,
    /// A factory produced an item whose name differs from the name it was asked for.
    NameMismatch { expected: String, found: String },
}

impl Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChildOfValue => write!(f, "cannot add a child to an item holding a value"),
            Self::ValueOfContainer => write!(f, "cannot store a value in an item with children"),
            Self::ValueTypeMismatch { expected, found } => {
                write!(f, "value type mismatch (item holds {expected}, got {found})")
            }
            Self::EmptyValue => write!(f, "item does not hold a value"),
            Self::RootRemoval => write!(f, "the root item cannot be removed"),
            Self::NameMismatch { expected, found } => {
                write!(f, "factory created item \"{found}\" where \"{expected}\" was expected")
            }
        }
    }
}

/// Error type shared by all registry operations.
///
/// Errors raised by a single item carry the name of the child involved. Errors raised through
/// [`Registry`](crate::Registry) carry the full dotted path instead.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// The requested item does not exist.
    NotFound { path: String },
    /// An item with the same name already exists.
    Conflict { path: String },
    /// The item is in a state that does not permit the operation.
    InvalidState { path: String, violation: StateViolation },
}

impl RegistryError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn conflict(path: impl Into<String>) -> Self {
        Self::Conflict { path: path.into() }
    }

    pub(crate) fn invalid_state(path: impl Into<String>, violation: StateViolation) -> Self {
        Self::InvalidState {
            path: path.into(),
            violation,
        }
    }

    /// The name or path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::Conflict { path } | Self::InvalidState { path, .. } => path,
        }
    }

    /// Replaces the name or path the error refers to.
    pub fn with_path(mut self, new_path: impl Into<String>) -> Self {
        match &mut self {
            Self::NotFound { path } | Self::Conflict { path } | Self::InvalidState { path, .. } => {
                *path = new_path.into();
            }
        }
        self
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "The item \"{path}\" is not found in the registry"),
            Self::Conflict { path } => write!(f, "The item \"{path}\" is already registered"),
            Self::InvalidState { path, violation } => {
                write!(f, "Invalid operation on item \"{path}\": {violation}")
            }
        }
    }
}

impl Error for RegistryError {}
