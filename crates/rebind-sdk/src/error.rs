//! Error types for calls and module loading

use crate::types::TypeTag;

/// Result type for a single call through a bound function
pub type CallResult<T> = Result<T, CallError>;

/// Closed set of failure kinds visible to the host runtime.
///
/// Each kind carries one literal message; hosts raise that message through
/// their standard error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong number of positional arguments
    ArgumentCountMismatch,
    /// A positional argument has the wrong dynamic type
    ArgumentTypeMismatch,
    /// A native value could not be represented dynamically
    ConversionFailure,
    /// Keyword arguments were passed
    KeywordArgumentsUnsupported,
    /// The native function panicked or returned an error
    NativeFault,
    /// The host could not create the module object
    ModuleCreationFailure,
    /// The host rejected a function during installation
    RegistrationFailure,
}

impl ErrorKind {
    /// Literal message reported to the host
    pub const fn message(self) -> &'static str {
        match self {
            ErrorKind::ArgumentCountMismatch => "argument count mismatch",
            ErrorKind::ArgumentTypeMismatch => "argument type mismatch",
            ErrorKind::ConversionFailure => "failed to convert value",
            ErrorKind::KeywordArgumentsUnsupported => "keyword arguments are not supported",
            ErrorKind::NativeFault => "native function raised a fault",
            ErrorKind::ModuleCreationFailure => "failed to create module",
            ErrorKind::RegistrationFailure => "failed to register function",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Call-time error.
///
/// Raised before the native function runs (count, type, keyword checks),
/// while it runs (faults) or while encoding its result (conversion).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    /// Positional argument count differs from the signature arity
    #[error("{}: '{function}' expects {expected} arguments, got {got}", ErrorKind::ArgumentCountMismatch)]
    ArgumentCountMismatch {
        /// Function name
        function: &'static str,
        /// Declared arity
        expected: usize,
        /// Number of arguments passed
        got: usize,
    },

    /// Positional argument could not be decoded to the parameter type
    #[error("{}: argument {index} expected {expected}, got {got}", ErrorKind::ArgumentTypeMismatch)]
    ArgumentTypeMismatch {
        /// Zero-based parameter index (0 when decoding outside a call)
        index: usize,
        /// Parameter type
        expected: TypeTag,
        /// Dynamic type, or a short description of the rejected value
        got: String,
    },

    /// Native value has no dynamic representation
    #[error("{}: {reason}", ErrorKind::ConversionFailure)]
    ConversionFailure {
        /// What could not be converted
        reason: String,
    },

    /// Keyword arguments were passed to a positional-only function
    #[error("{}: '{function}' got keyword arguments {names:?}", ErrorKind::KeywordArgumentsUnsupported)]
    KeywordArgumentsUnsupported {
        /// Function name
        function: &'static str,
        /// Keyword names that were passed
        names: Vec<String>,
    },

    /// Native function panicked or returned `Err`
    #[error("{}: '{function}': {message}", ErrorKind::NativeFault)]
    NativeFault {
        /// Function name
        function: &'static str,
        /// Panic payload or error text
        message: String,
    },
}

impl CallError {
    /// Kind reported to the host
    pub const fn kind(&self) -> ErrorKind {
        match self {
            CallError::ArgumentCountMismatch { .. } => ErrorKind::ArgumentCountMismatch,
            CallError::ArgumentTypeMismatch { .. } => ErrorKind::ArgumentTypeMismatch,
            CallError::ConversionFailure { .. } => ErrorKind::ConversionFailure,
            CallError::KeywordArgumentsUnsupported { .. } => ErrorKind::KeywordArgumentsUnsupported,
            CallError::NativeFault { .. } => ErrorKind::NativeFault,
        }
    }

    pub(crate) fn type_mismatch(expected: TypeTag, got: impl Into<String>) -> Self {
        CallError::ArgumentTypeMismatch {
            index: 0,
            expected,
            got: got.into(),
        }
    }

    pub(crate) fn conversion(reason: impl Into<String>) -> Self {
        CallError::ConversionFailure {
            reason: reason.into(),
        }
    }

    /// Fill in the function name on errors raised below the descriptor
    pub(crate) fn in_function(self, name: &'static str) -> Self {
        match self {
            CallError::NativeFault { function: "", message } => CallError::NativeFault {
                function: name,
                message,
            },
            CallError::ArgumentCountMismatch {
                function: "",
                expected,
                got,
            } => CallError::ArgumentCountMismatch {
                function: name,
                expected,
                got,
            },
            other => other,
        }
    }

    /// Attach the parameter index to a decoding error
    pub(crate) fn at_index(self, at: usize) -> Self {
        match self {
            CallError::ArgumentTypeMismatch { expected, got, .. } => {
                CallError::ArgumentTypeMismatch {
                    index: at,
                    expected,
                    got,
                }
            }
            other => other,
        }
    }
}

/// Error reported by a host runtime
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Module name is not acceptable to the host
    #[error("invalid module name {0:?}")]
    InvalidModuleName(String),

    /// A module with this name was already created
    #[error("module '{0}' already exists")]
    ModuleExists(String),

    /// Module already has an attribute with this name
    #[error("attribute '{0}' already defined")]
    DuplicateAttribute(String),

    /// Module has no attribute with this name
    #[error("module has no attribute '{0}'")]
    UnknownAttribute(String),
}

/// Module load error. Fatal: no partially populated module is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModuleError {
    /// Host could not create the module object
    #[error("{}: '{module}': {source}", ErrorKind::ModuleCreationFailure)]
    ModuleCreationFailure {
        /// Module name
        module: String,
        /// Host failure
        source: HostError,
    },

    /// Host rejected a function
    #[error("{}: '{module}.{function}': {source}", ErrorKind::RegistrationFailure)]
    RegistrationFailure {
        /// Module name
        module: String,
        /// Function name
        function: String,
        /// Host failure
        source: HostError,
    },
}

impl ModuleError {
    /// Kind reported to the host
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ModuleError::ModuleCreationFailure { .. } => ErrorKind::ModuleCreationFailure,
            ModuleError::RegistrationFailure { .. } => ErrorKind::RegistrationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = CallError::ArgumentCountMismatch {
            function: "sum",
            expected: 2,
            got: 1,
        };
        assert_eq!(err.kind(), ErrorKind::ArgumentCountMismatch);
        assert_eq!(
            err.to_string(),
            "argument count mismatch: 'sum' expects 2 arguments, got 1"
        );
    }

    #[test]
    fn test_at_index_only_touches_type_mismatch() {
        let err = CallError::type_mismatch(TypeTag::I32, "str").at_index(3);
        assert!(matches!(err, CallError::ArgumentTypeMismatch { index: 3, .. }));

        let err = CallError::conversion("nope").at_index(3);
        assert_eq!(err.kind(), ErrorKind::ConversionFailure);
    }

    #[test]
    fn test_module_error_message_starts_with_kind() {
        let err = ModuleError::RegistrationFailure {
            module: "example".to_string(),
            function: "__doc__".to_string(),
            source: HostError::DuplicateAttribute("__doc__".to_string()),
        };
        assert_eq!(err.kind(), ErrorKind::RegistrationFailure);
        assert!(err.to_string().starts_with(ErrorKind::RegistrationFailure.message()));
    }

    #[test]
    fn test_messages_are_distinct() {
        let kinds = [
            ErrorKind::ArgumentCountMismatch,
            ErrorKind::ArgumentTypeMismatch,
            ErrorKind::ConversionFailure,
            ErrorKind::KeywordArgumentsUnsupported,
            ErrorKind::NativeFault,
            ErrorKind::ModuleCreationFailure,
            ErrorKind::RegistrationFailure,
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().map(|k| k.message()).collect();
        assert_eq!(unique.len(), kinds.len());
    }
}
