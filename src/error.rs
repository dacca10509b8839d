use thiserror::Error;

/// Fixed message returned to callers for every unresolvable prompt. The
/// external contract collapses all causes into this one string; the enum
/// tags below exist so tests can still assert on the cause.
pub const GENERIC_FAILURE: &str =
    "Error: Could not generate appropriate SQL query. Please check the schema and try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The prompt contains no supported filter pattern.
    #[error("{}", GENERIC_FAILURE)]
    NoFilter,

    /// No catalog table is mentioned in the prompt and the `customers`
    /// fallback is absent.
    #[error("{}", GENERIC_FAILURE)]
    NoMainTable,

    /// The catalog has no table literally named `users`.
    #[error("{}", GENERIC_FAILURE)]
    NoUsersTable,

    /// No foreign-key column links the main table to `users`.
    #[error("{}", GENERIC_FAILURE)]
    NoRelationship,

    /// Unexpected fault inside the compiler.
    #[error("Error: Could not generate SQL query - {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;
