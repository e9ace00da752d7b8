use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = core::result::Result<T, AccumulatorError>;

/// Reasons an accumulator or witness operation is refused.
///
/// Every variant is raised before any value or state store is touched, so a failed
/// call leaves both exactly as they were.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum AccumulatorError {
    /// The element is already a member or is listed twice in one batch
    #[error("element is already present in the accumulator")]
    AlreadyPresent,
    /// The element is not a member or is removed twice in one batch
    #[error("element is not present in the accumulator")]
    NotPresent,
    /// The element is already part of the KB-universal domain or is listed twice
    #[error("element is already part of the accumulator domain")]
    AlreadyInDomain,
    /// The element is a reserved initial element or lies outside the domain
    #[error("element is not acceptable for this accumulator")]
    ElementNotAcceptable,
    /// No secret key was configured for the manager
    #[error("a secret key is required but none was supplied")]
    MissingSecretKey,
    /// No params were configured for the manager
    #[error("accumulator params are required but none were supplied")]
    MissingParams,
    /// Parallel argument lists differ in length
    #[error("expected {expected} entries but found {found}")]
    LengthMismatch {
        /// The length of the reference list
        expected: usize,
        /// The length of the mismatching list
        found: usize,
    },
    /// The value does not fit into the declared number of bits
    #[error("value does not fit in {bits} bits")]
    EncodingOverflow {
        /// The declared bit size
        bits: u32,
    },
    /// A value that must be invertible or non-zero is zero
    #[error("value cannot be zero")]
    CannotBeZero,
    /// A byte sequence does not decode to the expected value
    #[error("invalid bytes: {0}")]
    InvalidBytes(&'static str),
}

impl AccumulatorError {
    pub(crate) fn check_lengths(expected: usize, found: usize) -> Result<()> {
        if expected != found {
            return Err(Self::LengthMismatch { expected, found });
        }
        Ok(())
    }
}
