use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShamirError {
    #[error("threshold must be at least 2 and no greater than the number of shares")]
    InvalidThreshold,
    #[error("too many shares")]
    TooManyShares,
    #[error("cannot split an empty secret")]
    EmptySecret,
    #[error("at least one share is required to recover a secret")]
    NoShares,
    #[error("shares must be at least two bytes")]
    ShareTooShort,
    #[error("shares have unequal length")]
    SharesUnequalLength,
    #[error("share has x-coordinate 0, which is reserved for the secret")]
    ZeroXCoordinate,
    #[error("duplicate share detected with x-coordinate {0}")]
    DuplicateShare(u8),
    #[error("interpolation sample lists have unequal length")]
    SampleLengthMismatch,
    #[error("division by zero in GF(2^8)")]
    DivideByZero,
}
