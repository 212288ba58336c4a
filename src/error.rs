use thiserror::Error;

use crate::ShamirError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not split secret: {0}")]
    Shamir(#[from] ShamirError),

    #[error("threshold {threshold} must be less than or equal to the number of keys provided ({keys})")]
    ThresholdTooLarge { threshold: usize, keys: usize },

    #[error("a threshold of 1 supports at most {max} keys, but {keys} were provided")]
    TooManyRecipients { keys: usize, max: usize },

    #[error("shard can not have empty value")]
    EmptyShareValue,

    #[error("could not generate key pair: {0}")]
    KeyGeneration(#[source] rsa::Error),

    #[error("invalid key: {0}")]
    InvalidKey(#[source] rsa::pkcs1::Error),

    #[error("could not encrypt shard value: {0}")]
    Encrypt(#[source] rsa::Error),

    #[error("could not decrypt shard value: {0}")]
    Decrypt(#[source] rsa::Error),

    #[error("the provided key does not match the shard's encryption key's fingerprint")]
    IncorrectDecryptionKey,

    #[error("decrypted shard is malformed: {0}")]
    MalformedShard(#[source] ShamirError),

    #[error("none of the {total} shares could be recovered with the provided keys")]
    NoRecoverableShares { total: usize },

    #[error("could not combine recovered shares: {0}")]
    Combine(#[source] ShamirError),

    #[error("could not decode encrypted secret: {0}")]
    Format(#[from] FormatError),
}

/// Failures decoding the textual or PEM form of an `EncryptedSecret`.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("encrypted secret is empty")]
    Empty,

    #[error("line {line}: missing key id")]
    MissingKeyId { line: usize },

    #[error("line {line}: missing parenthesis")]
    MissingParenthesis { line: usize },

    #[error("line {line}: unexpected data after the last group")]
    TrailingData { line: usize },

    #[error("line {line}: empty value")]
    EmptyValue { line: usize },

    #[error("line {line}: invalid base64: {source}")]
    Base64 {
        line: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid PEM: {0}")]
    Pem(#[source] pem::PemError),

    #[error("unexpected PEM label {0:?}")]
    WrongLabel(String),

    #[error("encrypted secret is not valid UTF-8")]
    NotUtf8,
}
