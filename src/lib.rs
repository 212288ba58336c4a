#![doc(html_root_url = "https://docs.rs/multikey/0.1.0")]
#![warn(rust_2018_idioms)]

//! # Introduction
//!
//! Encrypt a secret to a set of RSA keys so that any `threshold` of the
//! matching private keys recover it.
//!
//! The secret is split with Shamir's Secret Sharing over GF(2^8), one share
//! per key, and each share is encrypted to its key with RSA-OAEP. A
//! threshold of one, which a polynomial scheme cannot express directly, is
//! emulated with a helper share handed to every key holder.
//!
//! # Getting Started
//!
//! ```toml
//! [dependencies]
//! multikey = "0.1.0"
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use multikey::{decrypt, encrypt, generate_key_pair};
//!
//! let pairs: Vec<_> = (0..3).map(|_| generate_key_pair(2048).unwrap()).collect();
//! let public_keys: Vec<_> = pairs.iter().map(|(_, public_key)| public_key.clone()).collect();
//!
//! let pem = encrypt(b"my secret", &public_keys, 2).unwrap();
//!
//! let two_private_keys: Vec<_> = pairs[1..].iter().map(|(private_key, _)| private_key.clone()).collect();
//! assert_eq!(decrypt(&pem, &two_private_keys).unwrap(), b"my secret");
//! ```

pub mod constants;

pub mod field;

mod polynomial;
pub use polynomial::{Polynomial, interpolate};

mod shamir_error;
pub use shamir_error::ShamirError;

mod shamir;
pub use shamir::{RawShare, recover_secret, split_secret};

mod error;
pub use error::{Error, FormatError, Result};

mod keys;
pub use keys::{
    ShareKeyHolder, ShareRecipient, decode_private_key_pem, decode_public_key_pem, decrypt_message,
    decrypt_message_with_pem_key, encode_private_key_pem, encode_public_key_pem, encrypt_message,
    encrypt_message_with_pem_key, fingerprint, generate_key_pair,
};

mod share;
pub use share::{EncryptedShare, EncryptedShareKind, Shard, ShardKind};

mod secret;
pub use secret::{EncryptedSecret, Recovery, RecoveryReport};

mod envelope;

pub use rsa::{RsaPrivateKey, RsaPublicKey};

/// Encrypt `data` to `public_keys` so that any `threshold` of the matching
/// private keys can decrypt it, returning the PEM-armoured result.
pub fn encrypt(data: &[u8], public_keys: &[RsaPublicKey], threshold: usize) -> Result<String> {
    EncryptedSecret::encrypt(data, public_keys, threshold).map(|secret| secret.to_pem())
}

/// Decrypt a PEM-armoured secret produced by `encrypt`.
pub fn decrypt(pem: &str, private_keys: &[RsaPrivateKey]) -> Result<Vec<u8>> {
    EncryptedSecret::from_pem(pem)?.decrypt(private_keys)
}
