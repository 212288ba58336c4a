//! RSA key handling and the key traits that shares are encrypted to.
//!
//! Shares are encrypted with RSA-OAEP over SHA-512. Keys are identified by
//! a fingerprint: the SHA-256 digest of the public modulus and exponent,
//! written as colon-separated hex.

use rand::rngs::OsRng;
use rsa::{
    Oaep, RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding},
    traits::PublicKeyParts,
};
use sha2::{Digest, Sha256, Sha512};

use crate::{Error, Result};

/// A public key a share can be encrypted to.
pub trait ShareRecipient {
    fn fingerprint(&self) -> String;
    fn encrypt_share(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// A private key that can decrypt the shares encrypted to its public half.
pub trait ShareKeyHolder {
    fn fingerprint(&self) -> String;
    fn decrypt_share(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

impl<T: ShareRecipient + ?Sized> ShareRecipient for &T {
    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }

    fn encrypt_share(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        (**self).encrypt_share(plaintext)
    }
}

impl<T: ShareKeyHolder + ?Sized> ShareKeyHolder for &T {
    fn fingerprint(&self) -> String {
        (**self).fingerprint()
    }

    fn decrypt_share(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        (**self).decrypt_share(ciphertext)
    }
}

impl ShareRecipient for RsaPublicKey {
    fn fingerprint(&self) -> String {
        fingerprint(self)
    }

    fn encrypt_share(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt_message(plaintext, self)
    }
}

impl ShareKeyHolder for RsaPrivateKey {
    fn fingerprint(&self) -> String {
        fingerprint(self)
    }

    fn decrypt_share(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt_message(ciphertext, self)
    }
}

/// Generate an RSA key pair with a modulus of `bits` bits.
pub fn generate_key_pair(bits: usize) -> Result<(RsaPrivateKey, RsaPublicKey)> {
    let private_key = RsaPrivateKey::new(&mut OsRng, bits).map_err(Error::KeyGeneration)?;
    let public_key = RsaPublicKey::from(&private_key);
    Ok((private_key, public_key))
}

/// The fingerprint of a key: colon-separated hex of SHA-256 over the
/// length-prefixed big-endian modulus and exponent.
///
/// A private key has the same fingerprint as its public half.
pub fn fingerprint(key: &impl PublicKeyParts) -> String {
    let mut hasher = Sha256::new();
    for part in [key.n().to_bytes_be(), key.e().to_bytes_be()] {
        hasher.update((part.len() as u32).to_be_bytes());
        hasher.update(&part);
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| hex::encode([*byte]))
        .collect::<Vec<_>>()
        .join(":")
}

/// Encode a private key as a PKCS#1 `RSA PRIVATE KEY` PEM block.
pub fn encode_private_key_pem(private_key: &RsaPrivateKey) -> Result<String> {
    private_key
        .to_pkcs1_pem(LineEnding::LF)
        .map(|pem| pem.to_string())
        .map_err(Error::InvalidKey)
}

/// Encode a public key as a PKCS#1 `RSA PUBLIC KEY` PEM block.
pub fn encode_public_key_pem(public_key: &RsaPublicKey) -> Result<String> {
    public_key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(Error::InvalidKey)
}

pub fn decode_private_key_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_pem(pem).map_err(Error::InvalidKey)
}

pub fn decode_public_key_pem(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_pkcs1_pem(pem).map_err(Error::InvalidKey)
}

/// Encrypt a message with RSA-OAEP (SHA-512).
///
/// A 2048-bit key accepts at most 126 bytes of plaintext.
pub fn encrypt_message(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>> {
    public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha512>(), plaintext)
        .map_err(Error::Encrypt)
}

/// Decrypt a message encrypted by `encrypt_message`.
pub fn decrypt_message(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    private_key
        .decrypt(Oaep::new::<Sha512>(), ciphertext)
        .map_err(Error::Decrypt)
}

pub fn encrypt_message_with_pem_key(plaintext: &[u8], public_key_pem: &str) -> Result<Vec<u8>> {
    let public_key = decode_public_key_pem(public_key_pem)?;
    encrypt_message(plaintext, &public_key)
}

pub fn decrypt_message_with_pem_key(ciphertext: &[u8], private_key_pem: &str) -> Result<Vec<u8>> {
    let private_key = decode_private_key_pem(private_key_pem)?;
    decrypt_message(ciphertext, &private_key)
}
