use bc_crypto::memzero;

use crate::{Error, Result, ShareKeyHolder, ShareRecipient, shamir::RawShare};

/// What accompanies a share besides its own value.
///
/// A threshold of one can't be expressed by a polynomial of degree one or
/// more, so it is emulated by handing every recipient the same extra share
/// (the helper). Any single recipient then holds two points of a degree-one
/// polynomial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardKind {
    Plain,
    WithHelper(RawShare),
}

/// A share of a secret, in the clear, destined for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    value: RawShare,
    kind: ShardKind,
}

impl Shard {
    pub fn new(value: RawShare, kind: ShardKind) -> Result<Self> {
        if value.payload().is_empty() {
            return Err(Error::EmptyShareValue);
        }
        if let ShardKind::WithHelper(helper) = &kind {
            if helper.payload().is_empty() {
                return Err(Error::EmptyShareValue);
            }
        }
        Ok(Self { value, kind })
    }

    pub fn value(&self) -> &RawShare {
        &self.value
    }

    pub fn kind(&self) -> &ShardKind {
        &self.kind
    }

    pub fn into_parts(self) -> (RawShare, ShardKind) {
        (self.value, self.kind)
    }

    /// Encrypt the value, and the helper if there is one, to `recipient`.
    pub fn encrypt(&self, recipient: &impl ShareRecipient) -> Result<EncryptedShare> {
        let value = encrypt_raw_share(&self.value, recipient)?;
        let kind = match &self.kind {
            ShardKind::Plain => EncryptedShareKind::Plain,
            ShardKind::WithHelper(helper) => {
                EncryptedShareKind::WithHelper(encrypt_raw_share(helper, recipient)?)
            }
        };
        Ok(EncryptedShare {
            value,
            key_id: recipient.fingerprint(),
            kind,
        })
    }
}

fn encrypt_raw_share(share: &RawShare, recipient: &impl ShareRecipient) -> Result<Vec<u8>> {
    let mut plaintext = share.to_bytes();
    let ciphertext = recipient.encrypt_share(&plaintext);
    memzero(plaintext.as_mut_slice());
    ciphertext
}

fn decrypt_raw_share(ciphertext: &[u8], holder: &impl ShareKeyHolder) -> Result<RawShare> {
    let mut plaintext = holder.decrypt_share(ciphertext)?;
    let share = RawShare::from_bytes(&plaintext).map_err(Error::MalformedShard);
    memzero(plaintext.as_mut_slice());
    share
}

/// The encrypted helper, if the share carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptedShareKind {
    Plain,
    WithHelper(Vec<u8>),
}

/// A share encrypted to the key identified by `key_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedShare {
    value: Vec<u8>,
    key_id: String,
    kind: EncryptedShareKind,
}

impl EncryptedShare {
    pub fn new(value: Vec<u8>, key_id: impl Into<String>, kind: EncryptedShareKind) -> Self {
        Self {
            value,
            key_id: key_id.into(),
            kind,
        }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn kind(&self) -> &EncryptedShareKind {
        &self.kind
    }

    pub fn helper(&self) -> Option<&[u8]> {
        match &self.kind {
            EncryptedShareKind::Plain => None,
            EncryptedShareKind::WithHelper(helper) => Some(helper),
        }
    }

    /// Decrypt with `holder`, which must be the key this share was
    /// encrypted to.
    pub fn decrypt(&self, holder: &impl ShareKeyHolder) -> Result<Shard> {
        if holder.fingerprint() != self.key_id {
            return Err(Error::IncorrectDecryptionKey);
        }
        let value = decrypt_raw_share(&self.value, holder)?;
        let kind = match &self.kind {
            EncryptedShareKind::Plain => ShardKind::Plain,
            EncryptedShareKind::WithHelper(helper) => {
                ShardKind::WithHelper(decrypt_raw_share(helper, holder)?)
            }
        };
        Shard::new(value, kind)
    }
}
