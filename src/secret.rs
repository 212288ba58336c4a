use bc_rand::SecureRandomNumberGenerator;
use tracing::{debug, warn};

use crate::{
    EncryptedShare, Error, Result, Shard, ShardKind, ShareKeyHolder, ShareRecipient,
    constants::{MAX_SHARE_COUNT, MIN_THRESHOLD},
    shamir::{RawShare, recover_secret, split_secret},
};

/// A secret split into shares, each encrypted to one recipient key.
///
/// This is the only form of a secret that is meant to be stored or sent
/// anywhere. See `encode`/`decode` and `to_pem`/`from_pem` for its textual
/// forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    name: Option<String>,
    shares: Vec<EncryptedShare>,
}

/// Counters describing how a decryption went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Shares in the encrypted secret.
    pub total: usize,
    /// Shares encrypted to one of the provided keys.
    pub matched: usize,
    /// Matched shares that decrypted successfully.
    pub recovered: usize,
    /// Matched shares that failed to decrypt and were skipped.
    pub failed: usize,
    /// Whether a helper share ended the search early.
    pub used_helper: bool,
}

/// A recovered secret and the report of how it was recovered.
#[derive(Debug)]
pub struct Recovery {
    pub secret: Vec<u8>,
    pub report: RecoveryReport,
}

impl EncryptedSecret {
    pub fn new(shares: Vec<EncryptedShare>) -> Self {
        Self { name: None, shares }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn shares(&self) -> &[EncryptedShare] {
        &self.shares
    }

    /// Split `data` into one share per recipient so that any `threshold`
    /// of the recipients can recover it, and encrypt each share to its
    /// recipient.
    ///
    /// A threshold of 1 is emulated with a helper share given to every
    /// recipient alongside their own share. The helper takes one of the 255
    /// x-coordinates, so at most 254 recipients are possible at threshold 1.
    pub fn encrypt<K: ShareRecipient>(data: &[u8], recipients: &[K], threshold: usize) -> Result<Self> {
        if threshold > recipients.len() {
            return Err(Error::ThresholdTooLarge {
                threshold,
                keys: recipients.len(),
            });
        }

        if threshold == 1 && recipients.len() >= MAX_SHARE_COUNT {
            return Err(Error::TooManyRecipients {
                keys: recipients.len(),
                max: MAX_SHARE_COUNT - 1,
            });
        }

        let mut random_generator = SecureRandomNumberGenerator;
        let mut shards = Vec::with_capacity(recipients.len());
        if threshold == 1 {
            let mut parts = split_secret(MIN_THRESHOLD, recipients.len() + 1, data, &mut random_generator)?;
            let helper = parts.remove(0);
            for part in parts {
                shards.push(Shard::new(part, ShardKind::WithHelper(helper.clone()))?);
            }
        } else {
            for part in split_secret(threshold, recipients.len(), data, &mut random_generator)? {
                shards.push(Shard::new(part, ShardKind::Plain)?);
            }
        }

        let shares = shards
            .iter()
            .zip(recipients)
            .map(|(shard, recipient)| shard.encrypt(recipient))
            .collect::<Result<Vec<_>>>()?;

        debug!(shares = shares.len(), threshold, "encrypted secret");
        Ok(Self::new(shares))
    }

    /// Recover the secret using whichever of `holders` the shares were
    /// encrypted to.
    pub fn decrypt<K: ShareKeyHolder>(&self, holders: &[K]) -> Result<Vec<u8>> {
        self.decrypt_with_report(holders).map(|recovery| recovery.secret)
    }

    /// As `decrypt`, also reporting how many shares were used.
    ///
    /// Shares encrypted to keys that aren't provided are skipped, as are
    /// shares that fail to decrypt. The first share that carries a helper
    /// is combined with its helper immediately. Otherwise every recovered
    /// share is combined once all shares have been examined; with fewer
    /// shares than the threshold the result is wrong rather than an error.
    pub fn decrypt_with_report<K: ShareKeyHolder>(&self, holders: &[K]) -> Result<Recovery> {
        let fingerprints: Vec<String> = holders.iter().map(|holder| holder.fingerprint()).collect();
        let mut report = RecoveryReport {
            total: self.shares.len(),
            ..Default::default()
        };
        let mut recovered: Vec<RawShare> = Vec::new();

        for share in &self.shares {
            let Some(index) = fingerprints.iter().position(|fp| fp == share.key_id()) else {
                debug!(key_id = share.key_id(), "no key for share, skipping");
                continue;
            };
            report.matched += 1;

            let shard = match share.decrypt(&holders[index]) {
                Ok(shard) => shard,
                Err(err) => {
                    report.failed += 1;
                    warn!(key_id = share.key_id(), error = %err, "could not decrypt share, skipping");
                    continue;
                }
            };
            report.recovered += 1;

            match shard.into_parts() {
                (value, ShardKind::WithHelper(helper)) => {
                    report.used_helper = true;
                    debug!(key_id = share.key_id(), "share carries a helper, combining immediately");
                    let secret = recover_secret(&[value, helper]).map_err(Error::Combine)?;
                    return Ok(Recovery { secret, report });
                }
                (value, ShardKind::Plain) => recovered.push(value),
            }
        }

        if recovered.is_empty() {
            return Err(Error::NoRecoverableShares { total: report.total });
        }

        let secret = recover_secret(&recovered).map_err(Error::Combine)?;
        debug!(
            recovered = report.recovered,
            failed = report.failed,
            total = report.total,
            "combined shares"
        );
        Ok(Recovery { secret, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EncryptedShareKind, ShamirError, test_keys::TestKey};

    fn keys(n: u8) -> Vec<TestKey> {
        (1..=n).map(TestKey::new).collect()
    }

    #[test]
    fn test_threshold_too_large() {
        assert!(matches!(
            EncryptedSecret::encrypt(b"secret", &keys(2), 3),
            Err(Error::ThresholdTooLarge { threshold: 3, keys: 2 })
        ));
        assert!(matches!(
            EncryptedSecret::encrypt(b"secret", &keys(0), 1),
            Err(Error::ThresholdTooLarge { threshold: 1, keys: 0 })
        ));
    }

    #[test]
    fn test_threshold_one_recipient_ceiling() {
        let keys: Vec<TestKey> = (1..=255).map(TestKey::new).collect();

        let secret = EncryptedSecret::encrypt(b"secret", &keys[..254], 1).unwrap();
        assert_eq!(secret.shares().len(), 254);
        assert_eq!(secret.decrypt(&keys[253..254]).unwrap(), b"secret");

        assert!(matches!(
            EncryptedSecret::encrypt(b"secret", &keys, 1),
            Err(Error::TooManyRecipients { keys: 255, max: 254 })
        ));
        // Higher thresholds have no helper and can use every x-coordinate.
        assert_eq!(EncryptedSecret::encrypt(b"secret", &keys, 2).unwrap().shares().len(), 255);
    }

    #[test]
    fn test_invalid_split_parameters() {
        assert!(matches!(
            EncryptedSecret::encrypt(b"secret", &keys(3), 0),
            Err(Error::Shamir(ShamirError::InvalidThreshold))
        ));
        assert!(matches!(
            EncryptedSecret::encrypt(b"", &keys(3), 2),
            Err(Error::Shamir(ShamirError::EmptySecret))
        ));
    }

    #[test]
    fn test_one_share_per_recipient() {
        let keys = keys(5);
        for threshold in 1..=5 {
            let secret = EncryptedSecret::encrypt(b"secret", &keys, threshold).unwrap();
            assert_eq!(secret.shares().len(), 5);
            for (share, key) in secret.shares().iter().zip(&keys) {
                assert_eq!(share.key_id(), key.fingerprint());
                assert_eq!(share.helper().is_some(), threshold == 1);
            }
        }
    }

    #[test]
    fn test_threshold_one_any_single_key() {
        let data = b"test secret value";
        for n in 1..=6u8 {
            let keys = keys(n);
            let secret = EncryptedSecret::encrypt(data, &keys, 1).unwrap();
            for key in &keys {
                let recovery = secret.decrypt_with_report(std::slice::from_ref(key)).unwrap();
                assert_eq!(recovery.secret, data);
                assert!(recovery.report.used_helper);
                assert_eq!(recovery.report.recovered, 1);
            }
        }
    }

    #[test]
    fn test_helper_short_circuits() {
        let keys = keys(4);
        let secret = EncryptedSecret::encrypt(b"abc", &keys, 1).unwrap();
        let recovery = secret.decrypt_with_report(&keys).unwrap();
        assert_eq!(recovery.secret, b"abc");
        assert_eq!(recovery.report.matched, 1);
        assert!(recovery.report.used_helper);
    }

    #[test]
    fn test_threshold_subsets() {
        let data = b"multikey";
        let keys = keys(5);
        for threshold in 2..=5usize {
            let secret = EncryptedSecret::encrypt(data, &keys, threshold).unwrap();
            for mask in 1u32..(1 << keys.len()) {
                let subset: Vec<&TestKey> = keys
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, key)| key)
                    .collect();
                let result = secret.decrypt(&subset);
                if subset.len() >= threshold {
                    assert_eq!(result.unwrap(), data);
                } else if let Ok(recovered) = result {
                    assert_ne!(recovered, data);
                }
            }
        }
    }

    #[test]
    fn test_no_matching_keys() {
        let secret = EncryptedSecret::encrypt(b"secret", &keys(3), 2).unwrap();
        let strangers: Vec<TestKey> = (10..13).map(TestKey::new).collect();
        assert!(matches!(
            secret.decrypt(&strangers),
            Err(Error::NoRecoverableShares { total: 3 })
        ));
        assert!(matches!(
            secret.decrypt::<TestKey>(&[]),
            Err(Error::NoRecoverableShares { total: 3 })
        ));
    }

    #[test]
    fn test_corrupted_share_is_skipped() {
        let keys = keys(3);
        let secret = EncryptedSecret::encrypt(b"secret", &keys, 2).unwrap();
        let mut shares = secret.shares().to_vec();
        shares[0] = EncryptedShare::new(b"garbage".to_vec(), shares[0].key_id(), EncryptedShareKind::Plain);
        let tampered = EncryptedSecret::new(shares);

        let recovery = tampered.decrypt_with_report(&keys).unwrap();
        assert_eq!(recovery.secret, b"secret");
        assert_eq!(
            recovery.report,
            RecoveryReport {
                total: 3,
                matched: 3,
                recovered: 2,
                failed: 1,
                used_helper: false,
            }
        );
    }

    #[test]
    fn test_all_matched_shares_corrupted() {
        let keys = keys(2);
        let secret = EncryptedSecret::encrypt(b"secret", &keys, 2).unwrap();
        let shares = secret
            .shares()
            .iter()
            .map(|share| EncryptedShare::new(b"garbage".to_vec(), share.key_id(), EncryptedShareKind::Plain))
            .collect();
        assert!(matches!(
            EncryptedSecret::new(shares).decrypt(&keys),
            Err(Error::NoRecoverableShares { total: 2 })
        ));
    }

    #[test]
    fn test_duplicate_shares_fail_to_combine() {
        let keys = keys(2);
        let secret = EncryptedSecret::encrypt(b"secret", &keys, 2).unwrap();
        let first = secret.shares()[0].clone();
        let doubled = EncryptedSecret::new(vec![first.clone(), first]);
        assert!(matches!(
            doubled.decrypt(&keys),
            Err(Error::Combine(ShamirError::DuplicateShare(_)))
        ));
    }

    #[test]
    fn test_encrypt_failure_aborts() {
        let mut keys = keys(3);
        keys[1] = TestKey::failing(2);
        assert!(matches!(
            EncryptedSecret::encrypt(b"secret", &keys, 2),
            Err(Error::Encrypt(_))
        ));
    }

    #[test]
    fn test_name() {
        let secret = EncryptedSecret::encrypt(b"secret", &keys(2), 2).unwrap();
        assert_eq!(secret.name(), None);
        let secret = secret.with_name("test secret name");
        assert_eq!(secret.name(), Some("test secret name"));
    }
}
