use bc_crypto::memzero;
use bc_rand::RandomNumberGenerator;

use crate::{
    ShamirError,
    constants::{MAX_SHARE_COUNT, MIN_THRESHOLD},
    polynomial::{Polynomial, interpolate},
};

/// One point of a split secret: an x-coordinate and the evaluation of every
/// byte's polynomial at that x-coordinate.
///
/// The byte encoding produced by `to_bytes` is the payload followed by the
/// x-coordinate.
#[derive(Clone, PartialEq, Eq)]
pub struct RawShare {
    x: u8,
    payload: Vec<u8>,
}

impl RawShare {
    pub fn new(x: u8, payload: Vec<u8>) -> Self {
        Self { x, payload }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encode as `payload || x`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.payload.len() + 1);
        bytes.extend_from_slice(&self.payload);
        bytes.push(self.x);
        bytes
    }

    /// Decode `payload || x`. At least one payload byte is required, and x
    /// must be nonzero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ShamirError> {
        match bytes.split_last() {
            Some((&0, _)) => Err(ShamirError::ZeroXCoordinate),
            Some((&x, payload)) if !payload.is_empty() => Ok(Self::new(x, payload.to_vec())),
            _ => Err(ShamirError::ShareTooShort),
        }
    }
}

impl std::fmt::Debug for RawShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawShare")
            .field("x", &self.x)
            .field("len", &self.payload.len())
            .finish()
    }
}

impl Drop for RawShare {
    fn drop(&mut self) {
        memzero(self.payload.as_mut_slice());
    }
}

fn validate_parameters(threshold: usize, share_count: usize, secret_length: usize) -> Result<(), ShamirError> {
    if share_count > MAX_SHARE_COUNT {
        return Err(ShamirError::TooManyShares);
    } else if threshold < MIN_THRESHOLD || threshold > share_count {
        return Err(ShamirError::InvalidThreshold);
    } else if secret_length == 0 {
        return Err(ShamirError::EmptySecret);
    }
    Ok(())
}

/// A uniformly distributed index in `0..bound`, for `1 <= bound <= 256`.
fn random_index(bound: usize, random_generator: &mut impl RandomNumberGenerator) -> usize {
    // Reject the bytes that would bias the reduction.
    let limit = 256 - 256 % bound;
    let mut byte = [0u8; 1];
    loop {
        random_generator.fill_random_data(&mut byte);
        let value = byte[0] as usize;
        if value < limit {
            return value % bound;
        }
    }
}

/// A random permutation of the nonzero field elements. Zero is reserved for
/// the intercept.
fn random_x_coordinates(random_generator: &mut impl RandomNumberGenerator) -> [u8; MAX_SHARE_COUNT] {
    let mut xs: [u8; MAX_SHARE_COUNT] = std::array::from_fn(|i| i as u8 + 1);
    for i in (1..xs.len()).rev() {
        let j = random_index(i + 1, random_generator);
        xs.swap(i, j);
    }
    xs
}

/// Split `secret` into `share_count` shares, any `threshold` of which
/// recover it.
///
/// Each byte of the secret becomes the intercept of its own random
/// polynomial of degree `threshold - 1`. Every share is evaluated at a
/// distinct, random, nonzero x-coordinate.
pub fn split_secret(
    threshold: usize,
    share_count: usize,
    secret: &[u8],
    random_generator: &mut impl RandomNumberGenerator,
) -> Result<Vec<RawShare>, ShamirError> {
    validate_parameters(threshold, share_count, secret.len())?;

    let xs = random_x_coordinates(random_generator);
    let mut payloads: Vec<Vec<u8>> = (0..share_count)
        .map(|_| Vec::with_capacity(secret.len()))
        .collect();

    for &byte in secret {
        let polynomial = Polynomial::random(byte, threshold - 1, random_generator);
        for (payload, &x) in payloads.iter_mut().zip(xs.iter()) {
            payload.push(polynomial.evaluate(x));
        }
    }

    Ok(payloads
        .into_iter()
        .zip(xs)
        .map(|(payload, x)| RawShare::new(x, payload))
        .collect())
}

/// Recover a secret from shares produced by `split_secret`.
///
/// No threshold check is possible here: fewer shares than the split's
/// threshold yield a wrong secret, not an error.
pub fn recover_secret(shares: &[RawShare]) -> Result<Vec<u8>, ShamirError> {
    let first = shares.first().ok_or(ShamirError::NoShares)?;
    let secret_length = first.payload.len();
    if secret_length == 0 {
        return Err(ShamirError::ShareTooShort);
    }
    if shares.iter().any(|share| share.payload.len() != secret_length) {
        return Err(ShamirError::SharesUnequalLength);
    }

    let mut seen = [false; 256];
    let mut xs = Vec::with_capacity(shares.len());
    for share in shares {
        // x = 0 would make the share's payload the whole answer.
        if share.x == 0 {
            return Err(ShamirError::ZeroXCoordinate);
        }
        if seen[share.x as usize] {
            return Err(ShamirError::DuplicateShare(share.x));
        }
        seen[share.x as usize] = true;
        xs.push(share.x);
    }

    let mut ys = vec![0u8; shares.len()];
    let mut secret = Vec::with_capacity(secret_length);
    for index in 0..secret_length {
        for (y, share) in ys.iter_mut().zip(shares) {
            *y = share.payload[index];
        }
        match interpolate(&xs, &ys, 0) {
            Ok(byte) => secret.push(byte),
            Err(err) => {
                memzero(ys.as_mut_slice());
                memzero(secret.as_mut_slice());
                return Err(err);
            }
        }
    }

    memzero(ys.as_mut_slice());

    Ok(secret)
}
