/// The irreducible polynomial x^8 + x^4 + x^3 + x^2 + 1 defining GF(2^8).
pub const FIELD_POLYNOMIAL: u16 = 0x11d;

/// A primitive element of GF(2^8) under `FIELD_POLYNOMIAL`, used to build
/// the logarithm and exponential tables.
pub const FIELD_GENERATOR: u8 = 2;

/// The smallest threshold the polynomial scheme can express.
pub const MIN_THRESHOLD: usize = 2;

/// x-coordinates are nonzero bytes, so at most 255 shares exist per split.
pub const MAX_SHARE_COUNT: usize = 255;

/// Label of the PEM block wrapping an encoded `EncryptedSecret`.
pub const PEM_LABEL: &str = "MULTIKEY ENCRYPTED SECRET";

/// Modulus size used by `generate_key_pair` callers that have no opinion.
pub const DEFAULT_KEY_BITS: usize = 2048;
