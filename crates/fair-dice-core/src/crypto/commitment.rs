//! Keyed-hash commitments: HMAC-SHA256 over the decimal value.
//!
//! The committing party publishes only the digest. Once the counter-party has
//! answered, the key and value are revealed and anyone can recompute the
//! digest, e.g. `printf 3 | openssl dgst -sha256 -mac HMAC -macopt hexkey:<KEY>`.

use crate::error::{GameError, Result};
use hmac::{Hmac, Mac};
use rand::rngs::ThreadRng;
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Length of the secret HMAC key in bytes
pub const SECRET_KEY_LEN: usize = 32;

/// Secret HMAC key, hidden until reveal
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Draw a fresh key from a cryptographically secure RNG
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for SecretKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<SecretKey> for String {
    fn from(key: SecretKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SecretKey {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

fn keyed_mac(key: &SecretKey, value: u32) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(value.to_string().as_bytes());
    mac
}

/// Digest = HMAC-SHA256(key, decimal(value))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Digest([u8; 32]);

impl Digest {
    /// Compute the keyed digest of a value
    pub fn compute(key: &SecretKey, value: u32) -> Self {
        Self(keyed_mac(key, value).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify that the given key and value produce this digest
    pub fn verify(&self, key: &SecretKey, value: u32) -> bool {
        keyed_mac(key, value).verify_slice(&self.0).is_ok()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.to_string()
    }
}

impl TryFrom<String> for Digest {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Check a revealed `(key, value)` pair against a published digest.
pub fn verify(key: &SecretKey, value: u32, digest: &Digest) -> bool {
    digest.verify(key, value)
}

/// A value in `0..bound` bound to a published digest.
///
/// Only [`Commitment::digest`] may be shown to the counter-party before it
/// answers; the key and value come out through [`Commitment::reveal`].
#[derive(Clone)]
pub struct Commitment {
    secret_key: SecretKey,
    value: u32,
    bound: u32,
    digest: Digest,
}

impl Commitment {
    /// Commit to a chosen value with a chosen key.
    ///
    /// Fairness of the exchange only holds when `value` was drawn uniformly;
    /// use [`CommitmentGenerator::commit`] outside of tests.
    pub fn with_value(secret_key: SecretKey, value: u32, bound: u32) -> Result<Self> {
        if bound == 0 {
            return Err(GameError::InvalidBound);
        }
        if value >= bound {
            return Err(GameError::OutOfRange { value, bound });
        }
        let digest = Digest::compute(&secret_key, value);
        Ok(Self {
            secret_key,
            value,
            bound,
            digest,
        })
    }

    /// The published digest
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Exclusive upper end of the committed range
    pub fn bound(&self) -> u32 {
        self.bound
    }

    /// Expose the hidden key and value for publication
    pub fn reveal(&self) -> (SecretKey, u32) {
        (self.secret_key.clone(), self.value)
    }

    /// Check the commitment invariant
    pub fn is_consistent(&self) -> bool {
        self.digest.verify(&self.secret_key, self.value)
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("bound", &self.bound)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Produces commitments from a cryptographically secure RNG it owns.
///
/// Precondition for fairness: the RNG must be unpredictable to the
/// counter-party. Values are drawn with `gen_range`, which has no modulo bias.
pub struct CommitmentGenerator<R = ThreadRng> {
    rng: R,
}

impl CommitmentGenerator<ThreadRng> {
    /// Generator backed by the thread-local OS-seeded RNG
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for CommitmentGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> CommitmentGenerator<R> {
    /// Generator backed by a caller-supplied RNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a uniform value in `0..bound` without committing to it
    pub fn draw(&mut self, bound: u32) -> Result<u32> {
        if bound == 0 {
            return Err(GameError::InvalidBound);
        }
        Ok(self.rng.gen_range(0..bound))
    }

    /// Commit to a fresh uniform value in `0..bound` under a fresh key
    pub fn commit(&mut self, bound: u32) -> Result<Commitment> {
        let value = self.draw(bound)?;
        let secret_key = SecretKey::random(&mut self.rng);
        let commitment = Commitment::with_value(secret_key, value, bound)?;
        debug!(bound, digest = %commitment.digest, "Committed to hidden value");
        Ok(commitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> CommitmentGenerator<StdRng> {
        CommitmentGenerator::with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_commitment_verification() {
        let commitment = seeded().commit(6).unwrap();
        let (key, value) = commitment.reveal();

        assert!(value < 6);
        assert!(verify(&key, value, commitment.digest()));
        assert!(commitment.is_consistent());
    }

    #[test]
    fn test_zero_bound_rejected() {
        assert_eq!(seeded().commit(0).unwrap_err(), GameError::InvalidBound);
        assert_eq!(seeded().draw(0).unwrap_err(), GameError::InvalidBound);
    }

    #[test]
    fn test_bound_one_always_commits_zero() {
        let mut generator = seeded();
        for _ in 0..16 {
            assert_eq!(generator.commit(1).unwrap().reveal().1, 0);
        }
    }

    #[test]
    fn test_wrong_value_fails_verification() {
        let commitment = seeded().commit(6).unwrap();
        let (key, value) = commitment.reveal();

        assert!(!verify(&key, value ^ 1, commitment.digest()));
    }

    #[test]
    fn test_key_bit_flip_fails_verification() {
        let commitment = seeded().commit(6).unwrap();
        let (key, value) = commitment.reveal();

        let mut bytes = *key.as_bytes();
        bytes[0] ^= 0x01;
        assert!(!verify(&SecretKey::from_bytes(bytes), value, commitment.digest()));
    }

    #[test]
    fn test_digest_bit_flip_fails_verification() {
        let commitment = seeded().commit(6).unwrap();
        let (key, value) = commitment.reveal();

        let mut bytes = *commitment.digest().as_bytes();
        bytes[31] ^= 0x80;
        assert!(!verify(&key, value, &Digest::from_bytes(bytes)));
    }

    #[test]
    fn test_different_keys_different_digests() {
        let mut generator = seeded();
        let key1 = SecretKey::random(&mut StdRng::seed_from_u64(1));
        let key2 = SecretKey::random(&mut StdRng::seed_from_u64(2));

        assert_ne!(Digest::compute(&key1, 3), Digest::compute(&key2, 3));
        let first = generator.commit(6).unwrap().reveal().0;
        let second = generator.commit(6).unwrap().reveal().0;
        assert_ne!(first, second);
    }

    #[test]
    fn test_with_value_checks_range() {
        let key = SecretKey::from_bytes([9u8; SECRET_KEY_LEN]);
        assert_eq!(
            Commitment::with_value(key.clone(), 2, 2).unwrap_err(),
            GameError::OutOfRange { value: 2, bound: 2 }
        );
        assert_eq!(
            Commitment::with_value(key, 0, 0).unwrap_err(),
            GameError::InvalidBound
        );
    }

    #[test]
    fn test_hmac_known_answer() {
        // Message is the ASCII decimal, not the raw integer bytes.
        let key = SecretKey::from_bytes([0x0b; SECRET_KEY_LEN]);
        let digest = Digest::compute(&key, 0);
        let mut mac = HmacSha256::new_from_slice(&[0x0b; SECRET_KEY_LEN]).unwrap();
        mac.update(b"0");
        assert_eq!(digest.as_bytes()[..], mac.finalize().into_bytes()[..]);
    }

    #[test]
    fn test_hex_round_trip() {
        let commitment = seeded().commit(6).unwrap();
        let (key, _) = commitment.reveal();

        assert_eq!(key.to_string().parse::<SecretKey>().unwrap(), key);
        assert_eq!(
            commitment.digest().to_string().parse::<Digest>().unwrap(),
            *commitment.digest()
        );
        assert!("zz".parse::<Digest>().is_err());
    }

    #[test]
    fn test_debug_hides_value() {
        let key = SecretKey::from_bytes([1u8; SECRET_KEY_LEN]);
        let commitment = Commitment::with_value(key, 4, 6).unwrap();
        let rendered = format!("{:?}", commitment);

        assert!(!rendered.contains("value"));
        assert!(!rendered.contains(&hex::encode([1u8; SECRET_KEY_LEN])));
    }
}
