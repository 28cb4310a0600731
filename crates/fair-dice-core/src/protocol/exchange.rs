//! Two-step fair random value exchange.
//!
//! ```text
//! committing party                 counter-party
//!   begin(N)  ── digest ──────────▶
//!             ◀──────── counter value in 0..N
//!   reveal()  ── key, value ──────▶  verify(key, value, digest)
//!   combined = (value + counter) mod N
//! ```
//!
//! The committing value is fixed by the digest before the counter value is
//! known, and the counter value is chosen without knowing the committing
//! value. As long as the committing value is uniform the combination is
//! uniform, whatever the counter-party does.

use crate::crypto::{Commitment, CommitmentGenerator, Digest, SecretKey};
use crate::error::{GameError, Result};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Combine both contributions: `(party + counter) mod bound`.
///
/// Both inputs must already lie in `0..bound`.
pub fn combine(party_value: u32, counter_value: u32, bound: u32) -> u32 {
    ((u64::from(party_value) + u64::from(counter_value)) % u64::from(bound)) as u32
}

/// Exchange state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeState {
    /// Digest published, waiting for the counter value
    Committed,
    /// Counter value received, key and value may be revealed
    ReadyToReveal,
    /// Key and value published
    Revealed,
}

/// Output of one exchange, with everything a verifier needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairRandomResult {
    pub bound: u32,
    pub party_value: u32,
    pub counter_value: u32,
    pub combined: u32,
    pub secret_key: SecretKey,
    pub digest: Digest,
}

impl FairRandomResult {
    /// Recheck the digest and the combination
    pub fn verify(&self) -> bool {
        self.party_value < self.bound
            && self.counter_value < self.bound
            && self.combined == combine(self.party_value, self.counter_value, self.bound)
            && self.digest.verify(&self.secret_key, self.party_value)
    }
}

/// One run of the commit / counter value / reveal protocol.
#[derive(Debug)]
pub struct FairRandomExchange {
    commitment: Commitment,
    counter_value: Option<u32>,
    state: ExchangeState,
}

impl FairRandomExchange {
    /// Commit to a fresh uniform value in `0..bound`
    pub fn begin<R: RngCore + CryptoRng>(
        generator: &mut CommitmentGenerator<R>,
        bound: u32,
    ) -> Result<Self> {
        Ok(Self::from_commitment(generator.commit(bound)?))
    }

    /// Run the exchange on an existing commitment
    pub fn from_commitment(commitment: Commitment) -> Self {
        Self {
            commitment,
            counter_value: None,
            state: ExchangeState::Committed,
        }
    }

    /// Current state
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Exclusive upper end of the value range
    pub fn bound(&self) -> u32 {
        self.commitment.bound()
    }

    /// The digest to publish before asking for the counter value
    pub fn digest(&self) -> &Digest {
        self.commitment.digest()
    }

    /// Accept the counter-party's contribution
    pub fn supply_counter_value(&mut self, value: u32) -> Result<()> {
        if self.state != ExchangeState::Committed {
            return Err(GameError::ProtocolViolation(
                "counter value already supplied",
            ));
        }
        let bound = self.bound();
        if value >= bound {
            return Err(GameError::OutOfRange { value, bound });
        }
        debug!(bound, counter_value = value, "Counter value received");
        self.counter_value = Some(value);
        self.state = ExchangeState::ReadyToReveal;
        Ok(())
    }

    /// Publish the key and value and combine both contributions
    pub fn reveal(&mut self) -> Result<FairRandomResult> {
        let counter_value = match (self.state, self.counter_value) {
            (ExchangeState::ReadyToReveal, Some(value)) => value,
            (ExchangeState::Revealed, _) => {
                return Err(GameError::ProtocolViolation("exchange already revealed"))
            }
            _ => {
                return Err(GameError::ProtocolViolation(
                    "reveal requested before counter value",
                ))
            }
        };

        let (secret_key, party_value) = self.commitment.reveal();
        let bound = self.bound();
        let combined = combine(party_value, counter_value, bound);
        self.state = ExchangeState::Revealed;

        debug!(
            bound,
            party_value, counter_value, combined, "Exchange revealed"
        );

        Ok(FairRandomResult {
            bound,
            party_value,
            counter_value,
            combined,
            secret_key,
            digest: *self.commitment.digest(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{verify, SECRET_KEY_LEN};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn exchange_with(value: u32, bound: u32) -> FairRandomExchange {
        let key = SecretKey::from_bytes([42u8; SECRET_KEY_LEN]);
        FairRandomExchange::from_commitment(Commitment::with_value(key, value, bound).unwrap())
    }

    #[test]
    fn test_coin_flip_combinations() {
        let mut exchange = exchange_with(1, 2);
        exchange.supply_counter_value(0).unwrap();
        assert_eq!(exchange.reveal().unwrap().combined, 1);

        let mut exchange = exchange_with(1, 2);
        exchange.supply_counter_value(1).unwrap();
        assert_eq!(exchange.reveal().unwrap().combined, 0);
    }

    #[test]
    fn test_state_transitions() {
        let mut exchange = exchange_with(3, 6);
        assert_eq!(exchange.state(), ExchangeState::Committed);

        exchange.supply_counter_value(5).unwrap();
        assert_eq!(exchange.state(), ExchangeState::ReadyToReveal);

        let result = exchange.reveal().unwrap();
        assert_eq!(exchange.state(), ExchangeState::Revealed);
        assert_eq!(result.combined, 2);
    }

    #[test]
    fn test_reveal_before_counter_value_fails() {
        let mut exchange = exchange_with(3, 6);
        assert!(matches!(
            exchange.reveal(),
            Err(GameError::ProtocolViolation(_))
        ));
        assert_eq!(exchange.state(), ExchangeState::Committed);
    }

    #[test]
    fn test_double_reveal_fails() {
        let mut exchange = exchange_with(3, 6);
        exchange.supply_counter_value(0).unwrap();
        exchange.reveal().unwrap();

        assert!(matches!(
            exchange.reveal(),
            Err(GameError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_counter_value_out_of_range() {
        let mut exchange = exchange_with(3, 6);
        assert_eq!(
            exchange.supply_counter_value(6).unwrap_err(),
            GameError::OutOfRange { value: 6, bound: 6 }
        );
        // Still waiting; a valid value is accepted afterwards
        assert_eq!(exchange.state(), ExchangeState::Committed);
        exchange.supply_counter_value(5).unwrap();
    }

    #[test]
    fn test_counter_value_supplied_twice_fails() {
        let mut exchange = exchange_with(3, 6);
        exchange.supply_counter_value(1).unwrap();
        assert!(matches!(
            exchange.supply_counter_value(2),
            Err(GameError::ProtocolViolation(_))
        ));
    }

    #[test]
    fn test_counter_value_equal_to_party_value_accepted() {
        let mut exchange = exchange_with(4, 6);
        exchange.supply_counter_value(4).unwrap();
        assert_eq!(exchange.reveal().unwrap().combined, 2);
    }

    #[test]
    fn test_revealed_result_verifies_against_published_digest() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(11));
        let mut exchange = FairRandomExchange::begin(&mut generator, 6).unwrap();
        let published = *exchange.digest();

        exchange.supply_counter_value(2).unwrap();
        let result = exchange.reveal().unwrap();

        assert_eq!(result.digest, published);
        assert!(verify(&result.secret_key, result.party_value, &published));
        assert!(result.verify());
    }

    #[test]
    fn test_tampered_result_fails_verification() {
        let mut exchange = exchange_with(3, 6);
        exchange.supply_counter_value(1).unwrap();
        let result = exchange.reveal().unwrap();

        let claimed = FairRandomResult {
            party_value: 4,
            combined: 5,
            ..result.clone()
        };
        assert!(!claimed.verify());

        let miscombined = FairRandomResult {
            combined: 0,
            ..result
        };
        assert!(!miscombined.verify());
    }

    #[test]
    fn test_begin_rejects_zero_bound() {
        let mut generator = CommitmentGenerator::with_rng(StdRng::seed_from_u64(1));
        assert_eq!(
            FairRandomExchange::begin(&mut generator, 0).unwrap_err(),
            GameError::InvalidBound
        );
    }

    #[test]
    fn test_combine_does_not_overflow() {
        assert_eq!(combine(u32::MAX - 1, u32::MAX - 1, u32::MAX), u32::MAX - 2);
    }

    proptest! {
        #[test]
        fn prop_combined_in_range(bound in 1u32..1000, a in any::<u32>(), b in any::<u32>()) {
            let (a, b) = (a % bound, b % bound);
            let mut exchange = exchange_with(a, bound);
            exchange.supply_counter_value(b).unwrap();
            let result = exchange.reveal().unwrap();

            prop_assert!(result.combined < bound);
            prop_assert_eq!(result.combined, (a + b) % bound);
            prop_assert!(result.verify());
        }
    }
}
