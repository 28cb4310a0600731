//! Cryptographic primitives for the fair dice game.
//!
//! This module provides:
//! - SecretKey and Digest for HMAC-SHA256 commitments
//! - Commitment and CommitmentGenerator for the commit-reveal scheme

mod commitment;

pub use commitment::{verify, Commitment, CommitmentGenerator, Digest, SecretKey, SECRET_KEY_LEN};
