// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing keypair generation.

use crate::error::{Error, Result};
use crate::params::{ParameterSet, SEED_BYTES};
use crate::signing_key::SigningKey;
use crate::verifying_key::VerifyingKey;
use rand::CryptoRng;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A ChipmunkRing keypair containing both signing and verifying keys.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl AsRef<VerifyingKey> for KeyPair {
    fn as_ref(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl signature::KeypairRef for KeyPair {
    type VerifyingKey = VerifyingKey;
}

impl core::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("signing_key", &self.signing_key)
            .field("verifying_key", &self.verifying_key)
            .finish()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.signing_key == other.signing_key && self.verifying_key == other.verifying_key
    }
}

impl Eq for KeyPair {}

impl Zeroize for KeyPair {
    fn zeroize(&mut self) {
        self.signing_key.zeroize();
    }
}

impl ZeroizeOnDrop for KeyPair {}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate(params: ParameterSet, rng: &mut impl CryptoRng) -> Result<Self> {
        let mut seed = Zeroizing::new([0u8; SEED_BYTES]);
        rng.fill_bytes(&mut seed[..]);
        Self::from_seed(params, &seed[..])
    }

    /// Generate a keypair from a specific seed.
    ///
    /// The seed must be exactly [`SEED_BYTES`] long; the same seed always
    /// yields the same keypair.
    pub fn from_seed(params: ParameterSet, seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_BYTES {
            return Err(Error::InvalidSeedLength {
                expected: SEED_BYTES,
                got: seed.len(),
            });
        }
        Self::from_signing_key(SigningKey::from_seed(params, seed)?)
    }

    /// Construct a keypair from a [`SigningKey`], deriving the corresponding [`VerifyingKey`].
    pub fn from_signing_key(signing_key: SigningKey) -> Result<Self> {
        let verifying_key = signing_key.verifying_key()?;
        tracing::debug!(parameter_set = signing_key.params().name(), "derived keypair");
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Get a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get a reference to the verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// The parameter set both keys belong to.
    pub fn params(&self) -> &ParameterSet {
        self.signing_key.params()
    }
}
