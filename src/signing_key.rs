// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing signing key.

use crate::chipmunk_signature::{ChipmunkSignature, sign_digest};
use crate::error::{Error, Result};
use crate::keygen::{PublicMaterial, SecretMaterial, derive};
use crate::layers::Algebra;
use crate::params::{ParameterSet, SEED_BYTES};
use crate::verifying_key::VerifyingKey;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A ChipmunkRing signing key: the parameter set id followed by a 32-byte
/// seed. All secret polynomials are re-derived from the seed on use.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    params: ParameterSet,
}

impl AsRef<[u8]> for SigningKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<&[u8]> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::InvalidKeyLength {
                expected: 2 + SEED_BYTES,
                got: bytes.len(),
            });
        }
        let params = ParameterSet::from_id(u16::from_be_bytes([bytes[0], bytes[1]]))?;
        Self::from_bytes_with_params(params, bytes)
    }
}

impl TryFrom<Vec<u8>> for SigningKey {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        let bytes = Zeroizing::new(bytes);
        Self::try_from(bytes.as_slice())
    }
}

impl TryFrom<&Vec<u8>> for SigningKey {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self> {
        Self::try_from(bytes.as_slice())
    }
}

impl TryFrom<Box<[u8]>> for SigningKey {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self> {
        let bytes = Zeroizing::new(bytes.into_vec());
        Self::try_from(bytes.as_slice())
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.params == other.params && bool::from(self.bytes.as_slice().ct_eq(other.bytes.as_slice()))
    }
}

impl Eq for SigningKey {}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("parameter_set", &self.params.name())
            .field("bytes", &"**FILTERED**")
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Build a signing key from a 32-byte seed.
    pub fn from_seed(params: ParameterSet, seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_BYTES {
            return Err(Error::InvalidSeedLength {
                expected: SEED_BYTES,
                got: seed.len(),
            });
        }
        let mut bytes = Vec::with_capacity(2 + SEED_BYTES);
        bytes.extend_from_slice(&params.id().to_be_bytes());
        bytes.extend_from_slice(seed);
        Ok(Self { bytes, params })
    }

    /// Decode a signing key whose parameter set may be a custom one.
    pub fn from_bytes_with_params(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let expected = params.signing_key_size();
        if bytes.len() != expected {
            return Err(Error::InvalidKeyLength {
                expected,
                got: bytes.len(),
            });
        }
        if bytes[..2] != params.id().to_be_bytes() {
            return Err(Error::MalformedKey);
        }
        Self::from_seed(params, &bytes[2..])
    }

    /// The parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Derive the matching verifying key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        let algebra = Algebra::new(self.params)?;
        let (public, _) = self.expand(&algebra);
        Ok(VerifyingKey::from_material(&algebra, &public))
    }

    /// Sign a message using a caller-provided RNG for the masking nonce.
    pub fn sign_with_rng(&self, rng: &mut impl rand::CryptoRng, msg: &[u8]) -> Result<ChipmunkSignature> {
        sign_digest(self, &crate::digest(msg), rng)
    }

    pub(crate) fn seed(&self) -> &[u8] {
        &self.bytes[2..]
    }

    pub(crate) fn expand(&self, algebra: &Algebra) -> (PublicMaterial, SecretMaterial) {
        let mut seed = Zeroizing::new([0u8; SEED_BYTES]);
        seed.copy_from_slice(self.seed());
        derive(algebra, &seed)
    }
}

impl signature::Signer<ChipmunkSignature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> core::result::Result<ChipmunkSignature, signature::Error> {
        let mut rng = rand::rng();
        self.sign_with_rng(&mut rng, msg).map_err(Into::into)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SigningKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SigningKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}
