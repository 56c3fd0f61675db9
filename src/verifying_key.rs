// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing verifying (public) key.

use crate::chipmunk_signature::{ChipmunkSignature, verify_digest};
use crate::error::{Error, Result};
use crate::keygen::PublicMaterial;
use crate::layers::Algebra;
use crate::params::ParameterSet;
use crate::signing_key::SigningKey;

/// A ChipmunkRing verifying key.
///
/// Holds the public polynomials of all four layers. Keys are validated on
/// construction: every packed coefficient is a reduced residue.
#[derive(Clone)]
pub struct VerifyingKey {
    bytes: Vec<u8>,
    params: ParameterSet,
}

impl AsRef<[u8]> for VerifyingKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::MalformedKey);
        }
        let params = ParameterSet::from_id(u16::from_be_bytes([bytes[0], bytes[1]]))?;
        Self::from_bytes_with_params(params, bytes)
    }
}

impl TryFrom<Vec<u8>> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::try_from(bytes.as_slice())
    }
}

impl TryFrom<&Vec<u8>> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self> {
        Self::try_from(bytes.as_slice())
    }
}

impl TryFrom<Box<[u8]>> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self> {
        Self::try_from(bytes.as_ref())
    }
}

impl TryFrom<&SigningKey> for VerifyingKey {
    type Error = Error;

    fn try_from(sk: &SigningKey) -> Result<Self> {
        sk.verifying_key()
    }
}

impl PartialEq for VerifyingKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for VerifyingKey {}

impl core::hash::Hash for VerifyingKey {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl core::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("parameter_set", &self.params.name())
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

impl VerifyingKey {
    /// Decode a verifying key whose parameter set may be a custom one.
    pub fn from_bytes_with_params(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let algebra = Algebra::new(params)?;
        PublicMaterial::decode(&algebra, bytes)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            params,
        })
    }

    /// The parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub(crate) fn from_material(algebra: &Algebra, public: &PublicMaterial) -> Self {
        Self {
            bytes: public.encode(algebra),
            params: *algebra.params(),
        }
    }

    /// Public polynomials; `algebra` must belong to this key's parameter set.
    pub(crate) fn material(&self, algebra: &Algebra) -> Result<PublicMaterial> {
        if algebra.params() != &self.params {
            return Err(Error::KeyTypeMismatch {
                expected: algebra.params().name(),
                got: self.params.name(),
            });
        }
        PublicMaterial::decode(algebra, &self.bytes)
    }
}

impl signature::Verifier<ChipmunkSignature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &ChipmunkSignature) -> core::result::Result<(), signature::Error> {
        verify_digest(self, &crate::digest(msg), signature).map_err(Into::into)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VerifyingKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VerifyingKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}
