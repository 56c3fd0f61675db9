// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standalone Chipmunk signature.
//!
//! A Fiat-Shamir-with-aborts proof of the Chipmunk one-time relation
//! `A sigma = d v0 + v1`: the challenge seed hashes the verifying key, the
//! digest and the commitment, and the verifier recomputes the commitment
//! from the response.

use crate::Digest;
use crate::codec::Reader;
use crate::dispatch::SignatureType;
use crate::error::{Error, Result};
use crate::hash::{DOMAIN_CHIPMUNK_SIG, DOMAIN_MASK, XofStream, hash32};
use crate::layers::{Algebra, LayerKind};
use crate::params::{CHALLENGE_BYTES, MAX_SIGNING_ATTEMPTS, ParameterSet};
use crate::signing_key::SigningKey;
use crate::verifying_key::VerifyingKey;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// A standalone Chipmunk signature.
#[derive(Clone)]
pub struct ChipmunkSignature {
    bytes: Vec<u8>,
    params: ParameterSet,
}

impl PartialEq for ChipmunkSignature {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ChipmunkSignature {}

impl AsRef<[u8]> for ChipmunkSignature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl core::fmt::Debug for ChipmunkSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChipmunkSignature")
            .field("parameter_set", &self.params.name())
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

impl ChipmunkSignature {
    /// Decode a signature over a catalogue parameter set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        reader.u16().ok_or(Error::CorruptSignature {
            reason: "truncated header",
        })?;
        let id = reader.u16().ok_or(Error::CorruptSignature {
            reason: "truncated header",
        })?;
        Self::from_bytes_with_params(ParameterSet::from_id(id)?, bytes)
    }

    /// Decode a signature whose parameter set may be a custom one.
    pub fn from_bytes_with_params(params: ParameterSet, bytes: &[u8]) -> Result<Self> {
        let expected = params.chipmunk_signature_size();
        if bytes.len() != expected {
            return Err(Error::CorruptSignature {
                reason: "signature length does not match the parameter set",
            });
        }
        let mut reader = Reader::new(bytes);
        if reader.u16() != Some(SignatureType::Chipmunk.tag()) {
            return Err(Error::CorruptSignature {
                reason: "not a chipmunk signature",
            });
        }
        if reader.u16() != Some(params.id()) {
            return Err(Error::CorruptSignature {
                reason: "parameter set mismatch",
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            params,
        })
    }

    /// Wire encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// The parameter set the signature was made under.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    fn challenge_seed(&self) -> [u8; CHALLENGE_BYTES] {
        let mut seed = [0u8; CHALLENGE_BYTES];
        seed.copy_from_slice(&self.bytes[4..4 + CHALLENGE_BYTES]);
        seed
    }

    fn response_bytes(&self) -> &[u8] {
        &self.bytes[4 + CHALLENGE_BYTES..]
    }
}

impl TryFrom<&[u8]> for ChipmunkSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for ChipmunkSignature {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl TryFrom<&Vec<u8>> for ChipmunkSignature {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Box<[u8]>> for ChipmunkSignature {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl From<ChipmunkSignature> for Vec<u8> {
    fn from(sig: ChipmunkSignature) -> Vec<u8> {
        sig.bytes
    }
}

impl signature::SignatureEncoding for ChipmunkSignature {
    type Repr = Vec<u8>;
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChipmunkSignature {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ChipmunkSignature {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}

fn challenge_seed(vk_bytes: &[u8], digest: &Digest, commitment: &[u8]) -> [u8; CHALLENGE_BYTES] {
    hash32(DOMAIN_CHIPMUNK_SIG, &[vk_bytes, digest.as_slice(), commitment])
}

/// Sign a 32-byte digest.
pub(crate) fn sign_digest(
    signing_key: &SigningKey,
    digest: &Digest,
    rng: &mut impl rand::CryptoRng,
) -> Result<ChipmunkSignature> {
    let params = *signing_key.params();
    let kind = LayerKind::Chipmunk;
    let algebra = Algebra::new(params)?;
    let (public, secret) = signing_key.expand(&algebra);
    let vk_bytes = public.encode(&algebra);
    let statement = algebra.hots_statement(&public, digest);
    let witness = secret.hots_witness(&algebra, digest);

    let mut nonce = Zeroizing::new(vec![0u8; params.randomness_size()]);
    rng.fill_bytes(&mut nonce[..]);

    for attempt in 0..MAX_SIGNING_ATTEMPTS {
        let mut stream = XofStream::new(
            DOMAIN_MASK,
            &[
                kind.label(),
                signing_key.seed(),
                nonce.as_slice(),
                digest.as_slice(),
                attempt.to_be_bytes().as_slice(),
            ],
        );
        let y = algebra.mask(kind, &mut stream);
        let w = algebra.commit(kind, &statement, &y);
        let seed = challenge_seed(&vk_bytes, digest, &algebra.encode_commitment(kind, &w));
        let c = algebra.challenge(kind, &seed);
        let Some(z) = algebra.respond(kind, &c, &y, &witness) else {
            tracing::trace!(attempt, "chipmunk response rejected, restarting");
            continue;
        };

        let shape = algebra.shape(kind);
        let mut bytes = Vec::with_capacity(params.chipmunk_signature_size());
        bytes.extend_from_slice(&SignatureType::Chipmunk.tag().to_be_bytes());
        bytes.extend_from_slice(&params.id().to_be_bytes());
        bytes.extend_from_slice(&seed);
        shape.encode_response(&z, &mut bytes);
        tracing::debug!(parameter_set = params.name(), attempts = attempt + 1, "chipmunk signature created");
        return Ok(ChipmunkSignature { bytes, params });
    }
    Err(Error::RejectionSamplingExhausted {
        attempts: MAX_SIGNING_ATTEMPTS,
    })
}

/// Verify a signature over a 32-byte digest.
pub(crate) fn verify_digest(
    verifying_key: &VerifyingKey,
    digest: &Digest,
    signature: &ChipmunkSignature,
) -> Result<()> {
    if signature.params != *verifying_key.params() {
        tracing::debug!("chipmunk signature parameter set differs from the key");
        return Err(Error::InvalidSignature);
    }
    let kind = LayerKind::Chipmunk;
    let algebra = Algebra::new(signature.params)?;
    let public = verifying_key.material(&algebra)?;
    let statement = algebra.hots_statement(&public, digest);

    let seed = signature.challenge_seed();
    let z = algebra.shape(kind).decode_response(signature.response_bytes());
    let c = algebra.challenge(kind, &seed);
    let Some(w) = algebra.recompute(kind, &statement, &z, &c) else {
        tracing::debug!(check = "response norm", "chipmunk verification failed");
        return Err(Error::InvalidSignature);
    };
    let expected = challenge_seed(verifying_key.as_ref(), digest, &algebra.encode_commitment(kind, &w));
    if bool::from(expected.as_slice().ct_eq(seed.as_slice())) {
        Ok(())
    } else {
        tracing::debug!(check = "challenge", "chipmunk verification failed");
        Err(Error::InvalidSignature)
    }
}
