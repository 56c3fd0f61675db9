// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ChipmunkRing post-quantum threshold ring signatures.
//!
//! A ChipmunkRing signature proves that at least `t` members of a ring of
//! `n` lattice public keys signed a message, without revealing which. Each
//! ring position carries a four-layer proof (ring-LWE, NTRU, a quasi-cyclic
//! syndrome relation and the Chipmunk one-time relation); the per-position
//! challenges are shares of a degree `n - t` polynomial over GF(2^16) whose
//! constant term is the Fiat-Shamir challenge.
//!
//! # Parameter sets
//!
//! - [`ParameterSet::FAST`]
//! - [`ParameterSet::BALANCED`] (default)
//! - [`ParameterSet::MAXIMUM`]
//! - [`ParameterSet::PARANOID`]
//!
//! Every operation takes its parameter set explicitly; [`Context`] carries a
//! default for callers that want one.
//!
//! # Example
//!
//! ```
//! use chipmunk_ring::{ParameterSet, digest, keygen, sign_ring, verify_ring};
//!
//! let mut rng = rand::rng();
//! let keys = (0..4)
//!     .map(|_| keygen(ParameterSet::FAST, None))
//!     .collect::<Result<Vec<_>, _>>()
//!     .expect("keygen");
//! let ring: Vec<_> = keys.iter().map(|k| k.verifying_key().clone()).collect();
//!
//! let digest = digest(b"hello");
//! let sig = sign_ring(&[(2, keys[2].signing_key())], &digest, &ring, 1, &mut rng).expect("sign");
//! verify_ring(&sig, &digest, &ring).expect("verify");
//! assert!(verify_ring(&sig, &chipmunk_ring::digest(b"hellp"), &ring).is_err());
//! ```

pub mod chipmunk_signature;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod keypair;
pub mod params;
pub mod ring;
pub mod ring_signature;
pub mod signing_key;
pub mod verifying_key;

mod arith;
mod binding;
mod codec;
mod gf65536;
mod hash;
mod keygen;
mod layers;
mod ntt;
mod poly;
mod sample;
mod sign;
mod threshold;
mod verify;

pub use chipmunk_signature::ChipmunkSignature;
pub use context::Context;
pub use dispatch::{AnySignature, RingSigner, RingVerifier, SignatureType, VerificationKey};
pub use error::{Error, Result};
pub use keypair::KeyPair;
pub use params::{ParameterSet, ParameterSetId, ParameterValues};
pub use ring::Ring;
pub use ring_signature::RingSignature;
pub use signing_key::SigningKey;
pub use verifying_key::VerifyingKey;

use rand::CryptoRng;

/// A 32-byte message digest.
pub type Digest = [u8; 32];

/// Largest message accepted by [`sign_message`] and [`verify_message`].
pub const MAX_MESSAGE_SIZE: usize = 1 << 20;

/// SHA3-256 of a message.
pub fn digest(msg: &[u8]) -> Digest {
    use sha3::Digest as _;
    sha3::Sha3_256::digest(msg).into()
}

pub(crate) fn message_digest(msg: &[u8]) -> Result<Digest> {
    if msg.len() > MAX_MESSAGE_SIZE {
        return Err(Error::MessageTooLarge {
            size: msg.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(digest(msg))
}

/// Generate a keypair; deterministic when a 32-byte `seed` is given,
/// otherwise drawn from the thread-local CSPRNG.
pub fn keygen(params: ParameterSet, seed: Option<&[u8]>) -> Result<KeyPair> {
    match seed {
        Some(seed) => KeyPair::from_seed(params, seed),
        None => KeyPair::generate(params, &mut rand::rng()),
    }
}

/// Produce a `required_signers`-of-`ring.len()` signature over `digest`.
///
/// `signer_keys` pairs every contributing signing key with its position in
/// `ring`; exactly `required_signers` distinct positions must be given.
pub fn sign_ring(
    signer_keys: &[(usize, &SigningKey)],
    digest: &Digest,
    ring: &[VerifyingKey],
    required_signers: u32,
    rng: &mut impl CryptoRng,
) -> Result<RingSignature> {
    let ring = Ring::try_from(ring)?;
    sign::sign(signer_keys, digest, &ring, required_signers, rng)
}

/// Verify a ring signature over `digest` against `ring`.
pub fn verify_ring(signature: &RingSignature, digest: &Digest, ring: &[VerifyingKey]) -> Result<()> {
    let ring = Ring::try_from(ring).map_err(|err| {
        tracing::debug!(%err, "ring rejected before verification");
        err
    })?;
    verify::verify(signature, digest, &ring)
}

/// Verify several signatures, in parallel with the `parallel` feature.
///
/// Returns one result per `(signature, digest, ring)` triple, in order.
pub fn verify_batch(items: &[(&RingSignature, &Digest, &Ring)]) -> Vec<Result<()>> {
    verify::verify_batch(items)
}

/// Encoded size of a signature over `ring_size` members.
///
/// Equal to the length of every signature [`sign_ring`] produces for that
/// ring size, whatever the threshold.
pub fn signature_size(ring_size: u32, params: &ParameterSet) -> usize {
    params.signature_size(ring_size as usize)
}

/// [`sign_ring`] over the SHA3-256 digest of a message of at most
/// [`MAX_MESSAGE_SIZE`] bytes.
pub fn sign_message(
    signer_keys: &[(usize, &SigningKey)],
    msg: &[u8],
    ring: &[VerifyingKey],
    required_signers: u32,
    rng: &mut impl CryptoRng,
) -> Result<RingSignature> {
    let digest = message_digest(msg)?;
    sign_ring(signer_keys, &digest, ring, required_signers, rng)
}

/// [`verify_ring`] over the SHA3-256 digest of a message.
pub fn verify_message(signature: &RingSignature, msg: &[u8], ring: &[VerifyingKey]) -> Result<()> {
    let digest = message_digest(msg)?;
    verify_ring(signature, &digest, ring)
}

#[cfg(feature = "serde")]
#[cfg(test)]
mod tests {
    use super::*;
    use signature::Signer;

    fn keypair_serde(params: ParameterSet) {
        let keypair = keygen(params, None).expect("keygen");
        let serialized = serde_json::to_string(&keypair).expect("serialize");
        let deserialized: KeyPair = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(keypair, deserialized);

        let serialized = postcard::to_stdvec(&keypair).expect("serialize");
        let deserialized: KeyPair = postcard::from_bytes(&serialized).expect("deserialize");
        assert_eq!(keypair, deserialized);
    }

    fn chipmunk_signature_serde(params: ParameterSet) {
        let keypair = keygen(params, None).expect("keygen");
        let sig = keypair.signing_key().try_sign(b"hello world").expect("sign");
        let serialized = serde_json::to_string(&sig).expect("serialize");
        let deserialized: ChipmunkSignature = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);

        let serialized = postcard::to_stdvec(&sig).expect("serialize");
        let deserialized: ChipmunkSignature = postcard::from_bytes(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);
    }

    fn ring_signature_serde(params: ParameterSet) {
        let a = keygen(params, None).expect("keygen");
        let b = keygen(params, None).expect("keygen");
        let ring = [a.verifying_key().clone(), b.verifying_key().clone()];
        let mut rng = rand::rng();
        let sig = sign_message(&[(1, b.signing_key())], b"hello world", &ring, 1, &mut rng).expect("sign");
        let serialized = serde_json::to_string(&sig).expect("serialize");
        let deserialized: RingSignature = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);

        let serialized = postcard::to_stdvec(&sig).expect("serialize");
        let deserialized: RingSignature = postcard::from_bytes(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);
        verify_message(&deserialized, b"hello world", &ring).expect("verify");
    }

    #[test]
    fn keypair_serde_fast() {
        keypair_serde(ParameterSet::FAST);
    }
    #[test]
    fn keypair_serde_balanced() {
        keypair_serde(ParameterSet::BALANCED);
    }

    #[test]
    fn chipmunk_signature_serde_fast() {
        chipmunk_signature_serde(ParameterSet::FAST);
    }
    #[test]
    fn chipmunk_signature_serde_balanced() {
        chipmunk_signature_serde(ParameterSet::BALANCED);
    }

    #[test]
    fn ring_signature_serde_fast() {
        ring_signature_serde(ParameterSet::FAST);
    }

    #[test]
    fn parameter_set_id_serde() {
        let json = serde_json::to_string(&ParameterSetId::Paranoid).expect("serialize");
        assert_eq!(json, "\"PARANOID\"");
        let id: ParameterSetId = serde_json::from_str("\"FAST\"").expect("deserialize");
        assert_eq!(id, ParameterSetId::Fast);
    }
}
