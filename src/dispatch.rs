// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signature-type dispatch.
//!
//! Every encoded signature starts with a big-endian `u16` type tag.
//! [`AnySignature`] decodes either variant from its tag, and the
//! [`RingSigner`] / [`RingVerifier`] pair exposes the ring engine through the
//! same [`signature::Signer`] / [`signature::Verifier`] traits the standalone
//! keys implement.

use crate::Digest;
use crate::chipmunk_signature::{self, ChipmunkSignature};
use crate::error::{Error, Result};
use crate::params::ParameterSet;
use crate::ring::Ring;
use crate::ring_signature::RingSignature;
use crate::signing_key::SigningKey;
use crate::verifying_key::VerifyingKey;
use crate::{sign, verify};
use rand::CryptoRng;

/// Wire type tag of an encoded signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SignatureType {
    /// Standalone Chipmunk signature.
    Chipmunk = 0x0107,
    /// ChipmunkRing threshold ring signature.
    ChipmunkRing = 0x0108,
}

impl SignatureType {
    /// The `u16` written at the start of the encoding.
    pub const fn tag(self) -> u16 {
        self as u16
    }

    /// Resolve a wire tag.
    pub fn from_tag(tag: u16) -> Result<Self> {
        match tag {
            0x0107 => Ok(Self::Chipmunk),
            0x0108 => Ok(Self::ChipmunkRing),
            other => Err(Error::UnknownSignatureType(other)),
        }
    }

    /// Read the tag at the start of an encoded signature.
    pub fn of(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [hi, lo, ..] => Self::from_tag(u16::from_be_bytes([*hi, *lo])),
            _ => Err(Error::CorruptSignature {
                reason: "truncated header",
            }),
        }
    }
}

/// The key a signature is checked against.
#[derive(Clone, Copy, Debug)]
pub enum VerificationKey<'a> {
    /// A single verifying key, for [`SignatureType::Chipmunk`].
    Single(&'a VerifyingKey),
    /// A ring, for [`SignatureType::ChipmunkRing`].
    Ring(&'a Ring),
}

impl VerificationKey<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "single key",
            Self::Ring(_) => "ring",
        }
    }
}

impl<'a> From<&'a VerifyingKey> for VerificationKey<'a> {
    fn from(key: &'a VerifyingKey) -> Self {
        Self::Single(key)
    }
}

impl<'a> From<&'a Ring> for VerificationKey<'a> {
    fn from(ring: &'a Ring) -> Self {
        Self::Ring(ring)
    }
}

/// Secret input for [`create_signature`].
#[derive(Clone, Copy, Debug)]
pub enum SigningMaterial<'a> {
    /// Produce a standalone Chipmunk signature.
    Single(&'a SigningKey),
    /// Produce a ring signature.
    Ring {
        /// `(position, key)` of every contributing signer.
        signers: &'a [(usize, &'a SigningKey)],
        /// The full ring.
        ring: &'a Ring,
        /// Threshold `t`.
        required_signers: u32,
    },
}

/// Either kind of signature, selected by its wire tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnySignature {
    /// Standalone Chipmunk signature.
    Chipmunk(ChipmunkSignature),
    /// ChipmunkRing threshold ring signature.
    ChipmunkRing(RingSignature),
}

impl AnySignature {
    /// Decode a signature of either type over a catalogue parameter set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match SignatureType::of(bytes)? {
            SignatureType::Chipmunk => ChipmunkSignature::from_bytes(bytes).map(Self::Chipmunk),
            SignatureType::ChipmunkRing => RingSignature::from_bytes(bytes).map(Self::ChipmunkRing),
        }
    }

    /// Wire encoding, tag included.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Chipmunk(sig) => sig.to_bytes(),
            Self::ChipmunkRing(sig) => sig.to_bytes(),
        }
    }

    /// The variant's wire tag.
    pub fn signature_type(&self) -> SignatureType {
        match self {
            Self::Chipmunk(_) => SignatureType::Chipmunk,
            Self::ChipmunkRing(_) => SignatureType::ChipmunkRing,
        }
    }

    /// The parameter set the signature was made under.
    pub fn params(&self) -> &ParameterSet {
        match self {
            Self::Chipmunk(sig) => sig.params(),
            Self::ChipmunkRing(sig) => sig.params(),
        }
    }

    /// Verify over a digest; the key kind must match the signature type.
    pub fn verify(&self, digest: &Digest, key: VerificationKey<'_>) -> Result<()> {
        match (self, key) {
            (Self::Chipmunk(sig), VerificationKey::Single(vk)) => {
                chipmunk_signature::verify_digest(vk, digest, sig)
            }
            (Self::ChipmunkRing(sig), VerificationKey::Ring(ring)) => verify::verify(sig, digest, ring),
            (sig, key) => Err(Error::KeyTypeMismatch {
                expected: match sig.signature_type() {
                    SignatureType::Chipmunk => "single key",
                    SignatureType::ChipmunkRing => "ring",
                },
                got: key.kind(),
            }),
        }
    }
}

impl From<ChipmunkSignature> for AnySignature {
    fn from(sig: ChipmunkSignature) -> Self {
        Self::Chipmunk(sig)
    }
}

impl From<RingSignature> for AnySignature {
    fn from(sig: RingSignature) -> Self {
        Self::ChipmunkRing(sig)
    }
}

impl TryFrom<&[u8]> for AnySignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

/// Sign a digest with whichever material is supplied.
pub fn create_signature(
    material: SigningMaterial<'_>,
    digest: &Digest,
    rng: &mut impl CryptoRng,
) -> Result<AnySignature> {
    match material {
        SigningMaterial::Single(key) => chipmunk_signature::sign_digest(key, digest, rng).map(Into::into),
        SigningMaterial::Ring {
            signers,
            ring,
            required_signers,
        } => sign::sign(signers, digest, ring, required_signers, rng).map(Into::into),
    }
}

/// A fixed set of cooperating signers over a ring.
///
/// Messages are hashed with SHA3-256 before signing; see
/// [`crate::sign_message`] for the size limit.
#[derive(Clone, Debug)]
pub struct RingSigner {
    ring: Ring,
    signers: Vec<(usize, SigningKey)>,
    required_signers: u32,
}

impl RingSigner {
    /// Bundle the ring, the signer keys with their positions, and `t`.
    ///
    /// Nothing is checked until the first signature is made.
    pub fn new(ring: Ring, signers: Vec<(usize, SigningKey)>, required_signers: u32) -> Self {
        Self {
            ring,
            signers,
            required_signers,
        }
    }

    /// The ring signed over.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Threshold `t`.
    pub fn required_signers(&self) -> u32 {
        self.required_signers
    }

    /// Sign a message using a caller-provided RNG.
    pub fn sign_with_rng(&self, rng: &mut impl CryptoRng, msg: &[u8]) -> Result<RingSignature> {
        let digest = crate::message_digest(msg)?;
        let signers: Vec<(usize, &SigningKey)> = self.signers.iter().map(|(i, key)| (*i, key)).collect();
        sign::sign(&signers, &digest, &self.ring, self.required_signers, rng)
    }
}

impl signature::Signer<RingSignature> for RingSigner {
    fn try_sign(&self, msg: &[u8]) -> core::result::Result<RingSignature, signature::Error> {
        let mut rng = rand::rng();
        self.sign_with_rng(&mut rng, msg).map_err(Into::into)
    }
}

/// Verifies ring signatures over one ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingVerifier {
    ring: Ring,
}

impl RingVerifier {
    /// Verifier for `ring`.
    pub fn new(ring: Ring) -> Self {
        Self { ring }
    }

    /// The ring verified against.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }
}

impl From<Ring> for RingVerifier {
    fn from(ring: Ring) -> Self {
        Self::new(ring)
    }
}

impl signature::Verifier<RingSignature> for RingVerifier {
    fn verify(&self, msg: &[u8], signature: &RingSignature) -> core::result::Result<(), signature::Error> {
        let digest = crate::message_digest(msg)?;
        verify::verify(signature, &digest, &self.ring).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    #[test]
    fn tags() {
        assert_eq!(SignatureType::Chipmunk.tag(), 0x0107);
        assert_eq!(SignatureType::ChipmunkRing.tag(), 0x0108);
        assert_eq!(SignatureType::from_tag(0x0108), Ok(SignatureType::ChipmunkRing));
        assert_eq!(SignatureType::from_tag(0x0200), Err(Error::UnknownSignatureType(0x0200)));
        assert!(matches!(SignatureType::of(&[0x01]), Err(Error::CorruptSignature { .. })));
    }

    #[test]
    fn key_kind_must_match() {
        let a = KeyPair::from_seed(ParameterSet::FAST, &[1u8; 32]).expect("keygen");
        let b = KeyPair::from_seed(ParameterSet::FAST, &[2u8; 32]).expect("keygen");
        let ring = Ring::new(vec![a.verifying_key().clone(), b.verifying_key().clone()]).expect("ring");
        let digest = crate::digest(b"dispatch");
        let mut rng = rand::rng();

        let single = create_signature(SigningMaterial::Single(a.signing_key()), &digest, &mut rng).expect("sign");
        assert_eq!(single.signature_type(), SignatureType::Chipmunk);
        single.verify(&digest, a.verifying_key().into()).expect("verify");
        assert_eq!(
            single.verify(&digest, (&ring).into()),
            Err(Error::KeyTypeMismatch {
                expected: "single key",
                got: "ring"
            })
        );

        let signers = [(1, b.signing_key())];
        let material = SigningMaterial::Ring {
            signers: &signers,
            ring: &ring,
            required_signers: 1,
        };
        let ring_sig = create_signature(material, &digest, &mut rng).expect("sign");
        let decoded = AnySignature::from_bytes(&ring_sig.to_bytes()).expect("decode");
        assert_eq!(decoded, ring_sig);
        decoded.verify(&digest, (&ring).into()).expect("verify");
        assert!(matches!(
            decoded.verify(&digest, a.verifying_key().into()),
            Err(Error::KeyTypeMismatch { .. })
        ));
    }
}
