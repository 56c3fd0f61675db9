// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An explicit, immutable default parameter set.

use crate::Digest;
use crate::error::{Error, Result};
use crate::keypair::KeyPair;
use crate::params::{ParameterSet, ParameterSetId};
use crate::ring::Ring;
use crate::ring_signature::RingSignature;
use crate::signing_key::SigningKey;
use crate::verifying_key::VerifyingKey;
use crate::{sign, verify};
use rand::CryptoRng;

/// Carries the parameter set used by its convenience methods.
///
/// A context never changes after construction. [`Context::set_active`]
/// returns a new context, so keys and signatures made under an older one keep
/// their parameter set and concurrent callers holding either context never
/// observe a switch.
///
/// ```
/// use chipmunk_ring::{Context, ParameterSet};
///
/// let ctx = Context::default();
/// assert_eq!(ctx.active(), &ParameterSet::BALANCED);
/// let fast = ctx.set_active(ParameterSet::FAST);
/// assert_eq!(ctx.active(), &ParameterSet::BALANCED);
/// assert_eq!(fast.active(), &ParameterSet::FAST);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Context {
    params: ParameterSet,
}

impl Context {
    /// A context over `params`.
    pub const fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    /// The active parameter set.
    pub fn active(&self) -> &ParameterSet {
        &self.params
    }

    /// A new context over `params`; `self` is unchanged.
    pub fn set_active(&self, params: ParameterSet) -> Self {
        tracing::debug!(from = self.params.name(), to = params.name(), "active parameter set changed");
        Self::new(params)
    }

    /// Key generation; deterministic when a 32-byte `seed` is given.
    pub fn keygen(&self, seed: Option<&[u8]>) -> Result<KeyPair> {
        crate::keygen(self.params, seed)
    }

    /// Key generation from a caller-provided RNG.
    pub fn generate(&self, rng: &mut impl CryptoRng) -> Result<KeyPair> {
        KeyPair::generate(self.params, rng)
    }

    /// Sign over a ring whose members all use the active parameter set.
    pub fn sign_ring(
        &self,
        signer_keys: &[(usize, &SigningKey)],
        digest: &Digest,
        ring: &[VerifyingKey],
        required_signers: u32,
        rng: &mut impl CryptoRng,
    ) -> Result<RingSignature> {
        let ring = self.ring(ring)?;
        sign::sign(signer_keys, digest, &ring, required_signers, rng)
    }

    /// Verify against a ring whose members all use the active parameter set.
    pub fn verify_ring(&self, signature: &RingSignature, digest: &Digest, ring: &[VerifyingKey]) -> Result<()> {
        let ring = self.ring(ring)?;
        verify::verify(signature, digest, &ring)
    }

    /// Encoded size of a signature over `ring_size` members.
    pub fn signature_size(&self, ring_size: u32) -> usize {
        crate::signature_size(ring_size, &self.params)
    }

    fn ring(&self, members: &[VerifyingKey]) -> Result<Ring> {
        let ring = Ring::try_from(members)?;
        if ring.params() != &self.params {
            return Err(Error::KeyTypeMismatch {
                expected: self.params.name(),
                got: ring.params().name(),
            });
        }
        Ok(ring)
    }
}

impl From<ParameterSet> for Context {
    fn from(params: ParameterSet) -> Self {
        Self::new(params)
    }
}

impl From<ParameterSetId> for Context {
    fn from(id: ParameterSetId) -> Self {
        Self::new(ParameterSet::select(id))
    }
}
