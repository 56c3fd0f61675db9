// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Domain-separated SHAKE256 helpers.
//!
//! Every derivation absorbs a domain label followed by length-prefixed
//! inputs, so no two call sites can produce colliding transcripts.

use sha3::Shake256;
use sha3::digest::{ExtendableOutput, Update, XofReader};

pub(crate) const DOMAIN_KEYGEN: &[u8] = b"ChipmunkRing/v1/keygen";
pub(crate) const DOMAIN_EXPAND: &[u8] = b"ChipmunkRing/v1/expand";
pub(crate) const DOMAIN_SECRET: &[u8] = b"ChipmunkRing/v1/secret";
pub(crate) const DOMAIN_MASK: &[u8] = b"ChipmunkRing/v1/mask";
pub(crate) const DOMAIN_SIMULATE: &[u8] = b"ChipmunkRing/v1/simulate";
pub(crate) const DOMAIN_LAYER_CHALLENGE: &[u8] = b"ChipmunkRing/v1/layer-challenge";
pub(crate) const DOMAIN_HOTS: &[u8] = b"ChipmunkRing/v1/hots-digest";
pub(crate) const DOMAIN_RING_ID: &[u8] = b"ChipmunkRing/v1/ring-id";
pub(crate) const DOMAIN_LEAF: &[u8] = b"ChipmunkRing/v1/leaf";
pub(crate) const DOMAIN_CHALLENGE: &[u8] = b"ChipmunkRing/v1/challenge";
pub(crate) const DOMAIN_BIND_LEAF: &[u8] = b"ChipmunkRing/v1/bind-leaf";
pub(crate) const DOMAIN_BIND_NODE: &[u8] = b"ChipmunkRing/v1/bind-node";
pub(crate) const DOMAIN_BIND_ROOT: &[u8] = b"ChipmunkRing/v1/bind-root";
pub(crate) const DOMAIN_CHIPMUNK_SIG: &[u8] = b"ChipmunkRing/v1/chipmunk-signature";

/// A SHAKE256 output stream.
pub(crate) struct XofStream {
    reader: sha3::Shake256Reader,
}

impl core::fmt::Debug for XofStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XofStream").finish_non_exhaustive()
    }
}

impl XofStream {
    pub(crate) fn new(domain: &[u8], inputs: &[&[u8]]) -> Self {
        let mut hasher = Shake256::default();
        absorb(&mut hasher, domain);
        for input in inputs {
            absorb(&mut hasher, input);
        }
        Self {
            reader: hasher.finalize_xof(),
        }
    }

    pub(crate) fn fill(&mut self, out: &mut [u8]) {
        self.reader.read(out);
    }

    pub(crate) fn next_u16(&mut self) -> u16 {
        let mut buf = [0u8; 2];
        self.reader.read(&mut buf);
        u16::from_le_bytes(buf)
    }

    pub(crate) fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.reader.read(&mut buf);
        u32::from_le_bytes(buf)
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.reader.read(&mut buf);
        u64::from_le_bytes(buf)
    }

    pub(crate) fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.reader.read(&mut out);
        out
    }
}

fn absorb(hasher: &mut Shake256, input: &[u8]) {
    hasher.update(&(input.len() as u64).to_be_bytes());
    hasher.update(input);
}

/// 32-byte domain-separated hash of the given inputs.
pub(crate) fn hash32(domain: &[u8], inputs: &[&[u8]]) -> [u8; 32] {
    XofStream::new(domain, inputs).array()
}
