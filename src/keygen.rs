// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key derivation and public-matrix expansion.
//!
//! A signing key is a 32-byte seed. SHAKE256 of the seed yields the public
//! seed `rho` followed by one secret seed per layer; public polynomials are
//! expanded from `rho` with AES-128-CTR.

use crate::Digest;
use crate::codec::{Reader, pack_poly, packed_len, unpack_poly};
use crate::error::{Error, Result};
use crate::hash::{DOMAIN_EXPAND, DOMAIN_KEYGEN, DOMAIN_SECRET, XofStream, hash32};
use crate::layers::{Algebra, LayerKind, Witness, chipmunk, code, ntru, ring_lwe};
use crate::poly::PolyRing;
use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use zeroize::Zeroizing;

type Aes128Ctr32 = ctr::Ctr32BE<Aes128>;

/// Expand a uniform polynomial from a public seed using AES-128-CTR.
///
/// Keystream words are masked to the bit length of `q` and rejected when
/// they land at or above `q`.
pub(crate) fn expand_uniform(ring: &PolyRing, rho: &[u8; 32], label: &[u8], index: u32) -> Vec<u32> {
    let key = hash32(DOMAIN_EXPAND, &[rho.as_slice(), label, index.to_be_bytes().as_slice()]);
    let iv = [0u8; 16];
    let mut cipher = Aes128Ctr32::new(key[..16].into(), &iv.into());

    let modulus = ring.modulus();
    let q = modulus.value();
    let mask = (1u32 << modulus.bits()) - 1;
    let mut out = Vec::with_capacity(ring.n());
    let mut block = [0u8; 64];
    while out.len() < ring.n() {
        block.fill(0);
        cipher.apply_keystream(&mut block);
        for word in block.chunks_exact(4) {
            let v = u32::from_le_bytes([word[0], word[1], word[2], word[3]]) & mask;
            if v < q && out.len() < ring.n() {
                out.push(v);
            }
        }
    }
    out
}

/// Public polynomials of a verifying key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PublicMaterial {
    pub(crate) rho: [u8; 32],
    pub(crate) ring_lwe_b: Vec<u32>,
    pub(crate) ntru_h: Vec<u32>,
    pub(crate) syndrome: Vec<u32>,
    pub(crate) hots_v0: Vec<u32>,
    pub(crate) hots_v1: Vec<u32>,
}

impl PublicMaterial {
    /// `id || rho || b || h || s || v0 || v1`, each polynomial packed at the
    /// bit length of its modulus.
    pub(crate) fn encode(&self, algebra: &Algebra) -> Vec<u8> {
        let bits = |kind| algebra.ring(kind).modulus().bits();
        let mut out = Vec::with_capacity(algebra.params().verifying_key_size());
        out.extend_from_slice(&algebra.params().id().to_be_bytes());
        out.extend_from_slice(&self.rho);
        out.extend(pack_poly(&self.ring_lwe_b, bits(LayerKind::RingLwe)));
        out.extend(pack_poly(&self.ntru_h, bits(LayerKind::Ntru)));
        out.extend(pack_poly(&self.syndrome, bits(LayerKind::Code)));
        out.extend(pack_poly(&self.hots_v0, bits(LayerKind::Chipmunk)));
        out.extend(pack_poly(&self.hots_v1, bits(LayerKind::Chipmunk)));
        out
    }

    pub(crate) fn decode(algebra: &Algebra, bytes: &[u8]) -> Result<Self> {
        let expected = algebra.params().verifying_key_size();
        if bytes.len() != expected {
            return Err(Error::InvalidKeyLength {
                expected,
                got: bytes.len(),
            });
        }
        let mut reader = Reader::new(bytes);
        if reader.u16() != Some(algebra.params().id()) {
            return Err(Error::MalformedKey);
        }
        let mut rho = [0u8; 32];
        rho.copy_from_slice(reader.take(32).ok_or(Error::MalformedKey)?);

        let mut section = |kind: LayerKind| -> Result<Vec<u32>> {
            let ring = algebra.ring(kind);
            let modulus = ring.modulus();
            let chunk = reader
                .take(packed_len(ring.n(), modulus.bits()))
                .ok_or(Error::MalformedKey)?;
            unpack_poly(chunk, ring.n(), modulus.bits(), modulus.value()).ok_or(Error::MalformedKey)
        };
        Ok(Self {
            rho,
            ring_lwe_b: section(LayerKind::RingLwe)?,
            ntru_h: section(LayerKind::Ntru)?,
            syndrome: section(LayerKind::Code)?,
            hots_v0: section(LayerKind::Chipmunk)?,
            hots_v1: section(LayerKind::Chipmunk)?,
        })
    }
}

/// Secret witnesses of a signing key.
#[derive(Debug)]
pub(crate) struct SecretMaterial {
    ring_lwe: Witness,
    ntru: Witness,
    code: Witness,
    hots_s0: Witness,
    hots_s1: Witness,
}

impl SecretMaterial {
    /// Per-layer witnesses for signing `digest`, in [`LayerKind`] order.
    pub(crate) fn witnesses(&self, algebra: &Algebra, digest: &Digest) -> Vec<Witness> {
        let d = chipmunk::digest_poly(digest, algebra.shape(LayerKind::Chipmunk).n());
        vec![
            self.ring_lwe.clone(),
            self.ntru.clone(),
            self.code.clone(),
            chipmunk::witness(&d, &self.hots_s0, &self.hots_s1),
        ]
    }

    /// The one-time witness alone, for standalone Chipmunk signatures.
    pub(crate) fn hots_witness(&self, algebra: &Algebra, digest: &Digest) -> Witness {
        let d = chipmunk::digest_poly(digest, algebra.shape(LayerKind::Chipmunk).n());
        chipmunk::witness(&d, &self.hots_s0, &self.hots_s1)
    }
}

/// Derive both halves of a key pair from its seed.
pub(crate) fn derive(algebra: &Algebra, seed: &[u8; 32]) -> (PublicMaterial, SecretMaterial) {
    let params = algebra.params();
    let values = params.values();
    let mut master = XofStream::new(
        DOMAIN_KEYGEN,
        &[params.id().to_be_bytes().as_slice(), seed.as_slice()],
    );
    let rho: [u8; 32] = master.array();
    let mut layer_stream = |kind: LayerKind| {
        let layer_seed = Zeroizing::new(master.array::<32>());
        XofStream::new(DOMAIN_SECRET, &[kind.label(), layer_seed.as_slice()])
    };
    let mut rlwe_stream = layer_stream(LayerKind::RingLwe);
    let mut ntru_stream = layer_stream(LayerKind::Ntru);
    let mut code_stream = layer_stream(LayerKind::Code);
    let mut hots_stream = layer_stream(LayerKind::Chipmunk);

    let (ring_lwe_b, ring_lwe) = ring_lwe::generate(
        algebra.ring(LayerKind::RingLwe),
        values.ring_lwe_sigma,
        &rho,
        &mut rlwe_stream,
    );
    let (ntru_h, ntru) = ntru::generate(algebra.ring(LayerKind::Ntru), &mut ntru_stream);
    let (syndrome, code) = code::generate(
        algebra.ring(LayerKind::Code),
        values.code_t,
        &rho,
        &mut code_stream,
    );
    let hots = chipmunk::generate(
        algebra.ring(LayerKind::Chipmunk),
        values.chipmunk_gamma,
        &rho,
        &mut hots_stream,
    );
    let public = PublicMaterial {
        rho,
        ring_lwe_b,
        ntru_h,
        syndrome,
        hots_v0: hots.v0,
        hots_v1: hots.v1,
    };
    let secret = SecretMaterial {
        ring_lwe,
        ntru,
        code,
        hots_s0: hots.s0,
        hots_s1: hots.s1,
    };
    (public, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    #[test]
    fn derivation_is_deterministic() {
        let algebra = Algebra::new(ParameterSet::FAST).expect("algebra");
        let (a, _) = derive(&algebra, &[1u8; 32]);
        let (b, _) = derive(&algebra, &[1u8; 32]);
        let (c, _) = derive(&algebra, &[2u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn public_material_encoding() {
        let algebra = Algebra::new(ParameterSet::FAST).expect("algebra");
        let (public, _) = derive(&algebra, &[1u8; 32]);
        let bytes = public.encode(&algebra);
        assert_eq!(bytes.len(), ParameterSet::FAST.verifying_key_size());
        assert_eq!(PublicMaterial::decode(&algebra, &bytes), Ok(public));

        assert_eq!(
            PublicMaterial::decode(&algebra, &bytes[1..]),
            Err(Error::InvalidKeyLength {
                expected: bytes.len(),
                got: bytes.len() - 1
            })
        );
        let mut wrong_set = bytes.clone();
        wrong_set[1] = 0x02;
        assert_eq!(PublicMaterial::decode(&algebra, &wrong_set), Err(Error::MalformedKey));
        // An all-ones section decodes to residues >= q.
        let mut oversized = bytes;
        oversized[40..48].fill(0xff);
        assert_eq!(PublicMaterial::decode(&algebra, &oversized), Err(Error::MalformedKey));
    }

    #[test]
    fn expansion_stays_below_q() {
        let ring = PolyRing::new(256, 8_380_417).expect("ring");
        let a = expand_uniform(&ring, &[0u8; 32], b"label", 0);
        let b = expand_uniform(&ring, &[0u8; 32], b"label", 1);
        assert_eq!(a.len(), 256);
        assert!(a.iter().all(|&c| c < 8_380_417));
        assert_ne!(a, b);
    }
}
