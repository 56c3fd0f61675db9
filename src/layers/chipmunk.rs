// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chipmunk homomorphic one-time signature layer.
//!
//! The key holds `v0 = A s0` and `v1 = A s1` for ternary vectors `s0`, `s1`
//! of `gamma` polynomials. Signing a digest maps it to a sparse polynomial
//! `d`; the one-time signature `sigma = d s0 + s1` is short and satisfies
//! `A sigma = d v0 + v1`.

use super::{LayerKind, Statement, Witness, into_witness};
use crate::Digest;
use crate::hash::{DOMAIN_HOTS, XofStream};
use crate::keygen::expand_uniform;
use crate::params::HOTS_WEIGHT;
use crate::poly::{PolyRing, SparseTernary};
use crate::sample::{sample_in_ball, ternary};
use zeroize::Zeroizing;

#[allow(clippy::cast_possible_truncation)]
fn public_matrix(ring: &PolyRing, rho: &[u8; 32], gamma: usize) -> Vec<Vec<u32>> {
    (0..gamma)
        .map(|j| ring.to_ntt(&expand_uniform(ring, rho, LayerKind::Chipmunk.label(), j as u32)))
        .collect()
}

fn image(ring: &PolyRing, a_hat: &[Vec<u32>], s: &[Vec<i32>]) -> Vec<u32> {
    let mut acc = vec![0u32; ring.n()];
    for (a_j, s_j) in a_hat.iter().zip(s) {
        ring.mul_acc(&mut acc, a_j, &ring.signed_to_ntt(s_j));
    }
    ring.from_ntt(acc)
}

/// One-time key material.
#[derive(Debug)]
pub(crate) struct HotsKey {
    pub(crate) v0: Vec<u32>,
    pub(crate) v1: Vec<u32>,
    pub(crate) s0: Witness,
    pub(crate) s1: Witness,
}

pub(crate) fn generate(
    ring: &PolyRing,
    gamma: usize,
    rho: &[u8; 32],
    stream: &mut XofStream,
) -> HotsKey {
    let n = ring.n();
    let s0 = into_witness((0..gamma).map(|_| ternary(stream, n)));
    let s1 = into_witness((0..gamma).map(|_| ternary(stream, n)));
    let a_hat = public_matrix(ring, rho, gamma);
    HotsKey {
        v0: image(ring, &a_hat, &s0),
        v1: image(ring, &a_hat, &s1),
        s0,
        s1,
    }
}

/// The sparse polynomial a digest is signed as.
pub(crate) fn digest_poly(digest: &Digest, n: usize) -> SparseTernary {
    let mut stream = XofStream::new(DOMAIN_HOTS, &[digest.as_slice()]);
    sample_in_ball(&mut stream, n, HOTS_WEIGHT)
}

/// `sigma_j = d s0_j + s1_j`, computed exactly over the integers.
pub(crate) fn witness(d: &SparseTernary, s0: &[Vec<i32>], s1: &[Vec<i32>]) -> Witness {
    Zeroizing::new(
        s0.iter()
            .zip(s1)
            .map(|(s0_j, s1_j)| {
                let ds = d.mul_small(s0_j);
                ds.iter().zip(s1_j).map(|(&a, &b)| a + b).collect()
            })
            .collect(),
    )
}

/// Row `A`, target `d v0 + v1`.
pub(crate) fn statement(
    ring: &PolyRing,
    rho: &[u8; 32],
    gamma: usize,
    v0: &[u32],
    v1: &[u32],
    digest: &Digest,
) -> Statement {
    let d_hat = ring.to_ntt(&digest_poly(digest, ring.n()).to_poly(ring));
    let mut target = ring.to_ntt(v1);
    ring.mul_acc(&mut target, &d_hat, &ring.to_ntt(v0));
    Statement::new(public_matrix(ring, rho, gamma), target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_time_signature_opens_the_key() {
        let ring = PolyRing::new(128, 2_013_265_921).expect("ring");
        let rho = [2u8; 32];
        let mut stream = XofStream::new(b"test", &[]);
        let key = generate(&ring, 2, &rho, &mut stream);

        let digest = [8u8; 32];
        let d = digest_poly(&digest, 128);
        let mut unit = vec![0i32; 128];
        unit[0] = 1;
        assert_eq!(d.mul_small(&unit).iter().filter(|&&v| v != 0).count(), HOTS_WEIGHT);
        let sigma = witness(&d, &key.s0, &key.s1);
        assert!(sigma.iter().flatten().all(|c| c.unsigned_abs() <= 17));

        let a_hat = public_matrix(&ring, &rho, 2);
        let lhs = image(&ring, &a_hat, &sigma);
        let mut rhs = ring.mul(&d.to_poly(&ring), &key.v0);
        ring.add_assign(&mut rhs, &key.v1);
        assert_eq!(lhs, rhs);
    }
}
