// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring-LWE layer: `a s + e = b` with binomial `s` and `e`.

use super::{LayerKind, Statement, Witness, into_witness};
use crate::hash::XofStream;
use crate::keygen::expand_uniform;
use crate::poly::PolyRing;
use crate::sample::centered_binomial;

fn public_a(ring: &PolyRing, rho: &[u8; 32]) -> Vec<u32> {
    expand_uniform(ring, rho, LayerKind::RingLwe.label(), 0)
}

/// Returns `b` and the witness `[s, e]`.
pub(crate) fn generate(
    ring: &PolyRing,
    eta: u32,
    rho: &[u8; 32],
    stream: &mut XofStream,
) -> (Vec<u32>, Witness) {
    let n = ring.n();
    let x = into_witness([
        centered_binomial(stream, n, eta),
        centered_binomial(stream, n, eta),
    ]);
    let a_hat = ring.to_ntt(&public_a(ring, rho));
    let mut b = ring.from_ntt(ring.pointwise(&a_hat, &ring.signed_to_ntt(&x[0])));
    ring.add_assign(&mut b, &ring.from_signed(&x[1]));
    (b, x)
}

/// Row `[a, 1]`, target `b`.
pub(crate) fn statement(ring: &PolyRing, rho: &[u8; 32], b: &[u32]) -> Statement {
    let row = vec![
        ring.to_ntt(&public_a(ring, rho)),
        ring.to_ntt(&ring.constant(1)),
    ];
    Statement::new(row, ring.to_ntt(b))
}
