// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quasi-cyclic syndrome layer.
//!
//! A double-circulant parity check `[1 | h]` over `Z_q[X]/(X^k + 1)` maps an
//! error `(e0, e1)` of fixed Hamming weight `t` to the syndrome
//! `s = e0 + h e1`. The key publishes `s`; `h` is expanded from the key seed.

use super::{LayerKind, Statement, Witness};
use crate::hash::XofStream;
use crate::keygen::expand_uniform;
use crate::poly::PolyRing;
use crate::sample::fixed_weight;
use zeroize::Zeroizing;

fn parity_check(ring: &PolyRing, rho: &[u8; 32]) -> Vec<u32> {
    expand_uniform(ring, rho, LayerKind::Code.label(), 0)
}

/// Returns the syndrome and the witness `[e0, e1]`.
pub(crate) fn generate(
    ring: &PolyRing,
    weight: usize,
    rho: &[u8; 32],
    stream: &mut XofStream,
) -> (Vec<u32>, Witness) {
    let k = ring.n();
    let e = fixed_weight(stream, 2 * k, weight);
    let x = Zeroizing::new(vec![e[..k].to_vec(), e[k..].to_vec()]);
    let mut syndrome = ring.mul(&parity_check(ring, rho), &ring.from_signed(&x[1]));
    ring.add_assign(&mut syndrome, &ring.from_signed(&x[0]));
    (syndrome, x)
}

/// Row `[1, h]`, target `s`.
pub(crate) fn statement(ring: &PolyRing, rho: &[u8; 32], syndrome: &[u32]) -> Statement {
    let row = vec![
        ring.to_ntt(&ring.constant(1)),
        ring.to_ntt(&parity_check(ring, rho)),
    ];
    Statement::new(row, ring.to_ntt(syndrome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_the_requested_weight() {
        let ring = PolyRing::new(128, 8_380_417).expect("ring");
        let mut stream = XofStream::new(b"test", &[]);
        let (syndrome, x) = generate(&ring, 32, &[1u8; 32], &mut stream);
        let weight: usize = x.iter().map(|e| e.iter().filter(|&&c| c != 0).count()).sum();
        assert_eq!(weight, 32);
        assert_eq!(syndrome.len(), 128);
    }
}
