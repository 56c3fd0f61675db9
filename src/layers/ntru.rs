// SPDX-License-Identifier: Apache-2.0 OR MIT

//! NTRU layer.
//!
//! The key is `h = g / f` with `f = 1 + 2F` and ternary `F`, `g`. Since
//! `h f = g`, the pair `(F, g)` satisfies `2h F - g = -h`, a linear relation
//! in short unknowns.

use super::{Statement, Witness, into_witness};
use crate::hash::XofStream;
use crate::poly::PolyRing;
use crate::sample::ternary;
use zeroize::Zeroizing;

/// Returns `h` and the witness `[F, g]`.
///
/// Draws fresh `F` from the same stream until `f` is a unit.
pub(crate) fn generate(ring: &PolyRing, stream: &mut XofStream) -> (Vec<u32>, Witness) {
    let n = ring.n();
    loop {
        let big_f = ternary(stream, n);
        let g = ternary(stream, n);
        let mut f = Zeroizing::new(big_f.iter().map(|&c| 2 * c).collect::<Vec<i32>>());
        f[0] += 1;
        let f_hat = ring.signed_to_ntt(&f);
        if let Some(f_inv) = ring.invert_ntt(&f_hat) {
            let f_inv = Zeroizing::new(f_inv);
            let h = ring.from_ntt(ring.pointwise(&ring.signed_to_ntt(&g), &f_inv));
            return (h, into_witness([big_f, g]));
        }
    }
}

/// Row `[2h, -1]`, target `-h`.
pub(crate) fn statement(ring: &PolyRing, h: &[u32]) -> Statement {
    let m = ring.modulus();
    let h_hat = ring.to_ntt(h);
    let row = vec![
        h_hat.iter().map(|&x| m.add(x, x)).collect(),
        ring.to_ntt(&ring.constant(-1)),
    ];
    Statement::new(row, ring.neg(&h_hat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_satisfies_the_quotient() {
        let ring = PolyRing::new(128, 8_380_417).expect("ring");
        let mut stream = XofStream::new(b"test", &[]);
        let (h, x) = generate(&ring, &mut stream);
        // h (1 + 2F) = g
        let mut f = ring.from_signed(&x[0]);
        let m = ring.modulus();
        f.iter_mut().for_each(|c| *c = m.add(*c, *c));
        f[0] = m.add(f[0], 1);
        assert_eq!(ring.mul(&h, &f), ring.from_signed(&x[1]));
    }
}
