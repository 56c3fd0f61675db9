// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polynomial arithmetic in `R_q = Z_q[X]/(X^n + 1)`.
//!
//! Polynomials are plain coefficient vectors of residues in `[0, q)`. Short
//! secrets and responses are carried as signed `i32` vectors and only lifted
//! into `R_q` when they meet a public operand.

use crate::arith::Modulus;
use crate::error::Result;
use crate::ntt::Ntt;
use zeroize::Zeroizing;

/// One polynomial ring together with its transform tables.
#[derive(Clone, Debug)]
pub(crate) struct PolyRing {
    n: usize,
    modulus: Modulus,
    ntt: Ntt,
}

impl PolyRing {
    pub(crate) fn new(n: usize, q: u32) -> Result<Self> {
        let modulus = Modulus::new(q);
        let ntt = Ntt::new(n, modulus)?;
        Ok(Self { n, modulus, ntt })
    }

    #[inline]
    pub(crate) fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub(crate) fn modulus(&self) -> Modulus {
        self.modulus
    }

    pub(crate) fn constant(&self, c: i32) -> Vec<u32> {
        let mut p = vec![0u32; self.n];
        p[0] = self.modulus.from_signed(c);
        p
    }

    pub(crate) fn from_signed(&self, a: &[i32]) -> Vec<u32> {
        a.iter().map(|&x| self.modulus.from_signed(x)).collect()
    }

    pub(crate) fn to_ntt(&self, a: &[u32]) -> Vec<u32> {
        let mut out = a.to_vec();
        self.ntt.forward(&mut out);
        out
    }

    /// Transform a short signed polynomial; the result is wiped on drop.
    pub(crate) fn signed_to_ntt(&self, a: &[i32]) -> Zeroizing<Vec<u32>> {
        let mut out = Zeroizing::new(self.from_signed(a));
        self.ntt.forward(&mut out);
        out
    }

    pub(crate) fn from_ntt(&self, mut a: Vec<u32>) -> Vec<u32> {
        self.ntt.inverse(&mut a);
        a
    }

    /// `acc += a ∘ b` in the transform domain.
    pub(crate) fn mul_acc(&self, acc: &mut [u32], a: &[u32], b: &[u32]) {
        let m = self.modulus;
        for ((c, &x), &y) in acc.iter_mut().zip(a).zip(b) {
            *c = m.add(*c, m.mul(x, y));
        }
    }

    /// `acc -= a ∘ b` in the transform domain.
    pub(crate) fn mul_sub(&self, acc: &mut [u32], a: &[u32], b: &[u32]) {
        let m = self.modulus;
        for ((c, &x), &y) in acc.iter_mut().zip(a).zip(b) {
            *c = m.sub(*c, m.mul(x, y));
        }
    }

    pub(crate) fn pointwise(&self, a: &[u32], b: &[u32]) -> Vec<u32> {
        let m = self.modulus;
        a.iter().zip(b).map(|(&x, &y)| m.mul(x, y)).collect()
    }

    /// Coefficient-domain product of two polynomials.
    pub(crate) fn mul(&self, a: &[u32], b: &[u32]) -> Vec<u32> {
        let product = self.pointwise(&self.to_ntt(a), &self.to_ntt(b));
        self.from_ntt(product)
    }

    pub(crate) fn add_assign(&self, acc: &mut [u32], b: &[u32]) {
        let m = self.modulus;
        for (c, &x) in acc.iter_mut().zip(b) {
            *c = m.add(*c, x);
        }
    }

    pub(crate) fn neg(&self, a: &[u32]) -> Vec<u32> {
        a.iter().map(|&x| self.modulus.neg(x)).collect()
    }

    /// Pointwise inverse of a transformed polynomial, if every slot is a unit.
    pub(crate) fn invert_ntt(&self, a_hat: &[u32]) -> Option<Vec<u32>> {
        let m = self.modulus;
        let mut invertible = true;
        let inv: Vec<u32> = a_hat
            .iter()
            .map(|&x| {
                invertible &= x != 0;
                m.inv(x)
            })
            .collect();
        invertible.then_some(inv)
    }
}

/// A sparse polynomial with coefficients in `{-1, 0, 1}`.
///
/// Challenges and digest polynomials are public, so their support may drive
/// control flow; the dense operand of [`SparseTernary::mul_small`] may be
/// secret and is touched uniformly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SparseTernary {
    n: usize,
    terms: Vec<(usize, i32)>,
}

impl SparseTernary {
    pub(crate) fn new(n: usize, terms: Vec<(usize, i32)>) -> Self {
        Self { n, terms }
    }

    /// Exact negacyclic product with a short integer polynomial.
    pub(crate) fn mul_small(&self, x: &[i32]) -> Zeroizing<Vec<i32>> {
        let n = self.n;
        let mut out = Zeroizing::new(vec![0i32; n]);
        for &(p, sign) in &self.terms {
            for k in 0..n - p {
                out[k + p] += sign * x[k];
            }
            for k in n - p..n {
                out[k + p - n] -= sign * x[k];
            }
        }
        out
    }

    pub(crate) fn to_poly(&self, ring: &PolyRing) -> Vec<u32> {
        let mut p = vec![0u32; self.n];
        for &(i, sign) in &self.terms {
            p[i] = ring.modulus().from_signed(sign);
        }
        p
    }
}

/// Infinity norm check `max |x_i| <= bound` that visits every coefficient.
pub(crate) fn within_bound(x: &[i32], bound: u32) -> bool {
    let mut over = 0u32;
    for &v in x {
        over |= bound.wrapping_sub(v.unsigned_abs()) >> 31;
    }
    over == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_product_matches_ring_product() {
        let ring = PolyRing::new(64, 12_289).expect("ring");
        let c = SparseTernary::new(64, vec![(0, 1), (5, -1), (63, 1)]);
        let x: Vec<i32> = (0..64).map(|i| (i % 5) - 2).collect();

        let exact = c.mul_small(&x);
        let via_ring = ring.mul(&c.to_poly(&ring), &ring.from_signed(&x));
        assert_eq!(ring.from_signed(&exact), via_ring);
    }

    #[test]
    fn bound_check() {
        assert!(within_bound(&[3, -3, 0], 3));
        assert!(!within_bound(&[3, -4, 0], 3));
        assert!(!within_bound(&[i32::MIN], 1 << 20));
    }

    #[test]
    fn inversion_in_transform_domain() {
        let ring = PolyRing::new(64, 12_289).expect("ring");
        // 1 + X evaluates to 1 + psi^k, which never vanishes since psi^k != -1.
        let mut f = ring.constant(1);
        f[1] = 1;
        let f_hat = ring.to_ntt(&f);
        let inv = ring.invert_ntt(&f_hat).expect("invertible");
        let one = ring.from_ntt(ring.pointwise(&f_hat, &inv));
        assert_eq!(one, ring.constant(1));
    }
}
