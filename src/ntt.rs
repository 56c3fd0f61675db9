// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Negacyclic number-theoretic transform over `Z_q[X]/(X^n + 1)`.

use crate::arith::Modulus;
use crate::error::{Error, Result};

/// Precomputed twiddle factors for one `(n, q)` pair.
#[derive(Clone, Debug)]
pub(crate) struct Ntt {
    modulus: Modulus,
    zetas: Vec<u32>,
    n_inv: u32,
}

fn bit_reverse(mut k: usize, log_n: u32) -> usize {
    let mut r = 0;
    for _ in 0..log_n {
        r = (r << 1) | (k & 1);
        k >>= 1;
    }
    r
}

impl Ntt {
    /// Build tables for a power-of-two `n` with `q ≡ 1 (mod 2n)`.
    pub(crate) fn new(n: usize, modulus: Modulus) -> Result<Self> {
        let q = modulus.value();
        let two_n = 2 * n as u64;
        if !n.is_power_of_two() || (u64::from(q) - 1) % two_n != 0 {
            return Err(Error::InvalidParameters {
                reason: "modulus does not support a negacyclic NTT",
            });
        }
        // psi^n == -1 exactly when the generator candidate is a non-residue.
        let exponent = (u64::from(q) - 1) / two_n;
        let psi = (2..q.min(1 << 16))
            .map(|g| modulus.pow(g, exponent))
            .find(|&psi| modulus.pow(psi, n as u64) == q - 1)
            .ok_or(Error::InvalidParameters {
                reason: "no primitive 2n-th root of unity",
            })?;

        let log_n = n.trailing_zeros();
        let zetas = (0..n)
            .map(|k| modulus.pow(psi, bit_reverse(k, log_n) as u64))
            .collect();
        let n_inv = modulus.inv(modulus.reduce(n as u64));
        Ok(Self {
            modulus,
            zetas,
            n_inv,
        })
    }

    /// In-place forward transform, natural order in, bit-reversed out.
    pub(crate) fn forward(&self, a: &mut [u32]) {
        let m = self.modulus;
        let n = self.zetas.len();
        let mut k = 0;
        let mut len = n / 2;
        while len >= 1 {
            let mut start = 0;
            while start < n {
                k += 1;
                let zeta = self.zetas[k];
                for j in start..start + len {
                    let t = m.mul(zeta, a[j + len]);
                    a[j + len] = m.sub(a[j], t);
                    a[j] = m.add(a[j], t);
                }
                start += 2 * len;
            }
            len >>= 1;
        }
    }

    /// In-place inverse transform including the `n^-1` scaling.
    pub(crate) fn inverse(&self, a: &mut [u32]) {
        let m = self.modulus;
        let n = self.zetas.len();
        let mut k = n;
        let mut len = 1;
        while len < n {
            let mut start = 0;
            while start < n {
                k -= 1;
                let zeta = m.neg(self.zetas[k]);
                for j in start..start + len {
                    let t = a[j];
                    a[j] = m.add(t, a[j + len]);
                    a[j + len] = m.mul(zeta, m.sub(t, a[j + len]));
                }
                start += 2 * len;
            }
            len <<= 1;
        }
        for coeff in a.iter_mut() {
            *coeff = m.mul(*coeff, self.n_inv);
        }
    }
}
