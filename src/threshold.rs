// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold closure of the ring challenge.
//!
//! A 32-byte challenge is read as sixteen GF(2^16) lanes. Ring position `i`
//! sits at x-coordinate `i + 1` and the aggregate challenge at `x = 0`. A
//! `t`-of-`n` proof is valid when all `n + 1` points lie on one polynomial of
//! degree at most `n - t`: non-signers fix `n - t` shares in advance, which
//! together with the challenge pin the polynomial and leave exactly the `t`
//! signer shares to be answered.

use crate::gf65536::{inv, mul};
use subtle::ConstantTimeEq;

/// A 32-byte challenge or challenge share.
pub(crate) type Share = [u8; 32];

const LANES: usize = 16;

fn lanes(share: &Share) -> [u16; LANES] {
    core::array::from_fn(|l| u16::from_le_bytes([share[2 * l], share[2 * l + 1]]))
}

fn to_share(lanes: &[u16; LANES]) -> Share {
    let mut out = [0u8; 32];
    for (chunk, lane) in out.chunks_exact_mut(2).zip(lanes) {
        chunk.copy_from_slice(&lane.to_le_bytes());
    }
    out
}

/// x-coordinate of a ring position.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn position_x(index: usize) -> u16 {
    (index + 1) as u16
}

/// Lagrange interpolation through a fixed point set, in barycentric form.
#[derive(Debug)]
pub(crate) struct Interpolator {
    xs: Vec<u16>,
    ys: Vec<[u16; LANES]>,
    weights: Vec<u16>,
}

impl Interpolator {
    /// Points must have pairwise distinct x-coordinates.
    pub(crate) fn new(points: &[(u16, Share)]) -> Self {
        let xs: Vec<u16> = points.iter().map(|(x, _)| *x).collect();
        let ys = points.iter().map(|(_, y)| lanes(y)).collect();
        let weights = xs
            .iter()
            .enumerate()
            .map(|(j, &xj)| {
                let denominator = xs
                    .iter()
                    .enumerate()
                    .filter(|&(m, _)| m != j)
                    .fold(1u16, |acc, (_, &xm)| mul(acc, xj ^ xm));
                inv(denominator)
            })
            .collect();
        Self { xs, ys, weights }
    }

    /// Evaluate at an `x` outside the interpolation set.
    pub(crate) fn evaluate(&self, x: u16) -> Share {
        let ell = self.xs.iter().fold(1u16, |acc, &xm| mul(acc, x ^ xm));
        let mut acc = [0u16; LANES];
        for ((&xj, yj), &wj) in self.xs.iter().zip(&self.ys).zip(&self.weights) {
            let basis = mul(mul(ell, inv(x ^ xj)), wj);
            for (a, &y) in acc.iter_mut().zip(yj) {
                *a ^= mul(basis, y);
            }
        }
        to_share(&acc)
    }
}

/// Answer the open positions given the challenge and the fixed shares.
///
/// `fixed` holds `n - t` `(position, share)` pairs and `open` the `t` signer
/// positions; the result is in the order of `open`.
pub(crate) fn close(challenge: &Share, fixed: &[(usize, Share)], open: &[usize]) -> Vec<Share> {
    let mut points = Vec::with_capacity(fixed.len() + 1);
    points.push((0u16, *challenge));
    points.extend(fixed.iter().map(|(i, s)| (position_x(*i), *s)));
    let interpolator = Interpolator::new(&points);
    open.iter()
        .map(|&i| interpolator.evaluate(position_x(i)))
        .collect()
}

/// Whether `(0, challenge)` and every share lie on a polynomial of degree
/// at most `shares.len() - threshold`.
pub(crate) fn consistent(challenge: &Share, shares: &[Share], threshold: usize) -> bool {
    let n = shares.len();
    if threshold == 0 || threshold > n {
        return false;
    }
    let degree = n - threshold;
    let mut points = Vec::with_capacity(degree + 1);
    points.push((0u16, *challenge));
    points.extend((0..degree).map(|i| (position_x(i), shares[i])));
    let interpolator = Interpolator::new(&points);

    let mut ok = subtle::Choice::from(1u8);
    for (i, share) in shares.iter().enumerate().skip(degree) {
        ok &= interpolator.evaluate(position_x(i)).as_slice().ct_eq(share.as_slice());
    }
    ok.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(seed: u8) -> Share {
        core::array::from_fn(|i| seed.wrapping_mul(31).wrapping_add(i as u8 * 7))
    }

    #[test]
    fn closing_produces_consistent_shares() {
        let n = 7;
        for t in 1..=n {
            // 2k + 1 mod 7 visits distinct positions.
            let signers: Vec<usize> = (0..t).map(|k| (2 * k + 1) % n).collect();
            let fixed: Vec<(usize, Share)> = (0..n)
                .filter(|i| !signers.contains(i))
                .map(|i| (i, share(i as u8 + 1)))
                .collect();
            let c = share(200);
            let answered = close(&c, &fixed, &signers);

            let mut all = vec![[0u8; 32]; n];
            for (i, s) in &fixed {
                all[*i] = *s;
            }
            for (i, s) in signers.iter().zip(answered) {
                all[*i] = s;
            }
            assert!(consistent(&c, &all, t), "t = {t}");
            if t < n {
                assert!(!consistent(&c, &all, t + 1), "t = {t}");
            }
        }
    }

    #[test]
    fn full_threshold_forces_equal_shares() {
        let c = share(9);
        let answered = close(&c, &[], &[0, 1, 2]);
        assert!(answered.iter().all(|s| *s == c));
    }

    #[test]
    fn tampered_share_is_detected() {
        let c = share(42);
        let fixed = vec![(0, share(1)), (2, share(3))];
        let answered = close(&c, &fixed, &[1]);
        let mut all = vec![share(1), answered[0], share(3)];
        assert!(consistent(&c, &all, 1));
        all[1][5] ^= 1;
        assert!(!consistent(&c, &all, 1));
        assert!(!consistent(&share(43), &[share(1), answered[0], share(3)], 1));
    }

    #[test]
    fn out_of_range_threshold_is_inconsistent() {
        let shares = vec![share(1), share(2)];
        assert!(!consistent(&share(0), &shares, 0));
        assert!(!consistent(&share(0), &shares, 3));
    }
}
