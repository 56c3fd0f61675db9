// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sampling of secrets, masks, simulated responses and challenges.
//!
//! Rejection loops below only ever reject on fresh stream output, so the
//! number of iterations is independent of the value finally accepted.

use crate::hash::{DOMAIN_LAYER_CHALLENGE, XofStream};
use crate::params::CHALLENGE_WEIGHT;
use crate::poly::SparseTernary;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

/// Uniform mask in `(-2^log_b, 2^log_b]`.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn mask(stream: &mut XofStream, n: usize, log_b: u32) -> Zeroizing<Vec<i32>> {
    let bound = 1u32 << log_b;
    let span_mask = (bound << 1) - 1;
    let mut out = Zeroizing::new(vec![0i32; n]);
    for coeff in out.iter_mut() {
        let v = stream.next_u32() & span_mask;
        *coeff = bound as i32 - v as i32;
    }
    out
}

/// Uniform response in `[-limit, limit]`, the accepted range of a genuine one.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn uniform_response(
    stream: &mut XofStream,
    n: usize,
    log_b: u32,
    limit: u32,
) -> Vec<i32> {
    let span_mask = (2u32 << log_b) - 1;
    let span = 2 * limit + 1;
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let v = stream.next_u32() & span_mask;
        if v < span {
            out.push(v as i32 - limit as i32);
        }
    }
    out
}

/// Centered binomial distribution with parameter `eta`.
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn centered_binomial(stream: &mut XofStream, n: usize, eta: u32) -> Zeroizing<Vec<i32>> {
    let bits = (1u32 << eta) - 1;
    let mut out = Zeroizing::new(vec![0i32; n]);
    for coeff in out.iter_mut() {
        let v = stream.next_u32();
        let a = (v & bits).count_ones() as i32;
        let b = ((v >> eta) & bits).count_ones() as i32;
        *coeff = a - b;
    }
    out
}

/// Uniform ternary polynomial.
pub(crate) fn ternary(stream: &mut XofStream, n: usize) -> Zeroizing<Vec<i32>> {
    let mut out = Zeroizing::new(Vec::with_capacity(n));
    let mut buf = Zeroizing::new([0u8; 1]);
    while out.len() < n {
        stream.fill(&mut buf[..]);
        if buf[0] < 243 {
            out.push(i32::from(buf[0] % 3) - 1);
        }
    }
    out
}

/// Secret ternary vector of exactly `weight` nonzero entries.
///
/// Positions are drawn like `SampleInBall`, but the swap is performed with
/// constant-time selects over the whole prefix so the secret support never
/// shapes the memory access pattern.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn fixed_weight(stream: &mut XofStream, len: usize, weight: usize) -> Zeroizing<Vec<i32>> {
    let mut out = Zeroizing::new(vec![0i32; len]);
    let index_mask = len.next_power_of_two() - 1;
    let mut signs = stream.next_u64();
    for i in len - weight..len {
        let j = loop {
            let candidate = usize::from(stream.next_u16()) & index_mask;
            if candidate <= i {
                break candidate;
            }
        };
        let sign = 1 - 2 * (signs & 1) as i32;
        signs >>= 1;
        if (i - (len - weight)) % 64 == 63 {
            signs = stream.next_u64();
        }

        let mut moved = 0i32;
        for (k, value) in out.iter().enumerate().take(i + 1) {
            let hit = (k as u64).ct_eq(&(j as u64));
            moved.conditional_assign(value, hit);
        }
        out[i] = moved;
        for (k, value) in out.iter_mut().enumerate().take(i + 1) {
            let hit = (k as u64).ct_eq(&(j as u64));
            value.conditional_assign(&sign, hit);
        }
    }
    out
}

/// Public sparse ternary polynomial of the given weight (`SampleInBall`).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn sample_in_ball(stream: &mut XofStream, n: usize, weight: usize) -> SparseTernary {
    let mut coeffs = vec![0i32; n];
    let index_mask = n - 1;
    let mut signs = stream.next_u64();
    for (drawn, i) in (n - weight..n).enumerate() {
        let j = loop {
            let candidate = usize::from(stream.next_u16()) & index_mask;
            if candidate <= i {
                break candidate;
            }
        };
        coeffs[i] = coeffs[j];
        coeffs[j] = 1 - 2 * (signs & 1) as i32;
        signs >>= 1;
        if drawn % 64 == 63 {
            signs = stream.next_u64();
        }
    }
    let terms = coeffs
        .into_iter()
        .enumerate()
        .filter(|&(_, c)| c != 0)
        .collect();
    SparseTernary::new(n, terms)
}

/// Per-layer challenge polynomial derived from a 32-byte challenge share.
pub(crate) fn layer_challenge(share: &[u8; 32], label: &[u8], n: usize) -> SparseTernary {
    let mut stream = XofStream::new(DOMAIN_LAYER_CHALLENGE, &[label, share.as_slice()]);
    sample_in_ball(&mut stream, n, CHALLENGE_WEIGHT)
}
