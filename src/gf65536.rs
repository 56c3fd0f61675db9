// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar GF(2^16) arithmetic over GF(2)[x]/(x^16 + x^12 + x^3 + x + 1).

/// Reduction polynomial including the x^16 term.
const POLY: u32 = 0x1100B;

/// Multiply two GF(2^16) elements without data-dependent branches.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn mul(a: u16, b: u16) -> u16 {
    let mut a = u32::from(a);
    let b = u32::from(b);
    let mut p = 0u32;
    for i in 0..16 {
        p ^= a & 0u32.wrapping_sub((b >> i) & 1);
        a <<= 1;
        a ^= POLY & 0u32.wrapping_sub((a >> 16) & 1);
    }
    p as u16
}

/// Multiplicative inverse via a^(2^16 - 2); zero maps to zero.
pub(crate) fn inv(a: u16) -> u16 {
    let mut square = a;
    let mut acc = 1u16;
    for _ in 1..16 {
        square = mul(square, square);
        acc = mul(acc, square);
    }
    acc
}
