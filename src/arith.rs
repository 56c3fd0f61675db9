// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constant-time arithmetic modulo a word-sized prime.

/// A prime modulus below 2^31 with a precomputed Barrett constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Modulus {
    q: u32,
    barrett: u64,
}

/// Subtract `q` from `r < 2q` when `r >= q`, without branching.
#[inline]
fn cond_sub(r: u64, q: u64) -> u64 {
    let t = r.wrapping_sub(q);
    let keep = 0u64.wrapping_sub(t >> 63);
    (r & keep) | (t & !keep)
}

impl Modulus {
    /// `q` must be an odd prime below 2^31.
    pub(crate) fn new(q: u32) -> Self {
        let barrett = ((1u128 << 64) / u128::from(q)) as u64;
        Self { q, barrett }
    }

    #[inline]
    pub(crate) fn value(self) -> u32 {
        self.q
    }

    /// Number of bits needed to store a reduced residue.
    pub(crate) fn bits(self) -> u32 {
        32 - (self.q - 1).leading_zeros()
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn reduce(self, x: u64) -> u32 {
        let quotient = ((u128::from(x) * u128::from(self.barrett)) >> 64) as u64;
        let r = x - quotient * u64::from(self.q);
        cond_sub(r, u64::from(self.q)) as u32
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn add(self, a: u32, b: u32) -> u32 {
        cond_sub(u64::from(a) + u64::from(b), u64::from(self.q)) as u32
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn sub(self, a: u32, b: u32) -> u32 {
        let q = u64::from(self.q);
        cond_sub(u64::from(a) + q - u64::from(b), q) as u32
    }

    #[inline]
    pub(crate) fn neg(self, a: u32) -> u32 {
        self.sub(0, a)
    }

    #[inline]
    pub(crate) fn mul(self, a: u32, b: u32) -> u32 {
        self.reduce(u64::from(a) * u64::from(b))
    }

    pub(crate) fn pow(self, base: u32, mut exp: u64) -> u32 {
        let mut acc = 1u32;
        let mut base = base;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = self.mul(acc, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        acc
    }

    /// Inverse by Fermat's little theorem; maps zero to zero.
    pub(crate) fn inv(self, a: u32) -> u32 {
        self.pow(a, u64::from(self.q - 2))
    }

    /// Map a signed value with `|x| < q` to its residue.
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn from_signed(self, x: i32) -> u32 {
        let v = i64::from(x) + i64::from(self.q);
        cond_sub(v as u64, u64::from(self.q)) as u32
    }
}

/// Deterministic Miller-Rabin for 32-bit integers.
pub(crate) fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    for p in [2u32, 3, 5, 7, 11, 13, 61] {
        if n % p == 0 {
            return n == p;
        }
    }
    let n64 = u64::from(n);
    let mut d = n64 - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }
    let mul = |a: u64, b: u64| (a * b) % n64;
    'witness: for a in [2u64, 7, 61] {
        let mut x = 1u64;
        let mut base = a;
        let mut e = d;
        while e > 0 {
            if e & 1 == 1 {
                x = mul(x, base);
            }
            base = mul(base, base);
            e >>= 1;
        }
        if x == 1 || x == n64 - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul(x, x);
            if x == n64 - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
