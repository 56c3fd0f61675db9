// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-width bit packing of polynomial coefficients.
//!
//! Values are written least-significant bit first into a contiguous byte
//! stream; a run of `count` values of `bits` bits occupies
//! `ceil(count * bits / 8)` bytes.

/// Bytes needed for `count` values of `bits` bits each.
pub(crate) const fn packed_len(count: usize, bits: u32) -> usize {
    (count * bits as usize).div_ceil(8)
}

/// Pack `values`, each below `2^bits`, into `out`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn pack(values: &[u32], bits: u32, out: &mut Vec<u8>) {
    let mut acc = 0u64;
    let mut filled = 0u32;
    for &v in values {
        acc |= u64::from(v) << filled;
        filled += bits;
        while filled >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            filled -= 8;
        }
    }
    if filled > 0 {
        out.push(acc as u8);
    }
}

/// Unpack `count` values of `bits` bits from `input`.
///
/// `input` must hold exactly [`packed_len`] bytes; callers check lengths
/// before decoding.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unpack(input: &[u8], count: usize, bits: u32) -> Vec<u32> {
    let mask = (1u64 << bits) - 1;
    let mut out = Vec::with_capacity(count);
    let mut acc = 0u64;
    let mut filled = 0u32;
    let mut bytes = input.iter();
    while out.len() < count {
        while filled < bits {
            let byte = bytes.next().copied().unwrap_or(0);
            acc |= u64::from(byte) << filled;
            filled += 8;
        }
        out.push((acc & mask) as u32);
        acc >>= bits;
        filled -= bits;
    }
    out
}

/// Pack residues of a public polynomial.
pub(crate) fn pack_poly(poly: &[u32], bits: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed_len(poly.len(), bits));
    pack(poly, bits, &mut out);
    out
}

/// Unpack a public polynomial, rejecting residues `>= q`.
pub(crate) fn unpack_poly(input: &[u8], n: usize, bits: u32, q: u32) -> Option<Vec<u32>> {
    if input.len() != packed_len(n, bits) {
        return None;
    }
    let poly = unpack(input, n, bits);
    poly.iter().all(|&c| c < q).then_some(poly)
}

/// Pack signed values in `[-2^(bits-1), 2^(bits-1))` by offsetting them.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn pack_signed(values: &[i32], bits: u32, out: &mut Vec<u8>) {
    let offset = 1i64 << (bits - 1);
    let shifted: Vec<u32> = values
        .iter()
        .map(|&v| (i64::from(v) + offset) as u32)
        .collect();
    pack(&shifted, bits, out);
}

/// Inverse of [`pack_signed`].
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unpack_signed(input: &[u8], count: usize, bits: u32) -> Vec<i32> {
    let offset = 1i64 << (bits - 1);
    unpack(input, count, bits)
        .into_iter()
        .map(|v| (i64::from(v) - offset) as i32)
        .collect()
}

/// Big-endian cursor over a byte slice.
#[derive(Debug)]
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.bytes.len() < len {
            return None;
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Some(head)
    }

    pub(crate) fn u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn u32(&mut self) -> Option<u32> {
        self.take(4).map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len()
    }
}
